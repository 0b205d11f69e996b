// Administrator actions: room management and payment confirmation.
// Gating and notices work the same way as the tenant dashboard.

use tracing::debug;

use crate::api::RentalApi;
use crate::dashboard::{reject, settle, ActionError};
use crate::draft::ProofFile;
use crate::models::{MessageResponse, Payment, PaymentStatus, Room, RoomStatus, User};
use crate::notice::{Notice, Notifier};

/// Fields of the room create/edit form, sent as multipart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoomForm {
    pub name: String,
    pub room_type: String,
    pub facilities: String,
    pub monthly_price: u64,
    pub status: RoomStatus,
    pub capacity: u32,
    pub floor: i32,
    pub description: String,
    pub image: Option<ProofFile>,
}

impl RoomForm {
    /// Prefill the edit form from an existing room. The image is kept server-side unless replaced.
    pub fn from_room(room: &Room) -> Self {
        Self {
            name: room.name.clone(),
            room_type: room.room_type.clone(),
            facilities: room.facilities.items().join(", "),
            monthly_price: room.monthly_price(),
            status: room.status,
            capacity: room.capacity,
            floor: room.floor,
            description: room.description.clone(),
            image: None,
        }
    }

    pub fn validate(&self) -> Result<(), ActionError> {
        if self.name.trim().is_empty() {
            return Err(ActionError::MissingField("Room name"));
        }
        if self.room_type.trim().is_empty() {
            return Err(ActionError::MissingField("Room type"));
        }
        if self.monthly_price == 0 {
            return Err(ActionError::MissingField("Monthly price"));
        }
        if self.capacity == 0 {
            return Err(ActionError::MissingField("Capacity"));
        }
        if self.status.wire_name().is_none() {
            return Err(ActionError::MissingField("Status"));
        }
        Ok(())
    }

    /// Text fields in backend naming; the image travels separately as the `image` part.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("nomor_kamar", self.name.trim().to_string()),
            ("tipe_kamar", self.room_type.trim().to_string()),
            ("fasilitas", self.facilities.trim().to_string()),
            ("harga_per_bulan", self.monthly_price.to_string()),
            ("capacity", self.capacity.to_string()),
            ("floor", self.floor.to_string()),
            ("description", self.description.trim().to_string()),
        ];
        if let Some(status) = self.status.wire_name() {
            fields.push(("status", status.to_string()));
        }
        fields
    }
}

pub struct AdminConsole<'a, A: RentalApi + ?Sized, N: Notifier> {
    api: &'a A,
    notifier: N,
}

impl<'a, A: RentalApi + ?Sized, N: Notifier> AdminConsole<'a, A, N> {
    /// Only users with the `admin` role get a console.
    pub fn new(api: &'a A, user: &User, notifier: N) -> Result<Self, ActionError> {
        if !user.is_admin() {
            return reject(&notifier, ActionError::NotAdmin);
        }
        Ok(Self { api, notifier })
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub async fn create_room(&self, form: RoomForm) -> Result<Room, ActionError> {
        if let Err(e) = form.validate() {
            return reject(&self.notifier, e);
        }
        let outcome = self.api.create_room(form).await;
        settle(&self.notifier, outcome, Notice::success("Room created"), "Failed to create room")
    }

    pub async fn update_room(&self, room_id: u64, form: RoomForm) -> Result<Room, ActionError> {
        if let Err(e) = form.validate() {
            return reject(&self.notifier, e);
        }
        let outcome = self.api.update_room(room_id, form).await;
        settle(&self.notifier, outcome, Notice::success("Room updated"), "Failed to update room")
    }

    pub async fn delete_room(&self, room_id: u64, confirmed: bool) -> Result<MessageResponse, ActionError> {
        if !confirmed {
            return reject(&self.notifier, ActionError::NotAcknowledged);
        }
        let outcome = self.api.delete_room(room_id).await;
        settle(&self.notifier, outcome, Notice::success("Room deleted"), "Failed to delete room")
    }

    /// Payments still waiting for an administrator, oldest first as the backend lists them.
    pub async fn pending_payments(&self) -> Result<Vec<Payment>, ActionError> {
        match self.api.list_payments().await {
            Ok(payments) => {
                let pending: Vec<Payment> = payments
                    .into_iter()
                    .filter(|p| p.status == PaymentStatus::Pending)
                    .collect();
                debug!(count = pending.len(), "pending payments");
                Ok(pending)
            }
            Err(e) => {
                self.notifier
                    .notify(Notice::error("Failed to load payments").with_description(e.user_message()));
                Err(ActionError::Rejected(e))
            }
        }
    }

    pub async fn confirm_payment(&self, payment_id: u64) -> Result<MessageResponse, ActionError> {
        let outcome = self.api.confirm_payment(payment_id).await;
        settle(
            &self.notifier,
            outcome,
            Notice::success("Payment confirmed"),
            "Failed to confirm payment",
        )
    }
}

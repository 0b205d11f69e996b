// Backend interface consumed by the booking wizard and the tenant dashboard.
// The REST service itself lives elsewhere; this is the client's view of it.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::admin::RoomForm;
use crate::draft::{BookingSubmission, ProofFile};
use crate::models::{
    Booking, ContactMessage, LoginResponse, MessageResponse, NewReview, Payment, PaymentReminder,
    Profile, ProfileUpdate, ProfileUpdateResponse, ProofUploadResponse, RegisterResponse,
    Registration, Review, Room,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl ApiError {
    /// Text shown to the user. Backend rejections are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            ApiError::InvalidResponse(message) => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Pull the human-readable message out of a failed response body.
pub fn error_message_from_body(status: u16, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => ["message", "error"]
            .iter()
            .find_map(|key| {
                json.get(*key)
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("Server error {}", status)),
        Err(_) if status == 404 => "API Endpoint not found (404).".to_string(),
        Err(_) => format!("Server error {}", status),
    }
}

#[async_trait]
pub trait RentalApi: Send + Sync {
    // Auth; the session itself lives in cookies
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError>;
    async fn logout(&self) -> Result<MessageResponse, ApiError>;
    async fn register(&self, registration: Registration) -> Result<RegisterResponse, ApiError>;

    // Rooms
    async fn get_room(&self, room_id: &str) -> Result<Room, ApiError>;
    async fn list_rooms(&self) -> Result<Vec<Room>, ApiError>;

    // Bookings
    async fn create_booking_with_proof(&self, submission: BookingSubmission) -> Result<Booking, ApiError>;
    async fn list_my_bookings(&self) -> Result<Vec<Booking>, ApiError>;
    async fn cancel_booking(&self, booking_id: u64) -> Result<MessageResponse, ApiError>;
    async fn extend_booking(&self, booking_id: u64, months: u32) -> Result<Payment, ApiError>;

    // Payments
    async fn upload_payment_proof(&self, payment_id: u64, proof: ProofFile) -> Result<ProofUploadResponse, ApiError>;
    async fn list_reminders(&self) -> Result<Vec<PaymentReminder>, ApiError>;

    // Reviews
    async fn list_room_reviews(&self, room_id: &str) -> Result<Vec<Review>, ApiError>;
    async fn list_reviews(&self) -> Result<Vec<Review>, ApiError>;
    async fn create_review(&self, review: NewReview) -> Result<Review, ApiError>;

    // Profile
    async fn get_profile(&self) -> Result<Profile, ApiError>;
    async fn update_profile(&self, update: ProfileUpdate) -> Result<ProfileUpdateResponse, ApiError>;
    async fn change_password(&self, old_password: &str, new_password: &str) -> Result<MessageResponse, ApiError>;

    async fn send_contact_form(&self, message: ContactMessage) -> Result<MessageResponse, ApiError>;

    // Admin only
    async fn create_room(&self, form: RoomForm) -> Result<Room, ApiError>;
    async fn update_room(&self, room_id: u64, form: RoomForm) -> Result<Room, ApiError>;
    async fn delete_room(&self, room_id: u64) -> Result<MessageResponse, ApiError>;
    async fn list_payments(&self) -> Result<Vec<Payment>, ApiError>;
    async fn confirm_payment(&self, payment_id: u64) -> Result<MessageResponse, ApiError>;
}

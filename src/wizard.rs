//! Three-step booking wizard: personal info, booking details, payment.
//!
//! The wizard owns a [`BookingDraft`] for its whole lifetime. Moving between
//! the input steps never touches the draft; the only side effect is the single
//! booking-creation request issued from the payment step.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ApiError, RentalApi};
use crate::catalog::guest_limit;
use crate::draft::{BookingDraft, BookingSubmission, DraftDefaults, MissingField, PaymentMethod, ProofFile};
use crate::models::{Booking, Room};
use crate::notice::{Notice, Notifier};
use crate::pricing::{self, PaymentBreakdown};

pub const PROOF_REQUIRED_MESSAGE: &str = "Please upload payment proof before completing booking.";
pub const MOVE_IN_REQUIRED_MESSAGE: &str = "Please choose a move-in date before completing booking.";
const ROOM_LOAD_FAILED_MESSAGE: &str = "Failed to load room details. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    PersonalInfo,
    Details,
    Payment,
    Submitting,
    Complete,
}

impl WizardStep {
    /// 1-based position among the three input steps.
    pub fn number(self) -> Option<u8> {
        match self {
            WizardStep::PersonalInfo => Some(1),
            WizardStep::Details => Some(2),
            WizardStep::Payment | WizardStep::Submitting => Some(3),
            WizardStep::Complete => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::PersonalInfo => "Personal Info",
            WizardStep::Details => "Booking Details",
            WizardStep::Payment | WizardStep::Submitting => "Payment",
            WizardStep::Complete => "Booking Confirmed",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WizardError {
    #[error("{}", MOVE_IN_REQUIRED_MESSAGE)]
    MissingMoveInDate,

    #[error("{}", PROOF_REQUIRED_MESSAGE)]
    ProofRequired,

    #[error("Submission is only possible from the payment step")]
    NotOnPaymentStep,

    #[error("No submission in progress")]
    NotSubmitting,

    #[error("A booking request is already in flight")]
    Busy,

    #[error("Booking already completed")]
    Finished,

    #[error("{}", .0.user_message())]
    Rejected(ApiError),
}

impl From<MissingField> for WizardError {
    fn from(missing: MissingField) -> Self {
        match missing {
            MissingField::MoveInDate => WizardError::MissingMoveInDate,
            MissingField::ProofOfPayment => WizardError::ProofRequired,
        }
    }
}

/// What the confirmation screen shows once the backend accepted the booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub booking_id: u64,
    pub display_id: String,
    pub payment_method: PaymentMethod,
    pub breakdown: PaymentBreakdown,
}

pub struct BookingWizard<N: Notifier> {
    room_id: String,
    room: Room,
    draft: BookingDraft,
    step: WizardStep,
    confirmation: Option<Confirmation>,
    notifier: N,
}

impl<N: Notifier> BookingWizard<N> {
    pub fn new(room_id: impl Into<String>, room: Room, defaults: &DraftDefaults, notifier: N) -> Self {
        let mut draft = BookingDraft::with_defaults(defaults);
        draft.guests = draft.guests.min(guest_limit(&room));

        Self {
            room_id: room_id.into(),
            room,
            draft,
            step: WizardStep::PersonalInfo,
            confirmation: None,
            notifier,
        }
    }

    /// Open the wizard for a room, fetching its price and capacity first.
    /// A failed fetch still opens the wizard, on a placeholder room.
    pub async fn load<A>(api: &A, room_id: &str, defaults: &DraftDefaults, notifier: N) -> Self
    where
        A: RentalApi + ?Sized,
    {
        let room = if room_id.starts_with("mock-") {
            debug!(room_id, "skipping fetch for demo room");
            None
        } else {
            match api.get_room(room_id).await {
                Ok(room) => Some(room),
                Err(e) => {
                    warn!(room_id, error = %e, "room fetch failed");
                    notifier.notify(Notice::error(ROOM_LOAD_FAILED_MESSAGE));
                    None
                }
            }
        };

        let room = room.unwrap_or_else(|| Room::placeholder(room_id));
        Self::new(room_id, room, defaults, notifier)
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.step == WizardStep::Submitting
    }

    pub fn progress_percent(&self) -> u8 {
        match self.step.number() {
            Some(n) => (n as u16 * 100 / 3) as u8,
            None => 100,
        }
    }

    pub fn max_guests(&self) -> u32 {
        guest_limit(&self.room)
    }

    pub fn breakdown(&self) -> PaymentBreakdown {
        pricing::breakdown(
            self.room.monthly_price(),
            self.draft.duration_months,
            self.draft.payment_type,
        )
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        match self.step {
            WizardStep::Submitting => Err(WizardError::Busy),
            WizardStep::Complete => Err(WizardError::Finished),
            _ => Ok(()),
        }
    }

    /// Change draft fields. Rejected while a request is in flight or after completion.
    pub fn edit(&mut self, f: impl FnOnce(&mut BookingDraft)) -> Result<(), WizardError> {
        self.ensure_editable()?;
        f(&mut self.draft);
        self.draft.duration_months = self.draft.duration_months.max(1);
        self.draft.guests = self.draft.guests.clamp(1, self.max_guests());
        Ok(())
    }

    pub fn attach_proof(&mut self, proof: ProofFile) -> Result<(), WizardError> {
        debug!(file = %proof.file_name, bytes = proof.len(), "proof attached");
        self.edit(|draft| draft.proof = Some(proof))
    }

    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_editable()?;
        self.step = match self.step {
            WizardStep::PersonalInfo => WizardStep::Details,
            WizardStep::Details | WizardStep::Payment => WizardStep::Payment,
            other => other,
        };
        debug!(step = ?self.step, "wizard advanced");
        Ok(self.step)
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_editable()?;
        self.step = match self.step {
            WizardStep::Payment => WizardStep::Details,
            WizardStep::Details | WizardStep::PersonalInfo => WizardStep::PersonalInfo,
            other => other,
        };
        debug!(step = ?self.step, "wizard went back");
        Ok(self.step)
    }

    /// First half of submission: run the local guard and enter `Submitting`.
    /// Nothing leaves the client unless this returns `Ok`.
    pub fn begin_submit(&mut self) -> Result<BookingSubmission, WizardError> {
        self.ensure_editable()?;
        if self.step != WizardStep::Payment {
            return Err(WizardError::NotOnPaymentStep);
        }

        match BookingSubmission::from_draft(&self.room_id, &self.draft) {
            Ok(submission) => {
                self.step = WizardStep::Submitting;
                info!(
                    room_id = %submission.room_id,
                    start = %submission.start_date,
                    months = submission.duration_months,
                    payment_type = submission.payment_type.as_str(),
                    payment_method = submission.payment_method.as_str(),
                    with_proof = submission.proof.is_some(),
                    "submitting booking"
                );
                Ok(submission)
            }
            Err(missing) => {
                let error = WizardError::from(missing);
                debug!(?missing, "submission blocked");
                self.notifier.notify(Notice::error(error.to_string()));
                Err(error)
            }
        }
    }

    /// Second half of submission: apply the backend's answer.
    pub fn finish_submit(&mut self, outcome: Result<Booking, ApiError>) -> Result<Confirmation, WizardError> {
        if self.step != WizardStep::Submitting {
            return Err(WizardError::NotSubmitting);
        }

        match outcome {
            Ok(booking) => {
                let confirmation = Confirmation {
                    booking_id: booking.id,
                    display_id: booking.confirmation_id(),
                    payment_method: self.draft.payment_method,
                    breakdown: self.breakdown(),
                };
                let description = match self.draft.payment_method {
                    PaymentMethod::BankTransfer => "Payment proof uploaded. Awaiting admin confirmation.",
                    PaymentMethod::Cash => "Please pay in cash on site.",
                };
                info!(booking = %confirmation.display_id, "booking created");
                self.notifier
                    .notify(Notice::success("Booking created!").with_description(description));
                self.step = WizardStep::Complete;
                self.confirmation = Some(confirmation.clone());
                Ok(confirmation)
            }
            Err(e) => {
                warn!(error = %e, "booking rejected");
                self.notifier.notify(Notice::error(e.user_message()));
                self.step = WizardStep::Payment;
                Err(WizardError::Rejected(e))
            }
        }
    }

    /// Validate, send the booking request, and settle on `Complete` or back on `Payment`.
    pub async fn submit<A>(&mut self, api: &A) -> Result<Confirmation, WizardError>
    where
        A: RentalApi + ?Sized,
    {
        let submission = self.begin_submit()?;
        let outcome = api.create_booking_with_proof(submission).await;
        self.finish_submit(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock_backend::MockBackend;
    use crate::draft::PaymentType;
    use crate::notice::{NoticeLevel, NoticeLog};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn suite_room() -> Room {
        Room {
            id: 1,
            name: "Premium Suite 201".to_string(),
            room_type: "Luxury".to_string(),
            price_per_month: 1_500_000.0,
            capacity: 2,
            ..Default::default()
        }
    }

    fn wizard() -> BookingWizard<Arc<NoticeLog>> {
        BookingWizard::new("1", suite_room(), &DraftDefaults::default(), Arc::new(NoticeLog::new()))
    }

    fn fill_in(wizard: &mut BookingWizard<Arc<NoticeLog>>) {
        wizard
            .edit(|d| {
                d.full_name = "Siti Rahma".to_string();
                d.email = "siti@example.com".to_string();
                d.phone = "08123456789".to_string();
                d.move_in = NaiveDate::from_ymd_opt(2025, 7, 1);
                d.guests = 2;
            })
            .unwrap();
    }

    #[test]
    fn test_navigation_preserves_fields() {
        let mut wizard = wizard();
        fill_in(&mut wizard);
        let before = wizard.draft().clone();

        assert_eq!(wizard.next().unwrap(), WizardStep::Details);
        assert_eq!(wizard.next().unwrap(), WizardStep::Payment);
        assert_eq!(wizard.next().unwrap(), WizardStep::Payment);
        assert_eq!(wizard.draft(), &before);

        assert_eq!(wizard.back().unwrap(), WizardStep::Details);
        assert_eq!(wizard.back().unwrap(), WizardStep::PersonalInfo);
        assert_eq!(wizard.back().unwrap(), WizardStep::PersonalInfo);
        assert_eq!(wizard.draft(), &before);
    }

    #[test]
    fn test_progress() {
        let mut wizard = wizard();
        assert_eq!(wizard.progress_percent(), 33);
        wizard.next().unwrap();
        assert_eq!(wizard.progress_percent(), 66);
        wizard.next().unwrap();
        assert_eq!(wizard.progress_percent(), 100);
        assert_eq!(wizard.step().title(), "Payment");
    }

    #[test]
    fn test_guests_clamped_to_capacity() {
        let mut wizard = wizard();
        wizard.edit(|d| d.guests = 5).unwrap();
        assert_eq!(wizard.draft().guests, 2);
        wizard.edit(|d| d.duration_months = 0).unwrap();
        assert_eq!(wizard.draft().duration_months, 1);
    }

    #[test]
    fn test_submit_only_from_payment_step() {
        let mut wizard = wizard();
        fill_in(&mut wizard);
        assert_eq!(wizard.begin_submit(), Err(WizardError::NotOnPaymentStep));
        assert_eq!(wizard.step(), WizardStep::PersonalInfo);
    }

    #[tokio::test]
    async fn test_transfer_without_proof_never_calls_backend() {
        let backend = MockBackend::new();
        let mut wizard = wizard();
        fill_in(&mut wizard);
        wizard.next().unwrap();
        wizard.next().unwrap();

        let result = wizard.submit(&backend).await;

        assert_eq!(result, Err(WizardError::ProofRequired));
        assert_eq!(backend.request_count(), 0);
        assert_eq!(wizard.step(), WizardStep::Payment);
        let notice = wizard.notifier().last().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.title, PROOF_REQUIRED_MESSAGE);
    }

    #[tokio::test]
    async fn test_missing_move_in_date_blocks_submit() {
        let backend = MockBackend::new();
        let mut wizard = wizard();
        wizard.edit(|d| d.payment_method = PaymentMethod::Cash).unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();

        assert_eq!(wizard.submit(&backend).await, Err(WizardError::MissingMoveInDate));
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_cash_without_proof_issues_one_request() {
        let backend = MockBackend::new();
        backend.push_booking_outcome(Ok(Booking {
            id: 314,
            ..Default::default()
        }));
        let mut wizard = wizard();
        fill_in(&mut wizard);
        wizard
            .edit(|d| {
                d.payment_method = PaymentMethod::Cash;
                d.payment_type = PaymentType::DownPayment;
            })
            .unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();

        let confirmation = wizard.submit(&backend).await.unwrap();

        assert_eq!(backend.request_count(), 1);
        assert_eq!(confirmation.display_id, "#BK314");
        assert_eq!(confirmation.breakdown.due_now, 2_700_000);
        assert_eq!(wizard.step(), WizardStep::Complete);

        let sent = backend.submissions.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].payment_method, PaymentMethod::Cash);
        assert!(sent[0].proof.is_none());
        assert_eq!(sent[0].duration_months, 6);
    }

    #[tokio::test]
    async fn test_transfer_with_proof_sends_file() {
        let backend = MockBackend::new();
        let mut wizard = wizard();
        fill_in(&mut wizard);
        wizard.next().unwrap();
        wizard.next().unwrap();
        wizard
            .attach_proof(ProofFile::new("bukti.jpg", vec![0xFFu8, 0xD8]))
            .unwrap();

        wizard.submit(&backend).await.unwrap();

        let sent = backend.submissions.lock();
        assert_eq!(sent[0].proof.as_ref().unwrap().file_name, "bukti.jpg");
        let notice = wizard.notifier().last().unwrap();
        assert_eq!(notice.level, NoticeLevel::Success);
    }

    #[tokio::test]
    async fn test_rejection_returns_to_payment_with_message() {
        let backend = MockBackend::new();
        let message = "anda sudah memiliki pesanan aktif (Pending). Selesaikan pembayaran atau batalkan pesanan sebelumnya";
        backend.push_booking_outcome(Err(ApiError::Status {
            status: 500,
            message: message.to_string(),
        }));
        let mut wizard = wizard();
        fill_in(&mut wizard);
        wizard.edit(|d| d.payment_method = PaymentMethod::Cash).unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();

        let error = wizard.submit(&backend).await.unwrap_err();

        assert_eq!(error.to_string(), message);
        assert_eq!(wizard.step(), WizardStep::Payment);
        assert_eq!(wizard.notifier().last().unwrap().title, message);
        assert!(wizard.confirmation().is_none());

        // the user can retry from the same step
        wizard.submit(&backend).await.unwrap();
        assert_eq!(backend.request_count(), 2);
    }

    #[test]
    fn test_busy_and_finished_states_reject_transitions() {
        let mut wizard = wizard();
        fill_in(&mut wizard);
        wizard.edit(|d| d.payment_method = PaymentMethod::Cash).unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();

        wizard.begin_submit().unwrap();
        assert!(wizard.is_submitting());
        assert_eq!(wizard.next(), Err(WizardError::Busy));
        assert_eq!(wizard.back(), Err(WizardError::Busy));
        assert_eq!(wizard.begin_submit(), Err(WizardError::Busy));
        assert_eq!(wizard.edit(|d| d.guests = 1), Err(WizardError::Busy));

        wizard
            .finish_submit(Ok(Booking {
                id: 7,
                ..Default::default()
            }))
            .unwrap();
        assert_eq!(wizard.back(), Err(WizardError::Finished));
        assert_eq!(wizard.begin_submit(), Err(WizardError::Finished));
        assert_eq!(
            wizard.finish_submit(Ok(Booking::default())),
            Err(WizardError::NotSubmitting)
        );
        assert_eq!(wizard.confirmation().unwrap().display_id, "#BK7");
    }

    #[tokio::test]
    async fn test_load_fetches_room() {
        let backend = MockBackend::new().with_room(suite_room());
        let wizard = BookingWizard::load(
            &backend,
            "1",
            &DraftDefaults {
                duration_months: Some(6),
                ..Default::default()
            },
            Arc::new(NoticeLog::new()),
        )
        .await;

        assert_eq!(wizard.room().name, "Premium Suite 201");
        assert_eq!(wizard.breakdown().total, 9_000_000);
        assert_eq!(wizard.max_guests(), 2);
    }

    #[tokio::test]
    async fn test_load_falls_back_to_placeholder() {
        let backend = MockBackend::new();
        let notices = Arc::new(NoticeLog::new());
        let wizard = BookingWizard::load(&backend, "404", &DraftDefaults::default(), notices.clone()).await;

        assert_eq!(wizard.room().name, "Room 404");
        assert_eq!(wizard.breakdown().total, 0);
        assert_eq!(notices.last().unwrap().level, NoticeLevel::Error);

        let demo = BookingWizard::load(&backend, "mock-2", &DraftDefaults::default(), NoticeLog::new()).await;
        assert_eq!(demo.room().name, "Room mock-2");
        assert_eq!(backend.request_count(), 1, "demo rooms are not fetched");
    }
}

// Tenant dashboard actions: each one gates locally, makes at most one call,
// and reports the outcome as a notice.

use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiError, RentalApi};
use crate::draft::ProofFile;
use crate::models::{
    ContactMessage, MessageResponse, NewReview, Payment, ProfileUpdate, ProfileUpdateResponse,
    ProofUploadResponse, Review,
};
use crate::notice::{Notice, Notifier};
use crate::pricing::{format_idr, total_due};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("Please tick the agreement box first")]
    NotAcknowledged,

    #[error("Extension must be at least one month")]
    InvalidMonths,

    #[error("Please select a file first")]
    FileRequired,

    #[error("New passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,

    #[error("Rating must be between 1 and 5")]
    InvalidRating,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Administrator access required")]
    NotAdmin,

    #[error("{}", .0.user_message())]
    Rejected(ApiError),
}

pub(crate) fn reject<T, N: Notifier>(notifier: &N, error: ActionError) -> Result<T, ActionError> {
    notifier.notify(Notice::error(error.to_string()));
    Err(error)
}

/// Report the outcome of a backend call and map a failure to [`ActionError::Rejected`].
pub(crate) fn settle<T, N: Notifier>(
    notifier: &N,
    outcome: Result<T, ApiError>,
    success: Notice,
    failure_title: &str,
) -> Result<T, ActionError> {
    match outcome {
        Ok(value) => {
            info!(notice = %success.title, "action succeeded");
            notifier.notify(success);
            Ok(value)
        }
        Err(e) => {
            warn!(error = %e, action = failure_title, "action failed");
            notifier.notify(Notice::error(failure_title).with_description(e.user_message()));
            Err(ActionError::Rejected(e))
        }
    }
}

pub struct Dashboard<'a, A: RentalApi + ?Sized, N: Notifier> {
    api: &'a A,
    notifier: N,
}

impl<'a, A: RentalApi + ?Sized, N: Notifier> Dashboard<'a, A, N> {
    pub fn new(api: &'a A, notifier: N) -> Self {
        Self { api, notifier }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    fn reject<T>(&self, error: ActionError) -> Result<T, ActionError> {
        reject(&self.notifier, error)
    }

    fn settle<T>(&self, outcome: Result<T, ApiError>, success: Notice, failure_title: &str) -> Result<T, ActionError> {
        settle(&self.notifier, outcome, success, failure_title)
    }

    /// Cancelling forfeits any payment made; the tenant must acknowledge that first.
    pub async fn cancel_booking(&self, booking_id: u64, acknowledged: bool) -> Result<MessageResponse, ActionError> {
        if !acknowledged {
            return self.reject(ActionError::NotAcknowledged);
        }
        let outcome = self.api.cancel_booking(booking_id).await;
        self.settle(
            outcome,
            Notice::success("Booking cancelled")
                .with_description("The booking was cancelled under the no-refund policy."),
            "Failed to cancel booking",
        )
    }

    pub async fn extend_booking(&self, booking_id: u64, months: u32, monthly_price: u64) -> Result<Payment, ActionError> {
        if months == 0 {
            return self.reject(ActionError::InvalidMonths);
        }
        let cost = total_due(monthly_price, months);
        let outcome = self.api.extend_booking(booking_id, months).await;
        self.settle(
            outcome,
            Notice::success("Extension requested").with_description(format!(
                "A new bill of {} has been created. Pay it from My Bills.",
                format_idr(cost)
            )),
            "Failed to extend booking",
        )
    }

    pub async fn upload_proof(&self, payment_id: u64, proof: Option<ProofFile>) -> Result<ProofUploadResponse, ActionError> {
        let Some(proof) = proof.filter(|p| !p.is_empty()) else {
            return self.reject(ActionError::FileRequired);
        };
        let outcome = self.api.upload_payment_proof(payment_id, proof).await;
        self.settle(
            outcome,
            Notice::success("Proof uploaded successfully!"),
            "Failed to upload proof",
        )
    }

    pub async fn change_password(&self, old: &str, new: &str, confirm: &str) -> Result<MessageResponse, ActionError> {
        if new != confirm {
            return self.reject(ActionError::PasswordMismatch);
        }
        if new.chars().count() < MIN_PASSWORD_LEN {
            return self.reject(ActionError::PasswordTooShort);
        }
        let outcome = self.api.change_password(old, new).await;
        self.settle(
            outcome,
            Notice::success("Password updated"),
            "Failed to change password",
        )
    }

    pub async fn submit_review(&self, room_id: u64, rating: u8, comment: &str) -> Result<Review, ActionError> {
        if !(1..=5).contains(&rating) {
            return self.reject(ActionError::InvalidRating);
        }
        if comment.trim().is_empty() {
            return self.reject(ActionError::MissingField("Comment"));
        }
        let review = NewReview {
            room_id,
            rating: rating as f64,
            comment: comment.trim().to_string(),
        };
        let outcome = self.api.create_review(review).await;
        self.settle(
            outcome,
            Notice::success("Thank you for your review!"),
            "Failed to submit review",
        )
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<ProfileUpdateResponse, ActionError> {
        if update.full_name.trim().is_empty() {
            return self.reject(ActionError::MissingField("Full name"));
        }
        let outcome = self.api.update_profile(update).await;
        self.settle(
            outcome,
            Notice::success("Profile updated"),
            "Failed to update profile",
        )
    }

    pub async fn send_contact(&self, name: &str, email: &str, message: &str) -> Result<MessageResponse, ActionError> {
        for (label, value) in [("Name", name), ("Email", email), ("Message", message)] {
            if value.trim().is_empty() {
                return self.reject(ActionError::MissingField(label));
            }
        }
        if !looks_like_email(email.trim()) {
            return self.reject(ActionError::InvalidEmail);
        }

        let outcome = self
            .api
            .send_contact_form(ContactMessage {
                name: name.trim().to_string(),
                email: email.trim().to_string(),
                message: message.trim().to_string(),
            })
            .await;
        self.settle(
            outcome,
            Notice::success("Message sent"),
            "Failed to send message",
        )
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

//! reqwest-backed implementation of [`RentalApi`].
//!
//! The backend keeps the login session in HttpOnly cookies, so the client
//! carries a cookie store. A 401 on any non-auth endpoint triggers one
//! session refresh followed by one retry of the original request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::admin::RoomForm;
use crate::api::{error_message_from_body, ApiError, RentalApi};
use crate::config::{ClientConfig, ConfigError};
use crate::draft::{BookingSubmission, ProofFile};
use crate::models::{
    Booking, ContactMessage, LoginResponse, MessageResponse, NewReview, Payment, PaymentReminder,
    Profile, ProfileUpdate, ProfileUpdateResponse, ProofUploadResponse, RegisterResponse,
    Registration, Review, Room,
};

const REFRESH_PATH: &str = "/auth/refresh";
const INVALID_FORMAT_MESSAGE: &str = "Invalid server response format";

// Request bodies are kept in a rebuildable form so that a request can be
// replayed after a session refresh; multipart forms are single-use.
enum Payload {
    Empty,
    Json(Value),
    Multipart(Vec<FormPart>),
}

enum FormPart {
    Text(&'static str, String),
    File(&'static str, ProofFile),
}

impl Payload {
    fn proof_form(field: &'static str, proof: ProofFile) -> Self {
        Payload::Multipart(vec![FormPart::File(field, proof)])
    }

    fn booking_form(submission: BookingSubmission) -> Self {
        let mut parts: Vec<FormPart> = submission
            .form_fields()
            .into_iter()
            .map(|(name, value)| FormPart::Text(name, value))
            .collect();
        if let Some(proof) = submission.proof {
            parts.push(FormPart::File("proof", proof));
        }
        Payload::Multipart(parts)
    }

    fn room_form(form: RoomForm) -> Self {
        let mut parts: Vec<FormPart> = form
            .form_fields()
            .into_iter()
            .map(|(name, value)| FormPart::Text(name, value))
            .collect();
        if let Some(image) = form.image {
            parts.push(FormPart::File("image", image));
        }
        Payload::Multipart(parts)
    }

    fn json<T: serde::Serialize>(body: &T) -> Result<Self, ApiError> {
        serde_json::to_value(body)
            .map(Payload::Json)
            .map_err(|e| ApiError::Other(e.to_string()))
    }
}

fn build_form(parts: &[FormPart]) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text(name, value) => form.text(*name, value.clone()),
            FormPart::File(name, proof) => {
                let file = Part::bytes(proof.contents.to_vec())
                    .file_name(proof.file_name.clone())
                    .mime_str(&proof.content_type)
                    .map_err(|e| ApiError::Other(format!("invalid content type: {}", e)))?;
                form.part(*name, file)
            }
        };
    }
    Ok(form)
}

fn is_auth_path(path: &str) -> bool {
    path.starts_with("/auth/")
}

#[derive(Debug, Clone)]
pub struct HttpRentalApi {
    client: Client,
    config: ClientConfig,
}

impl HttpRentalApi {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .cookie_store(true)
            .build()
            .map_err(|e| ConfigError::Init(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn transport_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(self.config.timeout_ms)
        } else {
            ApiError::Network(e.to_string())
        }
    }

    async fn send_once(&self, method: Method, path: &str, payload: &Payload) -> Result<Response, ApiError> {
        let url = self.config.endpoint(path);
        debug!(%method, %url, "api request");

        let mut request = self.client.request(method, &url);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        request = match payload {
            Payload::Empty => request,
            Payload::Json(body) => request.json(body),
            Payload::Multipart(parts) => request.multipart(build_form(parts)?),
        };

        request.send().await.map_err(|e| self.transport_error(e))
    }

    async fn refresh_session(&self) -> bool {
        match self.send_once(Method::POST, REFRESH_PATH, &Payload::Empty).await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!(error = %e, "session refresh failed");
                false
            }
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: Method, path: &str, payload: Payload) -> Result<T, ApiError> {
        let response = self.send_once(method.clone(), path, &payload).await?;

        if response.status() == StatusCode::UNAUTHORIZED && !is_auth_path(path) {
            debug!(path, "unauthorized, refreshing session");
            if self.refresh_session().await {
                let retried = self.send_once(method, path, &payload).await?;
                return self.decode(retried).await;
            }
        }

        self.decode(response).await
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let message = error_message_from_body(status.as_u16(), &text);
            warn!(status = status.as_u16(), %message, "api request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        // An empty success body is treated as an empty object.
        let body = if text.trim().is_empty() { "{}" } else { text.as_str() };
        serde_json::from_str(body).map_err(|e| {
            debug!(error = %e, "undecodable response body");
            ApiError::InvalidResponse(INVALID_FORMAT_MESSAGE.to_string())
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.call(Method::GET, path, Payload::Empty).await
    }
}

#[async_trait]
impl RentalApi for HttpRentalApi {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let response: LoginResponse = self
            .call(
                Method::POST,
                "/auth/login",
                Payload::Json(json!({ "username": username, "password": password })),
            )
            .await?;
        info!(user = %response.user.username, role = %response.user.role, "logged in");
        Ok(response)
    }

    async fn logout(&self) -> Result<MessageResponse, ApiError> {
        self.call(Method::POST, "/auth/logout", Payload::Empty).await
    }

    async fn register(&self, registration: Registration) -> Result<RegisterResponse, ApiError> {
        self.call(Method::POST, "/auth/register", Payload::json(&registration)?)
            .await
    }

    async fn get_room(&self, room_id: &str) -> Result<Room, ApiError> {
        self.get(&format!("/kamar/{}", room_id)).await
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, ApiError> {
        self.get("/kamar").await
    }

    async fn create_booking_with_proof(&self, submission: BookingSubmission) -> Result<Booking, ApiError> {
        self.call(
            Method::POST,
            "/bookings/with-proof",
            Payload::booking_form(submission),
        )
        .await
    }

    async fn list_my_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.get("/bookings").await
    }

    async fn cancel_booking(&self, booking_id: u64) -> Result<MessageResponse, ApiError> {
        self.call(Method::POST, &format!("/bookings/{}/cancel", booking_id), Payload::Empty)
            .await
    }

    async fn extend_booking(&self, booking_id: u64, months: u32) -> Result<Payment, ApiError> {
        self.call(
            Method::POST,
            &format!("/bookings/{}/extend", booking_id),
            Payload::Json(json!({ "months": months })),
        )
        .await
    }

    async fn upload_payment_proof(&self, payment_id: u64, proof: ProofFile) -> Result<ProofUploadResponse, ApiError> {
        self.call(
            Method::POST,
            &format!("/payments/{}/proof", payment_id),
            Payload::proof_form("proof", proof),
        )
        .await
    }

    async fn list_reminders(&self) -> Result<Vec<PaymentReminder>, ApiError> {
        self.get("/payments/reminders").await
    }

    async fn list_room_reviews(&self, room_id: &str) -> Result<Vec<Review>, ApiError> {
        self.get(&format!("/kamar/{}/reviews", room_id)).await
    }

    async fn list_reviews(&self) -> Result<Vec<Review>, ApiError> {
        self.get("/reviews").await
    }

    async fn create_review(&self, review: NewReview) -> Result<Review, ApiError> {
        self.call(Method::POST, "/reviews", Payload::json(&review)?).await
    }

    async fn get_profile(&self) -> Result<Profile, ApiError> {
        self.get("/profile").await
    }

    async fn update_profile(&self, update: ProfileUpdate) -> Result<ProfileUpdateResponse, ApiError> {
        self.call(Method::PUT, "/profile", Payload::json(&update)?).await
    }

    async fn change_password(&self, old_password: &str, new_password: &str) -> Result<MessageResponse, ApiError> {
        self.call(
            Method::PUT,
            "/profile/change-password",
            Payload::Json(json!({
                "old_password": old_password,
                "new_password": new_password,
            })),
        )
        .await
    }

    async fn send_contact_form(&self, message: ContactMessage) -> Result<MessageResponse, ApiError> {
        self.call(Method::POST, "/contact", Payload::json(&message)?).await
    }

    async fn create_room(&self, form: RoomForm) -> Result<Room, ApiError> {
        self.call(Method::POST, "/kamar", Payload::room_form(form)).await
    }

    async fn update_room(&self, room_id: u64, form: RoomForm) -> Result<Room, ApiError> {
        self.call(Method::PUT, &format!("/kamar/{}", room_id), Payload::room_form(form))
            .await
    }

    async fn delete_room(&self, room_id: u64) -> Result<MessageResponse, ApiError> {
        self.call(Method::DELETE, &format!("/kamar/{}", room_id), Payload::Empty)
            .await
    }

    async fn list_payments(&self) -> Result<Vec<Payment>, ApiError> {
        self.get("/payments").await
    }

    async fn confirm_payment(&self, payment_id: u64) -> Result<MessageResponse, ApiError> {
        self.call(Method::PUT, &format!("/payments/{}/confirm", payment_id), Payload::Empty)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{PaymentMethod, PaymentType};
    use chrono::NaiveDate;

    #[test]
    fn test_booking_form_parts() {
        let submission = BookingSubmission {
            room_id: "3".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            duration_months: 6,
            payment_type: PaymentType::Full,
            payment_method: PaymentMethod::BankTransfer,
            proof: Some(ProofFile::new("bukti.png", vec![1u8, 2, 3])),
        };

        let Payload::Multipart(parts) = Payload::booking_form(submission) else {
            panic!("booking payload must be multipart");
        };
        assert_eq!(parts.len(), 6);
        assert!(matches!(parts.last(), Some(FormPart::File("proof", p)) if p.file_name == "bukti.png"));
        assert!(build_form(&parts).is_ok());
    }

    #[test]
    fn test_room_form_parts() {
        let form = RoomForm {
            name: "Deluxe 104".to_string(),
            room_type: "Deluxe".to_string(),
            monthly_price: 1_200_000,
            capacity: 2,
            image: Some(ProofFile::new("kamar.jpg", vec![9u8])),
            ..Default::default()
        };

        let Payload::Multipart(parts) = Payload::room_form(form) else {
            panic!("room payload must be multipart");
        };
        assert!(parts
            .iter()
            .any(|p| matches!(p, FormPart::Text("harga_per_bulan", v) if v == "1200000")));
        assert!(matches!(parts.last(), Some(FormPart::File("image", f)) if f.content_type == "image/jpeg"));
    }

    #[test]
    fn test_auth_paths_skip_refresh() {
        assert!(is_auth_path("/auth/refresh"));
        assert!(is_auth_path("/auth/login"));
        assert!(!is_auth_path("/profile"));
    }

    #[test]
    fn test_client_builds_from_config() {
        let api = HttpRentalApi::new(ClientConfig::default().with_token("t")).unwrap();
        assert_eq!(api.config().token.as_deref(), Some("t"));
    }
}

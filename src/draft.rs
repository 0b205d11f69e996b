// The booking draft collected by the wizard and the payload built from it.

use std::fmt;
use std::path::Path;

use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DURATION_MONTHS: u32 = 6;
pub const DEFAULT_GUESTS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentType {
    #[default]
    #[serde(rename = "full")]
    Full,
    #[serde(rename = "dp")]
    DownPayment,
}

impl PaymentType {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentType::Full => "full",
            PaymentType::DownPayment => "dp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "transfer")]
    BankTransfer,
    #[serde(rename = "cash")]
    Cash,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::BankTransfer => "transfer",
            PaymentMethod::Cash => "cash",
        }
    }

    pub fn requires_proof(self) -> bool {
        matches!(self, PaymentMethod::BankTransfer)
    }
}

/// An image or PDF evidencing a manual bank transfer.
#[derive(Clone, PartialEq, Eq)]
pub struct ProofFile {
    pub file_name: String,
    pub content_type: String,
    pub contents: Bytes,
}

// Contents are left out so that logging a draft does not dump the file.
impl fmt::Debug for ProofFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProofFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.contents.len())
            .finish()
    }
}

impl ProofFile {
    pub fn new(file_name: impl Into<String>, contents: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        Self {
            content_type: content_type_for(&file_name).to_string(),
            file_name,
            contents: contents.into(),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "proof".to_string());
        Ok(Self::new(file_name, contents))
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Values a caller may pre-fill, e.g. from a room page's search box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftDefaults {
    pub move_in: Option<NaiveDate>,
    pub duration_months: Option<u32>,
    pub guests: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub move_in: Option<NaiveDate>,
    pub duration_months: u32,
    pub guests: u32,
    pub payment_type: PaymentType,
    pub payment_method: PaymentMethod,
    pub proof: Option<ProofFile>,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self::with_defaults(&DraftDefaults::default())
    }
}

impl BookingDraft {
    pub fn with_defaults(defaults: &DraftDefaults) -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            move_in: defaults.move_in,
            duration_months: defaults
                .duration_months
                .filter(|m| *m > 0)
                .unwrap_or(DEFAULT_DURATION_MONTHS),
            guests: defaults.guests.filter(|g| *g > 0).unwrap_or(DEFAULT_GUESTS),
            payment_type: PaymentType::default(),
            payment_method: PaymentMethod::default(),
            proof: None,
        }
    }

    /// Whether the payment step has everything the submit guard checks for.
    pub fn missing_for_submit(&self) -> Option<MissingField> {
        if self.move_in.is_none() {
            return Some(MissingField::MoveInDate);
        }
        if self.payment_method.requires_proof() && self.proof.is_none() {
            return Some(MissingField::ProofOfPayment);
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    MoveInDate,
    ProofOfPayment,
}

/// The single booking-creation request the wizard produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSubmission {
    pub room_id: String,
    pub start_date: NaiveDate,
    pub duration_months: u32,
    pub payment_type: PaymentType,
    pub payment_method: PaymentMethod,
    pub proof: Option<ProofFile>,
}

impl BookingSubmission {
    /// Build the payload, or report the first field the guard rejects.
    pub fn from_draft(room_id: &str, draft: &BookingDraft) -> Result<Self, MissingField> {
        if let Some(missing) = draft.missing_for_submit() {
            return Err(missing);
        }
        let start_date = draft.move_in.ok_or(MissingField::MoveInDate)?;

        // A file picked before switching to cash is not sent.
        let proof = if draft.payment_method.requires_proof() {
            draft.proof.clone()
        } else {
            None
        };

        Ok(Self {
            room_id: room_id.to_string(),
            start_date,
            duration_months: draft.duration_months,
            payment_type: draft.payment_type,
            payment_method: draft.payment_method,
            proof,
        })
    }

    /// Text parts of the multipart form, in the order the backend reads them.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("kamar_id", self.room_id.clone()),
            ("tanggal_mulai", self.start_date.format("%Y-%m-%d").to_string()),
            ("durasi_sewa", self.duration_months.to_string()),
            ("payment_type", self.payment_type.as_str().to_string()),
            ("payment_method", self.payment_method.as_str().to_string()),
        ]
    }
}

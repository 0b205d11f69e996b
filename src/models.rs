// Wire models returned by the rental backend.
// Field names follow the backend's JSON; Rust-side names are English.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Parse the leading `YYYY-MM-DD` of a backend timestamp.
pub fn date_part(timestamp: &str) -> Option<NaiveDate> {
    let head = timestamp.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum RoomStatus {
    #[default]
    #[serde(rename = "Tersedia")]
    Available,
    #[serde(rename = "Terisi")]
    Occupied,
    #[serde(rename = "Perbaikan")]
    UnderRepair,
    #[serde(rename = "Booked")]
    Booked,
    #[serde(other)]
    Unknown,
}

impl RoomStatus {
    pub fn is_bookable(self) -> bool {
        matches!(self, RoomStatus::Available)
    }

    /// Backend spelling, as sent in room forms.
    pub fn wire_name(self) -> Option<&'static str> {
        match self {
            RoomStatus::Available => Some("Tersedia"),
            RoomStatus::Occupied => Some("Terisi"),
            RoomStatus::UnderRepair => Some("Perbaikan"),
            RoomStatus::Booked => Some("Booked"),
            RoomStatus::Unknown => None,
        }
    }
}

// The backend stores facilities as free text; some responses carry a list.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Facilities {
    List(Vec<String>),
    Raw(String),
}

impl Default for Facilities {
    fn default() -> Self {
        Facilities::Raw(String::new())
    }
}

impl Facilities {
    pub fn items(&self) -> Vec<String> {
        match self {
            Facilities::List(items) => items.clone(),
            Facilities::Raw(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Room {
    pub id: u64,
    #[serde(rename = "nomor_kamar")]
    pub name: String,
    #[serde(rename = "tipe_kamar")]
    pub room_type: String,
    #[serde(rename = "fasilitas")]
    pub facilities: Facilities,
    #[serde(rename = "harga_per_bulan")]
    pub price_per_month: f64,
    pub status: RoomStatus,
    pub capacity: u32,
    pub floor: i32,
    pub size: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub description: String,
    pub image_url: String,
}

impl Room {
    /// Monthly price in whole Rupiah. Negative or non-finite prices count as zero.
    pub fn monthly_price(&self) -> u64 {
        if self.price_per_month.is_finite() && self.price_per_month > 0.0 {
            self.price_per_month.round() as u64
        } else {
            0
        }
    }

    /// Stand-in shown when a room cannot be fetched.
    pub fn placeholder(room_id: &str) -> Self {
        Self {
            name: format!("Room {}", room_id),
            room_type: "Unknown".to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Active,
    Completed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Confirmed,
    Failed,
    Settled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum ReminderStatus {
    #[default]
    Pending,
    Paid,
    Expired,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Payment {
    pub id: u64,
    #[serde(rename = "pemesanan_id")]
    pub booking_id: u64,
    #[serde(rename = "jumlah_bayar")]
    pub amount: f64,
    #[serde(rename = "tanggal_bayar")]
    pub paid_at: String,
    #[serde(rename = "bukti_transfer")]
    pub proof_url: String,
    #[serde(rename = "status_pembayaran")]
    pub status: PaymentStatus,
    pub order_id: String,
    #[serde(rename = "metode_pembayaran")]
    pub method: String,
    #[serde(rename = "tipe_pembayaran")]
    pub payment_type: String,
    #[serde(rename = "jumlah_dp")]
    pub down_payment: f64,
    #[serde(rename = "tanggal_jatuh_tempo")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PaymentReminder {
    pub id: u64,
    #[serde(rename = "pembayaran_id")]
    pub payment_id: u64,
    #[serde(rename = "jumlah_bayar")]
    pub amount: f64,
    #[serde(rename = "tanggal_reminder")]
    pub remind_at: String,
    #[serde(rename = "status_reminder")]
    pub status: ReminderStatus,
    pub is_sent: bool,
}

/// A booking as the backend reports it. Creation responses carry only the
/// core fields; the bookings list adds room and payment details.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Booking {
    pub id: u64,
    #[serde(rename = "kamar_id")]
    pub room_id: u64,
    #[serde(rename = "kamar")]
    pub room: Option<Room>,
    #[serde(rename = "tanggal_mulai")]
    pub start_date: String,
    #[serde(rename = "durasi_sewa")]
    pub duration_months: u32,
    #[serde(rename = "status_pemesanan")]
    pub status: BookingStatus,
    #[serde(rename = "total_bayar")]
    pub total_paid: Option<f64>,
    #[serde(rename = "status_bayar")]
    pub payment_status: Option<String>,
    pub payments: Vec<Payment>,
}

impl Booking {
    /// Identifier shown on the confirmation screen.
    pub fn confirmation_id(&self) -> String {
        format!("#BK{}", self.id)
    }

    pub fn move_in(&self) -> Option<NaiveDate> {
        date_part(&self.start_date)
    }

    pub fn move_out(&self) -> Option<NaiveDate> {
        crate::pricing::add_months(self.move_in()?, self.duration_months)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ReviewAuthor {
    #[serde(rename = "nama_lengkap")]
    pub full_name: String,
    #[serde(rename = "foto_profil")]
    pub photo_url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Review {
    pub id: u64,
    pub user_id: u64,
    #[serde(rename = "kamar_id")]
    pub room_id: u64,
    pub rating: f64,
    pub comment: String,
    pub created_at: Option<String>,
    #[serde(rename = "Penyewa")]
    pub author: Option<ReviewAuthor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReview {
    #[serde(rename = "kamar_id")]
    pub room_id: u64,
    pub rating: f64,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub role: String,
    pub email: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Login answer. The tokens themselves arrive as HttpOnly cookies.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct LoginResponse {
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<NaiveDate>,
    pub nik: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Tenant {
    pub id: u64,
    pub user_id: u64,
    #[serde(rename = "nama_lengkap")]
    pub full_name: String,
    pub email: String,
    pub nik: String,
    #[serde(rename = "nomor_hp")]
    pub phone: String,
    #[serde(rename = "alamat_asal")]
    pub home_address: String,
    #[serde(rename = "jenis_kelamin")]
    pub gender: String,
    #[serde(rename = "foto_profil")]
    pub photo_url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Profile {
    pub user: User,
    #[serde(rename = "penyewa")]
    pub tenant: Option<Tenant>,
    pub is_google_user: bool,
}

/// Editable profile fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(rename = "nama_lengkap")]
    pub full_name: String,
    pub nik: String,
    #[serde(rename = "nomor_hp")]
    pub phone: String,
    #[serde(rename = "alamat_asal")]
    pub home_address: String,
    #[serde(rename = "jenis_kelamin")]
    pub gender: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfileUpdateResponse {
    pub message: String,
    #[serde(rename = "penyewa")]
    pub tenant: Option<Tenant>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProofUploadResponse {
    pub message: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_from_backend_json() {
        let json = r#"{
            "id": 7,
            "nomor_kamar": "Premium Suite 201",
            "tipe_kamar": "Luxury",
            "fasilitas": "AC, WiFi ,  Kamar Mandi Dalam",
            "harga_per_bulan": 1500000,
            "status": "Tersedia",
            "capacity": 2,
            "floor": 2,
            "size": "4x5m",
            "bedrooms": 1,
            "bathrooms": 1,
            "description": "Corner room",
            "image_url": "https://img.example/201.jpg",
            "created_at": "2025-01-01T00:00:00Z"
        }"#;

        let room: Room = serde_json::from_str(json).unwrap();
        assert_eq!(room.id, 7);
        assert_eq!(room.name, "Premium Suite 201");
        assert_eq!(room.monthly_price(), 1_500_000);
        assert!(room.status.is_bookable());
        assert_eq!(
            room.facilities.items(),
            vec!["AC", "WiFi", "Kamar Mandi Dalam"]
        );
    }

    #[test]
    fn test_unknown_status_does_not_fail_decoding() {
        let room: Room =
            serde_json::from_str(r#"{"id": 1, "status": "Penuh", "fasilitas": ["AC"]}"#).unwrap();
        assert_eq!(room.status, RoomStatus::Unknown);
        assert!(!room.status.is_bookable());
        assert_eq!(room.facilities.items(), vec!["AC"]);
    }

    #[test]
    fn test_booking_dates_and_confirmation_id() {
        let json = r#"{
            "id": 42,
            "kamar_id": 3,
            "tanggal_mulai": "2025-01-31T00:00:00Z",
            "durasi_sewa": 1,
            "status_pemesanan": "Pending"
        }"#;

        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.confirmation_id(), "#BK42");
        assert_eq!(booking.move_in(), NaiveDate::from_ymd_opt(2025, 1, 31));
        assert_eq!(booking.move_out(), NaiveDate::from_ymd_opt(2025, 3, 3));
        assert!(booking.payments.is_empty());
    }

    #[test]
    fn test_registration_wire_format() {
        let registration = Registration {
            username: "siti".to_string(),
            password: "rahasia1".to_string(),
            birthdate: NaiveDate::from_ymd_opt(2001, 4, 9),
            ..Default::default()
        };
        let value = serde_json::to_value(&registration).unwrap();
        assert_eq!(value["birthdate"], "2001-04-09");
        assert_eq!(value["nik"], "");

        let without_birthdate = serde_json::to_value(Registration::default()).unwrap();
        assert!(without_birthdate.get("birthdate").is_none());
    }

    #[test]
    fn test_login_response_and_role() {
        let login: LoginResponse =
            serde_json::from_str(r#"{"user": {"id": 1, "username": "admin", "role": "admin"}}"#).unwrap();
        assert!(login.user.is_admin());
        assert_eq!(RoomStatus::UnderRepair.wire_name(), Some("Perbaikan"));
        assert_eq!(RoomStatus::Unknown.wire_name(), None);
    }

    #[test]
    fn test_negative_price_is_zero() {
        let room = Room {
            price_per_month: -10.0,
            ..Default::default()
        };
        assert_eq!(room.monthly_price(), 0);
        assert_eq!(Room::placeholder("9").name, "Room 9");
    }
}

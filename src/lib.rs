// Client library for the boarding-house ("kos") rental booking service

pub mod admin;
pub mod api;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod draft;
pub mod http;
pub mod models;
pub mod notice;
pub mod prefs;
pub mod pricing;
pub mod wizard;

// Re-export key types for convenience
pub use admin::{AdminConsole, RoomForm};
pub use api::{ApiError, RentalApi};
pub use catalog::{filter_rooms, PriceBand, RoomFilter};
pub use config::{ClientConfig, ConfigError};
pub use dashboard::{ActionError, Dashboard};
pub use draft::{BookingDraft, BookingSubmission, DraftDefaults, PaymentMethod, PaymentType, ProofFile};
pub use http::HttpRentalApi;
pub use models::{Booking, LoginResponse, Registration, Room, User};
pub use notice::{Notice, NoticeLevel, NoticeLog, Notifier, TracingNotifier};
pub use prefs::{FilePreferences, MemoryPreferences, PreferenceStore, UiPreferences};
pub use pricing::PaymentBreakdown;
pub use wizard::{BookingWizard, Confirmation, WizardError, WizardStep};

//! `prepdeck-accounts` — user accounts and per-account settings.

pub mod account;
pub mod repository;
pub mod service;
pub mod settings;

pub use account::{Account, AccountEvent, AccountRegistered};
pub use repository::AccountRepository;
pub use service::AccountService;
pub use settings::{AccountSettings, SettingsMap, from_json_column, to_json_column};

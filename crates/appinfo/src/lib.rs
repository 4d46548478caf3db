//! `prepdeck-appinfo` — application metadata and icon verification.

pub mod app_info;
pub mod icon_check;
pub mod repository;
pub mod service;

pub use app_info::{AppInfo, AppInfoEvent, AppInfoId, AppInfoRegistered, AppInfoUpdated};
pub use icon_check::{IconCheck, IconVerifier};
pub use repository::AppInfoRepository;
pub use service::AppInfoService;

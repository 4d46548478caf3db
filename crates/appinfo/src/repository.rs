//! Persistence boundary for app metadata.

use async_trait::async_trait;

use crate::app_info::{AppInfo, AppInfoId};

/// App metadata store.
#[async_trait]
pub trait AppInfoRepository: Send + Sync {
    async fn find_by_id(&self, id: AppInfoId) -> anyhow::Result<Option<AppInfo>>;

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<AppInfo>>;

    async fn save(&self, info: &mut AppInfo) -> anyhow::Result<()>;

    async fn delete(&self, id: AppInfoId) -> anyhow::Result<()>;

    async fn all(&self) -> anyhow::Result<Vec<AppInfo>>;
}

//! App metadata orchestration.

use std::sync::Arc;

use chrono::Utc;

use prepdeck_core::DomainError;
use prepdeck_events::{EventBus, UnitOfWork};

use crate::app_info::{AppInfo, AppInfoId};
use crate::icon_check::IconVerifier;
use crate::repository::AppInfoRepository;

/// Registers and updates app catalog entries.
pub struct AppInfoService {
    repo: Arc<dyn AppInfoRepository>,
    bus: Arc<dyn EventBus>,
    icons: IconVerifier,
}

impl AppInfoService {
    pub fn new(repo: Arc<dyn AppInfoRepository>, bus: Arc<dyn EventBus>, icons: IconVerifier) -> Self {
        Self { repo, bus, icons }
    }

    /// Register a new app entry.
    ///
    /// The icon check is fired in the background; its outcome is logged and
    /// never blocks or fails the registration.
    pub async fn register(
        &self,
        name: &str,
        description: &str,
        icon_url: Option<String>,
    ) -> anyhow::Result<AppInfo> {
        if self.repo.find_by_name(name).await?.is_some() {
            return Err(DomainError::conflict(format!("app '{name}' already exists")).into());
        }

        let mut info = AppInfo::register(name, description, icon_url.clone(), Utc::now())?;
        self.repo.save(&mut info).await?;

        self.spawn_icon_check(icon_url);

        let mut uow = UnitOfWork::new();
        uow.collect("appinfo.app", &mut info);
        let _ = uow.commit(&self.bus);

        Ok(info)
    }

    /// Update an existing entry. The entry must exist.
    pub async fn update(
        &self,
        id: AppInfoId,
        name: &str,
        description: &str,
        icon_url: Option<String>,
    ) -> anyhow::Result<AppInfo> {
        let mut info = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound)?;

        info.update(name, description, icon_url.clone(), Utc::now())?;
        self.repo.save(&mut info).await?;

        self.spawn_icon_check(icon_url);

        let mut uow = UnitOfWork::new();
        uow.collect("appinfo.app", &mut info);
        let _ = uow.commit(&self.bus);

        Ok(info)
    }

    pub async fn get(&self, id: AppInfoId) -> anyhow::Result<AppInfo> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found().into())
    }

    pub async fn list(&self) -> anyhow::Result<Vec<AppInfo>> {
        self.repo.all().await
    }

    fn spawn_icon_check(&self, icon_url: Option<String>) {
        if let Some(url) = icon_url {
            let check = self.icons.verify(&url);
            tokio::spawn(async move {
                let ok = check.outcome().await;
                tracing::info!(%url, valid = ok, "icon url verification finished");
            });
        }
    }
}

//! Account orchestration.

use std::sync::Arc;

use chrono::Utc;

use prepdeck_auth::{PrincipalId, Role};
use prepdeck_core::{AccountId, DomainError, Entity};
use prepdeck_events::{EventBus, UnitOfWork};

use crate::account::Account;
use crate::repository::AccountRepository;
use crate::settings::{AccountSettings, SettingsMap};

/// Registers accounts and manages per-account settings.
pub struct AccountService {
    repo: Arc<dyn AccountRepository>,
    bus: Arc<dyn EventBus>,
}

impl AccountService {
    pub fn new(repo: Arc<dyn AccountRepository>, bus: Arc<dyn EventBus>) -> Self {
        Self { repo, bus }
    }

    /// Register the caller's account.
    ///
    /// Idempotent on the identity subject: re-registering returns the
    /// existing account and records nothing.
    pub async fn register(
        &self,
        subject: PrincipalId,
        email: Option<String>,
        display_name: &str,
        role: Role,
    ) -> anyhow::Result<Account> {
        if let Some(existing) = self.repo.find_by_subject(&subject).await? {
            return Ok(existing);
        }

        let mut account = Account::register(subject, email, display_name, role, Utc::now())?;
        self.repo.save(&mut account).await?;

        let mut uow = UnitOfWork::new();
        uow.collect("accounts.account", &mut account);
        let _ = uow.commit(&self.bus);

        tracing::info!(account_id = ?account.id(), "account registered");
        Ok(account)
    }

    pub async fn get(&self, id: AccountId) -> anyhow::Result<Account> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found().into())
    }

    pub async fn find_by_subject(&self, subject: &PrincipalId) -> anyhow::Result<Option<Account>> {
        self.repo.find_by_subject(subject).await
    }

    pub async fn settings(&self, account_id: AccountId) -> anyhow::Result<AccountSettings> {
        self.require_account(account_id).await?;
        self.repo.load_settings(account_id).await
    }

    /// Replace the basic settings map.
    pub async fn update_settings(
        &self,
        account_id: AccountId,
        basic: SettingsMap,
    ) -> anyhow::Result<AccountSettings> {
        self.require_account(account_id).await?;
        let mut settings = self.repo.load_settings(account_id).await?;
        settings.basic = basic;
        self.repo.store_settings(&settings).await?;
        Ok(settings)
    }

    /// Replace the advanced settings map. Tier gating happens at the API
    /// boundary; the service only cares that the account exists.
    pub async fn update_advanced_settings(
        &self,
        account_id: AccountId,
        advanced: SettingsMap,
    ) -> anyhow::Result<AccountSettings> {
        self.require_account(account_id).await?;
        let mut settings = self.repo.load_settings(account_id).await?;
        settings.advanced = advanced;
        self.repo.store_settings(&settings).await?;
        Ok(settings)
    }

    async fn require_account(&self, account_id: AccountId) -> anyhow::Result<()> {
        if self.repo.find_by_id(account_id).await?.is_none() {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }
}

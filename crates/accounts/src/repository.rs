//! Persistence boundary for accounts.

use async_trait::async_trait;

use prepdeck_auth::PrincipalId;
use prepdeck_core::AccountId;

use crate::account::Account;
use crate::settings::AccountSettings;

/// Account store.
///
/// `save` assigns the numeric key on first save and returns the stored
/// entity. Implementations live in the infra crate (in-memory by default,
/// Postgres behind its feature flag).
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: AccountId) -> anyhow::Result<Option<Account>>;

    async fn find_by_subject(&self, subject: &PrincipalId) -> anyhow::Result<Option<Account>>;

    async fn save(&self, account: &mut Account) -> anyhow::Result<()>;

    async fn delete(&self, id: AccountId) -> anyhow::Result<()>;

    async fn load_settings(&self, account_id: AccountId) -> anyhow::Result<AccountSettings>;

    async fn store_settings(&self, settings: &AccountSettings) -> anyhow::Result<()>;
}

//! In-memory repositories for tests/dev.
//!
//! Rows are plain snapshots keyed by the numeric id; entities are rebuilt
//! through their `hydrate` constructors so event buffers never leak into
//! storage. Each call is atomic under its own lock.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use prepdeck_accounts::{Account, AccountRepository, AccountSettings, from_json_column, to_json_column};
use prepdeck_appinfo::{AppInfo, AppInfoId, AppInfoRepository};
use prepdeck_auth::{PrincipalId, Role};
use prepdeck_billing::{
    Plan, PlanId, PlanRepository, PlanTier, Subscription, SubscriptionId, SubscriptionRepository,
    SubscriptionStatus,
};
use prepdeck_core::{AccountId, Entity};

fn next(seq: &AtomicI64) -> i64 {
    seq.fetch_add(1, Ordering::SeqCst)
}

// ─────────────────────────────────────────────────────────────────────────────
// Accounts
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
struct AccountRow {
    id: i64,
    subject: String,
    email: Option<String>,
    display_name: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn hydrate(&self) -> Account {
        Account::hydrate(
            AccountId::from_raw(self.id),
            PrincipalId::new(self.subject.clone()),
            self.email.clone(),
            self.display_name.clone(),
            Role::new(self.role.clone()),
            self.created_at,
        )
    }
}

/// In-memory account store.
///
/// Settings are kept in their column form (JSON text) so the map conversion
/// helpers are exercised the same way the Postgres store exercises them.
pub struct InMemoryAccountRepository {
    rows: RwLock<HashMap<i64, AccountRow>>,
    settings: RwLock<HashMap<i64, (String, String)>>,
    seq: AtomicI64,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            settings: RwLock::new(HashMap::new()),
            seq: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_id(&self, id: AccountId) -> anyhow::Result<Option<Account>> {
        let rows = self.rows.read().unwrap();
        Ok(rows.get(&id.as_i64()).map(AccountRow::hydrate))
    }

    async fn find_by_subject(&self, subject: &PrincipalId) -> anyhow::Result<Option<Account>> {
        let rows = self.rows.read().unwrap();
        Ok(rows
            .values()
            .find(|row| row.subject == subject.as_str())
            .map(AccountRow::hydrate))
    }

    async fn save(&self, account: &mut Account) -> anyhow::Result<()> {
        let id = match account.id() {
            Some(id) => id.as_i64(),
            None => {
                let id = next(&self.seq);
                account.assign_id(AccountId::from_raw(id));
                id
            }
        };

        let row = AccountRow {
            id,
            subject: account.subject().as_str().to_string(),
            email: account.email().map(str::to_string),
            display_name: account.display_name().to_string(),
            role: account.role().as_str().to_string(),
            created_at: account.created_at(),
        };
        self.rows.write().unwrap().insert(id, row);
        Ok(())
    }

    async fn delete(&self, id: AccountId) -> anyhow::Result<()> {
        self.rows.write().unwrap().remove(&id.as_i64());
        self.settings.write().unwrap().remove(&id.as_i64());
        Ok(())
    }

    async fn load_settings(&self, account_id: AccountId) -> anyhow::Result<AccountSettings> {
        let settings = self.settings.read().unwrap();
        match settings.get(&account_id.as_i64()) {
            Some((basic, advanced)) => Ok(AccountSettings {
                account_id,
                basic: from_json_column(Some(basic))?,
                advanced: from_json_column(Some(advanced))?,
            }),
            None => Ok(AccountSettings::empty(account_id)),
        }
    }

    async fn store_settings(&self, settings: &AccountSettings) -> anyhow::Result<()> {
        let basic = to_json_column(&settings.basic)?;
        let advanced = to_json_column(&settings.advanced)?;
        self.settings
            .write()
            .unwrap()
            .insert(settings.account_id.as_i64(), (basic, advanced));
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plans
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
struct PlanRow {
    id: i64,
    tier: PlanTier,
    name: String,
    monthly_limit: u64,
    price_cents: u64,
    created_at: DateTime<Utc>,
}

impl PlanRow {
    fn hydrate(&self) -> Plan {
        Plan::hydrate(
            PlanId::from_raw(self.id),
            self.tier,
            self.name.clone(),
            self.monthly_limit,
            self.price_cents,
            self.created_at,
        )
    }
}

pub struct InMemoryPlanRepository {
    rows: RwLock<HashMap<i64, PlanRow>>,
    seq: AtomicI64,
}

impl InMemoryPlanRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            seq: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryPlanRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn find_by_id(&self, id: PlanId) -> anyhow::Result<Option<Plan>> {
        let rows = self.rows.read().unwrap();
        Ok(rows.get(&id.as_i64()).map(PlanRow::hydrate))
    }

    async fn find_by_tier(&self, tier: PlanTier) -> anyhow::Result<Option<Plan>> {
        let rows = self.rows.read().unwrap();
        Ok(rows.values().find(|row| row.tier == tier).map(PlanRow::hydrate))
    }

    async fn save(&self, plan: &mut Plan) -> anyhow::Result<()> {
        let id = match plan.id() {
            Some(id) => id.as_i64(),
            None => {
                let id = next(&self.seq);
                plan.assign_id(PlanId::from_raw(id));
                id
            }
        };

        let row = PlanRow {
            id,
            tier: plan.tier(),
            name: plan.name().to_string(),
            monthly_limit: plan.monthly_limit(),
            price_cents: plan.price_cents(),
            created_at: plan.created_at(),
        };
        self.rows.write().unwrap().insert(id, row);
        Ok(())
    }

    async fn all(&self) -> anyhow::Result<Vec<Plan>> {
        let rows = self.rows.read().unwrap();
        let mut plans: Vec<Plan> = rows.values().map(PlanRow::hydrate).collect();
        plans.sort_by_key(|p| p.id().map(|id| id.as_i64()));
        Ok(plans)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Subscriptions
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
struct SubscriptionRow {
    id: i64,
    account_id: i64,
    plan_id: i64,
    status: SubscriptionStatus,
    started_at: DateTime<Utc>,
}

impl SubscriptionRow {
    fn hydrate(&self) -> Subscription {
        Subscription::hydrate(
            SubscriptionId::from_raw(self.id),
            AccountId::from_raw(self.account_id),
            PlanId::from_raw(self.plan_id),
            self.status,
            self.started_at,
        )
    }
}

pub struct InMemorySubscriptionRepository {
    rows: RwLock<HashMap<i64, SubscriptionRow>>,
    seq: AtomicI64,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            seq: AtomicI64::new(1),
        }
    }
}

impl Default for InMemorySubscriptionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn find_by_id(&self, id: SubscriptionId) -> anyhow::Result<Option<Subscription>> {
        let rows = self.rows.read().unwrap();
        Ok(rows.get(&id.as_i64()).map(SubscriptionRow::hydrate))
    }

    async fn find_by_account(&self, account_id: AccountId) -> anyhow::Result<Vec<Subscription>> {
        let rows = self.rows.read().unwrap();
        let mut subscriptions: Vec<Subscription> = rows
            .values()
            .filter(|row| row.account_id == account_id.as_i64())
            .map(SubscriptionRow::hydrate)
            .collect();
        subscriptions.sort_by_key(|s| s.id().map(|id| id.as_i64()));
        Ok(subscriptions)
    }

    async fn save(&self, subscription: &mut Subscription) -> anyhow::Result<()> {
        let id = match subscription.id() {
            Some(id) => id.as_i64(),
            None => {
                let id = next(&self.seq);
                subscription.assign_id(SubscriptionId::from_raw(id));
                id
            }
        };

        let row = SubscriptionRow {
            id,
            account_id: subscription.account_id().as_i64(),
            plan_id: subscription.plan_id().as_i64(),
            status: subscription.status(),
            started_at: subscription.started_at(),
        };
        self.rows.write().unwrap().insert(id, row);
        Ok(())
    }

    async fn delete(&self, id: SubscriptionId) -> anyhow::Result<()> {
        self.rows.write().unwrap().remove(&id.as_i64());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App info
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
struct AppInfoRow {
    id: i64,
    name: String,
    description: String,
    icon_url: Option<String>,
    updated_at: DateTime<Utc>,
}

impl AppInfoRow {
    fn hydrate(&self) -> AppInfo {
        AppInfo::hydrate(
            AppInfoId::from_raw(self.id),
            self.name.clone(),
            self.description.clone(),
            self.icon_url.clone(),
            self.updated_at,
        )
    }
}

pub struct InMemoryAppInfoRepository {
    rows: RwLock<HashMap<i64, AppInfoRow>>,
    seq: AtomicI64,
}

impl InMemoryAppInfoRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            seq: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryAppInfoRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AppInfoRepository for InMemoryAppInfoRepository {
    async fn find_by_id(&self, id: AppInfoId) -> anyhow::Result<Option<AppInfo>> {
        let rows = self.rows.read().unwrap();
        Ok(rows.get(&id.as_i64()).map(AppInfoRow::hydrate))
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<AppInfo>> {
        let rows = self.rows.read().unwrap();
        Ok(rows.values().find(|row| row.name == name).map(AppInfoRow::hydrate))
    }

    async fn save(&self, info: &mut AppInfo) -> anyhow::Result<()> {
        let id = match info.id() {
            Some(id) => id.as_i64(),
            None => {
                let id = next(&self.seq);
                info.assign_id(AppInfoId::from_raw(id));
                id
            }
        };

        let row = AppInfoRow {
            id,
            name: info.name().to_string(),
            description: info.description().to_string(),
            icon_url: info.icon_url().map(str::to_string),
            updated_at: info.updated_at(),
        };
        self.rows.write().unwrap().insert(id, row);
        Ok(())
    }

    async fn delete(&self, id: AppInfoId) -> anyhow::Result<()> {
        self.rows.write().unwrap().remove(&id.as_i64());
        Ok(())
    }

    async fn all(&self) -> anyhow::Result<Vec<AppInfo>> {
        let rows = self.rows.read().unwrap();
        let mut infos: Vec<AppInfo> = rows.values().map(AppInfoRow::hydrate).collect();
        infos.sort_by_key(|i| i.id().map(|id| id.as_i64()));
        Ok(infos)
    }
}

//! Postgres repositories (behind the `postgres` feature).
//!
//! Settings maps are stored in their JSON column form through the same
//! conversion helpers the in-memory store uses.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use prepdeck_accounts::{
    Account, AccountRepository, AccountSettings, from_json_column, to_json_column,
};
use prepdeck_appinfo::{AppInfo, AppInfoId, AppInfoRepository};
use prepdeck_auth::{PrincipalId, Role};
use prepdeck_billing::{
    Plan, PlanId, PlanRepository, PlanTier, Subscription, SubscriptionId, SubscriptionRepository,
    SubscriptionStatus,
};
use prepdeck_core::{AccountId, Entity};

/// Create the schema if it is not there yet. Idempotent.
pub async fn ensure_schema(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id            BIGSERIAL PRIMARY KEY,
            subject       TEXT NOT NULL UNIQUE,
            email         TEXT,
            display_name  TEXT NOT NULL,
            role          TEXT NOT NULL,
            created_at    TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS account_settings (
            account_id  BIGINT PRIMARY KEY REFERENCES accounts(id) ON DELETE CASCADE,
            basic       TEXT,
            advanced    TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS plans (
            id             BIGSERIAL PRIMARY KEY,
            tier           TEXT NOT NULL,
            name           TEXT NOT NULL,
            monthly_limit  BIGINT NOT NULL,
            price_cents    BIGINT NOT NULL,
            created_at     TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS subscriptions (
            id          BIGSERIAL PRIMARY KEY,
            account_id  BIGINT NOT NULL,
            plan_id     BIGINT NOT NULL,
            status      TEXT NOT NULL,
            started_at  TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS app_info (
            id           BIGSERIAL PRIMARY KEY,
            name         TEXT NOT NULL UNIQUE,
            description  TEXT NOT NULL,
            icon_url     TEXT,
            updated_at   TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

fn parse_status(raw: &str) -> anyhow::Result<SubscriptionStatus> {
    match raw {
        "active" => Ok(SubscriptionStatus::Active),
        "canceled" => Ok(SubscriptionStatus::Canceled),
        "expired" => Ok(SubscriptionStatus::Expired),
        other => anyhow::bail!("unknown subscription status in store: {other}"),
    }
}

fn status_str(status: SubscriptionStatus) -> &'static str {
    match status {
        SubscriptionStatus::Active => "active",
        SubscriptionStatus::Canceled => "canceled",
        SubscriptionStatus::Expired => "expired",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Accounts
// ─────────────────────────────────────────────────────────────────────────────

pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn account_from_row(row: &sqlx::postgres::PgRow) -> anyhow::Result<Account> {
    Ok(Account::hydrate(
        AccountId::from_raw(row.try_get::<i64, _>("id")?),
        PrincipalId::new(row.try_get::<String, _>("subject")?),
        row.try_get::<Option<String>, _>("email")?,
        row.try_get::<String, _>("display_name")?,
        Role::new(row.try_get::<String, _>("role")?),
        row.try_get::<DateTime<Utc>, _>("created_at")?,
    ))
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_id(&self, id: AccountId) -> anyhow::Result<Option<Account>> {
        let row = sqlx::query("SELECT * FROM accounts WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(account_from_row).transpose()
    }

    async fn find_by_subject(&self, subject: &PrincipalId) -> anyhow::Result<Option<Account>> {
        let row = sqlx::query("SELECT * FROM accounts WHERE subject = $1")
            .bind(subject.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(account_from_row).transpose()
    }

    async fn save(&self, account: &mut Account) -> anyhow::Result<()> {
        match account.id() {
            None => {
                let row = sqlx::query(
                    "INSERT INTO accounts (subject, email, display_name, role, created_at) \
                     VALUES ($1, $2, $3, $4, $5) RETURNING id",
                )
                .bind(account.subject().as_str())
                .bind(account.email())
                .bind(account.display_name())
                .bind(account.role().as_str())
                .bind(account.created_at())
                .fetch_one(&self.pool)
                .await?;
                account.assign_id(AccountId::from_raw(row.try_get::<i64, _>("id")?));
            }
            Some(id) => {
                sqlx::query(
                    "UPDATE accounts SET email = $2, display_name = $3, role = $4 WHERE id = $1",
                )
                .bind(id.as_i64())
                .bind(account.email())
                .bind(account.display_name())
                .bind(account.role().as_str())
                .execute(&self.pool)
                .await?;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: AccountId) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn load_settings(&self, account_id: AccountId) -> anyhow::Result<AccountSettings> {
        let row = sqlx::query("SELECT basic, advanced FROM account_settings WHERE account_id = $1")
            .bind(account_id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let basic: Option<String> = row.try_get("basic")?;
                let advanced: Option<String> = row.try_get("advanced")?;
                Ok(AccountSettings {
                    account_id,
                    basic: from_json_column(basic.as_deref())?,
                    advanced: from_json_column(advanced.as_deref())?,
                })
            }
            None => Ok(AccountSettings::empty(account_id)),
        }
    }

    async fn store_settings(&self, settings: &AccountSettings) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO account_settings (account_id, basic, advanced) VALUES ($1, $2, $3) \
             ON CONFLICT (account_id) DO UPDATE SET basic = $2, advanced = $3",
        )
        .bind(settings.account_id.as_i64())
        .bind(to_json_column(&settings.basic)?)
        .bind(to_json_column(&settings.advanced)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plans
// ─────────────────────────────────────────────────────────────────────────────

pub struct PgPlanRepository {
    pool: PgPool,
}

impl PgPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn plan_from_row(row: &sqlx::postgres::PgRow) -> anyhow::Result<Plan> {
    Ok(Plan::hydrate(
        PlanId::from_raw(row.try_get::<i64, _>("id")?),
        PlanTier::from_claim(&row.try_get::<String, _>("tier")?),
        row.try_get::<String, _>("name")?,
        row.try_get::<i64, _>("monthly_limit")? as u64,
        row.try_get::<i64, _>("price_cents")? as u64,
        row.try_get::<DateTime<Utc>, _>("created_at")?,
    ))
}

#[async_trait]
impl PlanRepository for PgPlanRepository {
    async fn find_by_id(&self, id: PlanId) -> anyhow::Result<Option<Plan>> {
        let row = sqlx::query("SELECT * FROM plans WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(plan_from_row).transpose()
    }

    async fn find_by_tier(&self, tier: PlanTier) -> anyhow::Result<Option<Plan>> {
        let row = sqlx::query("SELECT * FROM plans WHERE tier = $1 LIMIT 1")
            .bind(tier.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(plan_from_row).transpose()
    }

    async fn save(&self, plan: &mut Plan) -> anyhow::Result<()> {
        match plan.id() {
            None => {
                let row = sqlx::query(
                    "INSERT INTO plans (tier, name, monthly_limit, price_cents, created_at) \
                     VALUES ($1, $2, $3, $4, $5) RETURNING id",
                )
                .bind(plan.tier().as_str())
                .bind(plan.name())
                .bind(plan.monthly_limit() as i64)
                .bind(plan.price_cents() as i64)
                .bind(plan.created_at())
                .fetch_one(&self.pool)
                .await?;
                plan.assign_id(PlanId::from_raw(row.try_get::<i64, _>("id")?));
            }
            Some(id) => {
                sqlx::query(
                    "UPDATE plans SET tier = $2, name = $3, monthly_limit = $4, price_cents = $5 \
                     WHERE id = $1",
                )
                .bind(id.as_i64())
                .bind(plan.tier().as_str())
                .bind(plan.name())
                .bind(plan.monthly_limit() as i64)
                .bind(plan.price_cents() as i64)
                .execute(&self.pool)
                .await?;
            }
        }
        Ok(())
    }

    async fn all(&self) -> anyhow::Result<Vec<Plan>> {
        let rows = sqlx::query("SELECT * FROM plans ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(plan_from_row).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Subscriptions
// ─────────────────────────────────────────────────────────────────────────────

pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn subscription_from_row(row: &sqlx::postgres::PgRow) -> anyhow::Result<Subscription> {
    Ok(Subscription::hydrate(
        SubscriptionId::from_raw(row.try_get::<i64, _>("id")?),
        AccountId::from_raw(row.try_get::<i64, _>("account_id")?),
        PlanId::from_raw(row.try_get::<i64, _>("plan_id")?),
        parse_status(&row.try_get::<String, _>("status")?)?,
        row.try_get::<DateTime<Utc>, _>("started_at")?,
    ))
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn find_by_id(&self, id: SubscriptionId) -> anyhow::Result<Option<Subscription>> {
        let row = sqlx::query("SELECT * FROM subscriptions WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(subscription_from_row).transpose()
    }

    async fn find_by_account(&self, account_id: AccountId) -> anyhow::Result<Vec<Subscription>> {
        let rows = sqlx::query("SELECT * FROM subscriptions WHERE account_id = $1 ORDER BY id")
            .bind(account_id.as_i64())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(subscription_from_row).collect()
    }

    async fn save(&self, subscription: &mut Subscription) -> anyhow::Result<()> {
        match subscription.id() {
            None => {
                let row = sqlx::query(
                    "INSERT INTO subscriptions (account_id, plan_id, status, started_at) \
                     VALUES ($1, $2, $3, $4) RETURNING id",
                )
                .bind(subscription.account_id().as_i64())
                .bind(subscription.plan_id().as_i64())
                .bind(status_str(subscription.status()))
                .bind(subscription.started_at())
                .fetch_one(&self.pool)
                .await?;
                subscription.assign_id(SubscriptionId::from_raw(row.try_get::<i64, _>("id")?));
            }
            Some(id) => {
                sqlx::query("UPDATE subscriptions SET plan_id = $2, status = $3 WHERE id = $1")
                    .bind(id.as_i64())
                    .bind(subscription.plan_id().as_i64())
                    .bind(status_str(subscription.status()))
                    .execute(&self.pool)
                    .await?;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: SubscriptionId) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App info
// ─────────────────────────────────────────────────────────────────────────────

pub struct PgAppInfoRepository {
    pool: PgPool,
}

impl PgAppInfoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn app_info_from_row(row: &sqlx::postgres::PgRow) -> anyhow::Result<AppInfo> {
    Ok(AppInfo::hydrate(
        AppInfoId::from_raw(row.try_get::<i64, _>("id")?),
        row.try_get::<String, _>("name")?,
        row.try_get::<String, _>("description")?,
        row.try_get::<Option<String>, _>("icon_url")?,
        row.try_get::<DateTime<Utc>, _>("updated_at")?,
    ))
}

#[async_trait]
impl AppInfoRepository for PgAppInfoRepository {
    async fn find_by_id(&self, id: AppInfoId) -> anyhow::Result<Option<AppInfo>> {
        let row = sqlx::query("SELECT * FROM app_info WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(app_info_from_row).transpose()
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<AppInfo>> {
        let row = sqlx::query("SELECT * FROM app_info WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(app_info_from_row).transpose()
    }

    async fn save(&self, info: &mut AppInfo) -> anyhow::Result<()> {
        match info.id() {
            None => {
                let row = sqlx::query(
                    "INSERT INTO app_info (name, description, icon_url, updated_at) \
                     VALUES ($1, $2, $3, $4) RETURNING id",
                )
                .bind(info.name())
                .bind(info.description())
                .bind(info.icon_url())
                .bind(info.updated_at())
                .fetch_one(&self.pool)
                .await?;
                info.assign_id(AppInfoId::from_raw(row.try_get::<i64, _>("id")?));
            }
            Some(id) => {
                sqlx::query(
                    "UPDATE app_info SET name = $2, description = $3, icon_url = $4, \
                     updated_at = $5 WHERE id = $1",
                )
                .bind(id.as_i64())
                .bind(info.name())
                .bind(info.description())
                .bind(info.icon_url())
                .bind(info.updated_at())
                .execute(&self.pool)
                .await?;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: AppInfoId) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM app_info WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn all(&self) -> anyhow::Result<Vec<AppInfo>> {
        let rows = sqlx::query("SELECT * FROM app_info ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(app_info_from_row).collect()
    }
}

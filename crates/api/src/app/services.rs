//! Service wiring (repositories, bus, listeners, domain services).

use std::sync::Arc;

use prepdeck_accounts::AccountService;
use prepdeck_appinfo::{AppInfoService, IconVerifier};
use prepdeck_billing::SubscriptionService;
use prepdeck_events::InProcessEventBus;
use prepdeck_infra::{
    AuditLogListener, BillingLogListener, InMemoryAccountRepository, InMemoryAppInfoRepository,
    InMemoryPlanRepository, InMemorySubscriptionRepository, InitializerContext,
};

/// The wired application services shared by every handler.
pub struct AppServices {
    pub accounts: AccountService,
    pub subscriptions: SubscriptionService,
    pub apps: AppInfoService,
    /// Repository handles for the bootstrap initializers.
    pub seed_ctx: InitializerContext,
}

/// Default wiring: in-memory repositories behind the same traits the
/// Postgres variants implement.
pub fn build_services() -> AppServices {
    let mut bus = InProcessEventBus::new();
    bus.register(Arc::new(AuditLogListener));
    bus.register(Arc::new(BillingLogListener));
    let bus = Arc::new(bus);

    let account_repo = Arc::new(InMemoryAccountRepository::new());
    let plan_repo = Arc::new(InMemoryPlanRepository::new());
    let subscription_repo = Arc::new(InMemorySubscriptionRepository::new());
    let app_repo = Arc::new(InMemoryAppInfoRepository::new());

    let seed_ctx = InitializerContext {
        accounts: account_repo.clone(),
        plans: plan_repo.clone(),
        subscriptions: subscription_repo.clone(),
        apps: app_repo.clone(),
    };

    AppServices {
        accounts: AccountService::new(account_repo, bus.clone()),
        subscriptions: SubscriptionService::new(subscription_repo, plan_repo, bus.clone()),
        apps: AppInfoService::new(app_repo, bus, IconVerifier::new()),
        seed_ctx,
    }
}

/// Postgres wiring, selected when a `DATABASE_URL` is configured.
#[cfg(feature = "postgres")]
pub async fn build_postgres_services(database_url: &str) -> anyhow::Result<AppServices> {
    use prepdeck_infra::{
        PgAccountRepository, PgAppInfoRepository, PgPlanRepository, PgSubscriptionRepository,
        ensure_schema,
    };

    let pool = sqlx::postgres::PgPool::connect(database_url).await?;
    ensure_schema(&pool).await?;

    let mut bus = InProcessEventBus::new();
    bus.register(Arc::new(AuditLogListener));
    bus.register(Arc::new(BillingLogListener));
    let bus = Arc::new(bus);

    let account_repo = Arc::new(PgAccountRepository::new(pool.clone()));
    let plan_repo = Arc::new(PgPlanRepository::new(pool.clone()));
    let subscription_repo = Arc::new(PgSubscriptionRepository::new(pool.clone()));
    let app_repo = Arc::new(PgAppInfoRepository::new(pool));

    let seed_ctx = InitializerContext {
        accounts: account_repo.clone(),
        plans: plan_repo.clone(),
        subscriptions: subscription_repo.clone(),
        apps: app_repo.clone(),
    };

    Ok(AppServices {
        accounts: AccountService::new(account_repo, bus.clone()),
        subscriptions: SubscriptionService::new(subscription_repo, plan_repo, bus.clone()),
        apps: AppInfoService::new(app_repo, bus, IconVerifier::new()),
        seed_ctx,
    })
}

//! `prepdeck-infra` — repository implementations, bootstrap seeding, and
//! stock event listeners.

pub mod bootstrap;
pub mod listeners;
pub mod repositories;
pub mod seed;

#[cfg(test)]
mod integration_tests;

pub use bootstrap::{EntityInitializer, InitializerContext, InitializerRegistry, InitializerReport};
pub use listeners::{AuditLogListener, BillingLogListener};
pub use repositories::in_memory::{
    InMemoryAccountRepository, InMemoryAppInfoRepository, InMemoryPlanRepository,
    InMemorySubscriptionRepository,
};
pub use seed::{DemoAppInitializer, PlanInitializer};

#[cfg(feature = "postgres")]
pub use repositories::postgres::{
    PgAccountRepository, PgAppInfoRepository, PgPlanRepository, PgSubscriptionRepository,
    ensure_schema,
};

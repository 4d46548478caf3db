//! `prepdeck-billing` — plans, subscriptions, and quota arithmetic.

pub mod plan;
pub mod quota;
pub mod repository;
pub mod service;
pub mod subscription;

pub use plan::{Plan, PlanId, PlanTier};
pub use quota::QuotaUsage;
pub use repository::{PlanRepository, SubscriptionRepository};
pub use service::SubscriptionService;
pub use subscription::{
    Subscription, SubscriptionCanceled, SubscriptionEvent, SubscriptionId,
    SubscriptionPlanChanged, SubscriptionStarted, SubscriptionStatus,
};

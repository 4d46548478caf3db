//! Persistence boundaries for plans and subscriptions.

use async_trait::async_trait;

use prepdeck_core::AccountId;

use crate::plan::{Plan, PlanId, PlanTier};
use crate::subscription::{Subscription, SubscriptionId};

/// Plan store.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn find_by_id(&self, id: PlanId) -> anyhow::Result<Option<Plan>>;

    async fn find_by_tier(&self, tier: PlanTier) -> anyhow::Result<Option<Plan>>;

    async fn save(&self, plan: &mut Plan) -> anyhow::Result<()>;

    async fn all(&self) -> anyhow::Result<Vec<Plan>>;
}

/// Subscription store.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn find_by_id(&self, id: SubscriptionId) -> anyhow::Result<Option<Subscription>>;

    async fn find_by_account(&self, account_id: AccountId) -> anyhow::Result<Vec<Subscription>>;

    async fn save(&self, subscription: &mut Subscription) -> anyhow::Result<()>;

    async fn delete(&self, id: SubscriptionId) -> anyhow::Result<()>;
}

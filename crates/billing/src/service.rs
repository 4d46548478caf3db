//! Subscription orchestration.

use std::sync::Arc;

use chrono::Utc;

use prepdeck_core::{AccountId, DomainError, Entity};
use prepdeck_events::{EventBus, UnitOfWork};

use crate::plan::{PlanId, PlanTier};
use crate::quota::QuotaUsage;
use crate::repository::{PlanRepository, SubscriptionRepository};
use crate::subscription::{Subscription, SubscriptionId};

/// Placeholder used-credit figures per tier.
///
/// There is no persistence-backed usage accounting yet; these literals stand
/// in until a real ledger exists.
fn placeholder_used(tier: PlanTier) -> u64 {
    match tier {
        PlanTier::Free => 120,
        PlanTier::Standard => 4_821,
        PlanTier::Pro => 23_456,
    }
}

/// Manages subscription lifecycles and quota reads.
pub struct SubscriptionService {
    subscriptions: Arc<dyn SubscriptionRepository>,
    plans: Arc<dyn PlanRepository>,
    bus: Arc<dyn EventBus>,
}

impl SubscriptionService {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        plans: Arc<dyn PlanRepository>,
        bus: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            subscriptions,
            plans,
            bus,
        }
    }

    /// Start a subscription for an account on an existing plan.
    pub async fn start_subscription(
        &self,
        account_id: AccountId,
        plan_id: PlanId,
    ) -> anyhow::Result<Subscription> {
        if self.plans.find_by_id(plan_id).await?.is_none() {
            return Err(DomainError::not_found().into());
        }

        let mut subscription = Subscription::start(account_id, plan_id, Utc::now());
        self.subscriptions.save(&mut subscription).await?;

        let mut uow = UnitOfWork::new();
        uow.collect("billing.subscription", &mut subscription);
        let _ = uow.commit(&self.bus);

        tracing::info!(subscription_id = ?subscription.id(), %plan_id, "subscription started");
        Ok(subscription)
    }

    /// Move an existing subscription to another plan.
    pub async fn change_plan(
        &self,
        subscription_id: SubscriptionId,
        new_plan_id: PlanId,
    ) -> anyhow::Result<Subscription> {
        if self.plans.find_by_id(new_plan_id).await?.is_none() {
            return Err(DomainError::not_found().into());
        }
        let mut subscription = self.require_subscription(subscription_id).await?;

        subscription.change_plan(new_plan_id, Utc::now())?;
        self.subscriptions.save(&mut subscription).await?;

        let mut uow = UnitOfWork::new();
        uow.collect("billing.subscription", &mut subscription);
        let _ = uow.commit(&self.bus);

        Ok(subscription)
    }

    /// Cancel an existing subscription.
    pub async fn cancel(&self, subscription_id: SubscriptionId) -> anyhow::Result<Subscription> {
        let mut subscription = self.require_subscription(subscription_id).await?;

        subscription.cancel(Utc::now())?;
        self.subscriptions.save(&mut subscription).await?;

        let mut uow = UnitOfWork::new();
        uow.collect("billing.subscription", &mut subscription);
        let _ = uow.commit(&self.bus);

        Ok(subscription)
    }

    /// Consume one interview credit.
    ///
    /// Unimplemented placeholder: the credit ledger does not exist yet, so
    /// this verifies the subscription and otherwise does nothing. The `None`
    /// stands in for the missing receipt.
    pub async fn use_interview(
        &self,
        subscription_id: SubscriptionId,
    ) -> anyhow::Result<Option<QuotaUsage>> {
        self.require_subscription(subscription_id).await?;
        tracing::debug!(%subscription_id, "use_interview called; credit accounting not implemented");
        Ok(None)
    }

    pub async fn get(&self, subscription_id: SubscriptionId) -> anyhow::Result<Subscription> {
        self.require_subscription(subscription_id).await
    }

    pub async fn for_account(&self, account_id: AccountId) -> anyhow::Result<Vec<Subscription>> {
        self.subscriptions.find_by_account(account_id).await
    }

    pub async fn plans(&self) -> anyhow::Result<Vec<crate::plan::Plan>> {
        self.plans.all().await
    }

    /// Quota snapshot for a tier, from the placeholder usage source.
    pub fn quota_for_tier(&self, tier: PlanTier) -> QuotaUsage {
        QuotaUsage::for_tier(tier, placeholder_used(tier))
    }

    /// Usage history is not recorded yet; the list is always empty.
    pub fn usage_history(&self, _tier: PlanTier) -> Vec<QuotaUsage> {
        Vec::new()
    }

    async fn require_subscription(
        &self,
        subscription_id: SubscriptionId,
    ) -> anyhow::Result<Subscription> {
        self.subscriptions
            .find_by_id(subscription_id)
            .await?
            .ok_or_else(|| DomainError::not_found().into())
    }
}

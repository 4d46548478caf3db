//! Shipped initializers: plan catalog and demo app entry.

use async_trait::async_trait;
use chrono::Utc;

use prepdeck_appinfo::{AppInfo, AppInfoRepository};
use prepdeck_billing::{Plan, PlanRepository, PlanTier};

use crate::bootstrap::{EntityInitializer, InitializerContext};

/// Seeds the three plan tiers if they are not stored yet.
pub struct PlanInitializer;

#[async_trait]
impl EntityInitializer for PlanInitializer {
    fn name(&self) -> &str {
        "plans"
    }

    fn priority(&self) -> i32 {
        50
    }

    async fn run(&self, ctx: &InitializerContext) -> anyhow::Result<()> {
        let catalog = [
            (PlanTier::Free, "Free", 0u64),
            (PlanTier::Standard, "Standard", 1_900),
            (PlanTier::Pro, "Pro", 4_900),
        ];

        for (tier, name, price_cents) in catalog {
            if ctx.plans.find_by_tier(tier).await?.is_some() {
                continue;
            }
            let mut plan = Plan::new(tier, name, price_cents, Utc::now());
            ctx.plans.save(&mut plan).await?;
            tracing::info!(%tier, "seeded plan");
        }
        Ok(())
    }
}

/// Seeds a demo app entry for local development. Runs after the plans.
pub struct DemoAppInitializer;

#[async_trait]
impl EntityInitializer for DemoAppInitializer {
    fn name(&self) -> &str {
        "demo-app"
    }

    fn priority(&self) -> i32 {
        150
    }

    fn depends_on(&self) -> Option<&str> {
        Some("plans")
    }

    async fn run(&self, ctx: &InitializerContext) -> anyhow::Result<()> {
        const NAME: &str = "Prepdeck Interview Coach";

        if ctx.apps.find_by_name(NAME).await?.is_some() {
            return Ok(());
        }

        let mut info = AppInfo::register(
            NAME,
            "Mock interviews with quota-tracked credits",
            None,
            Utc::now(),
        )?;
        ctx.apps.save(&mut info).await?;
        tracing::info!(app = NAME, "seeded demo app entry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::InitializerRegistry;
    use crate::repositories::in_memory::{
        InMemoryAccountRepository, InMemoryAppInfoRepository, InMemoryPlanRepository,
        InMemorySubscriptionRepository,
    };
    use std::sync::Arc;

    fn test_context() -> InitializerContext {
        InitializerContext {
            accounts: Arc::new(InMemoryAccountRepository::new()),
            plans: Arc::new(InMemoryPlanRepository::new()),
            subscriptions: Arc::new(InMemorySubscriptionRepository::new()),
            apps: Arc::new(InMemoryAppInfoRepository::new()),
        }
    }

    #[tokio::test]
    async fn seeding_twice_leaves_a_single_catalog() {
        let ctx = test_context();
        let mut registry = InitializerRegistry::new();
        registry.register(Arc::new(PlanInitializer));
        registry.register(Arc::new(DemoAppInitializer));

        let first = registry.run_all(&ctx).await;
        let second = registry.run_all(&ctx).await;

        assert!(first.failed.is_empty());
        assert!(second.failed.is_empty());
        assert_eq!(ctx.plans.all().await.unwrap().len(), 3);
        assert_eq!(ctx.apps.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn plans_are_seeded_before_the_demo_app() {
        let mut registry = InitializerRegistry::new();
        registry.register(Arc::new(DemoAppInitializer));
        registry.register(Arc::new(PlanInitializer));

        let order: Vec<String> = registry
            .execution_order()
            .iter()
            .map(|i| i.name().to_string())
            .collect();
        assert_eq!(order, vec!["plans".to_string(), "demo-app".to_string()]);
    }
}

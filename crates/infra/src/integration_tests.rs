//! Cross-crate integration tests: services + repositories + bus.

mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use prepdeck_accounts::AccountService;
    use prepdeck_auth::{PrincipalId, Role};
    use prepdeck_billing::{PlanTier, SubscriptionService};
    use prepdeck_core::Entity;
    use prepdeck_events::{EventEnvelope, EventListener, InProcessEventBus};

    use crate::repositories::in_memory::{
        InMemoryAccountRepository, InMemoryPlanRepository, InMemorySubscriptionRepository,
    };
    use crate::seed::PlanInitializer;
    use crate::bootstrap::{EntityInitializer, InitializerContext};
    use crate::repositories::in_memory::InMemoryAppInfoRepository;

    struct Recorder {
        types: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                types: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<String> {
            self.types.lock().unwrap().clone()
        }
    }

    impl EventListener for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn on_event(&self, event: &EventEnvelope) -> anyhow::Result<()> {
            self.types
                .lock()
                .unwrap()
                .push(event.event_type().to_string());
            Ok(())
        }
    }

    /// Dispatch runs on a background worker; poll briefly until it lands.
    async fn wait_for_events(recorder: &Recorder, expected: usize) {
        for _ in 0..100 {
            if recorder.seen().len() >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!(
            "expected {expected} events, saw {:?} within timeout",
            recorder.seen()
        );
    }

    struct World {
        accounts: AccountService,
        subscriptions: SubscriptionService,
        plans: Arc<InMemoryPlanRepository>,
        recorder: Arc<Recorder>,
    }

    async fn world() -> World {
        let recorder = Recorder::new();
        let mut bus = InProcessEventBus::new();
        bus.register(recorder.clone());
        let bus = Arc::new(bus);

        let account_repo = Arc::new(InMemoryAccountRepository::new());
        let plan_repo = Arc::new(InMemoryPlanRepository::new());
        let subscription_repo = Arc::new(InMemorySubscriptionRepository::new());

        let ctx = InitializerContext {
            accounts: account_repo.clone(),
            plans: plan_repo.clone(),
            subscriptions: subscription_repo.clone(),
            apps: Arc::new(InMemoryAppInfoRepository::new()),
        };
        PlanInitializer.run(&ctx).await.unwrap();

        World {
            accounts: AccountService::new(account_repo, bus.clone()),
            subscriptions: SubscriptionService::new(subscription_repo, plan_repo.clone(), bus),
            plans: plan_repo,
            recorder,
        }
    }

    #[tokio::test]
    async fn subscription_lifecycle_publishes_events_in_order() {
        use prepdeck_billing::PlanRepository;

        let w = world().await;
        let account = w
            .accounts
            .register(PrincipalId::new("subject-1"), None, "Ada", Role::new("pro"))
            .await
            .unwrap();
        wait_for_events(&w.recorder, 1).await;

        let pro = w
            .plans
            .find_by_tier(PlanTier::Pro)
            .await
            .unwrap()
            .unwrap();
        let standard = w
            .plans
            .find_by_tier(PlanTier::Standard)
            .await
            .unwrap()
            .unwrap();

        let subscription = w
            .subscriptions
            .start_subscription(account.id().unwrap(), pro.id().unwrap())
            .await
            .unwrap();
        let subscription_id = subscription.id().unwrap();

        w.subscriptions
            .change_plan(subscription_id, standard.id().unwrap())
            .await
            .unwrap();
        w.subscriptions.cancel(subscription_id).await.unwrap();

        wait_for_events(&w.recorder, 4).await;
        assert_eq!(
            w.recorder.seen(),
            vec![
                "accounts.account.registered".to_string(),
                "billing.subscription.started".to_string(),
                "billing.subscription.plan_changed".to_string(),
                "billing.subscription.canceled".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn failed_mutations_publish_nothing() {
        use prepdeck_billing::PlanRepository;

        let w = world().await;
        let account = w
            .accounts
            .register(PrincipalId::new("subject-1"), None, "Ada", Role::new("pro"))
            .await
            .unwrap();
        let pro = w
            .plans
            .find_by_tier(PlanTier::Pro)
            .await
            .unwrap()
            .unwrap();

        let subscription = w
            .subscriptions
            .start_subscription(account.id().unwrap(), pro.id().unwrap())
            .await
            .unwrap();
        wait_for_events(&w.recorder, 2).await;

        // Changing to the plan already in use is a conflict; the unit of
        // work is dropped and nothing new reaches the bus.
        let err = w
            .subscriptions
            .change_plan(subscription.id().unwrap(), pro.id().unwrap())
            .await;
        assert!(err.is_err());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(w.recorder.seen().len(), 2);
    }

    #[tokio::test]
    async fn registering_the_same_subject_twice_is_idempotent() {
        let w = world().await;
        let first = w
            .accounts
            .register(PrincipalId::new("subject-1"), None, "Ada", Role::new("free"))
            .await
            .unwrap();
        let second = w
            .accounts
            .register(PrincipalId::new("subject-1"), None, "Ada again", Role::new("free"))
            .await
            .unwrap();

        assert_eq!(first.id(), second.id());

        // Only the first registration produced an event.
        wait_for_events(&w.recorder, 1).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(w.recorder.seen().len(), 1);
    }

    #[tokio::test]
    async fn settings_round_trip_through_the_json_columns() {
        use serde_json::json;

        let w = world().await;
        let account = w
            .accounts
            .register(PrincipalId::new("subject-1"), None, "Ada", Role::new("pro"))
            .await
            .unwrap();
        let account_id = account.id().unwrap();

        let mut basic = prepdeck_accounts::SettingsMap::new();
        basic.insert("theme".to_string(), json!("dark"));
        w.accounts.update_settings(account_id, basic.clone()).await.unwrap();

        let mut advanced = prepdeck_accounts::SettingsMap::new();
        advanced.insert("webhooks".to_string(), json!({ "enabled": true }));
        w.accounts
            .update_advanced_settings(account_id, advanced.clone())
            .await
            .unwrap();

        let settings = w.accounts.settings(account_id).await.unwrap();
        assert_eq!(settings.basic, basic);
        assert_eq!(settings.advanced, advanced);
    }
}

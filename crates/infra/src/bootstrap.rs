//! Startup data seeding: named, ordered, dependency-aware initializers.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use prepdeck_accounts::AccountRepository;
use prepdeck_appinfo::AppInfoRepository;
use prepdeck_billing::{PlanRepository, SubscriptionRepository};

/// Everything an initializer may touch.
#[derive(Clone)]
pub struct InitializerContext {
    pub accounts: Arc<dyn AccountRepository>,
    pub plans: Arc<dyn PlanRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub apps: Arc<dyn AppInfoRepository>,
}

/// A named seed-data routine run once at startup.
///
/// Implementations must be idempotent: the registry may run them against a
/// store that was already seeded on a previous boot.
#[async_trait]
pub trait EntityInitializer: Send + Sync {
    fn name(&self) -> &str;

    /// Lower runs earlier among peers.
    fn priority(&self) -> i32 {
        100
    }

    /// Name of another initializer that must run first, if any.
    fn depends_on(&self) -> Option<&str> {
        None
    }

    async fn run(&self, ctx: &InitializerContext) -> anyhow::Result<()>;
}

/// Outcome of one registry run.
#[derive(Debug, Default)]
pub struct InitializerReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

/// Orders and runs registered initializers.
pub struct InitializerRegistry {
    initializers: Vec<Arc<dyn EntityInitializer>>,
}

impl InitializerRegistry {
    pub fn new() -> Self {
        Self {
            initializers: Vec::new(),
        }
    }

    pub fn register(&mut self, initializer: Arc<dyn EntityInitializer>) {
        self.initializers.push(initializer);
    }

    /// Execution order: initializers with a dependency sort after the
    /// independent ones; ties are broken by ascending priority. Dependency
    /// placement takes precedence over priority, so a low-priority dependent
    /// still runs after its high-priority dependency.
    pub fn execution_order(&self) -> Vec<Arc<dyn EntityInitializer>> {
        let known: HashSet<&str> = self.initializers.iter().map(|i| i.name()).collect();
        for initializer in &self.initializers {
            if let Some(dep) = initializer.depends_on() {
                if !known.contains(dep) {
                    tracing::warn!(
                        initializer = initializer.name(),
                        dependency = dep,
                        "initializer depends on an unknown entity; it will run last"
                    );
                }
            }
        }

        let mut ordered = self.initializers.clone();
        ordered.sort_by_key(|i| (i.depends_on().is_some(), i.priority()));
        ordered
    }

    /// Run every initializer in execution order.
    ///
    /// Each runs in its own unit of work; a failure is logged and skipped so
    /// the remaining initializers still run (partial-success semantics).
    pub async fn run_all(&self, ctx: &InitializerContext) -> InitializerReport {
        let mut report = InitializerReport::default();

        for initializer in self.execution_order() {
            match initializer.run(ctx).await {
                Ok(()) => {
                    tracing::info!(initializer = initializer.name(), "initializer completed");
                    report.succeeded.push(initializer.name().to_string());
                }
                Err(err) => {
                    tracing::error!(
                        initializer = initializer.name(),
                        error = %err,
                        "initializer failed; continuing with the rest"
                    );
                    report.failed.push(initializer.name().to_string());
                }
            }
        }

        report
    }
}

impl Default for InitializerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::in_memory::{
        InMemoryAccountRepository, InMemoryAppInfoRepository, InMemoryPlanRepository,
        InMemorySubscriptionRepository,
    };
    use std::sync::Mutex;

    fn test_context() -> InitializerContext {
        InitializerContext {
            accounts: Arc::new(InMemoryAccountRepository::new()),
            plans: Arc::new(InMemoryPlanRepository::new()),
            subscriptions: Arc::new(InMemorySubscriptionRepository::new()),
            apps: Arc::new(InMemoryAppInfoRepository::new()),
        }
    }

    struct Probe {
        name: &'static str,
        priority: i32,
        depends_on: Option<&'static str>,
        fail: bool,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl EntityInitializer for Probe {
        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn depends_on(&self) -> Option<&str> {
            self.depends_on
        }

        async fn run(&self, _ctx: &InitializerContext) -> anyhow::Result<()> {
            self.log.lock().unwrap().push(self.name);
            if self.fail {
                anyhow::bail!("seed data unavailable");
            }
            Ok(())
        }
    }

    fn probe(
        log: &Arc<Mutex<Vec<&'static str>>>,
        name: &'static str,
        priority: i32,
        depends_on: Option<&'static str>,
        fail: bool,
    ) -> Arc<Probe> {
        Arc::new(Probe {
            name,
            priority,
            depends_on,
            fail,
            log: log.clone(),
        })
    }

    #[tokio::test]
    async fn dependency_placement_beats_priority() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = InitializerRegistry::new();
        // Y has the lower priority number but depends on X, so X runs first.
        registry.register(probe(&log, "y", 10, Some("x"), false));
        registry.register(probe(&log, "x", 50, None, false));

        registry.run_all(&test_context()).await;

        assert_eq!(*log.lock().unwrap(), vec!["x", "y"]);
    }

    #[tokio::test]
    async fn independent_initializers_run_by_ascending_priority() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = InitializerRegistry::new();
        registry.register(probe(&log, "slowpoke", 200, None, false));
        registry.register(probe(&log, "eager", 10, None, false));
        registry.register(probe(&log, "default", 100, None, false));

        registry.run_all(&test_context()).await;

        assert_eq!(*log.lock().unwrap(), vec!["eager", "default", "slowpoke"]);
    }

    #[tokio::test]
    async fn a_failing_initializer_does_not_abort_the_rest() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = InitializerRegistry::new();
        registry.register(probe(&log, "first", 10, None, true));
        registry.register(probe(&log, "second", 20, None, false));

        let report = registry.run_all(&test_context()).await;

        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(report.failed, vec!["first".to_string()]);
        assert_eq!(report.succeeded, vec!["second".to_string()]);
    }

    #[tokio::test]
    async fn unknown_dependency_still_runs_last() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = InitializerRegistry::new();
        registry.register(probe(&log, "orphan", 1, Some("missing"), false));
        registry.register(probe(&log, "normal", 100, None, false));

        registry.run_all(&test_context()).await;

        assert_eq!(*log.lock().unwrap(), vec!["normal", "orphan"]);
    }
}

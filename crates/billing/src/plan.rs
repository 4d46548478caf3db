//! Subscription plans and tiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prepdeck_core::{Entity, numeric_id, same_identity};

numeric_id!(PlanId, "PlanId");

/// Plan tier, mirrored by the role claim in identity tokens.
///
/// Monthly interview-credit limits are hard-coded placeholder business data;
/// a real pricing source would replace these literals.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Standard,
    Pro,
}

impl PlanTier {
    /// Fixed monthly interview-credit limit for the tier.
    pub fn monthly_limit(self) -> u64 {
        match self {
            PlanTier::Free => 1_000,
            PlanTier::Standard => 20_000,
            PlanTier::Pro => 100_000,
        }
    }

    /// Map a role claim onto a tier. Unknown or admin claims fall back to
    /// `Free`, which keeps quota reads total.
    pub fn from_claim(claim: &str) -> Self {
        match claim.to_ascii_lowercase().as_str() {
            "standard" => PlanTier::Standard,
            "pro" => PlanTier::Pro,
            _ => PlanTier::Free,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Standard => "standard",
            PlanTier::Pro => "pro",
        }
    }
}

impl core::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sellable plan.
#[derive(Debug, Clone)]
pub struct Plan {
    id: Option<PlanId>,
    tier: PlanTier,
    name: String,
    monthly_limit: u64,
    price_cents: u64,
    created_at: DateTime<Utc>,
}

impl Plan {
    pub fn new(
        tier: PlanTier,
        name: impl Into<String>,
        price_cents: u64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            tier,
            name: name.into(),
            monthly_limit: tier.monthly_limit(),
            price_cents,
            created_at: now,
        }
    }

    pub fn hydrate(
        id: PlanId,
        tier: PlanTier,
        name: String,
        monthly_limit: u64,
        price_cents: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            tier,
            name,
            monthly_limit,
            price_cents,
            created_at,
        }
    }

    pub fn assign_id(&mut self, id: PlanId) {
        self.id = Some(id);
    }

    pub fn tier(&self) -> PlanTier {
        self.tier
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn monthly_limit(&self) -> u64 {
        self.monthly_limit
    }

    pub fn price_cents(&self) -> u64 {
        self.price_cents
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Plan {
    type Id = PlanId;

    fn id(&self) -> Option<PlanId> {
        self.id
    }
}

impl PartialEq for Plan {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}

//! Quota / usage arithmetic.

use serde::{Deserialize, Serialize};

use prepdeck_core::ValueObject;

use crate::plan::PlanTier;

/// A point-in-time quota snapshot for one caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaUsage {
    pub limit: u64,
    pub used: u64,
}

impl QuotaUsage {
    pub fn new(limit: u64, used: u64) -> Self {
        Self { limit, used }
    }

    /// Snapshot for a tier's fixed monthly limit.
    pub fn for_tier(tier: PlanTier, used: u64) -> Self {
        Self::new(tier.monthly_limit(), used)
    }

    /// Credits left this month. Never underflows; overuse reads as zero.
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.used)
    }

    /// Share of the limit consumed, in percent.
    pub fn percentage(&self) -> f64 {
        if self.limit == 0 {
            return 0.0;
        }
        self.used as f64 * 100.0 / self.limit as f64
    }
}

impl ValueObject for QuotaUsage {}

//! Plan tiers and the monthly generation guard.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StudioError;

pub const DEFAULT_FREE_MONTHLY_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Pro,
}

impl Plan {
    /// Only the free tier is metered.
    pub fn is_metered(self) -> bool {
        matches!(self, Self::Free)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => f.write_str("free"),
            Self::Pro => f.write_str("pro"),
        }
    }
}

impl FromStr for Plan {
    type Err = StudioError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            other => Err(StudioError::validation(format!("unknown plan: {other}"))),
        }
    }
}

/// Successful generations in a calendar month (`YYYY-MM`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounter {
    pub month: String,
    pub count: u32,
}

impl UsageCounter {
    /// Count for the month containing `now`; a counter from another month counts as zero.
    pub fn count_for(&self, now: DateTime<Utc>) -> u32 {
        if self.month == month_key(now) {
            self.count
        } else {
            0
        }
    }
}

fn month_key(now: DateTime<Utc>) -> String {
    format!("{:04}-{:02}", now.year(), now.month())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaGuard {
    pub plan: Plan,
    pub monthly_limit: u32,
}

impl QuotaGuard {
    pub fn new(plan: Plan, monthly_limit: u32) -> Self {
        Self {
            plan,
            monthly_limit,
        }
    }

    /// Whether another generation may be issued.
    pub fn can_generate(&self, usage: &UsageCounter, now: DateTime<Utc>) -> bool {
        self.can_reserve(usage, 0, now)
    }

    /// Whether another generation may be issued while `reserved` metered
    /// requests are still in flight. In-flight requests count against the
    /// ceiling as if they had already succeeded.
    pub fn can_reserve(&self, usage: &UsageCounter, reserved: u32, now: DateTime<Utc>) -> bool {
        if !self.plan.is_metered() {
            return true;
        }
        usage.count_for(now).saturating_add(reserved) < self.monthly_limit
    }

    /// Generations left this month, `None` when unmetered.
    pub fn remaining(&self, usage: &UsageCounter, now: DateTime<Utc>) -> Option<u32> {
        self.plan
            .is_metered()
            .then(|| self.monthly_limit.saturating_sub(usage.count_for(now)))
    }

    /// Counter after one more successful generation.
    pub fn record_success(&self, usage: &UsageCounter, now: DateTime<Utc>) -> UsageCounter {
        if !self.plan.is_metered() {
            return usage.clone();
        }
        UsageCounter {
            month: month_key(now),
            count: usage.count_for(now).saturating_add(1),
        }
    }
}

impl Default for QuotaGuard {
    fn default() -> Self {
        Self::new(Plan::Free, DEFAULT_FREE_MONTHLY_LIMIT)
    }
}

//! Paycheck settings singleton
//!
//! Anchors the paycheck series used to classify expense urgency. Created
//! lazily with empty defaults; only the biweekly frequency is implemented.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How often paychecks arrive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum PayFrequency {
    /// Every 14 days
    #[default]
    Biweekly,
}

impl PayFrequency {
    /// Days between consecutive paychecks
    pub fn interval_days(&self) -> i64 {
        match self {
            Self::Biweekly => 14,
        }
    }
}

/// Singleton paycheck settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaycheckSettings {
    /// Most recent payday; `None` until the user sets one
    pub last_paycheck_date: Option<NaiveDate>,

    /// Paycheck cadence
    #[serde(default)]
    pub frequency: PayFrequency,
}

impl PaycheckSettings {
    /// Create settings anchored at a payday
    pub fn anchored(last_paycheck_date: NaiveDate) -> Self {
        Self {
            last_paycheck_date: Some(last_paycheck_date),
            frequency: PayFrequency::Biweekly,
        }
    }
}

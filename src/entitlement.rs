//! Feature gating by per-day usage quotas.
//!
//! Navigation asks [`EntitlementGate::can_perform_action`] before exposing a
//! feature. [`UsageTracker`] is the in-process implementation; hosts with a
//! billing backend implement the trait themselves.

use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::config::engine::UsageConfig;
use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FeatureKey {
    StudyPlanner,
    MockTest,
    AiTutor,
    PracticeQuestions,
}

impl FeatureKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKey::StudyPlanner => "studyPlanner",
            FeatureKey::MockTest => "mockTest",
            FeatureKey::AiTutor => "aiTutor",
            FeatureKey::PracticeQuestions => "practiceQuestions",
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "studyPlanner" => Ok(FeatureKey::StudyPlanner),
            "mockTest" => Ok(FeatureKey::MockTest),
            "aiTutor" => Ok(FeatureKey::AiTutor),
            "practiceQuestions" => Ok(FeatureKey::PracticeQuestions),
            _ => Err(ParseError::FeatureKey(s.to_string())),
        }
    }
}

impl TryFrom<String> for FeatureKey {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FeatureKey> for String {
    fn from(key: FeatureKey) -> Self {
        key.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Entitlement {
    pub fn allow() -> Self {
        Entitlement { allowed: true, reason: None }
    }

    pub fn deny<S: Into<String>>(reason: S) -> Self {
        Entitlement { allowed: false, reason: Some(reason.into()) }
    }
}

pub trait EntitlementGate: Send + Sync {
    fn can_perform_action(&self, user_id: &str, feature: FeatureKey) -> Entitlement;
}

/// Counts feature use per user per calendar day (UTC).
pub struct UsageTracker {
    limits: HashMap<FeatureKey, u32>,
    usage: Mutex<HashMap<(String, FeatureKey, NaiveDate), u32>>,
}

impl UsageTracker {
    pub fn new(config: &UsageConfig) -> Self {
        UsageTracker {
            limits: config.daily_limits.clone(),
            usage: Mutex::new(HashMap::new()),
        }
    }

    pub fn limit(&self, feature: FeatureKey) -> Option<u32> {
        self.limits.get(&feature).copied()
    }

    pub fn usage_on(&self, user_id: &str, feature: FeatureKey, date: NaiveDate) -> u32 {
        self.usage
            .lock()
            .get(&(user_id.to_string(), feature, date))
            .copied()
            .unwrap_or(0)
    }

    pub fn can_perform_action_on(&self, user_id: &str, feature: FeatureKey, date: NaiveDate) -> Entitlement {
        let Some(limit) = self.limit(feature) else {
            return Entitlement::allow();
        };
        let used = self.usage_on(user_id, feature, date);
        if used < limit {
            Entitlement::allow()
        } else {
            tracing::debug!(user_id = %user_id, feature = %feature, used, limit, "Feature quota exhausted");
            Entitlement::deny(format!("Daily limit of {} reached for {}", limit, feature))
        }
    }

    /// Count one use of `feature`. Returns the new count for the day.
    pub fn record_usage_on(&self, user_id: &str, feature: FeatureKey, date: NaiveDate) -> u32 {
        let mut usage = self.usage.lock();
        let count = usage.entry((user_id.to_string(), feature, date)).or_insert(0);
        *count += 1;
        *count
    }

    pub fn record_usage(&self, user_id: &str, feature: FeatureKey) -> u32 {
        self.record_usage_on(user_id, feature, Utc::now().date_naive())
    }

    /// Drop counters for days before `date`.
    pub fn prune_before(&self, date: NaiveDate) {
        self.usage.lock().retain(|(_, _, day), _| *day >= date);
    }
}

impl EntitlementGate for UsageTracker {
    fn can_perform_action(&self, user_id: &str, feature: FeatureKey) -> Entitlement {
        self.can_perform_action_on(user_id, feature, Utc::now().date_naive())
    }
}

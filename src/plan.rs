use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Subscription tier of the restaurant running the import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    #[default]
    Base,
    Premium,
    Full,
}

impl SubscriptionPlan {
    /// Maximum number of items a single import may produce. `None` means unlimited.
    pub fn max_items(self) -> Option<usize> {
        match self {
            SubscriptionPlan::Base => Some(50),
            SubscriptionPlan::Premium => Some(200),
            SubscriptionPlan::Full => None,
        }
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionPlan::Base => write!(f, "base"),
            SubscriptionPlan::Premium => write!(f, "premium"),
            SubscriptionPlan::Full => write!(f, "full"),
        }
    }
}

impl FromStr for SubscriptionPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "base" => Ok(SubscriptionPlan::Base),
            "premium" => Ok(SubscriptionPlan::Premium),
            "full" => Ok(SubscriptionPlan::Full),
            other => Err(format!("unknown subscription plan: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("PREMIUM".parse(), Ok(SubscriptionPlan::Premium));
        assert_eq!(" full ".parse(), Ok(SubscriptionPlan::Full));
        assert_eq!("".parse(), Ok(SubscriptionPlan::Base));
        assert!("gold".parse::<SubscriptionPlan>().is_err());
    }

    #[test]
    fn full_plan_is_unlimited() {
        assert_eq!(SubscriptionPlan::Base.max_items(), Some(50));
        assert_eq!(SubscriptionPlan::Full.max_items(), None);
    }
}

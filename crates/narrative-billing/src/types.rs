//! Type definitions for the billing subsystem.

use crate::errors::BillingError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default price for a single narrative
pub const DEFAULT_PRICE_SINGLE: &str = "price_1QvkjaEHF0Ss91IDEKoczIOu";

/// Default price for the monthly subscription
pub const DEFAULT_PRICE_MONTHLY: &str = "price_1Qvkk0EHF0Ss91IDhWUXeh7E";

/// Purchasable plans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// One-time purchase
    Single,
    /// Recurring subscription
    Monthly,
}

impl Plan {
    /// Checkout mode the plan is sold under
    pub fn mode(self) -> CheckoutMode {
        match self {
            Plan::Single => CheckoutMode::Payment,
            Plan::Monthly => CheckoutMode::Subscription,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Plan::Single => "single",
            Plan::Monthly => "monthly",
        }
    }
}

impl FromStr for Plan {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Plan::Single),
            "monthly" => Ok(Plan::Monthly),
            other => Err(BillingError::InvalidPlan(other.to_string())),
        }
    }
}

/// Checkout session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutMode {
    Payment,
    Subscription,
}

impl CheckoutMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckoutMode::Payment => "payment",
            CheckoutMode::Subscription => "subscription",
        }
    }
}

/// Price ids per plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceCatalog {
    pub single: String,
    pub monthly: String,
}

impl PriceCatalog {
    /// Price id charged for `plan`
    pub fn price_for(&self, plan: Plan) -> &str {
        match plan {
            Plan::Single => &self.single,
            Plan::Monthly => &self.monthly,
        }
    }
}

impl Default for PriceCatalog {
    fn default() -> Self {
        Self {
            single: DEFAULT_PRICE_SINGLE.to_string(),
            monthly: DEFAULT_PRICE_MONTHLY.to_string(),
        }
    }
}

/// Hosted checkout session created by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider session id, used by the browser to redirect
    pub id: String,
    /// Hosted page URL, when the provider returns one
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_parse() {
        assert_eq!("single".parse::<Plan>().unwrap(), Plan::Single);
        assert_eq!("monthly".parse::<Plan>().unwrap(), Plan::Monthly);
        assert!(matches!(
            "yearly".parse::<Plan>(),
            Err(BillingError::InvalidPlan(p)) if p == "yearly"
        ));
        assert!("Single".parse::<Plan>().is_err());
    }

    #[test]
    fn test_plan_modes() {
        assert_eq!(Plan::Single.mode().as_str(), "payment");
        assert_eq!(Plan::Monthly.mode().as_str(), "subscription");
    }

    #[test]
    fn test_default_catalog() {
        let catalog = PriceCatalog::default();
        assert_eq!(catalog.price_for(Plan::Single), DEFAULT_PRICE_SINGLE);
        assert_eq!(catalog.price_for(Plan::Monthly), DEFAULT_PRICE_MONTHLY);
    }
}

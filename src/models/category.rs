//! Category model
//!
//! Expense categories with case-insensitive unique names. One category name
//! is special: expenses in "Credit Card Payment" route funds from an
//! account to a card.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// Category name that designates credit-card payment expenses
pub const CREDIT_CARD_PAYMENT: &str = "Credit Card Payment";

/// An expense category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name, unique case-insensitively
    pub name: String,

    /// Display color as a hex string (e.g., "#4f8a5b")
    pub color: String,

    /// Short icon token for the presentation layer
    pub icon: String,

    /// Whether this is one of the seeded default categories
    pub is_default: bool,

    /// When the category was created
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a new user category
    pub fn new(
        id: CategoryId,
        name: impl Into<String>,
        color: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            icon: icon.into(),
            is_default: false,
            created_at: Utc::now(),
        }
    }

    /// Name normalized for uniqueness comparison
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Whether this category designates credit-card payments
    pub fn is_credit_card_payment(&self) -> bool {
        self.name == CREDIT_CARD_PAYMENT
    }
}

/// Normalize a category name for case-insensitive comparison
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Seeded default categories as (name, color, icon)
pub const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Housing", "#4f8a5b", "home"),
    ("Utilities", "#c9a227", "bolt"),
    ("Insurance", "#3a6ea5", "shield"),
    ("Transportation", "#b45f3c", "car"),
    ("Subscriptions", "#7d5ba6", "repeat"),
    (CREDIT_CARD_PAYMENT, "#a63d40", "credit-card"),
    ("Debt", "#8c3f5d", "scale"),
    ("Healthcare", "#2e8b8b", "heart"),
    ("Education", "#5b7fa6", "book"),
    ("Other", "#6b6b6b", "dots"),
];

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_name() {
        let cat = Category::new(CategoryId::new(1), "  Housing ", "#4f8a5b", "home");
        assert_eq!(cat.normalized_name(), "housing");
        assert_eq!(normalize_name("HOUSING"), "housing");
    }

    #[test]
    fn test_credit_card_payment_detection() {
        let mut cat = Category::new(CategoryId::new(2), CREDIT_CARD_PAYMENT, "#a63d40", "cc");
        assert!(cat.is_credit_card_payment());
        cat.name = "Utilities".into();
        assert!(!cat.is_credit_card_payment());
    }

    #[test]
    fn test_defaults_include_credit_card_payment() {
        assert!(DEFAULT_CATEGORIES
            .iter()
            .any(|(name, _, _)| *name == CREDIT_CARD_PAYMENT));
        assert_eq!(DEFAULT_CATEGORIES.len(), 10);
    }

    #[test]
    fn test_serialization() {
        let cat = Category::new(CategoryId::new(3), "Utilities", "#c9a227", "bolt");
        let json = serde_json::to_value(&cat).unwrap();
        assert_eq!(json["isDefault"], false);
        assert_eq!(json["name"], "Utilities");

        let back: Category = serde_json::from_value(json).unwrap();
        assert_eq!(back, cat);
    }
}

//! Strongly-typed ID wrappers for all entity types
//!
//! Ids are small integers assigned by the store's per-collection sequences.
//! Newtype wrappers prevent accidentally mixing up IDs from different
//! entity types at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw id value
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the raw id value
            pub const fn raw(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(AccountId, "acct-");
define_id!(CreditCardId, "card-");
define_id!(CategoryId, "cat-");
define_id!(ExpenseId, "exp-");
define_id!(PendingTransactionId, "pend-");
define_id!(AuditEntryId, "audit-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_prefix() {
        assert_eq!(AccountId::new(12).to_string(), "acct-12");
        assert_eq!(ExpenseId::new(3).to_string(), "exp-3");
    }

    #[test]
    fn test_parse_with_and_without_prefix() {
        assert_eq!("card-7".parse::<CreditCardId>().unwrap(), CreditCardId::new(7));
        assert_eq!("7".parse::<CreditCardId>().unwrap(), CreditCardId::new(7));
        assert!("card-x".parse::<CreditCardId>().is_err());
    }

    #[test]
    fn test_serialization_is_transparent() {
        let id = AccountId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");

        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_different_id_types_not_mixable() {
        // Different ID types are distinct at compile time; only the raw
        // values can be compared.
        let account_id = AccountId::new(1);
        let expense_id = ExpenseId::new(1);
        assert_eq!(account_id.raw(), expense_id.raw());
    }
}

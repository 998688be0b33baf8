//! Structural validation for accounts, categories, and payment sources
//!
//! Validators are pure functions of their arguments. Expected findings come
//! back as data in the check result; nothing here touches the store.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{
    normalize_name, AccountId, AccountType, Category, CreditCardId, Money, PaymentSource,
    CREDIT_CARD_PAYMENT,
};

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "camelCase")]
pub enum ValidationError {
    /// Name is empty after trimming
    EmptyName,
    /// Name exceeds the storage limit
    #[serde(rename_all = "camelCase")]
    NameTooLong { length: usize, max: usize },
    /// A numeric field is NaN or infinite
    #[serde(rename_all = "camelCase")]
    NonFiniteAmount { field: String },
    /// The account type string is not one of the allowed values
    #[serde(rename_all = "camelCase")]
    UnknownAccountType { value: String },
    /// Another category already uses this name (case-insensitively)
    #[serde(rename_all = "camelCase")]
    DuplicateName { name: String },
    /// The color is not a hex color string
    #[serde(rename_all = "camelCase")]
    InvalidColor { value: String },
    /// The payment-source fields do not form a legal union shape
    #[serde(rename_all = "camelCase")]
    InvalidPaymentSource { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::NameTooLong { length, max } => {
                write!(f, "Name too long ({} chars, max {})", length, max)
            }
            Self::NonFiniteAmount { field } => {
                write!(f, "Field '{}' must be a finite number", field)
            }
            Self::UnknownAccountType { value } => {
                write!(f, "Unknown account type: {}", value)
            }
            Self::DuplicateName { name } => write!(f, "Name already in use: {}", name),
            Self::InvalidColor { value } => write!(f, "Not a hex color: {}", value),
            Self::InvalidPaymentSource { reason } => {
                write!(f, "Invalid payment source: {}", reason)
            }
        }
    }
}

const MAX_NAME_LEN: usize = 100;

/// Raw account input as it arrives from the presentation layer
#[derive(Debug, Clone)]
pub struct AccountInput {
    pub name: String,
    pub account_type: String,
    pub balance: f64,
}

/// Account input after normalization
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedAccount {
    pub name: String,
    pub account_type: AccountType,
    pub balance: Money,
}

/// Result of validating an account input
#[derive(Debug, Clone)]
pub struct AccountCheck {
    pub sanitized: Option<SanitizedAccount>,
    pub errors: Vec<ValidationError>,
}

impl AccountCheck {
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate and sanitize an account input
///
/// Trims the name, rejects empty names and non-finite balances, and
/// normalizes the type string to the enum.
pub fn validate_account(input: &AccountInput) -> AccountCheck {
    let mut errors = Vec::new();

    let name = input.name.trim().to_string();
    if name.is_empty() {
        errors.push(ValidationError::EmptyName);
    } else if name.len() > MAX_NAME_LEN {
        errors.push(ValidationError::NameTooLong {
            length: name.len(),
            max: MAX_NAME_LEN,
        });
    }

    let account_type = match AccountType::parse(&input.account_type) {
        Some(t) => Some(t),
        None => {
            errors.push(ValidationError::UnknownAccountType {
                value: input.account_type.clone(),
            });
            None
        }
    };

    let balance = match Money::from_f64(input.balance) {
        Some(m) => Some(m),
        None => {
            errors.push(ValidationError::NonFiniteAmount {
                field: "balance".into(),
            });
            None
        }
    };

    let sanitized = match (errors.is_empty(), account_type, balance) {
        (true, Some(account_type), Some(balance)) => Some(SanitizedAccount {
            name,
            account_type,
            balance,
        }),
        _ => None,
    };

    AccountCheck { sanitized, errors }
}

/// Raw category input
#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub color: String,
    pub icon: String,
}

/// Category input after normalization
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedCategory {
    pub name: String,
    pub color: String,
    pub icon: String,
}

/// Result of validating a category input
#[derive(Debug, Clone)]
pub struct CategoryCheck {
    pub sanitized: Option<SanitizedCategory>,
    pub errors: Vec<ValidationError>,
}

impl CategoryCheck {
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

fn is_hex_color(s: &str) -> bool {
    let Some(digits) = s.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Validate a category input against the existing categories
///
/// Uniqueness compares trimmed, lowercased names. Pass the category's own
/// name in `existing` filtered out when validating a rename.
pub fn validate_category(input: &CategoryInput, existing: &[Category]) -> CategoryCheck {
    let mut errors = Vec::new();

    let name = input.name.trim().to_string();
    if name.is_empty() {
        errors.push(ValidationError::EmptyName);
    } else if name.len() > MAX_NAME_LEN {
        errors.push(ValidationError::NameTooLong {
            length: name.len(),
            max: MAX_NAME_LEN,
        });
    } else {
        let needle = normalize_name(&name);
        if existing.iter().any(|c| c.normalized_name() == needle) {
            errors.push(ValidationError::DuplicateName { name: name.clone() });
        }
    }

    let color = input.color.trim().to_string();
    if !is_hex_color(&color) {
        errors.push(ValidationError::InvalidColor {
            value: color.clone(),
        });
    }

    let sanitized = if errors.is_empty() {
        Some(SanitizedCategory {
            name,
            color,
            icon: input.icon.trim().to_string(),
        })
    } else {
        None
    };

    CategoryCheck { sanitized, errors }
}

/// Raw payment-source fields as they arrive from the presentation layer,
/// before the union shape is established
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentSourceInput {
    pub account_id: Option<AccountId>,
    pub credit_card_id: Option<CreditCardId>,
    pub target_credit_card_id: Option<CreditCardId>,
}

/// Assemble a `PaymentSource` from raw fields, enforcing the union shape
///
/// For the "Credit Card Payment" category the funding account and target
/// card are both required and a direct card charge is illegal; for every
/// other category exactly one of account/card must be present and a target
/// is illegal.
pub fn validate_payment_source(
    category: &str,
    input: &PaymentSourceInput,
) -> Result<PaymentSource, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidPaymentSource {
        reason: reason.to_string(),
    };

    if category == CREDIT_CARD_PAYMENT {
        if input.credit_card_id.is_some() {
            return Err(invalid(
                "a credit-card payment cannot itself be charged to a card",
            ));
        }
        let account_id = input
            .account_id
            .ok_or_else(|| invalid("a credit-card payment needs a funding account"))?;
        let target_credit_card_id = input
            .target_credit_card_id
            .ok_or_else(|| invalid("a credit-card payment needs a target card"))?;
        return Ok(PaymentSource::CreditCardPayment {
            account_id,
            target_credit_card_id,
        });
    }

    if input.target_credit_card_id.is_some() {
        return Err(invalid(
            "only expenses in the Credit Card Payment category take a target card",
        ));
    }

    match (input.account_id, input.credit_card_id) {
        (Some(account_id), None) => Ok(PaymentSource::Account { account_id }),
        (None, Some(credit_card_id)) => Ok(PaymentSource::CreditCard { credit_card_id }),
        (Some(_), Some(_)) => Err(invalid(
            "an expense is funded by an account or charged to a card, not both",
        )),
        (None, None) => Err(invalid("no funding account or card given")),
    }
}

/// Verify the source⇔category invariant on an assembled expense
pub fn check_source_category(
    category: &str,
    source: &PaymentSource,
) -> Result<(), ValidationError> {
    let is_payment_category = category == CREDIT_CARD_PAYMENT;
    if is_payment_category != source.is_card_payment() {
        return Err(ValidationError::InvalidPaymentSource {
            reason: format!(
                "source kind does not match category '{}': card-payment sources belong to \
                 the {} category and nowhere else",
                category, CREDIT_CARD_PAYMENT
            ),
        });
    }
    Ok(())
}

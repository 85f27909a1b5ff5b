//! Request bodies for creating and editing expenses, and their validation.

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    amount::Amount,
    expense::core::{ExpenseUpdate, NewExpense},
    timestamp,
};

const TITLE_LENGTH: (usize, usize) = (1, 120);
const CURRENCY_LENGTH: (usize, usize) = (3, 3);
const CATEGORY_LENGTH: (usize, usize) = (1, 50);

/// The JSON body for creating an expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExpenseForm {
    pub title: String,
    pub amount: Amount,
    pub currency: String,
    pub category: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(with = "timestamp")]
    pub spent_at: OffsetDateTime,
}

impl CreateExpenseForm {
    /// Check the field lengths and convert the form into a [NewExpense].
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] naming the first field that is too short or too long.
    pub fn validate(self) -> Result<NewExpense, Error> {
        check_length("title", &self.title, TITLE_LENGTH)?;
        check_length("currency", &self.currency, CURRENCY_LENGTH)?;
        check_length("category", &self.category, CATEGORY_LENGTH)?;

        Ok(NewExpense {
            title: self.title,
            amount: self.amount,
            currency: self.currency,
            category: self.category,
            note: self.note,
            spent_at: self.spent_at,
        })
    }
}

/// The JSON body for a partial update of an expense.
///
/// Missing fields are left unchanged. Sending `null` for `note` removes the
/// note, while `null` for any other field is rejected since those fields are
/// required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditExpenseForm {
    #[serde(
        default,
        deserialize_with = "deserialize_non_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_non_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Amount>,
    #[serde(
        default,
        deserialize_with = "deserialize_non_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub currency: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_non_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub note: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_spent_at",
        serialize_with = "timestamp::option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub spent_at: Option<OffsetDateTime>,
}

impl EditExpenseForm {
    /// Check the supplied fields and convert the form into an [ExpenseUpdate].
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] naming the first field that is too short or too long.
    pub fn validate(self) -> Result<ExpenseUpdate, Error> {
        if let Some(title) = &self.title {
            check_length("title", title, TITLE_LENGTH)?;
        }

        if let Some(currency) = &self.currency {
            check_length("currency", currency, CURRENCY_LENGTH)?;
        }

        if let Some(category) = &self.category {
            check_length("category", category, CATEGORY_LENGTH)?;
        }

        Ok(ExpenseUpdate {
            title: self.title,
            amount: self.amount,
            currency: self.currency,
            category: self.category,
            note: self.note,
            spent_at: self.spent_at,
        })
    }
}

/// Distinguish a field that is present but `null` (`Some(None)`) from a
/// missing field (`None`, via `#[serde(default)]`).
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Reject `null` for a field that may be missing but cannot be removed.
fn deserialize_non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn deserialize_spent_at<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    timestamp::deserialize(deserializer).map(Some)
}

fn check_length(field: &str, value: &str, (min, max): (usize, usize)) -> Result<(), Error> {
    let length = value.chars().count();

    if (min..=max).contains(&length) {
        return Ok(());
    }

    let message = if min == max {
        format!("{field} must be exactly {min} characters long, got {length}")
    } else {
        format!("{field} must be between {min} and {max} characters long, got {length}")
    };

    Err(Error::Validation(message))
}

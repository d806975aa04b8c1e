use std::{cmp::Ordering, num::ParseIntError};

use thiserror::Error;
use tracing::trace;

use crate::{
    item::Record,
    text::{fix_author_for_alphabetization, month_number, to_four_digit_year},
};

pub mod stack;

pub use stack::{ComparatorStack, sort_records};

/// Pseudo-field name that sorts by a record's type instead of one of its fields.
pub const TYPE_HEADER: &str = "entrytype";

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("field `{field}`: cannot compare `{value}` with a numeric value")]
    NotAnInteger {
        field: String,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// How values of a field are turned into something comparable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldRule {
    /// The record's type name.
    TypeHeader,
    /// `author`/`editor`: names rewritten last-name-first.
    AuthorList,
    /// Four-digit years, newest first.
    Year,
    /// Month names or numbers, compared as 1..=12.
    Month,
    Generic,
}

impl FieldRule {
    pub fn classify(field: &str) -> Self {
        match field {
            TYPE_HEADER => Self::TypeHeader,
            "author" | "editor" => Self::AuthorList,
            "year" => Self::Year,
            "month" => Self::Month,
            _ => Self::Generic,
        }
    }

    fn transform(self, value: String) -> FieldValue {
        match self {
            Self::AuthorList => FieldValue::Text(fix_author_for_alphabetization(&value)),
            Self::Year => {
                let year = to_four_digit_year(&value);
                match year.parse() {
                    Ok(n) => FieldValue::Numeric(n),
                    Err(_) => FieldValue::Text(year),
                }
            }
            // Unknown months sort as 0.
            Self::Month => FieldValue::Numeric(month_number(&value).map_or(0, i64::from)),
            Self::TypeHeader | Self::Generic => FieldValue::Text(value),
        }
    }
}

/// A field value after its rule's transform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Numeric(i64),
    Text(String),
}

impl FieldValue {
    fn as_integer(&self, field: &str) -> Result<i64, CompareError> {
        match self {
            Self::Numeric(n) => Ok(*n),
            Self::Text(s) => s.parse().map_err(|source| CompareError::NotAnInteger {
                field: field.to_string(),
                value: s.clone(),
                source,
            }),
        }
    }
}

/// Orders records by a single named field.
///
/// The rule is picked once from the field name. Records missing the field sort after every
/// record that has it (before, when reversed); two missing values are equal.
///
/// Numeric values compare in descending order before the direction is applied, so an
/// ascending year sort puts the newest year first. Month sorts are ascending: the month rule
/// applies the opposite sign to its already-negated numeric comparison.
#[derive(Clone, Debug)]
pub struct FieldComparator {
    field: String,
    rule: FieldRule,
    reversed: bool,
}

impl FieldComparator {
    pub fn new(field: impl Into<String>) -> Self {
        Self::with_order(field, false)
    }

    pub fn with_order(field: impl Into<String>, reversed: bool) -> Self {
        let field = field.into();
        let rule = FieldRule::classify(&field);
        trace!(%field, ?rule, reversed, "classified sort field");
        Self {
            field,
            rule,
            reversed,
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field
    }

    pub fn rule(&self) -> FieldRule {
        self.rule
    }

    /// `-1` when reversed, `1` otherwise. Applied to missing-value ordering.
    pub fn multiplier(&self) -> i32 {
        if self.reversed { -1 } else { 1 }
    }

    /// The sign applied to comparisons of two present values.
    pub fn effective_multiplier(&self) -> i32 {
        match self.rule {
            FieldRule::Month => -self.multiplier(),
            _ => self.multiplier(),
        }
    }

    /// The transformed value `record` is sorted by, if it has one.
    pub fn sort_key<R: Record + ?Sized>(&self, record: &R) -> Option<FieldValue> {
        let raw = match self.rule {
            FieldRule::TypeHeader => Some(record.type_name()),
            _ => record.field(&self.field),
        };
        raw.map(|value| self.rule.transform(value))
    }

    pub fn compare<R: Record + ?Sized>(&self, a: &R, b: &R) -> Result<Ordering, CompareError> {
        self.compare_keys(self.sort_key(a).as_ref(), self.sort_key(b).as_ref())
    }

    /// Compare two values already produced by [`FieldComparator::sort_key`].
    ///
    /// Fails when one side is numeric and the other is text that does not parse as an
    /// integer.
    pub fn compare_keys(
        &self,
        a: Option<&FieldValue>,
        b: Option<&FieldValue>,
    ) -> Result<Ordering, CompareError> {
        let (a, b) = match (a, b) {
            (None, None) => return Ok(Ordering::Equal),
            (None, Some(_)) => return Ok(signed(Ordering::Greater, self.multiplier())),
            (Some(_), None) => return Ok(signed(Ordering::Less, self.multiplier())),
            (Some(a), Some(b)) => (a, b),
        };

        let ordering = match (a, b) {
            (FieldValue::Text(x), FieldValue::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
            _ => {
                let x = a.as_integer(&self.field)?;
                let y = b.as_integer(&self.field)?;
                y.cmp(&x)
            }
        };
        Ok(signed(ordering, self.effective_multiplier()))
    }
}

fn signed(ordering: Ordering, sign: i32) -> Ordering {
    if sign < 0 {
        ordering.reverse()
    } else {
        ordering
    }
}

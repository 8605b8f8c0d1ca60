use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Statement layout detected from the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementFormat {
    CreditCard,
    Checking,
    Unknown,
}

impl StatementFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::Checking => "checking",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StatementFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized output of statement parsing (format-agnostic projection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedRecord {
    /// Transaction date (credit card) or posting date (checking), ISO `YYYY-MM-DD`.
    pub date: String,
    /// Secondary post date, credit-card exports only.
    pub post_date: Option<String>,
    pub description: String,
    /// Positive magnitude; the sign of the source amount went into `kind`.
    pub amount: Decimal,
    pub kind: TransactionKind,
    /// Issuer-provided category label, carried through as opaque metadata.
    pub source_category: Option<String>,
}

impl ImportedRecord {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

/// One import call's worth of results: usable records plus the trail of
/// rows that were skipped and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub records: Vec<ImportedRecord>,
    pub format: StatementFormat,
    pub diagnostics: Vec<String>,
}

/// Why a single statement row was skipped. Row-local: never aborts the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("not enough fields, skipping")]
    NotEnoughFields,
    #[error("invalid date, skipping")]
    InvalidDate,
    #[error("invalid amount, skipping")]
    InvalidAmount,
    #[error("failed to parse")]
    Malformed,
}

//! Insert-ready projection of parsed statement records.
//!
//! The persistence layer bulk-inserts these rows; building the payload
//! and slicing it into store-sized batches stays pure and testable
//! here. Issuer categories land in `notes` as opaque text, never in the
//! app's own category model.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{ImportedRecord, TransactionKind};

/// Per-request row limit of the backing store's insert API.
pub const INSERT_BATCH_SIZE: usize = 500;

/// One transaction row as the store's insert API accepts it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionDraft {
    pub account_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub notes: Option<String>,
    pub date: String,
    pub is_recurring: bool,
    pub is_pending: bool,
}

/// Project parsed records into drafts bound to a destination account.
pub fn to_drafts(records: &[ImportedRecord], account_id: &str) -> Vec<TransactionDraft> {
    records
        .iter()
        .map(|r| TransactionDraft {
            account_id: account_id.to_string(),
            kind: r.kind,
            amount: r.amount,
            currency: "USD".to_string(),
            description: r.description.clone(),
            notes: r
                .source_category
                .as_ref()
                .map(|c| format!("Chase category: {c}")),
            date: r.date.clone(),
            is_recurring: false,
            is_pending: false,
        })
        .collect()
}

/// Insert batches in order, each at most `INSERT_BATCH_SIZE` rows.
pub fn batches(drafts: &[TransactionDraft]) -> impl Iterator<Item = &[TransactionDraft]> {
    drafts.chunks(INSERT_BATCH_SIZE)
}

//! bankfeed-ingest: bank statement export parsing (CSV) and the
//! insert-ready transaction projection built from it.

pub mod draft;
pub mod parsers;
pub mod types;

pub use draft::{INSERT_BATCH_SIZE, TransactionDraft, batches, to_drafts};
pub use parsers::chase::parse_statement;
pub use types::{ImportedRecord, ParseOutcome, StatementFormat, TransactionKind};

//! Chase CSV statement parser (credit card and checking/savings exports).
//!
//! Turns one decoded `.csv` blob into a `ParseOutcome`: the format
//! detected from the header row, the records that survived, and one
//! diagnostic per skipped row. A bad row is never fatal to the batch;
//! only an empty file or an unrecognized header rejects the upload.
//!
//! Credit card exports look like:
//!   Transaction Date,Post Date,Description,Category,Type,Amount
//!   03/01/2024,03/02/2024,Coffee Shop,Food,Sale,-4.50
//!
//! Checking/savings exports look like:
//!   Details,Posting Date,Description,Amount,Type,Balance,Check or Slip #
//!   DEBIT,01/15/2024,Grocery Store,-65.23,DEBIT,1000.00,

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

use crate::types::{ImportedRecord, ParseOutcome, RowError, StatementFormat, TransactionKind};

/// Lower-case a header name and collapse whitespace runs to `_`,
/// so `"Posting Date"` and `"posting  date"` both key as `posting_date`.
fn normalize_header(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Split one line into fields, honoring double-quoted fields (commas
/// inside quotes, `""` decoding to a literal `"`). One reader per line
/// keeps a malformed line row-local.
fn tokenize(line: &str) -> Result<Vec<String>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());

    let mut record = csv::StringRecord::new();
    if rdr.read_record(&mut record)? {
        Ok(record.iter().map(str::to_string).collect())
    } else {
        Ok(Vec::new())
    }
}

fn detect_format(normalized: &[String]) -> StatementFormat {
    let has = |name: &str| normalized.iter().any(|h| h == name);

    if has("transaction_date") && has("category") {
        return StatementFormat::CreditCard;
    }
    if has("details") && has("posting_date") && has("balance") {
        return StatementFormat::Checking;
    }
    StatementFormat::Unknown
}

/// Header-name -> column-index lookup, built once from the header row
/// and reused for every data row. Column reordering in the export does
/// not break parsing.
struct HeaderMap(HashMap<String, usize>);

impl HeaderMap {
    fn new(headers: &[String]) -> Self {
        Self(
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| (normalize_header(h), i))
                .collect(),
        )
    }

    /// Field value for a named column, empty string when the column or
    /// the field is absent.
    fn field<'a>(&self, fields: &'a [String], name: &str) -> &'a str {
        self.0
            .get(name)
            .and_then(|&i| fields.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Normalize a statement date to ISO `YYYY-MM-DD`.
///
/// A three-part `M/D/YYYY` value is validated component-wise and
/// zero-padded; anything else non-empty passes through unchanged (some
/// exports already carry ISO dates).
fn normalize_date(raw: &str) -> Result<String, RowError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(RowError::InvalidDate);
    }

    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        return Ok(raw.to_string());
    }

    let month: u32 = parts[0].trim().parse().map_err(|_| RowError::InvalidDate)?;
    let day: u32 = parts[1].trim().parse().map_err(|_| RowError::InvalidDate)?;
    let year: i32 = parts[2].trim().parse().map_err(|_| RowError::InvalidDate)?;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(RowError::InvalidDate)?;
    Ok(date.format("%Y-%m-%d").to_string())
}

/// Strict amount parse: magnitude plus the kind derived from its sign.
/// Negative means expense (purchase/debit), non-negative means income
/// (payment/credit). Unparseable and exactly-zero amounts both reject.
fn parse_amount(raw: &str) -> Result<(Decimal, TransactionKind), RowError> {
    let value = Decimal::from_str(raw.trim()).map_err(|_| RowError::InvalidAmount)?;
    if value.is_zero() {
        return Err(RowError::InvalidAmount);
    }

    let kind = if value.is_sign_negative() {
        TransactionKind::Expense
    } else {
        TransactionKind::Income
    };
    Ok((value.abs(), kind))
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_credit_row(map: &HeaderMap, fields: &[String]) -> Result<ImportedRecord, RowError> {
    let (amount, kind) = parse_amount(map.field(fields, "amount"))?;

    // A bad secondary date drops the field, not the row.
    let post_date = optional(map.field(fields, "post_date")).and_then(|d| normalize_date(&d).ok());

    Ok(ImportedRecord {
        date: normalize_date(map.field(fields, "transaction_date"))?,
        post_date,
        description: map.field(fields, "description").to_string(),
        amount,
        kind,
        source_category: optional(map.field(fields, "category")),
    })
}

fn parse_checking_row(map: &HeaderMap, fields: &[String]) -> Result<ImportedRecord, RowError> {
    let (amount, kind) = parse_amount(map.field(fields, "amount"))?;

    Ok(ImportedRecord {
        date: normalize_date(map.field(fields, "posting_date"))?,
        post_date: None,
        description: map.field(fields, "description").to_string(),
        amount,
        kind,
        source_category: None,
    })
}

/// Parse a raw statement export into records plus per-row diagnostics.
///
/// Never errors on malformed input: an empty file or an unrecognized
/// header yields an `Unknown` outcome with one explanatory diagnostic,
/// and every skipped data row is explained in `diagnostics` without
/// aborting the batch. Pure and idempotent; output order matches input
/// line order.
pub fn parse_statement(raw: &str) -> ParseOutcome {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.len() < 2 {
        return ParseOutcome {
            records: Vec::new(),
            format: StatementFormat::Unknown,
            diagnostics: vec!["file is empty or has no data rows".to_string()],
        };
    }

    let headers = tokenize(lines[0]).unwrap_or_default();
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    let format = detect_format(&normalized);

    if format == StatementFormat::Unknown {
        return ParseOutcome {
            records: Vec::new(),
            format,
            diagnostics: vec![format!(
                "unrecognized CSV format, found headers: {}; expected a credit card or checking/savings export",
                headers.join(", ")
            )],
        };
    }

    let map = HeaderMap::new(&headers);
    let parse_row: fn(&HeaderMap, &[String]) -> Result<ImportedRecord, RowError> = match format {
        StatementFormat::CreditCard => parse_credit_row,
        _ => parse_checking_row,
    };

    let mut records = Vec::new();
    let mut diagnostics = Vec::new();

    for (i, line) in lines.iter().enumerate().skip(1) {
        // Header counts as row 1, so the first data row reports as row 2.
        let row = i + 1;

        let parsed = tokenize(line)
            .map_err(|_| RowError::Malformed)
            .and_then(|fields| {
                if fields.len() < 3 {
                    return Err(RowError::NotEnoughFields);
                }
                parse_row(&map, &fields)
            });

        match parsed {
            Ok(record) => records.push(record),
            Err(err) => diagnostics.push(format!("row {row}: {err}")),
        }
    }

    ParseOutcome {
        records,
        format,
        diagnostics,
    }
}

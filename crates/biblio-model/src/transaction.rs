//! Append-only transaction log records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Checkout,
    Return,
}

/// One checkout or return, recorded at the time it happened.
///
/// Records are append-only and never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Unique record ID, assigned when the record is appended to the
    /// library's log (0 until then).
    pub id: i64,

    /// Display name of the member involved.
    pub member_name: String,

    /// Title of the book involved.
    pub book_title: String,

    /// Date the transaction happened.
    pub date: NaiveDate,

    pub kind: TransactionKind,
}

impl TransactionRecord {
    pub fn new(
        member_name: impl Into<String>,
        book_title: impl Into<String>,
        date: NaiveDate,
        kind: TransactionKind,
    ) -> Self {
        Self {
            id: 0, // Will be set by store
            member_name: member_name.into(),
            book_title: book_title.into(),
            date,
            kind,
        }
    }
}

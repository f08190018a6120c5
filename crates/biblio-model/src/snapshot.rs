//! Library state snapshot, the unit of persistence

use biblio_util::{Isbn, MemberId};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::{Book, Member, TransactionRecord};

/// One loan as persisted: which member holds which ISBN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub member: MemberId,
    pub isbn: Isbn,
}

/// Full library state as written to and read from durable storage.
///
/// Loans are carried alongside books/members/transactions so the ledger
/// invariant (an ISBN held by at most one member, held iff unavailable)
/// survives a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    /// Timestamp of snapshot
    pub timestamp: DateTime<Local>,

    pub books: Vec<Book>,
    pub members: Vec<Member>,
    /// Current loans in borrow order per member.
    pub loans: Vec<LoanRecord>,
    pub transactions: Vec<TransactionRecord>,
}

impl LibrarySnapshot {
    /// An empty snapshot: the state of a library that has never been saved.
    pub fn empty(timestamp: DateTime<Local>) -> Self {
        Self {
            timestamp,
            books: Vec::new(),
            members: Vec::new(),
            loans: Vec::new(),
            transactions: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
            && self.members.is_empty()
            && self.loans.is_empty()
            && self.transactions.is_empty()
    }
}

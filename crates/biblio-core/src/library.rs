//! The library engine
//!
//! Coordinates the catalog and the loan ledger so the two invariants hold
//! after every operation:
//! - a book is unavailable exactly while some member holds it
//! - an ISBN appears in at most one member's held sequence
//!
//! All mutations go through `&mut self`; the binary wraps the engine in one
//! mutex shared with the sweepers, so borrow/return are atomic with respect
//! to every reader.

use biblio_config::LoanPolicy;
use biblio_model::{Book, LibrarySnapshot, Member, TransactionKind, TransactionRecord};
use biblio_util::{Isbn, LibraryError, MemberId, Money, Result};
use chrono::{DateTime, Local, NaiveDate};
use tracing::{info, warn};

use crate::{Catalog, LoanLedger, fine};

/// Result of a successful borrow.
#[derive(Debug, Clone)]
pub struct BorrowReceipt {
    pub isbn: Isbn,
    pub title: String,
    pub due_date: NaiveDate,
}

/// Result of a successful return. The fine is reported, not stored.
#[derive(Debug, Clone)]
pub struct ReturnReceipt {
    pub isbn: Isbn,
    pub title: String,
    pub days_late: i64,
    pub fine: Money,
}

/// One row of a due-date listing.
#[derive(Debug, Clone)]
pub struct DueDateEntry {
    pub isbn: Isbn,
    pub title: String,
    pub due_date: NaiveDate,
}

/// The record keeper: catalog, ledger, and the append-only transaction log.
#[derive(Debug)]
pub struct Library {
    catalog: Catalog,
    ledger: LoanLedger,
    policy: LoanPolicy,
    transactions: Vec<TransactionRecord>,
    next_transaction_id: i64,
}

impl Library {
    /// Create an empty library.
    pub fn new(policy: LoanPolicy) -> Self {
        Self {
            catalog: Catalog::new(),
            ledger: LoanLedger::new(),
            policy,
            transactions: Vec::new(),
            next_transaction_id: 1,
        }
    }

    /// Restore a library from a persisted snapshot.
    pub fn from_snapshot(policy: LoanPolicy, snapshot: LibrarySnapshot) -> Self {
        let mut catalog = Catalog::new();
        for book in snapshot.books {
            let isbn = book.isbn;
            if let Err(e) = catalog.insert_book(book) {
                warn!(isbn = %isbn, error = %e, "Skipping duplicate book in snapshot");
            }
        }
        for member in snapshot.members {
            let id = member.id.clone();
            if let Err(e) = catalog.insert_member(member) {
                warn!(member = %id, error = %e, "Skipping duplicate member in snapshot");
            }
        }

        let ledger = LoanLedger::from_records(snapshot.loans);
        let next_transaction_id = snapshot
            .transactions
            .iter()
            .map(|t| t.id)
            .max()
            .unwrap_or(0)
            + 1;

        info!(
            books = catalog.book_count(),
            members = catalog.member_count(),
            transactions = snapshot.transactions.len(),
            "Library restored from snapshot"
        );

        Self {
            catalog,
            ledger,
            policy,
            transactions: snapshot.transactions,
            next_transaction_id,
        }
    }

    /// Capture the current state for persistence.
    pub fn snapshot(&self, timestamp: DateTime<Local>) -> LibrarySnapshot {
        LibrarySnapshot {
            timestamp,
            books: self.catalog.books().into_iter().cloned().collect(),
            members: self.catalog.members().into_iter().cloned().collect(),
            loans: self.ledger.records(),
            transactions: self.transactions.clone(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &LoanLedger {
        &self.ledger
    }

    pub fn policy(&self) -> &LoanPolicy {
        &self.policy
    }

    /// The append-only checkout/return log.
    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    /// Add a book to the catalog.
    pub fn add_book(&mut self, book: Book) -> Result<()> {
        let isbn = book.isbn;
        self.catalog.insert_book(book)?;
        info!(isbn = %isbn, "Book added");
        Ok(())
    }

    /// Register a member.
    pub fn add_member(&mut self, member: Member) -> Result<()> {
        let id = member.id.clone();
        self.catalog.insert_member(member)?;
        info!(member = %id, "Member added");
        Ok(())
    }

    /// Borrow a book: due date is `today` plus the loan period.
    pub fn borrow(
        &mut self,
        member_id: &MemberId,
        isbn: Isbn,
        today: NaiveDate,
    ) -> Result<BorrowReceipt> {
        let member_name = self
            .catalog
            .member(member_id)
            .map(|m| m.name.clone())
            .ok_or_else(|| LibraryError::MemberNotFound(member_id.clone()))?;

        let due = today + chrono::Duration::days(i64::from(self.policy.period_days));
        let title = {
            let book = self
                .catalog
                .book_mut(isbn)
                .ok_or(LibraryError::BookNotFound(isbn))?;
            if !book.available() {
                return Err(LibraryError::BookUnavailable(isbn));
            }
            book.check_out(due);
            book.title.clone()
        };

        self.ledger.record_loan(member_id.clone(), isbn);
        if let Some(member) = self.catalog.member_mut(member_id) {
            member.add_title(&title);
        }
        self.record_transaction(member_name, title.clone(), today, TransactionKind::Checkout);

        info!(member = %member_id, isbn = %isbn, due = %due, "Book borrowed");

        Ok(BorrowReceipt {
            isbn,
            title,
            due_date: due,
        })
    }

    /// Return a book, reporting any fine owed.
    pub fn return_book(
        &mut self,
        member_id: &MemberId,
        isbn: Isbn,
        today: NaiveDate,
    ) -> Result<ReturnReceipt> {
        if !self.ledger.is_held_by(member_id, isbn) {
            return Err(LibraryError::NotBorrowed {
                member: member_id.clone(),
                isbn,
            });
        }

        let (title, days_late, fine) = {
            let book = self.catalog.book_mut(isbn).ok_or_else(|| {
                LibraryError::internal(format!("ledger references ISBN {isbn} missing from catalog"))
            })?;
            let due = book.due_date.ok_or_else(|| {
                LibraryError::internal(format!("held book {isbn} has no due date"))
            })?;
            let days_late = fine::days_overdue(today, due);
            let fine = fine::fine_amount(today, due, self.policy.fine_per_day);
            book.check_in();
            (book.title.clone(), days_late, fine)
        };

        self.ledger.discharge(member_id, isbn);
        let member_name = match self.catalog.member_mut(member_id) {
            Some(member) => {
                member.remove_title(&title);
                member.name.clone()
            }
            None => member_id.to_string(),
        };
        self.record_transaction(member_name, title.clone(), today, TransactionKind::Return);

        info!(
            member = %member_id,
            isbn = %isbn,
            days_late,
            fine = %fine,
            "Book returned"
        );

        Ok(ReturnReceipt {
            isbn,
            title,
            days_late,
            fine,
        })
    }

    /// Due dates for everything a member currently holds. Empty for an
    /// unknown member or empty holdings.
    pub fn due_dates_for(&self, member_id: &MemberId) -> Vec<DueDateEntry> {
        self.ledger
            .holdings(member_id)
            .iter()
            .filter_map(|&isbn| {
                let Some(book) = self.catalog.book(isbn) else {
                    warn!(isbn = %isbn, "Held ISBN missing from catalog, skipping");
                    return None;
                };
                let Some(due_date) = book.due_date else {
                    warn!(isbn = %isbn, "Held book has no due date, skipping");
                    return None;
                };
                Some(DueDateEntry {
                    isbn,
                    title: book.title.clone(),
                    due_date,
                })
            })
            .collect()
    }

    /// Total fine a member would owe if everything were returned today.
    ///
    /// A held ISBN the catalog cannot resolve is logged and skipped so one
    /// bad entry never poisons the total for the rest.
    pub fn total_fine_for(&self, member_id: &MemberId, today: NaiveDate) -> Money {
        self.ledger
            .holdings(member_id)
            .iter()
            .filter_map(|&isbn| {
                let Some(book) = self.catalog.book(isbn) else {
                    warn!(isbn = %isbn, "Held ISBN missing from catalog, skipping");
                    return None;
                };
                let Some(due) = book.due_date else {
                    warn!(isbn = %isbn, "Held book has no due date, skipping");
                    return None;
                };
                Some(fine::fine_amount(today, due, self.policy.fine_per_day))
            })
            .sum()
    }

    fn record_transaction(
        &mut self,
        member_name: String,
        book_title: String,
        date: NaiveDate,
        kind: TransactionKind,
    ) {
        let mut record = TransactionRecord::new(member_name, book_title, date, kind);
        record.id = self.next_transaction_id;
        self.next_transaction_id += 1;
        self.transactions.push(record);
    }
}

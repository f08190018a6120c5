//! Catalog book record

use biblio_util::Isbn;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A book in the catalog.
///
/// Availability is derived: a book is available exactly when it has no due
/// date. `check_out` and `check_in` are the only mutators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub isbn: Isbn,
    pub title: String,
    pub author: String,
    /// Due date of the current loan, if the book is checked out.
    pub due_date: Option<NaiveDate>,
}

impl Book {
    /// Create a new, available book.
    pub fn new(isbn: Isbn, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            isbn,
            title: title.into(),
            author: author.into(),
            due_date: None,
        }
    }

    /// Whether the book can currently be borrowed.
    pub fn available(&self) -> bool {
        self.due_date.is_none()
    }

    /// Mark the book as checked out until `due`.
    pub fn check_out(&mut self, due: NaiveDate) {
        self.due_date = Some(due);
    }

    /// Mark the book as returned.
    pub fn check_in(&mut self) {
        self.due_date = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_iff_no_due_date() {
        let mut book = Book::new(Isbn::new(123456), "Harry Potter", "J.K. Rowling");
        assert!(book.available());
        assert!(book.due_date.is_none());

        let due = NaiveDate::from_ymd_opt(2026, 3, 6).unwrap();
        book.check_out(due);
        assert!(!book.available());
        assert_eq!(book.due_date, Some(due));

        book.check_in();
        assert!(book.available());
        assert!(book.due_date.is_none());
    }

    #[test]
    fn book_serializes_round_trip() {
        let mut book = Book::new(Isbn::new(789012), "Lord of the Rings", "J.R.R. Tolkien");
        book.check_out(NaiveDate::from_ymd_opt(2026, 3, 6).unwrap());

        let json = serde_json::to_string(&book).unwrap();
        let parsed: Book = serde_json::from_str(&json).unwrap();
        assert_eq!(book, parsed);
    }
}

//! Catalog store: exclusive owner of book and member records
//!
//! The maps are private; the rest of the system goes through the insert and
//! lookup operations below, never raw map access.

use biblio_model::{Book, Member};
use biblio_util::{Isbn, LibraryError, MemberId, Result};
use std::collections::HashMap;

/// Books and members, keyed by their identifiers.
#[derive(Debug, Default)]
pub struct Catalog {
    books: HashMap<Isbn, Book>,
    members: HashMap<MemberId, Member>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a book to the catalog.
    pub fn insert_book(&mut self, book: Book) -> Result<()> {
        if self.books.contains_key(&book.isbn) {
            return Err(LibraryError::BookAlreadyExists(book.isbn));
        }
        self.books.insert(book.isbn, book);
        Ok(())
    }

    pub fn book(&self, isbn: Isbn) -> Option<&Book> {
        self.books.get(&isbn)
    }

    pub(crate) fn book_mut(&mut self, isbn: Isbn) -> Option<&mut Book> {
        self.books.get_mut(&isbn)
    }

    /// All books, sorted by ISBN for stable listings.
    pub fn books(&self) -> Vec<&Book> {
        let mut books: Vec<&Book> = self.books.values().collect();
        books.sort_by_key(|b| b.isbn);
        books
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Register a member. One record per email address.
    pub fn insert_member(&mut self, member: Member) -> Result<()> {
        if self.members.contains_key(&member.id) {
            return Err(LibraryError::MemberAlreadyExists(member.id));
        }
        self.members.insert(member.id.clone(), member);
        Ok(())
    }

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.get(id)
    }

    pub(crate) fn member_mut(&mut self, id: &MemberId) -> Option<&mut Member> {
        self.members.get_mut(id)
    }

    /// All members, sorted by id for stable listings.
    pub fn members(&self) -> Vec<&Member> {
        let mut members: Vec<&Member> = self.members.values().collect();
        members.sort_by(|a, b| a.id.cmp(&b.id));
        members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

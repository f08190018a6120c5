//! Error types for biblio

use thiserror::Error;

use crate::{Isbn, MemberId};

/// Core error type for library operations.
///
/// Every variant is recoverable at the call site and reported back to the
/// menu as a result value, never a process-terminating fault.
#[derive(Debug, Clone, Error)]
pub enum LibraryError {
    #[error("Book with ISBN {0} not found in the library")]
    BookNotFound(Isbn),

    #[error("Book with ISBN {0} already exists in the library")]
    BookAlreadyExists(Isbn),

    #[error("Book {0} is not available for borrowing")]
    BookUnavailable(Isbn),

    #[error("Book {isbn} not borrowed by member {member}")]
    NotBorrowed { member: MemberId, isbn: Isbn },

    #[error("Member {0} not found")]
    MemberNotFound(MemberId),

    #[error("Member {0} is already registered")]
    MemberAlreadyExists(MemberId),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LibraryError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;

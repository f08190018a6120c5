//! Domain records shared by the biblio core and store
//!
//! This crate holds the serializable records both sides depend on:
//! - `Book` and `Member` (catalog records)
//! - `TransactionRecord` (append-only checkout/return log)
//! - `LibrarySnapshot` (the unit of persistence)

mod book;
mod member;
mod snapshot;
mod transaction;

pub use book::*;
pub use member::*;
pub use snapshot::*;
pub use transaction::*;

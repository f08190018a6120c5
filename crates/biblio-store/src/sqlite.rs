//! SQLite-based store implementation

use biblio_model::{Book, LibrarySnapshot, LoanRecord, Member, TransactionKind, TransactionRecord};
use biblio_util::{Isbn, MemberId};
use chrono::{DateTime, Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

use crate::{Store, StoreError, StoreResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-based store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS books (
                isbn INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                author TEXT NOT NULL,
                due_date TEXT
            );

            CREATE TABLE IF NOT EXISTS members (
                email TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                notifications_enabled INTEGER NOT NULL DEFAULT 1,
                borrowed_titles TEXT NOT NULL DEFAULT '[]'
            );

            -- Current loans, in borrow order
            CREATE TABLE IF NOT EXISTS loans (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                member TEXT NOT NULL,
                isbn INTEGER NOT NULL
            );

            -- Transaction log (append-only)
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                member_name TEXT NOT NULL,
                book_title TEXT NOT NULL,
                date TEXT NOT NULL,
                kind TEXT NOT NULL
            );

            -- Snapshot metadata (single row)
            CREATE TABLE IF NOT EXISTS snapshot_meta (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                saved_at TEXT NOT NULL
            );
            "#,
        )?;

        debug!("Store schema initialized");
        Ok(())
    }
}

impl Store for SqliteStore {
    fn load_snapshot(&self) -> StoreResult<LibrarySnapshot> {
        let conn = self.conn.lock().unwrap();

        let saved_at: Option<String> = conn
            .query_row("SELECT saved_at FROM snapshot_meta WHERE id = 1", [], |r| {
                r.get(0)
            })
            .optional()?;

        let timestamp = match saved_at {
            Some(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Local))
                .map_err(|e| StoreError::Serialization(e.to_string()))?,
            // Never saved: the empty-state case
            None => return Ok(LibrarySnapshot::empty(biblio_util::now())),
        };

        let mut books = Vec::new();
        let mut stmt =
            conn.prepare("SELECT isbn, title, author, due_date FROM books ORDER BY isbn")?;
        let rows = stmt.query_map([], |row| {
            let isbn: i64 = row.get(0)?;
            let title: String = row.get(1)?;
            let author: String = row.get(2)?;
            let due_date: Option<String> = row.get(3)?;
            Ok((isbn, title, author, due_date))
        })?;
        for row in rows {
            let (isbn, title, author, due_date) = row?;
            let due_date = due_date
                .map(|s| {
                    NaiveDate::parse_from_str(&s, DATE_FORMAT)
                        .map_err(|e| StoreError::Serialization(e.to_string()))
                })
                .transpose()?;
            books.push(Book {
                isbn: Isbn::new(isbn as u64),
                title,
                author,
                due_date,
            });
        }

        let mut members = Vec::new();
        let mut stmt = conn.prepare(
            "SELECT email, name, notifications_enabled, borrowed_titles FROM members ORDER BY email",
        )?;
        let rows = stmt.query_map([], |row| {
            let email: String = row.get(0)?;
            let name: String = row.get(1)?;
            let notifications_enabled: bool = row.get(2)?;
            let borrowed_titles: String = row.get(3)?;
            Ok((email, name, notifications_enabled, borrowed_titles))
        })?;
        for row in rows {
            let (email, name, notifications_enabled, borrowed_titles) = row?;
            members.push(Member {
                id: MemberId::new(email),
                name,
                notifications_enabled,
                borrowed_titles: serde_json::from_str(&borrowed_titles)?,
            });
        }

        let mut loans = Vec::new();
        let mut stmt = conn.prepare("SELECT member, isbn FROM loans ORDER BY seq")?;
        let rows = stmt.query_map([], |row| {
            let member: String = row.get(0)?;
            let isbn: i64 = row.get(1)?;
            Ok((member, isbn))
        })?;
        for row in rows {
            let (member, isbn) = row?;
            loans.push(LoanRecord {
                member: MemberId::new(member),
                isbn: Isbn::new(isbn as u64),
            });
        }

        let mut transactions = Vec::new();
        let mut stmt = conn.prepare(
            "SELECT id, member_name, book_title, date, kind FROM transactions ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            let id: i64 = row.get(0)?;
            let member_name: String = row.get(1)?;
            let book_title: String = row.get(2)?;
            let date: String = row.get(3)?;
            let kind: String = row.get(4)?;
            Ok((id, member_name, book_title, date, kind))
        })?;
        for row in rows {
            let (id, member_name, book_title, date, kind) = row?;
            let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            let kind = match kind.as_str() {
                "CHECKOUT" => TransactionKind::Checkout,
                "RETURN" => TransactionKind::Return,
                other => {
                    return Err(StoreError::Serialization(format!(
                        "unknown transaction kind: {other}"
                    )));
                }
            };
            transactions.push(TransactionRecord {
                id,
                member_name,
                book_title,
                date,
                kind,
            });
        }

        debug!(
            books = books.len(),
            members = members.len(),
            loans = loans.len(),
            transactions = transactions.len(),
            "Snapshot loaded"
        );

        Ok(LibrarySnapshot {
            timestamp,
            books,
            members,
            loans,
            transactions,
        })
    }

    fn save_snapshot(&self, snapshot: &LibrarySnapshot) -> StoreResult<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM books", [])?;
        tx.execute("DELETE FROM members", [])?;
        tx.execute("DELETE FROM loans", [])?;
        tx.execute("DELETE FROM transactions", [])?;
        tx.execute("DELETE FROM snapshot_meta", [])?;

        for book in &snapshot.books {
            let due_date = book.due_date.map(|d| d.format(DATE_FORMAT).to_string());
            tx.execute(
                "INSERT INTO books (isbn, title, author, due_date) VALUES (?, ?, ?, ?)",
                params![book.isbn.value() as i64, book.title, book.author, due_date],
            )?;
        }

        for member in &snapshot.members {
            let titles = serde_json::to_string(&member.borrowed_titles)?;
            tx.execute(
                "INSERT INTO members (email, name, notifications_enabled, borrowed_titles)
                 VALUES (?, ?, ?, ?)",
                params![
                    member.id.as_str(),
                    member.name,
                    member.notifications_enabled,
                    titles
                ],
            )?;
        }

        for loan in &snapshot.loans {
            tx.execute(
                "INSERT INTO loans (member, isbn) VALUES (?, ?)",
                params![loan.member.as_str(), loan.isbn.value() as i64],
            )?;
        }

        for record in &snapshot.transactions {
            let kind = match record.kind {
                TransactionKind::Checkout => "CHECKOUT",
                TransactionKind::Return => "RETURN",
            };
            tx.execute(
                "INSERT INTO transactions (id, member_name, book_title, date, kind)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    record.id,
                    record.member_name,
                    record.book_title,
                    record.date.format(DATE_FORMAT).to_string(),
                    kind
                ],
            )?;
        }

        tx.execute(
            "INSERT INTO snapshot_meta (id, saved_at) VALUES (1, ?)",
            [snapshot.timestamp.to_rfc3339()],
        )?;

        tx.commit()?;

        debug!(
            books = snapshot.books.len(),
            members = snapshot.members.len(),
            "Snapshot saved"
        );
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        match self.conn.lock() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => {
                tracing::warn!("Store lock poisoned");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> LibrarySnapshot {
        let mut book = Book::new(Isbn::new(123456), "Harry Potter", "J.K. Rowling");
        book.check_out(NaiveDate::from_ymd_opt(2026, 3, 6).unwrap());

        let mut member = Member::new(MemberId::new("john@example.com"), "John");
        member.add_title("Harry Potter");

        LibrarySnapshot {
            timestamp: biblio_util::now(),
            books: vec![
                book,
                Book::new(Isbn::new(789012), "Lord of the Rings", "J.R.R. Tolkien"),
            ],
            members: vec![member],
            loans: vec![LoanRecord {
                member: MemberId::new("john@example.com"),
                isbn: Isbn::new(123456),
            }],
            transactions: vec![TransactionRecord {
                id: 1,
                member_name: "John".into(),
                book_title: "Harry Potter".into(),
                date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                kind: TransactionKind::Checkout,
            }],
        }
    }

    #[test]
    fn test_in_memory_store() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.is_healthy());
    }

    #[test]
    fn fresh_store_loads_empty_snapshot() {
        let store = SqliteStore::in_memory().unwrap();
        let snapshot = store.load_snapshot().unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn save_load_round_trip() {
        let store = SqliteStore::in_memory().unwrap();
        let snapshot = sample_snapshot();

        store.save_snapshot(&snapshot).unwrap();
        let loaded = store.load_snapshot().unwrap();

        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn save_replaces_prior_state() {
        let store = SqliteStore::in_memory().unwrap();
        store.save_snapshot(&sample_snapshot()).unwrap();

        let empty = LibrarySnapshot::empty(biblio_util::now());
        store.save_snapshot(&empty).unwrap();

        let loaded = store.load_snapshot().unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("biblio.db");
        let snapshot = sample_snapshot();

        {
            let store = SqliteStore::open(&path).unwrap();
            store.save_snapshot(&snapshot).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let loaded = store.load_snapshot().unwrap();
        assert_eq!(loaded, snapshot);
    }
}

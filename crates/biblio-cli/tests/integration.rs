//! Integration tests for biblio
//!
//! These tests verify end-to-end behavior through the public crate APIs:
//! the borrow/return lifecycle, fines, sweeps, and persistence.

use biblio_config::{LoanPolicy, parse_config};
use biblio_core::{Library, LoanStatus};
use biblio_model::{Book, Member, TransactionKind};
use biblio_store::{SqliteStore, Store};
use biblio_util::{Isbn, LibraryError, MemberId, Money};
use chrono::NaiveDate;
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn make_test_library() -> Library {
    let mut library = Library::new(LoanPolicy::default());
    library
        .add_member(Member::new(MemberId::new("u1"), "John"))
        .unwrap();
    library
        .add_member(Member::new(MemberId::new("u2"), "Jane"))
        .unwrap();
    library
        .add_book(Book::new(Isbn::new(123456), "Harry Potter", "J.K. Rowling"))
        .unwrap();
    library
        .add_book(Book::new(
            Isbn::new(789012),
            "Lord of the Rings",
            "J.R.R. Tolkien",
        ))
        .unwrap();
    library
}

fn assert_book_invariant(library: &Library) {
    for book in library.catalog().books() {
        assert_eq!(book.available(), book.due_date.is_none());
        assert_eq!(book.available(), library.ledger().holder_of(book.isbn).is_none());
    }
}

#[test]
fn borrow_return_fine_lifecycle() {
    let mut library = make_test_library();
    let u1 = MemberId::new("u1");
    let u2 = MemberId::new("u2");
    let isbn = Isbn::new(123456);
    let start = date(2026, 3, 1);

    // Borrow succeeds: due date is start + 5 days, book unavailable
    let receipt = library.borrow(&u1, isbn, start).unwrap();
    assert_eq!(receipt.due_date, date(2026, 3, 6));
    assert!(!library.catalog().book(isbn).unwrap().available());
    assert_book_invariant(&library);

    // A second borrower is turned away
    let denied = library.borrow(&u2, isbn, start);
    assert!(matches!(denied, Err(LibraryError::BookUnavailable(i)) if i == isbn));

    // Returned 8 days after borrowing = 3 days late
    let receipt = library.return_book(&u1, isbn, date(2026, 3, 9)).unwrap();
    assert_eq!(receipt.days_late, 3);
    assert_eq!(receipt.fine, library.policy().fine_per_day * 3);

    let book = library.catalog().book(isbn).unwrap();
    assert!(book.available());
    assert!(book.due_date.is_none());
    assert_book_invariant(&library);

    // The whole exchange is on the transaction log
    let kinds: Vec<TransactionKind> = library.transactions().iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TransactionKind::Checkout, TransactionKind::Return]);
}

#[test]
fn return_without_loan_leaves_catalog_unchanged() {
    let mut library = make_test_library();
    let u2 = MemberId::new("u2");

    let before: Vec<Book> = library.catalog().books().into_iter().cloned().collect();

    let result = library.return_book(&u2, Isbn::new(123456), date(2026, 3, 1));
    assert!(matches!(result, Err(LibraryError::NotBorrowed { .. })));

    let after: Vec<Book> = library.catalog().books().into_iter().cloned().collect();
    assert_eq!(before, after);
    assert!(library.transactions().is_empty());
}

#[test]
fn fine_sweep_reflects_current_loans() {
    let mut library = make_test_library();
    let u1 = MemberId::new("u1");

    library.borrow(&u1, Isbn::new(123456), date(2026, 3, 1)).unwrap(); // due 03-06

    // Nothing owed before the due date
    assert!(library.fine_sweep(date(2026, 3, 6)).is_empty());

    // Two days past due
    let notices = library.fine_sweep(date(2026, 3, 8));
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].member, u1);
    assert_eq!(notices[0].total, library.policy().fine_per_day * 2);

    // Returning clears the sweep
    library.return_book(&u1, Isbn::new(123456), date(2026, 3, 8)).unwrap();
    assert!(library.fine_sweep(date(2026, 3, 8)).is_empty());
}

#[test]
fn notification_classification_windows() {
    let today = date(2026, 3, 10);

    // Due in 2 days: due soon
    assert_eq!(
        LoanStatus::classify(today, date(2026, 3, 12), 7),
        LoanStatus::DueSoon
    );
    // Due 1 day ago: overdue
    assert_eq!(
        LoanStatus::classify(today, date(2026, 3, 9), 7),
        LoanStatus::Overdue
    );
    // Due in 30 days: normal
    assert_eq!(
        LoanStatus::classify(today, date(2026, 4, 9), 7),
        LoanStatus::Normal
    );
}

#[test]
fn notification_sweep_composes_one_message_per_member() {
    let mut library = make_test_library();
    let u1 = MemberId::new("u1");
    let u2 = MemberId::new("u2");

    library.borrow(&u1, Isbn::new(123456), date(2026, 3, 1)).unwrap(); // due 03-06
    library.borrow(&u2, Isbn::new(789012), date(2026, 3, 9)).unwrap(); // due 03-14

    let notifications = library.notification_sweep(date(2026, 3, 10));
    assert_eq!(notifications.len(), 2);

    let john = notifications.iter().find(|n| n.member == u1).unwrap();
    assert!(john.message.contains("Harry Potter (Overdue)"));

    let jane = notifications.iter().find(|n| n.member == u2).unwrap();
    assert!(jane.message.contains("Lord of the Rings (Due in 4 days)"));
}

#[test]
fn snapshot_round_trips_through_sqlite() {
    let mut library = make_test_library();
    let u1 = MemberId::new("u1");
    library.borrow(&u1, Isbn::new(123456), date(2026, 3, 1)).unwrap();

    let snapshot = library.snapshot(biblio_util::now());

    let store = SqliteStore::in_memory().unwrap();
    store.save_snapshot(&snapshot).unwrap();
    let loaded = store.load_snapshot().unwrap();
    assert_eq!(loaded, snapshot);

    // A library restored from the loaded snapshot behaves like the original
    let restored = Library::from_snapshot(LoanPolicy::default(), loaded);
    assert!(restored.ledger().is_held_by(&u1, Isbn::new(123456)));
    assert!(!restored.catalog().book(Isbn::new(123456)).unwrap().available());
    assert_book_invariant(&restored);
}

#[test]
fn fresh_store_is_the_empty_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("biblio.db")).unwrap();

    let snapshot = store.load_snapshot().unwrap();
    assert!(snapshot.is_empty());

    let library = Library::from_snapshot(LoanPolicy::default(), snapshot);
    assert_eq!(library.catalog().book_count(), 0);
    assert!(library.transactions().is_empty());
}

#[test]
fn config_drives_loan_policy() {
    let settings = parse_config(
        r#"
        config_version = 1

        [loans]
        period_days = 14
        fine_per_day_cents = 25

        [sweeps]
        fine_interval_secs = 2
        notification_interval_secs = 3
    "#,
    )
    .unwrap();

    let mut library = Library::new(settings.loans);
    library
        .add_member(Member::new(MemberId::new("u1"), "John"))
        .unwrap();
    library
        .add_book(Book::new(Isbn::new(1), "Dune", "Frank Herbert"))
        .unwrap();

    let receipt = library
        .borrow(&MemberId::new("u1"), Isbn::new(1), date(2026, 3, 1))
        .unwrap();
    assert_eq!(receipt.due_date, date(2026, 3, 15));

    let receipt = library
        .return_book(&MemberId::new("u1"), Isbn::new(1), date(2026, 3, 17))
        .unwrap();
    assert_eq!(receipt.fine, Money::from_cents(50));
}

#[tokio::test]
async fn sweeps_read_the_shared_library_under_its_mutex() {
    use tokio::sync::Mutex;

    let library = Arc::new(Mutex::new(make_test_library()));
    let u1 = MemberId::new("u1");

    {
        let mut library = library.lock().await;
        library.borrow(&u1, Isbn::new(123456), date(2026, 3, 1)).unwrap();
    }

    // A reader task sees a consistent post-borrow state
    let reader = {
        let library = library.clone();
        tokio::spawn(async move {
            let library = library.lock().await;
            library.fine_sweep(date(2026, 3, 9))
        })
    };

    let notices = reader.await.unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].total, Money::from_cents(2000) * 3);
}

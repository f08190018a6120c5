//! The interactive numbered menu
//!
//! One `tokio::select!` loop over three inputs: stdin lines, sweep reports,
//! and ctrl-c. Mutating commands save a snapshot afterward; a failed save is
//! reported and the in-memory state kept.

use anyhow::Result;
use biblio_config::SweepSchedule;
use biblio_core::Library;
use biblio_model::{Book, Member};
use biblio_store::Store;
use biblio_util::{Isbn, MemberId, format_date};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{info, warn};

use crate::sweeper::Sweepers;

type StdinLines = tokio::io::Lines<BufReader<tokio::io::Stdin>>;

/// Run the menu until exit, EOF, or ctrl-c.
pub async fn run(
    library: Arc<Mutex<Library>>,
    store: Arc<dyn Store>,
    schedule: SweepSchedule,
) -> Result<()> {
    let (reports_tx, mut reports_rx) = mpsc::unbounded_channel::<String>();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut sweepers = Sweepers::new(library.clone(), schedule, reports_tx, shutdown_rx);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_menu();

    loop {
        print!("Enter your choice: ");
        std::io::stdout().flush()?;

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    // stdin closed
                    println!();
                    break;
                };
                if !handle_choice(line.trim(), &mut lines, &library, &store, &mut sweepers).await? {
                    break;
                }
            }
            Some(report) = reports_rx.recv() => {
                println!();
                println!("{report}");
                println!();
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                info!("Received ctrl-c, shutting down");
                break;
            }
        }
    }

    // Stop the sweepers at their next tick boundary
    let _ = shutdown_tx.send(true);

    save(&library, &store).await;
    println!("Goodbye!");
    info!("Shutdown complete");
    Ok(())
}

fn print_menu() {
    println!();
    println!(" MENU");
    println!("1. Add a book to the library");
    println!("2. Add a member");
    println!("3. Borrow a book");
    println!("4. Return a book");
    println!("5. Show all books");
    println!("6. Start the fine sweep");
    println!("7. Start the notification sweep");
    println!("8. Check due dates for a member");
    println!("9. View fines for a member");
    println!("10. Exit");
}

/// Dispatch one menu choice. Returns false when the user chose to exit.
async fn handle_choice(
    choice: &str,
    lines: &mut StdinLines,
    library: &Arc<Mutex<Library>>,
    store: &Arc<dyn Store>,
    sweepers: &mut Sweepers,
) -> Result<bool> {
    match choice {
        "1" => add_book(lines, library, store).await?,
        "2" => add_member(lines, library, store).await?,
        "3" => borrow_book(lines, library, store).await?,
        "4" => return_book(lines, library, store).await?,
        "5" => show_all_books(library).await,
        "6" => {
            let secs = sweepers.schedule().fine_interval.as_secs();
            if sweepers.start_fine_sweep() {
                println!("Fine sweep started (every {secs}s).");
            } else {
                println!("Fine sweep is already running.");
            }
        }
        "7" => {
            let secs = sweepers.schedule().notification_interval.as_secs();
            if sweepers.start_notification_sweep() {
                println!("Notification sweep started (every {secs}s).");
            } else {
                println!("Notification sweep is already running.");
            }
        }
        "8" => check_due_dates(lines, library).await?,
        "9" => view_fines(lines, library).await?,
        "10" => return Ok(false),
        "" => {}
        other => println!("Invalid choice '{other}'. Please try again."),
    }

    Ok(true)
}

async fn add_book(
    lines: &mut StdinLines,
    library: &Arc<Mutex<Library>>,
    store: &Arc<dyn Store>,
) -> Result<()> {
    let Some(isbn) = prompt_isbn(lines, "Enter the ISBN of the book: ").await? else {
        return Ok(());
    };
    let Some(title) = prompt(lines, "Enter the title of the book: ").await? else {
        return Ok(());
    };
    let Some(author) = prompt(lines, "Enter the author of the book: ").await? else {
        return Ok(());
    };

    let result = {
        let mut library = library.lock().await;
        library.add_book(Book::new(isbn, title, author))
    };
    match result {
        Ok(()) => {
            println!("Book added successfully.");
            save(library, store).await;
        }
        Err(e) => println!("{e}"),
    }
    Ok(())
}

async fn add_member(
    lines: &mut StdinLines,
    library: &Arc<Mutex<Library>>,
    store: &Arc<dyn Store>,
) -> Result<()> {
    let Some(name) = prompt(lines, "Enter the member's name: ").await? else {
        return Ok(());
    };
    let Some(email) = prompt(lines, "Enter the member's email: ").await? else {
        return Ok(());
    };

    let result = {
        let mut library = library.lock().await;
        library.add_member(Member::new(MemberId::new(email), name))
    };
    match result {
        Ok(()) => {
            println!("Member added successfully.");
            save(library, store).await;
        }
        Err(e) => println!("{e}"),
    }
    Ok(())
}

async fn borrow_book(
    lines: &mut StdinLines,
    library: &Arc<Mutex<Library>>,
    store: &Arc<dyn Store>,
) -> Result<()> {
    let Some(email) = prompt(lines, "Enter the member's email: ").await? else {
        return Ok(());
    };
    let Some(isbn) = prompt_isbn(lines, "Enter the ISBN of the book to borrow: ").await? else {
        return Ok(());
    };

    let member = MemberId::new(email);
    let result = {
        let mut library = library.lock().await;
        library.borrow(&member, isbn, biblio_util::today())
    };
    match result {
        Ok(receipt) => {
            println!(
                "Book {} borrowed successfully by member {}. Due date: {}",
                receipt.isbn,
                member,
                format_date(receipt.due_date)
            );
            save(library, store).await;
        }
        Err(e) => println!("{e}"),
    }
    Ok(())
}

async fn return_book(
    lines: &mut StdinLines,
    library: &Arc<Mutex<Library>>,
    store: &Arc<dyn Store>,
) -> Result<()> {
    let Some(email) = prompt(lines, "Enter the member's email: ").await? else {
        return Ok(());
    };
    let Some(isbn) = prompt_isbn(lines, "Enter the ISBN of the book being returned: ").await?
    else {
        return Ok(());
    };

    let member = MemberId::new(email);
    let result = {
        let mut library = library.lock().await;
        library.return_book(&member, isbn, biblio_util::today())
    };
    match result {
        Ok(receipt) => {
            if receipt.fine.is_zero() {
                println!(
                    "Book {} returned successfully by member {}.",
                    receipt.isbn, member
                );
            } else {
                println!(
                    "Book {} returned late by {} days. Fine amount: {}",
                    receipt.isbn, receipt.days_late, receipt.fine
                );
            }
            save(library, store).await;
        }
        Err(e) => println!("{e}"),
    }
    Ok(())
}

async fn show_all_books(library: &Arc<Mutex<Library>>) {
    let library = library.lock().await;
    let books = library.catalog().books();
    if books.is_empty() {
        println!("No books in the library.");
        return;
    }

    println!("Books in the library:");
    for book in books {
        let due = match book.due_date {
            Some(due) => format!(", Due date: {}", format_date(due)),
            None => String::new(),
        };
        println!(
            "ISBN: {}, Title: {}, Author: {}{}",
            book.isbn, book.title, book.author, due
        );
    }
}

async fn check_due_dates(lines: &mut StdinLines, library: &Arc<Mutex<Library>>) -> Result<()> {
    let Some(email) = prompt(lines, "Enter the member's email: ").await? else {
        return Ok(());
    };

    let member = MemberId::new(email);
    let entries = {
        let library = library.lock().await;
        library.due_dates_for(&member)
    };
    if entries.is_empty() {
        println!("Member {member} has no borrowed books.");
        return Ok(());
    }

    println!("Due dates for books borrowed by member {member}:");
    for entry in entries {
        println!(
            "Book ISBN: {}, Title: {}, Due date: {}",
            entry.isbn,
            entry.title,
            format_date(entry.due_date)
        );
    }
    Ok(())
}

async fn view_fines(lines: &mut StdinLines, library: &Arc<Mutex<Library>>) -> Result<()> {
    let Some(email) = prompt(lines, "Enter the member's email: ").await? else {
        return Ok(());
    };

    let member = MemberId::new(email);
    let total = {
        let library = library.lock().await;
        library.total_fine_for(&member, biblio_util::today())
    };
    println!("Total fine for member {member}: {total}");
    Ok(())
}

/// Save a snapshot of the current state. A failure is reported but never
/// rolls back the in-memory library.
async fn save(library: &Arc<Mutex<Library>>, store: &Arc<dyn Store>) {
    let snapshot = {
        let library = library.lock().await;
        library.snapshot(biblio_util::now())
    };
    if let Err(e) = store.save_snapshot(&snapshot) {
        warn!(error = %e, "Failed to save library data");
        println!("Warning: failed to save library data: {e}");
    }
}

async fn prompt(lines: &mut StdinLines, text: &str) -> Result<Option<String>> {
    print!("{text}");
    std::io::stdout().flush()?;
    Ok(lines
        .next_line()
        .await?
        .map(|line| line.trim().to_string()))
}

async fn prompt_isbn(lines: &mut StdinLines, text: &str) -> Result<Option<Isbn>> {
    let Some(input) = prompt(lines, text).await? else {
        return Ok(None);
    };
    match input.parse::<Isbn>() {
        Ok(isbn) => Ok(Some(isbn)),
        Err(_) => {
            println!("Invalid ISBN '{input}'. Please enter a number.");
            Ok(None)
        }
    }
}

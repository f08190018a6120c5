//! Periodic sweep computations
//!
//! One call here is one sweep over current state: the fine sweep aggregates
//! what each borrower owes, the notification sweep composes a status message
//! per member. Neither mutates anything; scheduling lives in the binary.

use biblio_util::{MemberId, Money};
use chrono::NaiveDate;
use tracing::warn;

use crate::Library;

/// Classification of a single held title relative to its due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    /// Past the due date.
    Overdue,
    /// Due within the look-ahead window.
    DueSoon,
    /// Due comfortably in the future.
    Normal,
}

impl LoanStatus {
    /// Classify a due date as seen from `today`.
    pub fn classify(today: NaiveDate, due: NaiveDate, due_soon_days: u32) -> Self {
        if today > due {
            LoanStatus::Overdue
        } else if today + chrono::Duration::days(i64::from(due_soon_days)) > due {
            LoanStatus::DueSoon
        } else {
            LoanStatus::Normal
        }
    }
}

/// One fine-sweep report line: a borrower with a positive fine total.
#[derive(Debug, Clone)]
pub struct FineNotice {
    pub member: MemberId,
    pub total: Money,
}

/// One composed notification message for a member.
#[derive(Debug, Clone)]
pub struct Notification {
    pub member: MemberId,
    pub name: String,
    pub message: String,
}

impl Library {
    /// Fine-aggregation sweep: every borrower owing more than zero, sorted
    /// by member id. Informational only - nothing is charged or stored.
    pub fn fine_sweep(&self, today: NaiveDate) -> Vec<FineNotice> {
        let mut notices: Vec<FineNotice> = self
            .ledger()
            .borrowers()
            .filter_map(|(member, _)| {
                let total = self.total_fine_for(member, today);
                if total.is_zero() {
                    None
                } else {
                    Some(FineNotice {
                        member: member.clone(),
                        total,
                    })
                }
            })
            .collect();
        notices.sort_by(|a, b| a.member.cmp(&b.member));
        notices
    }

    /// Notification sweep: one composed message per member with
    /// notifications enabled and non-empty holdings, every held title
    /// listed with its classification.
    ///
    /// A held ISBN the catalog cannot resolve is logged and skipped; one
    /// bad entry never aborts the sweep for other members.
    pub fn notification_sweep(&self, today: NaiveDate) -> Vec<Notification> {
        let mut notifications = Vec::new();

        for member in self.catalog().members() {
            if !member.notifications_enabled {
                continue;
            }
            let holdings = self.ledger().holdings(&member.id);
            if holdings.is_empty() {
                continue;
            }

            let mut lines = Vec::new();
            for &isbn in holdings {
                let Some(book) = self.catalog().book(isbn) else {
                    warn!(isbn = %isbn, member = %member.id, "Held ISBN missing from catalog, skipping");
                    continue;
                };
                let Some(due) = book.due_date else {
                    warn!(isbn = %isbn, member = %member.id, "Held book has no due date, skipping");
                    continue;
                };
                let line = match LoanStatus::classify(today, due, self.policy().due_soon_days) {
                    LoanStatus::Overdue => format!("- {} (Overdue)", book.title),
                    LoanStatus::DueSoon => {
                        format!("- {} (Due in {} days)", book.title, (due - today).num_days())
                    }
                    LoanStatus::Normal => format!("- {}", book.title),
                };
                lines.push(line);
            }

            if lines.is_empty() {
                continue;
            }

            let message = format!(
                "Dear {},\n\nHere is the status of your borrowed books:\n\n{}\n\nThank you for using our library services.",
                member.name,
                lines.join("\n")
            );

            notifications.push(Notification {
                member: member.id.clone(),
                name: member.name.clone(),
                message,
            });
        }

        notifications
    }
}

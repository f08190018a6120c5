//! Library member record

use biblio_util::MemberId;
use serde::{Deserialize, Serialize};

/// A registered library member, keyed by email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Stable identifier (the member's email).
    pub id: MemberId,

    /// Display name.
    pub name: String,

    /// Whether the notification sweep composes messages for this member.
    pub notifications_enabled: bool,

    /// Titles currently held, in borrow order. Display data; the loan
    /// ledger is the authority on what is actually held.
    pub borrowed_titles: Vec<String>,
}

impl Member {
    /// Register a new member. Notifications are on by default.
    pub fn new(id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            notifications_enabled: true,
            borrowed_titles: Vec::new(),
        }
    }

    /// Record a borrowed title.
    pub fn add_title(&mut self, title: impl Into<String>) {
        self.borrowed_titles.push(title.into());
    }

    /// Remove the first occurrence of a returned title.
    pub fn remove_title(&mut self, title: &str) {
        if let Some(pos) = self.borrowed_titles.iter().position(|t| t == title) {
            self.borrowed_titles.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_member_has_notifications_enabled() {
        let member = Member::new(MemberId::new("john@example.com"), "John");
        assert!(member.notifications_enabled);
        assert!(member.borrowed_titles.is_empty());
    }

    #[test]
    fn titles_append_and_remove_first_occurrence() {
        let mut member = Member::new(MemberId::new("jane@example.com"), "Jane");
        member.add_title("The Hobbit");
        member.add_title("Harry Potter");
        member.add_title("The Hobbit");

        member.remove_title("The Hobbit");
        assert_eq!(member.borrowed_titles, vec!["Harry Potter", "The Hobbit"]);

        // Removing an unknown title is a no-op
        member.remove_title("Dune");
        assert_eq!(member.borrowed_titles.len(), 2);
    }
}

//! Loan ledger: which member currently holds which ISBNs
//!
//! The ledger holds identifiers only - the catalog owns the book records.

use biblio_model::LoanRecord;
use biblio_util::{Isbn, MemberId};
use std::collections::HashMap;

/// Current loans, ordered per member by borrow time.
///
/// Invariant: an ISBN appears in at most one member's sequence, and while it
/// does, the corresponding catalog book is unavailable. Both sides of that
/// invariant are maintained by the `Library` engine, the only mutation path.
#[derive(Debug, Default)]
pub struct LoanLedger {
    loans: HashMap<MemberId, Vec<Isbn>>,
}

impl LoanLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the ledger from persisted loan records (in borrow order).
    pub fn from_records(records: Vec<LoanRecord>) -> Self {
        let mut ledger = Self::new();
        for record in records {
            ledger.record_loan(record.member, record.isbn);
        }
        ledger
    }

    /// Append an ISBN to a member's held sequence.
    pub(crate) fn record_loan(&mut self, member: MemberId, isbn: Isbn) {
        self.loans.entry(member).or_default().push(isbn);
    }

    /// Remove an ISBN from a member's held sequence. Returns false if the
    /// member did not hold it.
    pub(crate) fn discharge(&mut self, member: &MemberId, isbn: Isbn) -> bool {
        let Some(held) = self.loans.get_mut(member) else {
            return false;
        };
        let Some(pos) = held.iter().position(|&i| i == isbn) else {
            return false;
        };
        held.remove(pos);
        if held.is_empty() {
            self.loans.remove(member);
        }
        true
    }

    /// ISBNs currently held by a member, in borrow order. Empty for an
    /// unknown member.
    pub fn holdings(&self, member: &MemberId) -> &[Isbn] {
        self.loans.get(member).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_held_by(&self, member: &MemberId, isbn: Isbn) -> bool {
        self.holdings(member).contains(&isbn)
    }

    /// The member currently holding an ISBN, if any.
    pub fn holder_of(&self, isbn: Isbn) -> Option<&MemberId> {
        self.loans
            .iter()
            .find(|(_, held)| held.contains(&isbn))
            .map(|(member, _)| member)
    }

    /// All members with at least one held ISBN.
    pub fn borrowers(&self) -> impl Iterator<Item = (&MemberId, &[Isbn])> {
        self.loans.iter().map(|(m, held)| (m, held.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    /// Persistable records, sorted by member then borrow order.
    pub fn records(&self) -> Vec<LoanRecord> {
        let mut members: Vec<&MemberId> = self.loans.keys().collect();
        members.sort();

        let mut records = Vec::new();
        for member in members {
            for isbn in self.holdings(member) {
                records.push(LoanRecord {
                    member: member.clone(),
                    isbn: *isbn,
                });
            }
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(email: &str) -> MemberId {
        MemberId::new(email)
    }

    #[test]
    fn loans_append_in_borrow_order() {
        let mut ledger = LoanLedger::new();
        ledger.record_loan(member("u1"), Isbn::new(1));
        ledger.record_loan(member("u1"), Isbn::new(2));

        assert_eq!(ledger.holdings(&member("u1")), &[Isbn::new(1), Isbn::new(2)]);
        assert!(ledger.is_held_by(&member("u1"), Isbn::new(2)));
        assert!(!ledger.is_held_by(&member("u2"), Isbn::new(1)));
    }

    #[test]
    fn discharge_removes_and_prunes() {
        let mut ledger = LoanLedger::new();
        ledger.record_loan(member("u1"), Isbn::new(1));

        assert!(ledger.discharge(&member("u1"), Isbn::new(1)));
        assert!(ledger.is_empty());

        // Discharging again reports not-held
        assert!(!ledger.discharge(&member("u1"), Isbn::new(1)));
    }

    #[test]
    fn holder_of_finds_the_single_holder() {
        let mut ledger = LoanLedger::new();
        ledger.record_loan(member("u1"), Isbn::new(1));
        ledger.record_loan(member("u2"), Isbn::new(2));

        assert_eq!(ledger.holder_of(Isbn::new(2)), Some(&member("u2")));
        assert_eq!(ledger.holder_of(Isbn::new(3)), None);
    }

    #[test]
    fn records_round_trip() {
        let mut ledger = LoanLedger::new();
        ledger.record_loan(member("u2"), Isbn::new(3));
        ledger.record_loan(member("u1"), Isbn::new(1));
        ledger.record_loan(member("u1"), Isbn::new(2));

        let records = ledger.records();
        let rebuilt = LoanLedger::from_records(records.clone());

        assert_eq!(rebuilt.records(), records);
        assert_eq!(rebuilt.holdings(&member("u1")), &[Isbn::new(1), Isbn::new(2)]);
    }
}

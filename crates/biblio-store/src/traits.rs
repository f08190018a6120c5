//! Store trait definitions

use biblio_model::LibrarySnapshot;

use crate::StoreResult;

/// The persistence collaborator.
///
/// Implementations must be shareable across the menu task and the sweepers.
pub trait Store: Send + Sync {
    /// Load the last saved snapshot.
    ///
    /// Returns an empty snapshot if no prior state exists - absence of
    /// saved data is the empty-state case, not an error.
    fn load_snapshot(&self) -> StoreResult<LibrarySnapshot>;

    /// Save a full snapshot, replacing any prior state.
    fn save_snapshot(&self, snapshot: &LibrarySnapshot) -> StoreResult<()>;

    /// Check if the store is healthy
    fn is_healthy(&self) -> bool;
}

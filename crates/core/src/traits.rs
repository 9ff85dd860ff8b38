use std::path::{Path, PathBuf};

use crate::record::Record;

/// Snapshot persistence seam. The address book only guarantees that its
/// full ordered content round-trips; the format belongs to the implementor.
pub trait Snapshot {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist the whole ordered collection; returns the path actually
    /// written (the implementor may add its extension).
    fn save(&self, path: &Path, records: &[Record]) -> Result<PathBuf, Self::Error>;

    fn load(&self, path: &Path) -> Result<Vec<Record>, Self::Error>;
}

/// What to do when a removal matches more than one record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalChoice {
    Abort,
    All,
    /// Remove the candidate at this index within the presented set.
    One(usize),
}

/// The external decision provider consulted when an operation turns out
/// ambiguous. Both calls block; the store resumes on the answer.
pub trait DecisionProvider {
    /// A record with the same `person_id` already exists: add anyway?
    fn allow_duplicate(&self, candidates: &[Record]) -> bool;

    /// Several records match a removal; pick one, all, or none.
    fn pick_removal(&self, candidates: &[Record]) -> RemovalChoice;
}

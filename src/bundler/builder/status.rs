//! Progress tables for discovery and package builds.

use crate::bundler::error::{Error, Result};
use std::{collections::HashMap, fmt::Debug, hash::Hash};

/// Progress of one tracked item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Not yet triggered; the status of every untracked key.
    Pending,
    /// Work is in flight.
    Started,
    /// Work has settled, successfully or not.
    Complete,
}

/// Keyed status table enforcing `Pending -> Started -> Complete`.
#[derive(Debug)]
pub struct StatusTable<K> {
    label: &'static str,
    entries: HashMap<K, Status>,
}

impl<K> StatusTable<K>
where
    K: Eq + Hash + Debug,
{
    /// Creates an empty table; `label` names it in error messages.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            entries: HashMap::new(),
        }
    }

    /// Current status of `key`.
    pub fn get(&self, key: &K) -> Status {
        self.entries.get(key).copied().unwrap_or(Status::Pending)
    }

    /// Moves `key` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvariantViolation`] for anything other than
    /// `Pending -> Started` or `Started -> Complete`; such a call means a
    /// deduplication guard failed.
    pub fn transition(&mut self, key: K, to: Status) -> Result<()> {
        let from = self.get(&key);
        match (from, to) {
            (Status::Pending, Status::Started) | (Status::Started, Status::Complete) => {
                log::debug!("{} {:?}: {:?} -> {:?}", self.label, key, from, to);
                self.entries.insert(key, to);
                Ok(())
            }
            _ => Err(Error::InvariantViolation(format!(
                "{} {:?}: illegal transition {:?} -> {:?}",
                self.label, key, from, to
            ))),
        }
    }

    /// Whether every tracked entry is complete. True for an empty table.
    pub fn all_complete(&self) -> bool {
        self.entries.values().all(|status| *status == Status::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untracked_keys_are_pending() {
        let table: StatusTable<&str> = StatusTable::new("package");
        assert_eq!(table.get(&"a"), Status::Pending);
        assert!(table.all_complete());
    }

    #[test]
    fn forward_transitions_only() {
        let mut table = StatusTable::new("package");
        table.transition("a", Status::Started).unwrap();
        assert!(!table.all_complete());
        assert_eq!(table.get(&"a"), Status::Started);

        table.transition("a", Status::Complete).unwrap();
        assert!(table.all_complete());
        assert_eq!(table.get(&"a"), Status::Complete);
    }

    #[test]
    fn illegal_transitions_are_rejected() {
        let mut table = StatusTable::new("module");
        assert!(table.transition("a", Status::Complete).is_err());

        table.transition("a", Status::Started).unwrap();
        let err = table.transition("a", Status::Started).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(ref m) if m.contains("illegal transition")));

        table.transition("a", Status::Complete).unwrap();
        assert!(table.transition("a", Status::Started).is_err());
        assert!(table.transition("a", Status::Pending).is_err());
        assert_eq!(table.get(&"a"), Status::Complete);
    }
}

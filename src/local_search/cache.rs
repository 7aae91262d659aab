//! The list of improving moves ("LM") kept between iterations of a
//! cache-backed steepest descent.
//!
//! Records are validated lazily: nothing is touched when the tour changes,
//! and stale records are dropped the next time the list is scanned. After
//! a move is applied only the moves around the changed positions have to
//! be enumerated again; everything else in the list stays valid.

use super::moves::{Move, MoveKey, MoveRecord};
use crate::tour::Tour;
use std::collections::HashMap;

/// Improving moves indexed by key, with O(1) insertion and removal.
#[derive(Debug, Clone, Default)]
pub struct MoveCache {
    entries: Vec<(MoveKey, MoveRecord)>,
    index: HashMap<MoveKey, usize>,
}

impl MoveCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Adds `record` unless a record with the same key is already cached.
    /// Returns whether it was added.
    pub fn add(&mut self, record: MoveRecord) -> bool {
        let key = record.key();
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.entries.len());
        self.entries.push((key, record));
        true
    }

    pub fn contains(&self, key: &MoveKey) -> bool {
        self.index.contains_key(key)
    }

    /// Removes the record with `key`.
    pub fn remove(&mut self, key: &MoveKey) -> Option<MoveRecord> {
        let at = *self.index.get(key)?;
        Some(self.remove_at(at))
    }

    fn remove_at(&mut self, at: usize) -> MoveRecord {
        let (key, record) = self.entries.swap_remove(at);
        self.index.remove(&key);
        if let Some((moved, _)) = self.entries.get(at) {
            self.index.insert(*moved, at);
        }
        record
    }

    pub fn records(&self) -> impl Iterator<Item = &MoveRecord> {
        self.entries.iter().map(|(_, r)| r)
    }

    /// Scans the list, dropping every stale record, and removes and
    /// returns the best applicable one by `(delta, key)` together with its
    /// position-based form in `tour`.
    pub fn take_best(&mut self, tour: &Tour<'_>) -> Option<(MoveRecord, Move)> {
        let mut best: Option<(usize, Move)> = None;
        let mut at = 0;
        while at < self.entries.len() {
            let (key, record) = self.entries[at];
            let Some(mv) = record.revalidate(tour) else {
                self.remove_at(at);
                continue;
            };
            let better = match best {
                None => true,
                Some((b, _)) => {
                    let (best_key, best_record) = &self.entries[b];
                    (record.delta(), key) < (best_record.delta(), *best_key)
                }
            };
            if better {
                best = Some((at, mv));
            }
            at += 1;
        }
        // Removals only ever move not-yet-visited entries, so `b` is stable.
        let (b, mv) = best?;
        Some((self.remove_at(b), mv))
    }
}

//! Tabu lists and per-run tabu memory.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use crate::error::TabuError;

/// Bounded FIFO record of recently applied move keys.
///
/// Holds at most `maxlen` distinct keys. Pushing a new key when full evicts
/// the oldest one; pushing a key already present refreshes it to the newest
/// position.
///
/// # Examples
///
/// ```
/// use u_tabu::tabu::TabuList;
///
/// let mut tabu = TabuList::new(2);
/// tabu.push("swap:1:2");
/// tabu.push("swap:2:3");
/// tabu.push("swap:3:4");
/// assert_eq!(tabu.len(), 2);
/// assert!(!tabu.contains("swap:1:2"));
/// assert!(tabu.contains("swap:3:4"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TabuList {
    maxlen: usize,
    // FIFO queue of keys with set for O(1) lookup
    queue: VecDeque<String>,
    set: HashSet<String>,
}

impl TabuList {
    /// Creates an empty list holding at most `maxlen` keys.
    pub fn new(maxlen: usize) -> Self {
        Self {
            maxlen,
            queue: VecDeque::with_capacity(maxlen),
            set: HashSet::with_capacity(maxlen),
        }
    }

    /// Capacity of the list.
    pub fn maxlen(&self) -> usize {
        self.maxlen
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if no key is held.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Whether `key` is currently tabu.
    pub fn contains(&self, key: &str) -> bool {
        self.set.contains(key)
    }

    /// Records `key` as the most recent move.
    pub fn push(&mut self, key: impl Into<String>) {
        if self.maxlen == 0 {
            return;
        }
        let key = key.into();
        if self.set.contains(&key) {
            self.queue.retain(|k| k != &key);
        } else if self.queue.len() >= self.maxlen {
            if let Some(old_key) = self.queue.pop_front() {
                self.set.remove(&old_key);
            }
        }
        self.set.insert(key.clone());
        self.queue.push_back(key);
    }

    /// Keys from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }

    /// Drops every key and sets a new capacity.
    pub fn reset(&mut self, maxlen: usize) {
        self.maxlen = maxlen;
        self.queue.clear();
        self.set.clear();
    }
}

/// Tabu lists for every neighborhood kind of one run.
///
/// Created empty at the start of a run from the configured capacities and
/// dropped when the run ends, so nothing leaks between runs.
#[derive(Debug, Clone, Default)]
pub struct TabuMemory {
    lists: HashMap<&'static str, TabuList>,
}

impl TabuMemory {
    /// Creates one empty list per configured kind.
    pub fn with_capacities(capacities: &BTreeMap<&'static str, usize>) -> Self {
        Self {
            lists: capacities
                .iter()
                .map(|(&kind, &maxlen)| (kind, TabuList::new(maxlen)))
                .collect(),
        }
    }

    /// Whether a list exists for `kind`.
    pub fn is_configured(&self, kind: &str) -> bool {
        self.lists.contains_key(kind)
    }

    /// The list for `kind`.
    pub fn list(&self, kind: &'static str) -> Result<&TabuList, TabuError> {
        self.lists
            .get(kind)
            .ok_or(TabuError::TabuNotConfigured(kind))
    }

    /// Records an accepted move of `kind`.
    pub fn record(&mut self, kind: &'static str, key: impl Into<String>) -> Result<(), TabuError> {
        self.lists
            .get_mut(kind)
            .ok_or(TabuError::TabuNotConfigured(kind))?
            .push(key);
        Ok(())
    }
}

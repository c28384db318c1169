use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

/// Runtime-mutable set of field names whose values must be masked.
///
/// Readers take a cheap `Arc` snapshot and never hold the lock while
/// sanitizing; writers build a new set and swap it in.
#[derive(Debug, Default)]
pub struct Blacklist {
    entries: RwLock<Arc<HashSet<String>>>,
}

impl Blacklist {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: RwLock::new(Arc::new(entries.into_iter().map(Into::into).collect())),
        }
    }

    /// Consistent view of the current entries.
    pub fn snapshot(&self) -> Arc<HashSet<String>> {
        Arc::clone(&self.entries.read())
    }

    /// Current entries, sorted for stable output.
    pub fn entries(&self) -> Vec<String> {
        let snapshot = self.snapshot();
        let mut entries: Vec<String> = snapshot.iter().cloned().collect();
        entries.sort();
        entries
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.read().contains(field)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn replace<I, S>(&self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let next: HashSet<String> = entries.into_iter().map(Into::into).collect();
        *self.entries.write() = Arc::new(next);
    }

    pub fn extend<I, S>(&self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut guard = self.entries.write();
        let mut next = (**guard).clone();
        next.extend(entries.into_iter().map(Into::into));
        *guard = Arc::new(next);
    }

    /// Remove one entry by exact name. Returns whether it was present.
    pub fn remove(&self, field: &str) -> bool {
        let mut guard = self.entries.write();
        if !guard.contains(field) {
            return false;
        }
        let mut next = (**guard).clone();
        next.remove(field);
        *guard = Arc::new(next);
        true
    }
}

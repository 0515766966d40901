use std::sync::Arc;

use crate::{Error, Explore, Result};

/// A root object as stored by the explorer.
///
/// Register an `Arc` you keep a clone of (usually around a lock or atomics)
/// to watch state the host program keeps changing.
pub type SharedValue = Arc<dyn Explore + Send + Sync>;

/// Registry of root objects, in registration order.
///
/// Roots are only ever added. Labels are unique.
#[derive(Default, Clone)]
pub struct Roots {
    entries: Vec<(String, SharedValue)>,
}

impl Roots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root object under `label`.
    ///
    /// Fails with [`Error::EmptyRootLabel`] for an empty label, since an
    /// empty root marks a grid hole, and with [`Error::DuplicateRoot`] if the
    /// label is already taken.
    pub fn insert(&mut self, label: impl Into<String>, value: SharedValue) -> Result<()> {
        let label = label.into();
        if label.is_empty() {
            return Err(Error::EmptyRootLabel);
        }
        if self.contains(&label) {
            return Err(Error::DuplicateRoot(label));
        }
        self.entries.push((label, value));
        Ok(())
    }

    pub fn get(&self, label: &str) -> Option<&SharedValue> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|(l, _)| l == label)
    }

    /// Labels of all roots, in registration order.
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(l, _)| l.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Roots {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.iter().map(|(l, _)| l)).finish()
    }
}

// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Snapshot-and-rollback for local mutations that a backend may still reject.

/// A pending optimistic mutation over a `Vec<T>`.
///
/// [`Optimistic::apply`] records a snapshot and mutates the items in place.
/// The caller then either [`commit`](Optimistic::commit)s once the backend
/// accepts the change or [`rollback`](Optimistic::rollback)s to restore the
/// items exactly as they were, order included.
#[must_use = "an optimistic mutation must be committed or rolled back"]
#[derive(Debug)]
pub struct Optimistic<T> {
    snapshot: Vec<T>,
}

impl<T: Clone> Optimistic<T> {
    /// Snapshot `items`, then apply `mutate` to them.
    pub fn apply<R>(items: &mut Vec<T>, mutate: impl FnOnce(&mut Vec<T>) -> R) -> (Self, R) {
        let snapshot = items.clone();
        let out = mutate(items);
        (Self { snapshot }, out)
    }

    /// Keep the mutation.
    pub fn commit(self) {}

    /// Restore `items` to the snapshot.
    pub fn rollback(self, items: &mut Vec<T>) {
        *items = self.snapshot;
    }

    /// The state before the mutation.
    pub fn snapshot(&self) -> &[T] {
        &self.snapshot
    }
}

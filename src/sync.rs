//! Mirror collections and minimal-diff synchronization.
//!
//! The host IDE owns the live configuration objects and mutates them at
//! will; this crate keeps an observable local mirror of them. On every
//! update cycle the caller recomputes the target sequence from the host's
//! current state and calls [`MirrorCollection::synchronize_with`], which
//! edits the mirror in place with the minimal set of insert/remove
//! operations and leaves every unchanged element untouched — same instance,
//! no spurious change event.
//!
//! Whether an element is "unchanged" is decided by [`StructuralEq`]:
//! identity of the wrapped host object plus order-sensitive equality of all
//! nested children.

use std::hash::{DefaultHasher, Hash, Hasher};

// ═══════════════════════════════════════════════════════════════════════════════
//  Structural equality
// ═══════════════════════════════════════════════════════════════════════════════

/// Order-sensitive structural identity, used to decide reuse vs. replace
/// during mirror synchronization.
///
/// Not a general-purpose equality: two entities are structurally equal only
/// when they wrap the *same* host object (pointer identity) and their
/// observed state, including the full ordered child hierarchy, is identical.
pub trait StructuralEq {
    /// Hash of the entity's own observed state folded, in order, with each
    /// child's structural hash via [`combine_hash`]. Reordering children
    /// changes the result.
    fn structural_hash(&self) -> u64;

    /// Same wrapped host object and element-wise structurally equal
    /// children, in order.
    fn structural_eq(&self, other: &Self) -> bool;

    /// Hook invoked when an existing mirror element is kept in place of a
    /// freshly computed counterpart, so composite entities can synchronize
    /// their nested mirror against the fresh child sequence. Leaf entities
    /// keep the default no-op.
    fn reconcile(&mut self, fresh: Self)
    where
        Self: Sized,
    {
        let _ = fresh;
    }
}

/// Fold one child hash into an accumulated hash.
///
/// Deterministic `seed * 33 ^ next` aggregate; folding the same hashes in a
/// different order yields a different result.
pub fn combine_hash(seed: u64, next: u64) -> u64 {
    seed.wrapping_mul(33) ^ next
}

/// Hash a value with the standard hasher, fixed-keyed so the result is
/// stable for the lifetime of the process.
pub fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Change events
// ═══════════════════════════════════════════════════════════════════════════════

/// A single observable edit of a [`MirrorCollection`], with the index at
/// which it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionChange {
    /// An element was inserted at `index`.
    Inserted { index: usize },
    /// The element at `index` was removed.
    Removed { index: usize },
}

// ═══════════════════════════════════════════════════════════════════════════════
//  MirrorCollection
// ═══════════════════════════════════════════════════════════════════════════════

/// An ordered, observable mirror of an externally owned sequence.
///
/// Reads go through [`iter`](Self::iter)/[`get`](Self::get)/
/// [`as_slice`](Self::as_slice); the only mutation path is
/// [`synchronize_with`](Self::synchronize_with), which records every edit in
/// an internal change log the owner drains and forwards as its own change
/// notifications.
///
/// A synchronization pass holds `&mut self` for its whole duration, so
/// concurrent or reentrant passes over the same mirror are rejected at
/// compile time rather than checked at runtime.
#[derive(Debug)]
pub struct MirrorCollection<T> {
    items: Vec<T>,
    changes: Vec<CollectionChange>,
}

impl<T> Default for MirrorCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MirrorCollection<T> {
    pub fn new() -> Self {
        Self { items: Vec::new(), changes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Consume the mirror, yielding its elements in order.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Take all change events recorded since the last drain, in the order
    /// they were applied.
    pub fn drain_changes(&mut self) -> Vec<CollectionChange> {
        std::mem::take(&mut self.changes)
    }

    fn insert_at(&mut self, index: usize, item: T) {
        self.items.insert(index, item);
        self.changes.push(CollectionChange::Inserted { index });
    }

    fn remove_at(&mut self, index: usize) -> T {
        self.changes.push(CollectionChange::Removed { index });
        self.items.remove(index)
    }
}

impl<'a, T> IntoIterator for &'a MirrorCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: StructuralEq> MirrorCollection<T> {
    /// Edit the mirror in place until it matches `target`, reusing every
    /// element that is structurally unchanged.
    ///
    /// Three passes, all positional (the lists involved are small, so the
    /// O(n·m) scans are fine):
    ///
    /// 1. remove, highest index first, every mirror element with no
    ///    structural counterpart anywhere in the target;
    /// 2. walk the target positions — an element already in place is kept
    ///    as-is (no event), a counterpart found later in the mirror is moved
    ///    into place (one remove plus one insert of the *same* instance),
    ///    anything else is inserted fresh;
    /// 3. drop trailing mirror elements beyond the target length
    ///    (structurally equal duplicates the target no longer repeats).
    ///
    /// Kept and moved elements are [`reconcile`](StructuralEq::reconcile)d
    /// with their fresh counterpart so nested mirrors stay synchronized.
    /// Running the same target twice emits no events on the second pass.
    pub fn synchronize_with(&mut self, target: Vec<T>) {
        let target_len = target.len();

        // Pass 1: drop vanished elements.
        for index in (0..self.items.len()).rev() {
            if !target.iter().any(|fresh| self.items[index].structural_eq(fresh)) {
                self.remove_at(index);
            }
        }

        // Pass 2: keep, move, or insert.
        for (index, fresh) in target.into_iter().enumerate() {
            if index < self.items.len() && self.items[index].structural_eq(&fresh) {
                self.items[index].reconcile(fresh);
                continue;
            }

            let found = (index + 1..self.items.len())
                .find(|&candidate| self.items[candidate].structural_eq(&fresh));

            match found {
                Some(candidate) => {
                    let item = self.remove_at(candidate);
                    self.insert_at(index, item);
                    self.items[index].reconcile(fresh);
                }
                None => self.insert_at(index, fresh),
            }
        }

        // Pass 3: trim leftover duplicates.
        while self.items.len() > target_len {
            let last = self.items.len() - 1;
            self.remove_at(last);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════════

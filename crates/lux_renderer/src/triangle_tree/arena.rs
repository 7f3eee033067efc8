//! Pools for tree node records.
//!
//! Records live in a flat vector and refer to each other through typed
//! indices. The pool grows in fixed batches and is released in one step,
//! so tearing down a tree never walks it.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Index;

/// Typed index of a record in a [`Pool`].
pub(crate) struct Handle<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    #[cfg(test)]
    pub fn index(self) -> usize {
        self.index
    }
}

// Manual impls: derives would require `T: Copy` etc.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.index)
    }
}

/// Batch-growing, bulk-released storage for records of one type.
pub(crate) struct Pool<T> {
    items: Vec<T>,
    batch: usize,
}

impl<T> Pool<T> {
    pub fn new(batch: usize) -> Self {
        Self {
            items: Vec::new(),
            batch: batch.max(1),
        }
    }

    /// Store a record and return its handle.
    pub fn alloc(&mut self, value: T) -> Handle<T> {
        if self.items.len() == self.items.capacity() {
            self.items.reserve_exact(self.batch);
        }
        let handle = Handle::new(self.items.len());
        self.items.push(value);
        handle
    }

    /// Release every record and the memory backing them.
    ///
    /// Handles issued before the purge must not be used afterwards.
    pub fn purge(&mut self) {
        self.items = Vec::new();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<T> Index<Handle<T>> for Pool<T> {
    type Output = T;

    #[inline]
    fn index(&self, handle: Handle<T>) -> &T {
        &self.items[handle.index]
    }
}

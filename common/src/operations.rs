//! Abstract storage operations.

use std::marker::PhantomData;

use crate::Handler;

/// Stores a new record. Fails if a record with the same key exists.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Overwrites an already stored record of the same key.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Reads something described by the wrapped selector, usually a [`By`].
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Begins a transaction, isolating writes until a [`Commit`].
#[derive(Clone, Copy, Debug)]
pub struct Transact;

/// Handler of the operations within a began [`Transact`]ion.
pub type Transacted<T> = <T as Handler<Transact>>::Ok;

/// Publishes the writes of a [`Transact`]ion.
#[derive(Clone, Copy, Debug)]
pub struct Commit;

/// Selector of a `W`hat by some `B` key or criteria.
///
/// `W` is usually an [`Option`] for a single record looked up by its key, or
/// a [`Vec`] for all the records matching some criteria (`()` matching
/// everything).
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the selected value.
    _what: PhantomData<W>,

    /// Key or criteria to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] selector of the provided key or criteria.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Returns the key or criteria of this [`By`] selector.
    #[must_use]
    pub fn inner(&self) -> &B {
        &self.by
    }

    /// Unwraps the key or criteria of this [`By`] selector.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}

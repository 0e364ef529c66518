//! Operations a [`Handler`] may be executed with.
//!
//! Each operation wraps the value it acts upon, so a single [`Handler`] may
//! implement the same operation for different values, like
//! `Select<By<Vec<Partner>, Selector>>` and `Select<By<Option<Partner>, Id>>`.
//!
//! [`Handler`]: crate::Handler

use std::marker::PhantomData;

/// Creates the wrapped value on the remote side.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Changes the wrapped value on the remote side.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Removes the wrapped value from the remote side.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Reads the wrapped value, usually a [`By`] selector.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Opens a stream of changes of the wrapped value.
#[derive(Clone, Copy, Debug)]
pub struct Subscribe<T>(pub T);

/// Starts the wrapped long-running task.
#[derive(Clone, Copy, Debug)]
pub struct Start<T>(pub T);

/// Selector of a `W`hat by a `B` key.
///
/// `W` is never stored and only tells apart selections by the same key
/// resolving into different values.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the selected value.
    _what: PhantomData<W>,

    /// Key to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] selector with the provided key.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Returns the key of this [`By`] selector.
    #[must_use]
    pub fn by(&self) -> &B {
        &self.by
    }

    /// Unwraps the key of this [`By`] selector.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}

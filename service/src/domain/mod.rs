//! Domain definitions.

pub mod account;
pub mod partner;
pub mod session;

use std::{error::Error, fmt};

use itertools::Itertools as _;

pub use self::{account::Email, partner::Partner, session::Session};

/// Non-empty list of violated rules.
///
/// Displayed as every violation joined with `; `.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Violations<R>(Vec<R>);

impl<R> Violations<R> {
    /// Collects the provided violations, succeeding if there are none.
    ///
    /// # Errors
    ///
    /// If at least one violation is provided.
    pub fn check(violated: impl IntoIterator<Item = R>) -> Result<(), Self> {
        let all = violated.into_iter().collect::<Vec<_>>();
        if all.is_empty() {
            Ok(())
        } else {
            Err(Self(all))
        }
    }

    /// Returns the violated rules.
    #[must_use]
    pub fn as_slice(&self) -> &[R] {
        &self.0
    }
}

impl<R: fmt::Display> fmt::Display for Violations<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().format("; "))
    }
}

impl<R: fmt::Debug + fmt::Display> Error for Violations<R> {}

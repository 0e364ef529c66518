//! [`Handler`] abstraction.
//!
//! Commands, queries and tasks of the service, as well as its
//! infrastructure (identity provider and remote partner API), are all
//! [`Handler`]s of different operations.

use std::future::Future;

/// Asynchronous handler of `Args` operation.
pub trait Handler<Args = ()> {
    /// Type of a successful outcome.
    type Ok;

    /// Type of a failed outcome.
    type Err;

    /// Handles the provided `Args` operation.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}

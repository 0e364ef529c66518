//! [`Query`] collection related to the current [`Session`].

use std::convert::Infallible;

use crate::{domain::Session, Service};

use super::Query;

/// Queries the latest known [`Session`], if any.
///
/// May be stale while the session [`Store`] is loading.
///
/// [`Store`]: crate::session::Store
#[derive(Clone, Copy, Debug)]
pub struct Current;

impl<Idp, Api> Query<Current> for Service<Idp, Api> {
    type Ok = Option<Session>;
    type Err = Infallible;

    async fn execute(&self, _: Current) -> Result<Self::Ok, Self::Err> {
        Ok(self.session().current())
    }
}

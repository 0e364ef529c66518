//! [`MirrorIdentity`] [`Task`].

use common::operations::{Start, Subscribe};
use futures::StreamExt as _;
use tracerr::Traced;
use tracing as log;

use crate::{
    infra::{
        identity::{self, AuthState, Pushes},
        IdentityProvider,
    },
    Service,
};

#[cfg(doc)]
use crate::session::Store;

use super::Task;

/// [`Task`] forwarding every authentication state pushed by the
/// [`IdentityProvider`] into the session [`Store`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MirrorIdentity;

impl<Idp, Api> Task<Start<MirrorIdentity>> for Service<Idp, Api>
where
    Idp: IdentityProvider<
        Subscribe<AuthState>,
        Ok = Pushes,
        Err = Traced<identity::Error>,
    >,
{
    type Ok = ();
    type Err = ExecutionError;

    async fn execute(
        &self,
        _: Start<MirrorIdentity>,
    ) -> Result<Self::Ok, Self::Err> {
        let store = self.session();
        store.begin_loading();

        let mut pushes = self
            .identity()
            .execute(Subscribe(AuthState))
            .await
            // Nothing else is going to resolve the `Store` in this case.
            .inspect_err(|_| store.resolve(None))
            .map_err(tracerr::wrap!())?;
        while let Some(session) = pushes.next().await {
            store.resolve(session);
        }

        log::warn!("identity provider closed its state stream");
        Ok(())
    }
}

/// Error of [`MirrorIdentity`] execution.
pub type ExecutionError = Traced<identity::Error>;

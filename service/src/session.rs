//! Session State Manager.
//!
//! [`Store`] mirrors the authentication state of an [`IdentityProvider`].
//! It is mutated only by [`Command`]s and [`task::MirrorIdentity`] of the
//! [`Service`], while anyone may read its [`Snapshot`]s and subscribe to
//! their changes.
//!
//! [`Command`]: crate::Command
//! [`IdentityProvider`]: crate::infra::IdentityProvider
//! [`Service`]: crate::Service
//! [`task::MirrorIdentity`]: crate::task::MirrorIdentity

use std::sync::Arc;

use tokio::sync::watch;
use tracing as log;

use crate::domain::Session;

/// Process-wide store of the current [`Session`].
#[derive(Clone, Debug)]
pub struct Store(Arc<watch::Sender<Snapshot>>);

/// Point-in-time view of a [`Store`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Snapshot {
    /// Latest known [`Session`], if any.
    session: Option<Session>,

    /// [`Phase`] of the [`Store`].
    phase: Phase,
}

/// Phase of a [`Store`] lifecycle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Phase {
    /// Nobody listens to the identity provider yet.
    #[default]
    Uninitialized,

    /// Waiting for the first push of the identity provider.
    Loading,

    /// The identity provider has reported its state at least once.
    Resolved,
}

/// State of a [`Store`] as seen by its consumers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State<'s> {
    /// Mirroring has not started yet.
    Uninitialized,

    /// Waiting for the identity provider to report its state.
    Loading,

    /// The provided [`Session`] is signed in.
    Authenticated(&'s Session),

    /// Nobody is signed in.
    Anonymous,
}

impl Snapshot {
    /// Returns the [`State`] of this [`Snapshot`].
    #[must_use]
    pub fn state(&self) -> State<'_> {
        match (self.phase, &self.session) {
            (Phase::Uninitialized, _) => State::Uninitialized,
            (Phase::Loading, _) => State::Loading,
            (Phase::Resolved, Some(s)) => State::Authenticated(s),
            (Phase::Resolved, None) => State::Anonymous,
        }
    }

    /// Returns the latest known [`Session`], if any.
    ///
    /// May be stale while [`Snapshot::is_loading()`].
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Indicates whether the identity provider hasn't reported its state
    /// yet.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase != Phase::Resolved
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates a new [`Uninitialized`] [`Store`].
    ///
    /// [`Uninitialized`]: State::Uninitialized
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(watch::Sender::new(Snapshot::default())))
    }

    /// Returns the current [`Snapshot`] of this [`Store`].
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.0.borrow().clone()
    }

    /// Returns the latest known [`Session`], if any.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.0.borrow().session.clone()
    }

    /// Indicates whether the identity provider hasn't reported its state
    /// yet.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.0.borrow().is_loading()
    }

    /// Subscribes to changes of this [`Store`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.0.subscribe()
    }

    /// Waits until the identity provider reports its state for the first
    /// time, returning the resolved [`Snapshot`].
    pub async fn settled(&self) -> Snapshot {
        let mut rx = self.0.subscribe();
        // `self` owns the sender, so it cannot be closed here.
        let settled = match rx.wait_for(|s| !s.is_loading()).await {
            Ok(s) => s.clone(),
            Err(_) => self.snapshot(),
        };
        settled
    }

    /// Switches this [`Store`] into the [`Loading`] state, if it's still
    /// [`Uninitialized`].
    ///
    /// [`Loading`]: State::Loading
    /// [`Uninitialized`]: State::Uninitialized
    pub(crate) fn begin_loading(&self) {
        _ = self.0.send_if_modified(|s| {
            let uninit = s.phase == Phase::Uninitialized;
            if uninit {
                s.phase = Phase::Loading;
            }
            uninit
        });
    }

    /// Applies the state pushed by the identity provider, resolving this
    /// [`Store`].
    pub(crate) fn resolve(&self, session: Option<Session>) {
        log::debug!(
            "identity provider reported {}",
            session.as_ref().map_or("no session", |s| s.uid.as_ref()),
        );
        _ = self.0.send_if_modified(|s| {
            let changed = s.session != session || s.phase != Phase::Resolved;
            s.session = session;
            s.phase = Phase::Resolved;
            changed
        });
    }

    /// Publishes the [`Session`] produced locally by a [`Command`],
    /// without resolving the loading state.
    ///
    /// [`Command`]: crate::Command
    pub(crate) fn publish(&self, session: Option<Session>) {
        _ = self.0.send_if_modified(|s| {
            let changed = s.session != session;
            s.session = session;
            changed
        });
    }
}

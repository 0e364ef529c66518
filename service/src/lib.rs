//! Service contains the business logic of the study-partner client.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
#[cfg(test)]
mod fixture;
pub mod infra;
pub mod query;
pub mod read;
pub mod session;
pub mod task;

use std::error::Error;

use common::operations::Start;

#[cfg(doc)]
use infra::{IdentityProvider, PartnerApi};

pub use self::{command::Command, query::Query, task::Task};

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Idp, Api> {
    /// [`IdentityProvider`] of this [`Service`].
    identity: Idp,

    /// [`PartnerApi`] of this [`Service`].
    api: Api,

    /// [`session::Store`] mirroring the [`IdentityProvider`].
    session: session::Store,
}

impl<Idp, Api> Service<Idp, Api> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(identity: Idp, api: Api) -> (Self, task::Background)
    where
        Self: Task<Start<task::MirrorIdentity>, Ok = (), Err: Error>
            + Clone
            + 'static,
    {
        let this = Service {
            identity,
            api,
            session: session::Store::new(),
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn("mirror_identity", async move {
            svc.execute(Start(task::MirrorIdentity)).await
        });

        (this, bg)
    }

    /// Returns [`IdentityProvider`] of this [`Service`].
    #[must_use]
    pub fn identity(&self) -> &Idp {
        &self.identity
    }

    /// Returns [`PartnerApi`] of this [`Service`].
    #[must_use]
    pub fn api(&self) -> &Api {
        &self.api
    }

    /// Returns [`session::Store`] of this [`Service`].
    #[must_use]
    pub fn session(&self) -> &session::Store {
        &self.session
    }
}

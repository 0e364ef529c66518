//! [`PartnerApi`]-related implementations.
//!
//! Supported operations:
//! - [`Select`]`<`[`By`]`<`[`Vec`]`<`[`Partner`]`>, `[`list::Selector`]`>>`;
//! - [`Select`]`<`[`By`]`<`[`Option`]`<`[`Partner`]`>, `[`partner::Id`]`>>`;
//! - [`Select`]`<`[`By`]`<`[`Vec`]`<`[`Connection`]`>, `[`Email`]`>>`;
//! - [`Insert`]`<`[`Draft`]`>` resolving into an [`Insertion`];
//! - [`Update`]`<(`[`partner::Id`]`, `[`Patch`]`)>`;
//! - [`Delete`]`<`[`By`]`<`[`Partner`]`, `[`partner::Id`]`>>` resolving into
//!   a [`Deletion`].

#[cfg(feature = "http")]
pub mod http;
pub mod memory;
#[cfg(feature = "http")]
pub mod payload;

#[cfg(doc)]
use common::operations::{By, Delete, Insert, Select, Update};
use derive_more::{Display, Error as StdError, From};

#[cfg(doc)]
use crate::{
    domain::{
        partner::{Draft, Patch},
        Email, Partner,
    },
    read::{partner::list, Connection},
};
use crate::domain::partner;

#[cfg(feature = "http")]
pub use self::http::Http;
pub use self::memory::Memory;

/// Remote partner API operation.
pub use common::Handler as PartnerApi;

/// Acknowledgement of an [`Insert`]ed [`Draft`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Insertion {
    /// Indicator whether the remote side acknowledged the write.
    pub acknowledged: bool,

    /// [`partner::Id`] of the created [`Partner`], if any.
    pub inserted_id: Option<partner::Id>,
}

/// Acknowledgement of a [`Delete`]d [`Partner`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Deletion {
    /// Indicator whether the remote side acknowledged the write.
    pub acknowledged: bool,

    /// Number of deleted records.
    pub deleted_count: u64,
}

/// [`PartnerApi`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Http`] error.
    #[cfg(feature = "http")]
    Http(http::Error),

    /// [`Memory`] error.
    Memory(memory::Error),
}

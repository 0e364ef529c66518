//! Infrastructure layer.

pub mod api;
pub mod identity;

pub use self::{api::PartnerApi, identity::IdentityProvider};

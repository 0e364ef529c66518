//! View-models of the application pages.

pub mod auth;
pub mod banner;
pub mod connections;
pub mod details;
pub mod listing;
pub mod profile;
pub mod remote;
pub mod top;

pub use self::{
    banner::Banner, connections::Connections, details::Details,
    listing::Listing, profile::CreateProfile, remote::Status, top::TopPartners,
};

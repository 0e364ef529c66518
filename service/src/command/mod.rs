//! [`Command`] definition.

pub mod create_partner;
pub mod delete_partner;
pub mod register_account;
pub mod sign_in_with_identity_provider;
pub mod sign_in_with_password;
pub mod sign_out;
pub mod update_partner;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_partner::CreatePartner, delete_partner::DeletePartner,
    register_account::RegisterAccount,
    sign_in_with_identity_provider::SignInWithIdentityProvider,
    sign_in_with_password::SignInWithPassword, sign_out::SignOut,
    update_partner::UpdatePartner,
};

//! Background [`Task`]s definitions.

mod background;
pub mod mirror_identity;

pub use common::Handler as Task;

pub use self::{background::Background, mirror_identity::MirrorIdentity};

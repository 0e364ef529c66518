//! Read entities definitions.

pub mod connection;
pub mod partner;

pub use self::connection::Connection;

//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing the last sign-in of an account.
#[derive(Clone, Copy, Debug)]
pub struct LastLogin;

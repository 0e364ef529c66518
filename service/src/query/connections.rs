//! [`Query`] collection related to accepted [`Connection`]s.

use common::operations::By;

use crate::{domain::Email, read::Connection};
#[cfg(doc)]
use crate::Query;

use super::ApiQuery;

/// Queries [`Connection`]s of the account with the provided [`Email`].
pub type ByEmail = ApiQuery<By<Vec<Connection>, Email>>;

//! [`Query`] collection related to a single [`Partner`].

use common::operations::By;

use crate::domain::{partner, Partner};
#[cfg(doc)]
use crate::Query;

use super::ApiQuery;

/// Queries a [`Partner`] by its [`partner::Id`].
pub type ById = ApiQuery<By<Option<Partner>, partner::Id>>;

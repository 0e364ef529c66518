//! [`Connection`] read definitions.

use crate::domain::{partner, Partner};

/// Accepted connection of an account, as listed on its dashboard.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Connection {
    /// Connected [`Partner`] profile.
    ///
    /// Its [`partner::Id`] identifies this [`Connection`] row on updates and
    /// deletions.
    pub partner: Partner,

    /// [`partner::Id`] of the linked [`Partner`] details page.
    pub partner_id: partner::Id,
}

impl Connection {
    /// Returns the [`partner::Id`] identifying this [`Connection`] row.
    #[must_use]
    pub fn id(&self) -> &partner::Id {
        &self.partner.id
    }
}

//! In-memory [`PartnerApi`] implementation.

use std::sync::Arc;

use common::operations::{By, Delete, Insert, Select, Update};
use derive_more::{Display, Error as StdError};
use tokio::sync::RwLock;
use tracerr::Traced;
use tracing as log;
use uuid::Uuid;

use crate::{
    domain::{
        partner::{self, ConnectionCount, Draft, Patch},
        Email, Partner,
    },
    read::{partner::list, Connection},
};

use super::{Deletion, Insertion, PartnerApi};

/// In-memory [`PartnerApi`] implementation.
///
/// Behaves like the remote API: [`list::Selector::Search`] matches subjects,
/// updates and deletions target connection rows.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Shared state of this [`Memory`].
    state: Arc<RwLock<State>>,
}

/// State of a [`Memory`] API.
#[derive(Debug, Default)]
struct State {
    /// Stored [`Partner`]s in their creation order.
    partners: Vec<Partner>,

    /// Accepted [`Connection`]s along with the [`Email`] of their owner.
    connections: Vec<(Email, Connection)>,

    /// Indicator whether every request should fail.
    offline: bool,
}

impl Memory {
    /// Number of [`Partner`]s in [`list::Selector::Recent`] and
    /// [`list::Selector::Top`] lists.
    pub const SHOWCASE_LIMIT: usize = 6;

    /// Creates a new [`Memory`] API storing the provided [`Partner`]s.
    #[must_use]
    pub fn new(partners: impl IntoIterator<Item = Partner>) -> Self {
        Self {
            state: Arc::new(RwLock::new(State {
                partners: partners.into_iter().collect(),
                ..State::default()
            })),
        }
    }

    /// Stores the provided [`Connection`] of the account with the provided
    /// [`Email`].
    pub async fn connect(&self, owner: Email, connection: Connection) {
        self.state.write().await.connections.push((owner, connection));
    }

    /// Makes every following request fail (or succeed again).
    pub async fn set_offline(&self, offline: bool) {
        self.state.write().await.offline = offline;
    }

    /// Reads the [`State`] failing if this [`Memory`] API is offline.
    async fn read(
        &self,
    ) -> Result<tokio::sync::RwLockReadGuard<'_, State>, Traced<super::Error>>
    {
        let state = self.state.read().await;
        if state.offline {
            return Err(tracerr::new!(super::Error::from(Error::Offline)));
        }
        Ok(state)
    }

    /// Writes the [`State`] failing if this [`Memory`] API is offline.
    async fn write(
        &self,
    ) -> Result<tokio::sync::RwLockWriteGuard<'_, State>, Traced<super::Error>>
    {
        let state = self.state.write().await;
        if state.offline {
            return Err(tracerr::new!(super::Error::from(Error::Offline)));
        }
        Ok(state)
    }
}

impl PartnerApi<Select<By<Vec<Partner>, list::Selector>>> for Memory {
    type Ok = Vec<Partner>;
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Partner>, list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        use list::Selector as S;

        let state = self.read().await?;
        let all = state.partners.iter().cloned();
        Ok(match by.into_inner() {
            S::All => all.collect(),
            S::Recent => {
                all.rev().take(Self::SHOWCASE_LIMIT).collect::<Vec<_>>()
            }
            S::Top => {
                let mut top = all.collect::<Vec<_>>();
                top.sort_by(|a, b| b.rating.cmp(&a.rating));
                top.truncate(Self::SHOWCASE_LIMIT);
                top
            }
            S::Search(term) => {
                all.filter(|p| term.matches(p.subject.as_ref())).collect()
            }
            S::Sorted(key) => {
                let mut sorted = all.collect::<Vec<_>>();
                sorted.sort_by_key(|p| key.rank(p.experience));
                sorted
            }
        })
    }
}

impl PartnerApi<Select<By<Option<Partner>, partner::Id>>> for Memory {
    type Ok = Option<Partner>;
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Partner>, partner::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .read()
            .await?
            .partners
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }
}

impl PartnerApi<Select<By<Vec<Connection>, Email>>> for Memory {
    type Ok = Vec<Connection>;
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Connection>, Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let owner = by.into_inner();
        Ok(self
            .read()
            .await?
            .connections
            .iter()
            .filter(|(email, _)| *email == owner)
            .map(|(_, c)| c.clone())
            .collect())
    }
}

impl PartnerApi<Insert<Draft>> for Memory {
    type Ok = Insertion;
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let Draft {
            name,
            avatar,
            bio,
            subject,
            study_mode,
            availability,
            location,
            experience,
            rating,
            email,
        } = draft;

        let Some(id) = partner::Id::new(Uuid::new_v4().simple().to_string())
        else {
            return Ok(Insertion {
                acknowledged: false,
                inserted_id: None,
            });
        };
        self.write().await?.partners.push(Partner {
            id: id.clone(),
            name,
            subject,
            study_mode,
            experience,
            availability,
            location,
            rating,
            connections: ConnectionCount::default(),
            email: Some(email),
            avatar,
            bio: Some(bio),
        });
        log::debug!("stored new partner `{id}`");

        Ok(Insertion {
            acknowledged: true,
            inserted_id: Some(id),
        })
    }
}

impl PartnerApi<Update<(partner::Id, Patch)>> for Memory {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Update((id, patch)): Update<(partner::Id, Patch)>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.write().await?;
        for (_, c) in &mut state.connections {
            if c.partner.id == id {
                c.partner.apply(patch.clone());
            }
        }
        Ok(())
    }
}

impl PartnerApi<Delete<By<Partner, partner::Id>>> for Memory {
    type Ok = Deletion;
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Partner, partner::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let mut state = self.write().await?;

        let before = state.connections.len();
        state.connections.retain(|(_, c)| c.partner.id != id);
        let deleted = before - state.connections.len();

        Ok(Deletion {
            acknowledged: true,
            deleted_count: u64::try_from(deleted).unwrap_or(u64::MAX),
        })
    }
}

/// [`Memory`] API error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// API is switched offline.
    #[display("partner API is offline")]
    Offline,
}

//! Partner [`Listing`] view-model.

use common::pagination::{Control, Page, PageSize, Pagination, Range};
use service::{
    domain::Partner,
    infra::api,
    query,
    read::partner::list::{Selector, SortKey, Term},
};
use tracerr::Traced;
use tracing as log;

use crate::{AsError, Error};

use super::remote::{Recovery, Remote, Status, Ticket};

/// Current search and sort state of a [`Listing`].
///
/// Search and sort exclude each other: applying one clears the other.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Query {
    /// Search [`Term`], empty when not searching.
    pub term: Term,

    /// [`SortKey`], if sorted.
    pub sort: Option<SortKey>,
}

/// Fetch replacing the working set of a [`Listing`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Fetch {
    /// Every [`Partner`].
    All,

    /// [`Partner`]s matching the [`Term`].
    Search(Term),

    /// Every [`Partner`] ordered by the [`SortKey`].
    Sort(SortKey),
}

impl Fetch {
    /// Returns the [`Selector`] of this [`Fetch`].
    #[must_use]
    pub fn selector(&self) -> Selector {
        match self {
            Self::All => Selector::All,
            Self::Search(term) => Selector::Search(term.clone()),
            Self::Sort(key) => Selector::Sorted(*key),
        }
    }

    /// Returns the [`Query`] shown once this [`Fetch`] succeeds.
    #[must_use]
    pub fn query(&self) -> Query {
        match self {
            Self::All => Query::default(),
            Self::Search(term) => Query {
                term: term.clone(),
                sort: None,
            },
            Self::Sort(key) => Query {
                term: Term::default(),
                sort: Some(*key),
            },
        }
    }
}

/// [`Fetch`] in flight.
#[derive(Clone, Debug)]
pub struct Pending {
    /// [`Ticket`] of the [`Fetch`].
    ticket: Ticket,

    /// Started [`Fetch`].
    fetch: Fetch,
}

impl Pending {
    /// Returns the started [`Fetch`].
    #[must_use]
    pub fn fetch(&self) -> &Fetch {
        &self.fetch
    }
}

/// Searchable, sortable and paginated listing of every [`Partner`].
#[derive(Clone, Debug)]
pub struct Listing {
    /// Working set of [`Partner`]s.
    remote: Remote<Vec<Partner>>,

    /// Current [`Query`].
    query: Query,

    /// [`Pagination`] over the working set.
    pagination: Pagination,

    /// Notice about the latest failed search, if any.
    notice: Option<Error>,
}

impl Listing {
    /// Creates a new empty [`Listing`] with the provided [`PageSize`].
    #[must_use]
    pub fn new(size: PageSize) -> Self {
        Self {
            remote: Remote::default(),
            query: Query::default(),
            pagination: Pagination::new(size),
            notice: None,
        }
    }

    /// Starts the provided [`Fetch`].
    ///
    /// The [`Query`] changes only once the [`Fetch`] succeeds.
    pub fn begin(&mut self, fetch: Fetch) -> Pending {
        Pending {
            ticket: self.remote.start(),
            fetch,
        }
    }

    /// Applies the outcome of the [`Pending`] fetch.
    ///
    /// A failed search keeps the previous working set and leaves a
    /// [`Listing::notice()`] instead, unless there is no working set to keep.
    /// Returns `false` if the outcome is stale and has been discarded.
    pub fn finish(
        &mut self,
        pending: Pending,
        outcome: Result<Vec<Partner>, Error>,
    ) -> bool {
        let Pending { ticket, fetch } = pending;
        match outcome {
            Ok(partners) => {
                let total = partners.len();
                if !self.remote.settle(ticket, Ok(Some(partners))) {
                    return false;
                }
                self.pagination.reset(total);
                self.query = fetch.query();
                self.notice = None;
            }
            Err(e) if matches!(fetch, Fetch::Search(_)) => {
                match self.remote.recover(ticket, e) {
                    Recovery::Stale => return false,
                    Recovery::Restored(e) => {
                        log::warn!("search has failed: {e}");
                        self.notice = Some(e);
                    }
                    Recovery::Failed => {
                        self.pagination.reset(0);
                        self.notice = None;
                    }
                }
            }
            Err(e) => {
                if !self.remote.settle(ticket, Err(e)) {
                    return false;
                }
                self.pagination.reset(0);
            }
        }
        true
    }

    /// Performs the provided [`Fetch`] against the provided [`Service`].
    ///
    /// [`Service`]: service::Service
    pub async fn fetch<S>(&mut self, svc: &S, fetch: Fetch) -> bool
    where
        S: service::Query<
            query::partners::List,
            Ok = Vec<Partner>,
            Err = Traced<api::Error>,
        >,
    {
        let pending = self.begin(fetch);
        let outcome = svc
            .execute(query::partners::List::by(pending.fetch.selector()))
            .await
            .map_err(AsError::into_error);
        self.finish(pending, outcome)
    }

    /// Loads every [`Partner`].
    pub async fn load_all<S>(&mut self, svc: &S) -> bool
    where
        S: service::Query<
            query::partners::List,
            Ok = Vec<Partner>,
            Err = Traced<api::Error>,
        >,
    {
        self.fetch(svc, Fetch::All).await
    }

    /// Loads every [`Partner`] ordered by the provided [`SortKey`], clearing
    /// the search [`Term`].
    pub async fn apply_sort<S>(&mut self, svc: &S, key: SortKey) -> bool
    where
        S: service::Query<
            query::partners::List,
            Ok = Vec<Partner>,
            Err = Traced<api::Error>,
        >,
    {
        self.fetch(svc, Fetch::Sort(key)).await
    }

    /// Loads the [`Partner`]s matching the provided search `term`, clearing
    /// the [`SortKey`].
    pub async fn apply_search<S>(&mut self, svc: &S, term: &str) -> bool
    where
        S: service::Query<
            query::partners::List,
            Ok = Vec<Partner>,
            Err = Traced<api::Error>,
        >,
    {
        self.fetch(svc, Fetch::Search(Term::new(term))).await
    }

    /// Selects the page with the provided number, clamped into the existing
    /// pages.
    pub fn set_page(&mut self, number: usize) -> Page {
        self.pagination.set_page(number)
    }

    /// Returns the page [`Control`]s to render.
    #[must_use]
    pub fn page_window(&self) -> Vec<Control> {
        self.pagination.window()
    }

    /// Returns the [`Range`] of the shown [`Partner`]s.
    #[must_use]
    pub fn range(&self) -> Range {
        self.pagination.range()
    }

    /// Returns the [`Partner`]s of the current page, if the working set is
    /// [`Status::Ready`].
    #[must_use]
    pub fn page_items(&self) -> &[Partner] {
        match (self.remote.status(), self.remote.value()) {
            (Status::Ready, Some(all)) => self.pagination.slice(all),
            _ => &[],
        }
    }

    /// Returns the whole working set.
    #[must_use]
    pub fn working_set(&self) -> &[Partner] {
        self.remote.value().map_or(&[][..], Vec::as_slice)
    }

    /// Returns the [`Status`] of the working set.
    #[must_use]
    pub fn status(&self) -> &Status {
        self.remote.status()
    }

    /// Returns the current [`Query`].
    #[must_use]
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Returns the [`Pagination`] state.
    #[must_use]
    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Returns the notice about the latest failed search, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&Error> {
        self.notice.as_ref()
    }

    /// Marks this [`Listing`] as unmounted, discarding fetches in flight.
    pub fn unmount(&mut self) {
        self.remote.unmount();
    }
}

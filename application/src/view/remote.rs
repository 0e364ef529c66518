//! [`Remote`] data of a view.

use std::mem;

use crate::Error;

/// Data of a view fetched from a remote side.
///
/// Every fetch is identified by a [`Ticket`], and only the outcome of the
/// latest one is applied, as long as the view is still mounted.
#[derive(Clone, Debug)]
pub struct Remote<T> {
    /// Generation of the latest issued [`Ticket`].
    generation: u64,

    /// Indicator whether the view is still mounted.
    mounted: bool,

    /// Current [`Status`].
    status: Status,

    /// Latest settled [`Status`] preceding the fetches in flight.
    prior: Status,

    /// Latest successfully fetched value.
    value: Option<T>,
}

/// Identifier of a started fetch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ticket(u64);

/// Status of a [`Remote`].
#[derive(Clone, Debug, Default)]
pub enum Status {
    /// Nothing has been fetched yet.
    #[default]
    Idle,

    /// Fetch is in flight.
    Loading,

    /// Fetched value is ready to be shown.
    Ready,

    /// Fetched value is empty.
    Empty,

    /// Requested value doesn't exist.
    NotFound,

    /// Fetch has failed.
    Failed(Error),
}

/// Outcome of [`Remote::recover()`].
#[derive(Debug)]
pub enum Recovery {
    /// Fetch is stale, so its failure has been discarded.
    Stale,

    /// [`Status`] preceding the fetch has been restored, leaving the error
    /// to be reported aside.
    Restored(Error),

    /// Nothing to restore, so the [`Remote`] has settled into
    /// [`Status::Failed`].
    Failed,
}

/// Value a [`Remote`] can hold.
pub trait Content {
    /// Indicates whether this value should be shown as [`Status::Empty`].
    fn is_empty(&self) -> bool {
        false
    }
}

impl<T> Content for Vec<T> {
    fn is_empty(&self) -> bool {
        <[T]>::is_empty(self)
    }
}

impl<T> Default for Remote<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            mounted: true,
            status: Status::Idle,
            prior: Status::Idle,
            value: None,
        }
    }
}

impl<T: Content> Remote<T> {
    /// Starts a new fetch, superseding every previous one.
    pub fn start(&mut self) -> Ticket {
        self.generation += 1;
        let previous = mem::replace(&mut self.status, Status::Loading);
        if !matches!(previous, Status::Loading) {
            self.prior = previous;
        }
        Ticket(self.generation)
    }

    /// Indicates whether the provided [`Ticket`] belongs to the latest fetch
    /// of a mounted view.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.mounted && ticket.0 == self.generation
    }

    /// Applies the outcome of the fetch identified by the provided
    /// [`Ticket`], where [`None`] means the value doesn't exist.
    ///
    /// Returns `false` if the outcome is stale and has been discarded.
    pub fn settle(
        &mut self,
        ticket: Ticket,
        outcome: Result<Option<T>, Error>,
    ) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.status = match outcome {
            Ok(Some(v)) => {
                let status = if v.is_empty() {
                    Status::Empty
                } else {
                    Status::Ready
                };
                self.value = Some(v);
                status
            }
            Ok(None) => {
                self.value = None;
                Status::NotFound
            }
            Err(e) => Status::Failed(e),
        };
        true
    }

    /// Abandons the failed fetch identified by the provided [`Ticket`],
    /// restoring the settled [`Status`] and the value preceding it.
    ///
    /// Settles into [`Status::Failed`] instead if nothing has been settled
    /// before.
    pub fn recover(&mut self, ticket: Ticket, error: Error) -> Recovery {
        if !self.is_current(ticket) {
            return Recovery::Stale;
        }
        match mem::take(&mut self.prior) {
            Status::Idle | Status::Loading => {
                self.status = Status::Failed(error);
                Recovery::Failed
            }
            prior => {
                self.status = prior;
                Recovery::Restored(error)
            }
        }
    }
}

impl<T> Remote<T> {
    /// Returns the current [`Status`].
    #[must_use]
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Returns the latest successfully fetched value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Returns the latest successfully fetched value mutably, if any.
    pub fn value_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }

    /// Marks the view as unmounted, discarding every fetch in flight.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.generation += 1;
    }
}

//! Partner [`Details`] page.

use service::{
    domain::{partner, Partner},
    infra::api,
    query,
};
use tracerr::Traced;

use crate::{error::NotFoundError, AsError, Error};

use super::remote::{Content, Remote, Status};

impl Content for Partner {}

/// Details page of a single [`Partner`].
#[derive(Clone, Debug, Default)]
pub struct Details {
    /// Shown [`Partner`].
    remote: Remote<Partner>,
}

impl Details {
    /// Loads the [`Partner`] with the provided raw ID.
    ///
    /// An invalid ID is reported as [`Status::NotFound`] without reaching the
    /// remote side.
    pub async fn load<S>(&mut self, svc: &S, id: &str) -> bool
    where
        S: service::Query<
            query::partner::ById,
            Ok = Option<Partner>,
            Err = Traced<api::Error>,
        >,
    {
        let ticket = self.remote.start();
        let Some(id) = partner::Id::new(id) else {
            return self.remote.settle(ticket, Ok(None));
        };
        let outcome = svc
            .execute(query::partner::ById::by(id))
            .await
            .map_err(AsError::into_error);
        self.remote.settle(ticket, outcome)
    }

    /// Returns the [`Status`] of this page.
    #[must_use]
    pub fn status(&self) -> &Status {
        self.remote.status()
    }

    /// Returns the shown [`Partner`], if any.
    #[must_use]
    pub fn partner(&self) -> Option<&Partner> {
        match self.remote.status() {
            Status::Ready => self.remote.value(),
            Status::Idle
            | Status::Loading
            | Status::Empty
            | Status::NotFound
            | Status::Failed(_) => None,
        }
    }

    /// Returns the [`Error`] to show instead of the [`Partner`], if any.
    #[must_use]
    pub fn error(&self) -> Option<Error> {
        match self.remote.status() {
            Status::NotFound => Some(NotFoundError::PartnerNotFound.into()),
            Status::Failed(e) => Some(e.clone()),
            Status::Idle | Status::Loading | Status::Ready | Status::Empty => {
                None
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use service::{domain::partner::ExperienceLevel as L, infra::api};

    use crate::fixture::{self, partner};

    use super::Details;

    #[tokio::test]
    async fn shows_existing_partner() {
        let svc = fixture::service(api::Memory::new([partner(
            "p1",
            "Physics",
            L::Expert,
            4.0,
        )]));
        let mut details = Details::default();

        _ = details.load(&svc, "p1").await;

        assert_eq!(details.partner().map(|p| p.id.as_ref()), Some("p1"));
        assert!(details.error().is_none());
    }

    #[tokio::test]
    async fn shows_no_partner_for_missing_or_invalid_id() {
        let svc = fixture::service(api::Memory::default());
        let mut details = Details::default();

        for id in ["missing", "", "a/b"] {
            _ = details.load(&svc, id).await;

            assert!(details.partner().is_none());
            let err = details.error().unwrap();
            assert_eq!(err.code, "PARTNER_NOT_FOUND");
            assert_eq!(err.message, "No Partner Found !!!");
        }
    }
}

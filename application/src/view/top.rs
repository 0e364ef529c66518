//! [`TopPartners`] section.

use service::{
    domain::Partner,
    infra::api,
    query,
    read::partner::list::Selector,
};
use tracerr::Traced;

use crate::AsError;

use super::remote::{Remote, Status};

/// Section listing the top-rated [`Partner`]s.
#[derive(Clone, Debug, Default)]
pub struct TopPartners {
    /// Top-rated [`Partner`]s.
    remote: Remote<Vec<Partner>>,
}

impl TopPartners {
    /// Loads the top-rated [`Partner`]s.
    pub async fn load<S>(&mut self, svc: &S) -> bool
    where
        S: service::Query<
            query::partners::List,
            Ok = Vec<Partner>,
            Err = Traced<api::Error>,
        >,
    {
        let ticket = self.remote.start();
        let outcome = svc
            .execute(query::partners::List::by(Selector::Top))
            .await
            .map(Some)
            .map_err(AsError::into_error);
        self.remote.settle(ticket, outcome)
    }

    /// Returns the [`Status`] of this section.
    #[must_use]
    pub fn status(&self) -> &Status {
        self.remote.status()
    }

    /// Returns the loaded [`Partner`]s, best rated first.
    #[must_use]
    pub fn partners(&self) -> &[Partner] {
        self.remote.value().map_or(&[][..], Vec::as_slice)
    }
}

#[cfg(test)]
mod spec {
    use service::infra::api;

    use crate::{fixture, view::remote::Status};

    use super::TopPartners;

    #[tokio::test]
    async fn reports_failure_explicitly() {
        let api = api::Memory::default();
        api.set_offline(true).await;
        let svc = fixture::service(api);
        let mut top = TopPartners::default();

        _ = top.load(&svc).await;

        assert!(matches!(
            top.status(),
            Status::Failed(e) if e.code == "TRANSPORT_FAILED",
        ));
        assert!(top.partners().is_empty());
    }
}

//! [`Command`] for creating a new [`Partner`] profile.

use common::operations::Insert;
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Partner;
use crate::{
    domain::partner::{self, Draft},
    infra::{
        api::{self, Insertion},
        PartnerApi,
    },
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Partner`] profile from a [`Draft`].
#[derive(Clone, Debug)]
pub struct CreatePartner {
    /// [`Draft`] of the new [`Partner`].
    pub draft: Draft,
}

impl<Idp, Api> Command<CreatePartner> for Service<Idp, Api>
where
    Api: PartnerApi<Insert<Draft>, Ok = Insertion, Err = Traced<api::Error>>,
{
    type Ok = partner::Id;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreatePartner) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Insertion {
            acknowledged,
            inserted_id,
        } = self
            .api()
            .execute(Insert(cmd.draft))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let id = inserted_id
            .filter(|_| acknowledged)
            .ok_or_else(|| tracerr::new!(E::NotAcknowledged))?;
        log::debug!("created partner `{id}`");

        Ok(id)
    }
}

/// Error of [`CreatePartner`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`PartnerApi`] error.
    #[display("`PartnerApi` operation failed: {_0}")]
    #[from]
    Api(api::Error),

    /// [`PartnerApi`] didn't acknowledge the creation.
    #[display("partner creation is not acknowledged")]
    NotAcknowledged,
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};

    use crate::{
        command::Command as _,
        domain::Partner,
        fixture,
        infra::{api, identity, PartnerApi as _},
        Service,
    };

    use super::{CreatePartner, ExecutionError};

    #[tokio::test]
    async fn stores_new_partner() {
        let api = api::Memory::default();
        let (svc, _) = Service::new(identity::Memory::default(), api.clone());

        let id = svc
            .execute(CreatePartner {
                draft: fixture::draft(),
            })
            .await
            .unwrap();

        let stored = api
            .execute(Select(By::<Option<Partner>, _>::new(id)))
            .await
            .unwrap();
        assert_eq!(stored.map(|p| p.name.to_string()), Some("Ada".into()));
    }

    #[tokio::test]
    async fn fails_when_api_is_offline() {
        let api = api::Memory::default();
        api.set_offline(true).await;
        let (svc, _) = Service::new(identity::Memory::default(), api);

        let err = svc
            .execute(CreatePartner {
                draft: fixture::draft(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Api(_)));
    }
}

//! [`Command`] for deleting a [`Partner`] of an accepted connection.

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{partner, Partner},
    infra::{
        api::{self, Deletion},
        PartnerApi,
    },
    Service,
};

use super::Command;

/// [`Command`] for deleting the [`Partner`] of an accepted connection.
///
/// Succeeds only if exactly one row has been deleted.
#[derive(Clone, Debug)]
pub struct DeletePartner {
    /// [`partner::Id`] of the connection row to delete.
    pub id: partner::Id,
}

impl<Idp, Api> Command<DeletePartner> for Service<Idp, Api>
where
    Api: PartnerApi<
        Delete<By<Partner, partner::Id>>,
        Ok = Deletion,
        Err = Traced<api::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeletePartner) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Deletion {
            acknowledged,
            deleted_count,
        } = self
            .api()
            .execute(Delete(By::new(cmd.id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if !acknowledged || deleted_count != 1 {
            return Err(tracerr::new!(E::NotDeleted(cmd.id)));
        }
        Ok(())
    }
}

/// Error of [`DeletePartner`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`PartnerApi`] error.
    #[display("`PartnerApi` operation failed: {_0}")]
    #[from]
    Api(api::Error),

    /// [`Partner`] with the [`partner::Id`] hasn't been deleted.
    #[display("`{_0}` partner hasn't been deleted")]
    NotDeleted(#[error(not(source))] partner::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::Command as _,
        domain::partner::ExperienceLevel,
        fixture,
        infra::{api, identity},
        read::Connection,
        Service,
    };

    use super::{DeletePartner, ExecutionError};

    #[tokio::test]
    async fn deletes_exactly_one_row() {
        let api = api::Memory::default();
        let partner =
            fixture::partner("c1", "Biology", ExperienceLevel::Expert, 4.0);
        api.connect(
            "ada@example.com".parse().unwrap(),
            Connection {
                partner_id: partner.id.clone(),
                partner,
            },
        )
        .await;
        let (svc, _) = Service::new(identity::Memory::default(), api);

        svc.execute(DeletePartner {
            id: "c1".parse().unwrap(),
        })
        .await
        .unwrap();

        let err = svc
            .execute(DeletePartner {
                id: "c1".parse().unwrap(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::NotDeleted(_)));
    }
}

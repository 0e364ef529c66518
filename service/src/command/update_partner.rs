//! [`Command`] for updating a [`Partner`] of an accepted connection.

use common::operations::Update;
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Partner;
use crate::{
    domain::partner::{self, Patch},
    infra::{api, PartnerApi},
    Service,
};

use super::Command;

/// [`Command`] for applying a [`Patch`] to the [`Partner`] of an accepted
/// connection.
#[derive(Clone, Debug)]
pub struct UpdatePartner {
    /// [`partner::Id`] of the connection row to update.
    pub id: partner::Id,

    /// [`Patch`] to apply.
    pub patch: Patch,
}

impl<Idp, Api> Command<UpdatePartner> for Service<Idp, Api>
where
    Api: PartnerApi<
        Update<(partner::Id, Patch)>,
        Ok = (),
        Err = Traced<api::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdatePartner) -> Result<Self::Ok, Self::Err> {
        let UpdatePartner { id, patch } = cmd;

        self.api()
            .execute(Update((id, patch)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))
    }
}

/// Error of [`UpdatePartner`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`PartnerApi`] error.
    #[display("`PartnerApi` operation failed: {_0}")]
    Api(api::Error),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};

    use crate::{
        command::Command as _,
        domain::{
            partner::{patch, ExperienceLevel, Patch},
            Email,
        },
        fixture,
        infra::{api, identity, PartnerApi as _},
        read::Connection,
        Service,
    };

    use super::UpdatePartner;

    #[tokio::test]
    async fn patches_connection_row() {
        let owner: Email = "ada@example.com".parse().unwrap();
        let api = api::Memory::default();
        for id in ["c1", "c2"] {
            let partner =
                fixture::partner(id, "Biology", ExperienceLevel::Beginner, 3.0);
            api.connect(
                owner.clone(),
                Connection {
                    partner_id: partner.id.clone(),
                    partner,
                },
            )
            .await;
        }
        let (svc, _) = Service::new(identity::Memory::default(), api.clone());

        svc.execute(UpdatePartner {
            id: "c2".parse().unwrap(),
            patch: Patch::parse(&patch::Form {
                name: "Grace".into(),
                subject: "Physics".into(),
                study_mode: "Offline".into(),
                image_url: String::new(),
            })
            .unwrap(),
        })
        .await
        .unwrap();

        let rows = api
            .execute(Select(By::<Vec<Connection>, _>::new(owner)))
            .await
            .unwrap();
        let names = rows
            .iter()
            .map(|c| c.partner.name.to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, ["Partner c1", "Grace"]);
        assert_eq!(rows[1].partner.subject.as_ref(), "Physics");
        assert_eq!(rows[1].partner.experience, ExperienceLevel::Beginner);
    }
}

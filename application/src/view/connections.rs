//! Accepted [`Connections`] dashboard.

use service::{
    command::{self, Command},
    domain::{
        partner::{self, patch, Patch},
        Email,
    },
    infra::api,
    query,
    read::Connection,
};
use tracerr::Traced;
use tracing as log;

use crate::{error::AuthError, AsError, Error};

use super::remote::{Remote, Status};

/// Dashboard of the accepted [`Connection`]s of the signed-in account.
#[derive(Clone, Debug, Default)]
pub struct Connections {
    /// Loaded [`Connection`] rows.
    remote: Remote<Vec<Connection>>,
}

impl Connections {
    /// Loads [`Connection`]s of the account with the provided [`Email`].
    ///
    /// Without an [`Email`] (nobody is signed in, or the account has none)
    /// the dashboard fails with an authorization [`Error`].
    pub async fn load<S>(&mut self, svc: &S, owner: Option<Email>) -> bool
    where
        S: service::Query<
            query::connections::ByEmail,
            Ok = Vec<Connection>,
            Err = Traced<api::Error>,
        >,
    {
        let ticket = self.remote.start();
        let Some(owner) = owner else {
            return self
                .remote
                .settle(ticket, Err(AuthError::AuthorizationRequired.into()));
        };
        let outcome = svc
            .execute(query::connections::ByEmail::by(owner))
            .await
            .map(Some)
            .map_err(AsError::into_error);
        self.remote.settle(ticket, outcome)
    }

    /// Validates the provided [`patch::Form`] and applies it to the row with
    /// the provided [`partner::Id`].
    ///
    /// Only the row with exactly that ID changes locally, and only once the
    /// remote side accepts the [`Patch`].
    ///
    /// # Errors
    ///
    /// - If the [`patch::Form`] is invalid, listing every violation.
    /// - If the remote side fails.
    pub async fn update<S>(
        &mut self,
        svc: &S,
        id: &partner::Id,
        form: &patch::Form,
    ) -> Result<(), Error>
    where
        S: Command<
            command::UpdatePartner,
            Ok = (),
            Err = Traced<command::update_partner::ExecutionError>,
        >,
    {
        let patch = Patch::parse(form).map_err(|v| Error::validation(&v))?;
        svc.execute(command::UpdatePartner {
            id: id.clone(),
            patch: patch.clone(),
        })
        .await
        .map_err(AsError::into_error)?;

        for row in self.rows_mut().filter(|c| c.id() == id) {
            row.partner.apply(patch.clone());
        }
        Ok(())
    }

    /// Deletes the row with the provided [`partner::Id`].
    ///
    /// The row is removed locally only once the remote side acknowledges
    /// exactly one deletion.
    ///
    /// # Errors
    ///
    /// If the remote side fails or doesn't acknowledge the deletion.
    pub async fn delete<S>(
        &mut self,
        svc: &S,
        id: &partner::Id,
    ) -> Result<(), Error>
    where
        S: Command<
            command::DeletePartner,
            Ok = (),
            Err = Traced<command::delete_partner::ExecutionError>,
        >,
    {
        svc.execute(command::DeletePartner { id: id.clone() })
            .await
            .map_err(AsError::into_error)?;

        if let Some(rows) = self.remote.value_mut() {
            let before = rows.len();
            rows.retain(|c| c.id() != id);
            if rows.len() == before {
                log::warn!("deleted `{id}` partner is not among loaded rows");
            }
        }
        Ok(())
    }

    /// Returns the [`Status`] of this dashboard.
    #[must_use]
    pub fn status(&self) -> &Status {
        self.remote.status()
    }

    /// Returns the loaded [`Connection`] rows.
    #[must_use]
    pub fn rows(&self) -> &[Connection] {
        self.remote.value().map_or(&[][..], Vec::as_slice)
    }

    /// Returns the loaded [`Connection`] rows mutably.
    fn rows_mut(&mut self) -> impl Iterator<Item = &mut Connection> {
        self.remote.value_mut().into_iter().flatten()
    }
}

#[cfg(test)]
mod spec {
    use service::{
        domain::{
            partner::{patch, ExperienceLevel as L, StudyMode},
            Email,
        },
        infra::api,
        read::Connection,
    };

    use crate::{
        error::Kind,
        fixture::{self, partner},
        view::remote::Status,
    };

    use super::Connections;

    fn owner() -> Email {
        "ada@example.com".parse().unwrap()
    }

    async fn connected(ids: &[&str]) -> api::Memory {
        let api = api::Memory::default();
        for id in ids {
            let p = partner(id, "Biology", L::Intermediate, 4.0);
            api.connect(
                owner(),
                Connection {
                    partner_id: p.id.clone(),
                    partner: p,
                },
            )
            .await;
        }
        api
    }

    fn form() -> patch::Form {
        patch::Form {
            name: "Grace".into(),
            subject: "Physics".into(),
            study_mode: "Offline".into(),
            image_url: "https://i.ibb.co/g.png".into(),
        }
    }

    #[tokio::test]
    async fn requires_signed_in_email() {
        let svc = fixture::service(api::Memory::default());
        let mut view = Connections::default();

        _ = view.load(&svc, None).await;

        assert!(matches!(
            view.status(),
            Status::Failed(e) if e.code == "AUTHORIZATION_REQUIRED",
        ));
    }

    #[tokio::test]
    async fn updates_exactly_patched_fields_of_matching_row() {
        let svc = fixture::service(connected(&["c1", "c2"]).await);
        let mut view = Connections::default();
        _ = view.load(&svc, Some(owner())).await;
        let before = view.rows().to_vec();

        view.update(&svc, &"c1".parse().unwrap(), &form())
            .await
            .unwrap();

        let (updated, untouched) = (&view.rows()[0], &view.rows()[1]);
        assert_eq!(untouched, &before[1]);
        assert_eq!(updated.partner.name.as_ref(), "Grace");
        assert_eq!(updated.partner.subject.as_ref(), "Physics");
        assert_eq!(updated.partner.study_mode, StudyMode::Offline);
        assert_eq!(updated.partner.avatar.url(), "https://i.ibb.co/g.png");

        let mut expected = before[0].partner.clone();
        expected.name = updated.partner.name.clone();
        expected.subject = updated.partner.subject.clone();
        expected.study_mode = updated.partner.study_mode;
        expected.avatar = updated.partner.avatar.clone();
        assert_eq!(updated.partner, expected);
    }

    #[tokio::test]
    async fn rejects_invalid_patch_locally() {
        let api = connected(&["c1"]).await;
        api.set_offline(true).await;
        let svc = fixture::service(api);
        let mut view = Connections::default();

        let err = view
            .update(
                &svc,
                &"c1".parse().unwrap(),
                &patch::Form {
                    name: "G".into(),
                    subject: "Astrology".into(),
                    ..form()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind, Kind::Validation);
        assert_eq!(err.message.lines().count(), 2);
    }

    #[tokio::test]
    async fn deletes_only_acknowledged_row() {
        let svc = fixture::service(connected(&["c1", "c2"]).await);
        let mut view = Connections::default();
        _ = view.load(&svc, Some(owner())).await;

        view.delete(&svc, &"c2".parse().unwrap()).await.unwrap();
        assert_eq!(view.rows().len(), 1);

        let err = view.delete(&svc, &"c9".parse().unwrap()).await.unwrap_err();
        assert_eq!(err.code, "NOT_ACKNOWLEDGED");
        assert_eq!(view.rows().len(), 1);
        assert_eq!(view.rows()[0].id().as_ref(), "c1");
    }

    #[tokio::test]
    async fn keeps_rows_when_deleted_one_is_not_loaded() {
        let api = connected(&["c1", "c2"]).await;
        let svc = fixture::service(api.clone());
        let mut view = Connections::default();
        _ = view.load(&svc, Some(owner())).await;
        let before = view.rows().to_vec();

        let unseen = partner("c3", "Biology", L::Intermediate, 4.0);
        api.connect(
            owner(),
            Connection {
                partner_id: unseen.id.clone(),
                partner: unseen,
            },
        )
        .await;
        view.delete(&svc, &"c3".parse().unwrap()).await.unwrap();

        assert_eq!(view.rows(), before.as_slice());
    }
}

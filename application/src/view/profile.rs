//! [`CreateProfile`] form.

use service::{
    command::{self, Command},
    domain::{
        partner::{self, draft, Draft},
        Session,
    },
};
use tracerr::Traced;
use tracing as log;

use crate::{AsError, Error};

/// Form creating a new partner profile.
#[derive(Clone, Debug, Default)]
pub struct CreateProfile {
    /// Raw values of this form.
    pub form: draft::Form,
}

impl CreateProfile {
    /// Creates a new [`CreateProfile`] form, prefilled from the provided
    /// [`Session`].
    #[must_use]
    pub fn new(session: Option<&Session>) -> Self {
        let mut form = draft::Form::default();
        if let Some(s) = session {
            if let Some(email) = &s.email {
                form.email = email.to_string();
            }
            if let Some(name) = &s.display_name {
                form.name = name.to_string();
            }
            if let Some(url) = &s.photo_url {
                form.photo_url = url.to_string();
            }
        }
        Self { form }
    }

    /// Validates and submits this form.
    ///
    /// # Errors
    ///
    /// - If the form is invalid, listing every violation.
    /// - If the remote side fails or doesn't acknowledge the creation.
    pub async fn submit<S>(&self, svc: &S) -> Result<partner::Id, Error>
    where
        S: Command<
            command::CreatePartner,
            Ok = partner::Id,
            Err = Traced<command::create_partner::ExecutionError>,
        >,
    {
        let draft =
            Draft::parse(&self.form).map_err(|v| Error::validation(&v))?;
        let id = svc
            .execute(command::CreatePartner { draft })
            .await
            .map_err(AsError::into_error)?;
        log::info!("partner profile `{id}` created");
        Ok(id)
    }
}

#[cfg(test)]
mod spec {
    use service::{
        domain::{partner::draft, Email, Session},
        infra::api,
    };

    use crate::{error::Kind, fixture};

    use super::CreateProfile;

    fn filled() -> draft::Form {
        draft::Form {
            name: "Ada".into(),
            photo_url: "https://i.ibb.co/a.png".into(),
            bio: "Loves proofs".into(),
            subject: "Mathematics".into(),
            study_mode: "Online".into(),
            availability: "Weekends".into(),
            location: "Dhaka".into(),
            experience: "Beginner".into(),
            rating: "5".into(),
            email: "ada@example.com".into(),
        }
    }

    #[test]
    fn prefills_email_from_session() {
        let session = Session {
            email: Some("ada@example.com".parse::<Email>().unwrap()),
            ..fixture::session("ada")
        };

        let profile = CreateProfile::new(Some(&session));

        assert_eq!(profile.form.email, "ada@example.com");
        assert!(CreateProfile::new(None).form.email.is_empty());
    }

    #[tokio::test]
    async fn lists_every_violation_without_submitting() {
        let api = api::Memory::default();
        api.set_offline(true).await;
        let svc = fixture::service(api);
        let profile = CreateProfile {
            form: draft::Form {
                rating: "6".into(),
                email: "ada@example.com".into(),
                ..draft::Form::default()
            },
        };

        let err = profile.submit(&svc).await.unwrap_err();

        assert_eq!(err.kind, Kind::Validation);
        assert!(err.message.contains("Name is required"));
        assert!(err
            .message
            .contains("Rating must be a number between 0 and 5"));
        assert!(!err.message.contains("Email"));
    }

    #[tokio::test]
    async fn submits_valid_form() {
        let svc = fixture::service(api::Memory::default());
        let profile = CreateProfile { form: filled() };

        let id = profile.submit(&svc).await.unwrap();

        assert!(!id.as_ref().is_empty());
    }

    #[tokio::test]
    async fn reports_transport_failure() {
        let api = api::Memory::default();
        api.set_offline(true).await;
        let svc = fixture::service(api);
        let profile = CreateProfile { form: filled() };

        let err = profile.submit(&svc).await.unwrap_err();

        assert_eq!(err.code, "TRANSPORT_FAILED");
    }
}

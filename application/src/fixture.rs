//! Test fixtures.

use std::future::IntoFuture as _;

use common::Rating;
use service::{
    domain::{
        partner::{
            Availability, Avatar, ConnectionCount, ExperienceLevel, Id,
            Location, Name, StudyMode, Subject,
        },
        session::Uid,
        Partner, Session,
    },
    infra::{api, identity},
    session::Snapshot,
    task,
};

/// [`service::Service`] backed by in-memory infrastructure.
pub(crate) type Service = service::Service<identity::Memory, api::Memory>;

/// Creates a new [`Service`] over the provided [`api::Memory`], leaving its
/// identity mirroring not started.
pub(crate) fn service(api: api::Memory) -> Service {
    spawn(api).0
}

/// Creates a new [`Service`] over the provided [`api::Memory`] along with its
/// [`task::Background`].
pub(crate) fn spawn(api: api::Memory) -> (Service, task::Background) {
    Service::new(identity::Memory::default(), api)
}

/// Drives the provided [`task::Background`] until the session of the
/// provided [`Service`] settles.
pub(crate) async fn settled(svc: &Service, bg: task::Background) -> Snapshot {
    tokio::select! {
        snapshot = svc.session().settled() => snapshot,
        res = bg.into_future() => {
            panic!("background completed before session settled: {res:?}")
        }
    }
}

/// [`Session`] with the provided [`Uid`] only.
pub(crate) fn session(uid: &str) -> Session {
    Session {
        uid: Uid::new(uid).unwrap(),
        display_name: None,
        email: None,
        photo_url: None,
        created_at: None,
        last_login_at: None,
    }
}

/// [`Partner`] with the provided parameters.
pub(crate) fn partner(
    id: &str,
    subject: &str,
    experience: ExperienceLevel,
    rating: f64,
) -> Partner {
    Partner {
        id: Id::new(id).unwrap(),
        name: Name::new(format!("Partner {id}")).unwrap(),
        subject: Subject::new(subject).unwrap(),
        study_mode: StudyMode::Online,
        experience,
        availability: Availability::new("Evenings").unwrap(),
        location: Location::new("Dhaka").unwrap(),
        rating: Rating::from_f64(rating).unwrap(),
        connections: ConnectionCount::default(),
        email: None,
        avatar: Avatar::default(),
        bio: None,
    }
}

//! Test fixtures.

use common::Rating;

use crate::domain::{
    partner::{
        draft, Availability, Avatar, ConnectionCount, Draft, ExperienceLevel,
        Id, Location, Name, StudyMode, Subject,
    },
    Partner,
};

/// Valid [`Draft`] of a new [`Partner`].
pub(crate) fn draft() -> Draft {
    Draft::parse(&draft::Form {
        name: "Ada".into(),
        photo_url: "https://i.ibb.co/a.png".into(),
        bio: "Loves proofs".into(),
        subject: "Mathematics".into(),
        study_mode: "Offline".into(),
        availability: "Evenings".into(),
        location: "Dhaka".into(),
        experience: "Expert".into(),
        rating: "4.5".into(),
        email: "ada@example.com".into(),
    })
    .unwrap()
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

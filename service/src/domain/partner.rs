//! [`Partner`] definitions.

use std::{borrow::Cow, str::FromStr};

use common::{define_kind, Rating};
use derive_more::{AsRef, Display, From, Into};

use super::{
    account::{Email, PhotoUrl},
    Violations,
};

/// Study partner profile.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Partner {
    /// ID of this [`Partner`].
    pub id: Id,

    /// [`Name`] of this [`Partner`].
    pub name: Name,

    /// [`Subject`] this [`Partner`] studies.
    pub subject: Subject,

    /// [`StudyMode`] this [`Partner`] prefers.
    pub study_mode: StudyMode,

    /// [`ExperienceLevel`] of this [`Partner`].
    pub experience: ExperienceLevel,

    /// [`Availability`] of this [`Partner`].
    pub availability: Availability,

    /// [`Location`] of this [`Partner`].
    pub location: Location,

    /// [`Rating`] of this [`Partner`].
    pub rating: Rating,

    /// Number of accepted connections of this [`Partner`].
    pub connections: ConnectionCount,

    /// [`Email`] of this [`Partner`].
    pub email: Option<Email>,

    /// [`Avatar`] of this [`Partner`].
    pub avatar: Avatar,

    /// [`Bio`] of this [`Partner`].
    pub bio: Option<Bio>,
}

impl Partner {
    /// Applies the provided [`Patch`] to this [`Partner`].
    ///
    /// Only [`Name`], [`Subject`], [`StudyMode`] and [`Avatar`] change.
    pub fn apply(&mut self, patch: Patch) {
        let Patch {
            name,
            subject,
            study_mode,
            avatar,
        } = patch;
        self.name = name;
        self.subject = subject;
        self.study_mode = study_mode;
        self.avatar = avatar;
    }
}

/// ID of a [`Partner`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[as_ref(str)]
pub struct Id(String);

impl Id {
    /// Creates a new [`Id`] if the given `id` is not blank and contains no
    /// whitespace.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        Self::check(&id).then_some(Self(id))
    }

    /// Checks whether the given `id` is a valid [`Id`].
    fn check(id: impl AsRef<str>) -> bool {
        let id = id.as_ref();
        !id.is_empty()
            && id.len() <= 128
            && !id.chars().any(|c| c.is_whitespace() || c == '/')
    }
}

impl FromStr for Id {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Id`")
    }
}

/// Defines a trimmed non-empty text newtype.
macro_rules! define_text {
    ($(#[doc = $doc:literal])* $name:ident, $max:literal) => {
        $(#[doc = $doc])*
        #[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
        #[as_ref(str)]
        pub struct $name(String);

        impl $name {
            #[doc = ::core::concat!(
                "Creates a new [`", ::core::stringify!($name), "`] if the \
                 given `text` is trimmed, not empty and not longer than ",
                ::core::stringify!($max), " bytes.",
            )]
            #[must_use]
            pub fn new(text: impl Into<String>) -> Option<Self> {
                let text = text.into();
                (text.trim() == text && !text.is_empty() && text.len() <= $max)
                    .then_some(Self(text))
            }
        }

        impl FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s).ok_or(::core::concat!(
                    "invalid `", ::core::stringify!($name), "`",
                ))
            }
        }
    };
}

define_text!(
    /// Name of a [`Partner`].
    Name,
    512
);

define_text!(
    /// Subject a [`Partner`] studies.
    Subject,
    128
);

define_text!(
    /// Free-text availability of a [`Partner`], like `"Evenings 6-9 PM"`.
    Availability,
    256
);

define_text!(
    /// Free-text location of a [`Partner`].
    Location,
    256
);

define_text!(
    /// Free-text biography of a [`Partner`].
    Bio,
    4096
);

impl Subject {
    /// [`Subject`]s offered for selection.
    pub const KNOWN: [&'static str; 9] = [
        "English",
        "Mathematics",
        "Physics",
        "Programming",
        "Chemistry",
        "Biology",
        "Statistics",
        "Economics",
        "History",
    ];

    /// Indicates whether this [`Subject`] is one of the [`Subject::KNOWN`].
    #[must_use]
    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }
}

define_kind! {
    #[doc = "Mode a [`Partner`] prefers to study in."]
    enum StudyMode {
        #[doc = "Studying remotely."]
        Online = 1,

        #[doc = "Studying in person."]
        Offline = 2,
    }
}

define_kind! {
    #[doc = "Experience level of a [`Partner`]."]
    enum ExperienceLevel {
        #[doc = "Just started studying the subject."]
        Beginner = 1,

        #[doc = "Has a solid grasp of the subject."]
        Intermediate = 2,

        #[doc = "Masters the subject."]
        Expert = 3,
    }
}

/// Number of accepted connections of a [`Partner`].
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, From, Into, Ord, PartialEq,
    PartialOrd,
)]
pub struct ConnectionCount(u32);

/// Avatar of a [`Partner`] as it was stored.
///
/// Use [`Avatar::url()`] to get the URL to render.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Avatar(String);

impl Avatar {
    /// URL of the picture rendered in place of a missing [`Avatar`].
    pub const PLACEHOLDER: &'static str =
        "https://i.ibb.co/7y4m2bq/avatar-placeholder.png";

    /// Creates a new [`Avatar`] out of the provided stored value.
    #[must_use]
    pub fn new(stored: impl Into<String>) -> Self {
        let stored = stored.into();
        Self(stored.trim().to_owned())
    }

    /// Returns the stored value of this [`Avatar`], which may be empty.
    #[must_use]
    pub fn stored(&self) -> &str {
        &self.0
    }

    /// Returns the URL to render for this [`Avatar`].
    ///
    /// - An empty value, or one pointing to the profile creation page,
    ///   resolves to the [`Avatar::PLACEHOLDER`].
    /// - A value starting with `http` is used as is.
    /// - Any other value gets the `https://` scheme prepended.
    #[must_use]
    pub fn url(&self) -> Cow<'_, str> {
        let stored = self.0.as_str();
        if stored.is_empty() || stored.contains("create-partner") {
            Cow::Borrowed(Self::PLACEHOLDER)
        } else if stored.starts_with("http") {
            Cow::Borrowed(stored)
        } else {
            Cow::Owned(format!("https://{stored}"))
        }
    }
}

impl From<PhotoUrl> for Avatar {
    fn from(url: PhotoUrl) -> Self {
        Self(url.to_string())
    }
}

/// Raw text value of a form field.
fn field(raw: &str) -> Option<&str> {
    Some(raw.trim()).filter(|s| !s.is_empty())
}

/// Parses the value of a required form field, violating the `missing` rule
/// if it's blank, or the `rejected` one if the `parse` fails.
fn parse_field<'f, R, T>(
    raw: &'f str,
    (missing, rejected): (R, R),
    violated: &mut Vec<R>,
    parse: impl FnOnce(&'f str) -> Option<T>,
) -> Option<T> {
    let Some(value) = field(raw) else {
        violated.push(missing);
        return None;
    };
    let parsed = parse(value);
    if parsed.is_none() {
        violated.push(rejected);
    }
    parsed
}

pub mod patch {
    //! [`Patch`] form definitions.
    //!
    //! [`Patch`]: super::Patch

    use derive_more::Display;

    /// Raw values of the connection update form.
    #[derive(Clone, Debug, Default)]
    pub struct Form {
        /// Raw name.
        pub name: String,

        /// Raw subject.
        pub subject: String,

        /// Raw study mode.
        pub study_mode: String,

        /// Raw picture URL, may be empty.
        pub image_url: String,
    }

    /// Rule of the connection update form.
    #[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
    pub enum Rule {
        /// Name must be provided.
        #[display("Name is required")]
        NameRequired,

        /// Name must have at least 2 characters.
        #[display("Name must be at least 2 characters")]
        NameTooShort,

        /// Name must fit into a [`Name`].
        ///
        /// [`Name`]: super::Name
        #[display("Name is too long")]
        NameTooLong,

        /// Subject must be provided.
        #[display("Subject is required")]
        SubjectRequired,

        /// Subject must fit into a [`Subject`].
        ///
        /// [`Subject`]: super::Subject
        #[display("Subject is too long")]
        SubjectTooLong,

        /// Subject must be a known one.
        #[display("Please select a valid subject from the list")]
        SubjectUnknown,

        /// Study mode must be a valid one.
        #[display("Please select a valid study mode")]
        StudyModeInvalid,

        /// Picture URL must be well-formed, if provided.
        #[display("Picture URL is invalid")]
        ImageUrlInvalid,
    }
}

/// Changes to a [`Partner`] made from the connection update form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Patch {
    /// New [`Name`].
    pub name: Name,

    /// New [`Subject`].
    pub subject: Subject,

    /// New [`StudyMode`].
    pub study_mode: StudyMode,

    /// New [`Avatar`], empty when no picture URL is provided.
    pub avatar: Avatar,
}

impl Patch {
    /// Validates the provided [`patch::Form`].
    ///
    /// # Errors
    ///
    /// Lists every violated [`patch::Rule`].
    pub fn parse(form: &patch::Form) -> Result<Self, Violations<patch::Rule>> {
        use patch::Rule as R;

        let mut violated = Vec::new();

        let name = match field(&form.name) {
            Some(n) if n.chars().count() < 2 => {
                violated.push(R::NameTooShort);
                None
            }
            _ => parse_field(
                &form.name,
                (R::NameRequired, R::NameTooLong),
                &mut violated,
                Name::new,
            ),
        };

        let subject = match parse_field(
            &form.subject,
            (R::SubjectRequired, R::SubjectTooLong),
            &mut violated,
            Subject::new,
        ) {
            Some(s) if !s.is_known() => {
                violated.push(R::SubjectUnknown);
                None
            }
            s => s,
        };

        let study_mode = field(&form.study_mode)
            .and_then(|m| m.parse::<StudyMode>().ok());
        if study_mode.is_none() {
            violated.push(R::StudyModeInvalid);
        }

        let avatar = match field(&form.image_url) {
            None => Some(Avatar::default()),
            Some(url) => PhotoUrl::new(url).map(Avatar::from),
        };
        if avatar.is_none() {
            violated.push(R::ImageUrlInvalid);
        }

        match (name, subject, study_mode, avatar) {
            (Some(name), Some(subject), Some(study_mode), Some(avatar))
                if violated.is_empty() =>
            {
                Ok(Self {
                    name,
                    subject,
                    study_mode,
                    avatar,
                })
            }
            _ => Err(Violations(violated)),
        }
    }
}

pub mod draft {
    //! [`Draft`] form definitions.
    //!
    //! [`Draft`]: super::Draft

    use derive_more::Display;

    /// Raw values of the profile creation form.
    #[derive(Clone, Debug, Default)]
    pub struct Form {
        /// Raw name.
        pub name: String,

        /// Raw photo URL.
        pub photo_url: String,

        /// Raw biography.
        pub bio: String,

        /// Raw subject.
        pub subject: String,

        /// Raw study mode.
        pub study_mode: String,

        /// Raw availability.
        pub availability: String,

        /// Raw location.
        pub location: String,

        /// Raw experience level.
        pub experience: String,

        /// Raw rating, an empty one means `0`.
        pub rating: String,

        /// Raw email.
        pub email: String,
    }

    /// Rule of the profile creation form.
    #[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
    pub enum Rule {
        /// Name must be provided.
        #[display("Name is required")]
        NameRequired,

        /// Name must fit into a [`Name`].
        ///
        /// [`Name`]: super::Name
        #[display("Name is too long")]
        NameTooLong,

        /// Photo URL must be provided.
        #[display("Photo URL is required")]
        PhotoUrlRequired,

        /// Photo URL must be well-formed.
        #[display("Photo URL is invalid")]
        PhotoUrlInvalid,

        /// Biography must be provided.
        #[display("Bio details is required")]
        BioRequired,

        /// Bio must fit into a [`Bio`].
        ///
        /// [`Bio`]: super::Bio
        #[display("Bio details are too long")]
        BioTooLong,

        /// Subject must be provided.
        #[display("Subject is required")]
        SubjectRequired,

        /// Subject must fit into a [`Subject`].
        ///
        /// [`Subject`]: super::Subject
        #[display("Subject is too long")]
        SubjectTooLong,

        /// Study mode must be selected.
        #[display("Please select a study mode")]
        StudyModeRequired,

        /// Availability must be provided.
        #[display("Availability time is required")]
        AvailabilityRequired,

        /// Availability must fit into a [`Availability`].
        ///
        /// [`Availability`]: super::Availability
        #[display("Availability time is too long")]
        AvailabilityTooLong,

        /// Location must be provided.
        #[display("Location is required")]
        LocationRequired,

        /// Location must fit into a [`Location`].
        ///
        /// [`Location`]: super::Location
        #[display("Location is too long")]
        LocationTooLong,

        /// Experience level must be selected.
        #[display("Please select an experience level")]
        ExperienceRequired,

        /// Rating must be a number within `[0, 5]`.
        #[display("Rating must be a number between 0 and 5")]
        RatingInvalid,

        /// Email must be provided.
        #[display("Email is required")]
        EmailRequired,

        /// Email must be well-formed.
        #[display("Email is invalid")]
        EmailInvalid,
    }
}

/// New [`Partner`] profile submitted for creation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Draft {
    /// [`Name`] of the new [`Partner`].
    pub name: Name,

    /// [`Avatar`] of the new [`Partner`].
    pub avatar: Avatar,

    /// [`Bio`] of the new [`Partner`].
    pub bio: Bio,

    /// [`Subject`] of the new [`Partner`].
    pub subject: Subject,

    /// [`StudyMode`] of the new [`Partner`].
    pub study_mode: StudyMode,

    /// [`Availability`] of the new [`Partner`].
    pub availability: Availability,

    /// [`Location`] of the new [`Partner`].
    pub location: Location,

    /// [`ExperienceLevel`] of the new [`Partner`].
    pub experience: ExperienceLevel,

    /// Self-assessed [`Rating`] of the new [`Partner`].
    pub rating: Rating,

    /// [`Email`] of the account owning the new [`Partner`].
    pub email: Email,
}

impl Draft {
    /// Validates the provided [`draft::Form`].
    ///
    /// # Errors
    ///
    /// Lists every violated [`draft::Rule`].
    pub fn parse(form: &draft::Form) -> Result<Self, Violations<draft::Rule>> {
        use draft::Rule as R;

        let mut violated = Vec::new();

        let name = parse_field(
            &form.name,
            (R::NameRequired, R::NameTooLong),
            &mut violated,
            Name::new,
        );
        let avatar = parse_field(
            &form.photo_url,
            (R::PhotoUrlRequired, R::PhotoUrlInvalid),
            &mut violated,
            PhotoUrl::new,
        );
        let bio = parse_field(
            &form.bio,
            (R::BioRequired, R::BioTooLong),
            &mut violated,
            Bio::new,
        );
        let subject = parse_field(
            &form.subject,
            (R::SubjectRequired, R::SubjectTooLong),
            &mut violated,
            Subject::new,
        );
        let study_mode = parse_field(
            &form.study_mode,
            (R::StudyModeRequired, R::StudyModeRequired),
            &mut violated,
            |m| m.parse::<StudyMode>().ok(),
        );
        let availability = parse_field(
            &form.availability,
            (R::AvailabilityRequired, R::AvailabilityTooLong),
            &mut violated,
            Availability::new,
        );
        let location = parse_field(
            &form.location,
            (R::LocationRequired, R::LocationTooLong),
            &mut violated,
            Location::new,
        );
        let experience = parse_field(
            &form.experience,
            (R::ExperienceRequired, R::ExperienceRequired),
            &mut violated,
            |e| e.parse::<ExperienceLevel>().ok(),
        );
        let rating = match field(&form.rating) {
            None => Some(Rating::default()),
            Some(r) => r.parse::<Rating>().ok(),
        };
        if rating.is_none() {
            violated.push(R::RatingInvalid);
        }
        let email = parse_field(
            &form.email,
            (R::EmailRequired, R::EmailInvalid),
            &mut violated,
            Email::new,
        );

        violated.sort_by_key(|r| *r as u8);

        match (
            name,
            avatar,
            bio,
            subject,
            study_mode,
            availability,
            location,
            experience,
            rating,
            email,
        ) {
            (
                Some(name),
                Some(photo),
                Some(bio),
                Some(subject),
                Some(study_mode),
                Some(availability),
                Some(location),
                Some(experience),
                Some(rating),
                Some(email),
            ) if violated.is_empty() => Ok(Self {
                name,
                avatar: photo.into(),
                bio,
                subject,
                study_mode,
                availability,
                location,
                experience,
                rating,
                email,
            }),
            _ => Err(Violations(violated)),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::Rating;

    use super::{
        draft, patch, Avatar, ConnectionCount, Draft, ExperienceLevel, Id,
        Location, Name, Partner, Patch, StudyMode, Subject,
    };

    fn partner() -> Partner {
        Partner {
            id: Id::new("p1").unwrap(),
            name: Name::new("Ada").unwrap(),
            subject: Subject::new("Mathematics").unwrap(),
            study_mode: StudyMode::Offline,
            experience: ExperienceLevel::Expert,
            availability: super::Availability::new("Mornings").unwrap(),
            location: Location::new("Dhaka").unwrap(),
            rating: Rating::from_f64(4.5).unwrap(),
            connections: ConnectionCount::from(3),
            email: None,
            avatar: Avatar::default(),
            bio: None,
        }
    }

    fn patch_form() -> patch::Form {
        patch::Form {
            name: " Grace ".into(),
            subject: "Physics".into(),
            study_mode: "Online".into(),
            image_url: "https://i.ibb.co/g.png".into(),
        }
    }

    fn draft_form() -> draft::Form {
        draft::Form {
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
        }
    }

    #[test]
    fn resolves_avatar_url() {
        assert_eq!(Avatar::new("").url(), Avatar::PLACEHOLDER);
        assert_eq!(Avatar::new("   ").url(), Avatar::PLACEHOLDER);
        assert_eq!(
            Avatar::new("https://site/create-partner/x.png").url(),
            Avatar::PLACEHOLDER,
        );
        assert_eq!(Avatar::new("http://x.io/a.png").url(), "http://x.io/a.png");
        assert_eq!(Avatar::new("x.io/a.png").url(), "https://x.io/a.png");
    }

    #[test]
    fn applies_exactly_patched_fields() {
        let before = partner();
        let patch = Patch::parse(&patch_form()).unwrap();

        let mut after = before.clone();
        after.apply(patch);

        assert_eq!(after.name.as_ref(), "Grace");
        assert_eq!(after.subject.as_ref(), "Physics");
        assert_eq!(after.study_mode, StudyMode::Online);
        assert_eq!(after.avatar.url(), "https://i.ibb.co/g.png");

        assert_eq!(after.id, before.id);
        assert_eq!(after.experience, before.experience);
        assert_eq!(after.availability, before.availability);
        assert_eq!(after.location, before.location);
        assert_eq!(after.rating, before.rating);
        assert_eq!(after.connections, before.connections);
        assert_eq!(after.bio, before.bio);
    }

    #[test]
    fn empty_image_url_resets_avatar() {
        let patch = Patch::parse(&patch::Form {
            image_url: String::new(),
            ..patch_form()
        })
        .unwrap();

        assert_eq!(patch.avatar.url(), Avatar::PLACEHOLDER);
    }

    #[test]
    fn lists_every_violated_patch_rule() {
        use patch::Rule as R;

        let violations = Patch::parse(&patch::Form {
            name: "A".into(),
            subject: "Astrology".into(),
            study_mode: "Hybrid".into(),
            image_url: "not a url".into(),
        })
        .unwrap_err();

        assert_eq!(
            violations.as_slice(),
            [
                R::NameTooShort,
                R::SubjectUnknown,
                R::StudyModeInvalid,
                R::ImageUrlInvalid,
            ],
        );

        let violations = Patch::parse(&patch::Form {
            name: "  ".into(),
            subject: String::new(),
            ..patch_form()
        })
        .unwrap_err();
        assert_eq!(
            violations.as_slice(),
            [R::NameRequired, R::SubjectRequired],
        );
    }

    #[test]
    fn parses_valid_draft() {
        let draft = Draft::parse(&draft_form()).unwrap();

        assert_eq!(draft.experience, ExperienceLevel::Expert);
        assert_eq!(draft.study_mode, StudyMode::Offline);
        assert_eq!(draft.rating.to_string(), "4.5");
        assert_eq!(draft.avatar.url(), "https://i.ibb.co/a.png");
    }

    #[test]
    fn empty_rating_means_zero() {
        let draft = Draft::parse(&draft::Form {
            rating: String::new(),
            ..draft_form()
        })
        .unwrap();

        assert_eq!(draft.rating, Rating::default());
    }

    #[test]
    fn lists_every_violated_draft_rule() {
        use draft::Rule as R;

        let violations = Draft::parse(&draft::Form {
            rating: "7".into(),
            ..draft::Form::default()
        })
        .unwrap_err();

        assert_eq!(
            violations.as_slice(),
            [
                R::NameRequired,
                R::PhotoUrlRequired,
                R::BioRequired,
                R::SubjectRequired,
                R::StudyModeRequired,
                R::AvailabilityRequired,
                R::LocationRequired,
                R::ExperienceRequired,
                R::RatingInvalid,
                R::EmailRequired,
            ],
        );

        let violations = Draft::parse(&draft::Form {
            photo_url: "nope".into(),
            study_mode: "Hybrid".into(),
            email: "ada".into(),
            ..draft_form()
        })
        .unwrap_err();
        assert_eq!(
            violations.to_string(),
            "Photo URL is invalid; Please select a study mode; \
             Email is invalid",
        );
    }

    #[test]
    fn reports_too_long_draft_fields() {
        use draft::Rule as R;

        let violations = Draft::parse(&draft::Form {
            bio: "b".repeat(5000),
            location: "l".repeat(300),
            ..draft_form()
        })
        .unwrap_err();

        assert_eq!(violations.as_slice(), [R::BioTooLong, R::LocationTooLong]);
        assert_eq!(
            violations.to_string(),
            "Bio details are too long; Location is too long",
        );
    }

    #[test]
    fn reports_too_long_patch_fields() {
        use patch::Rule as R;

        let violations = Patch::parse(&patch::Form {
            name: "n".repeat(600),
            subject: "s".repeat(200),
            ..patch_form()
        })
        .unwrap_err();

        assert_eq!(violations.as_slice(), [R::NameTooLong, R::SubjectTooLong]);
    }
}

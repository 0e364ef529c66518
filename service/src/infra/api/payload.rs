//! Wire payloads of the remote partner API and their normalization.
//!
//! The remote API stores partner records written by different clients, so
//! the same field may come under several names. Every accepted alias is
//! mapped to the canonical [`Partner`] here, and nowhere else.

use common::Rating;
use derive_more::{Display, Error as StdError};
use serde::{Deserialize, Serialize};
use tracing as log;

use crate::{
    domain::{
        partner::{
            self, Availability, Avatar, Bio, ConnectionCount, Draft,
            Location, Name, Patch, Subject,
        },
        Email, Partner,
    },
    read::Connection,
};

use super::{Deletion, Insertion};

/// Identifier as stored remotely: either a plain string or an extended JSON
/// object ID.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    /// Plain string identifier.
    Plain(String),

    /// Extended JSON object ID, like `{"$oid": "..."}`.
    Object {
        /// Hex value of the object ID.
        #[serde(rename = "$oid")]
        oid: String,
    },
}

impl RawId {
    /// Converts this [`RawId`] into a [`partner::Id`].
    fn into_id(self) -> Option<partner::Id> {
        match self {
            Self::Plain(id) | Self::Object { oid: id } => partner::Id::new(id),
        }
    }
}

/// Partner record as returned by the remote API.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct RawPartner {
    /// Primary identifier.
    #[serde(rename = "_id")]
    primary_id: Option<RawId>,

    /// Secondary identifier.
    id: Option<RawId>,

    /// ID of the linked partner of a connection row.
    partner_id: Option<RawId>,

    /// Name.
    name: Option<String>,

    /// Subject.
    subject: Option<String>,

    /// Subject written by the update endpoint.
    sub: Option<String>,

    /// Study mode.
    study_mode: Option<String>,

    /// Study mode written by the update endpoint.
    std_mode: Option<String>,

    /// Experience level.
    experience_level: Option<String>,

    /// Availability.
    availability_time: Option<String>,

    /// Availability written by older clients.
    availability: Option<String>,

    /// Location.
    location: Option<String>,

    /// Rating, a number or a numeric string.
    rating: Option<Rating>,

    /// Number of accepted connections.
    partner_count: Option<u32>,

    /// Owner email.
    email: Option<String>,

    /// Avatar URL.
    #[serde(rename = "profileimage")]
    profileimage: Option<String>,

    /// Avatar URL written by older clients.
    profile_image: Option<String>,

    /// Avatar URL written by the update endpoint.
    #[serde(rename = "imgURL")]
    img_url: Option<String>,

    /// Biography.
    bio: Option<String>,
}

/// Reason a [`RawPartner`] cannot be normalized.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, StdError)]
pub enum Malformed {
    /// No usable identifier.
    #[display("missing identifier")]
    Id,

    /// No usable name.
    #[display("missing name")]
    Name,

    /// No usable subject.
    #[display("missing subject")]
    Subject,

    /// No recognizable study mode.
    #[display("invalid study mode")]
    StudyMode,

    /// No recognizable experience level.
    #[display("invalid experience level")]
    ExperienceLevel,

    /// No usable availability.
    #[display("missing availability")]
    Availability,

    /// No usable location.
    #[display("missing location")]
    Location,
}

/// Returns the first present non-blank value, trimmed.
fn first(candidates: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_owned())
        .find(|s| !s.is_empty())
}

impl RawPartner {
    /// Normalizes this [`RawPartner`] into a [`Partner`] and the ID of its
    /// linked partner.
    fn normalize(self) -> Result<(Partner, partner::Id), Malformed> {
        let id = [self.primary_id, self.id]
            .into_iter()
            .flatten()
            .find_map(RawId::into_id)
            .ok_or(Malformed::Id)?;
        let linked = self
            .partner_id
            .and_then(RawId::into_id)
            .unwrap_or_else(|| id.clone());

        let partner = Partner {
            name: first([self.name])
                .and_then(Name::new)
                .ok_or(Malformed::Name)?,
            subject: first([self.subject, self.sub])
                .and_then(Subject::new)
                .ok_or(Malformed::Subject)?,
            study_mode: first([self.study_mode, self.std_mode])
                .and_then(|m| m.parse().ok())
                .ok_or(Malformed::StudyMode)?,
            experience: first([self.experience_level])
                .and_then(|l| l.parse().ok())
                .ok_or(Malformed::ExperienceLevel)?,
            availability: first([self.availability_time, self.availability])
                .and_then(Availability::new)
                .ok_or(Malformed::Availability)?,
            location: first([self.location])
                .and_then(Location::new)
                .ok_or(Malformed::Location)?,
            rating: self.rating.unwrap_or_default(),
            connections: ConnectionCount::from(
                self.partner_count.unwrap_or_default(),
            ),
            email: first([self.email]).and_then(Email::new),
            avatar: first([self.profileimage, self.profile_image, self.img_url])
                .map(Avatar::new)
                .unwrap_or_default(),
            bio: first([self.bio]).and_then(Bio::new),
            id,
        };
        Ok((partner, linked))
    }
}

/// Normalizes a list of raw records, skipping malformed ones.
fn normalize_all(
    raw: Vec<serde_json::Value>,
) -> impl Iterator<Item = (Partner, partner::Id)> {
    raw.into_iter().enumerate().filter_map(|(n, value)| {
        serde_json::from_value::<RawPartner>(value)
            .map_err(|e| e.to_string())
            .and_then(|r| r.normalize().map_err(|e| e.to_string()))
            .map_err(|e| log::warn!("skipping malformed partner #{n}: {e}"))
            .ok()
    })
}

/// Normalizes a list of partner records, skipping malformed ones.
pub(super) fn partners(raw: Vec<serde_json::Value>) -> Vec<Partner> {
    normalize_all(raw).map(|(p, _)| p).collect()
}

/// Normalizes a list of connection rows, skipping malformed ones.
pub(super) fn connections(raw: Vec<serde_json::Value>) -> Vec<Connection> {
    normalize_all(raw)
        .map(|(partner, partner_id)| Connection {
            partner,
            partner_id,
        })
        .collect()
}

/// Normalizes a single partner record.
///
/// A `null` or malformed record means no [`Partner`].
pub(super) fn partner(raw: serde_json::Value) -> Option<Partner> {
    if raw.is_null() {
        return None;
    }
    serde_json::from_value::<RawPartner>(raw)
        .map_err(|e| e.to_string())
        .and_then(|r| r.normalize().map_err(|e| e.to_string()))
        .map(|(p, _)| p)
        .map_err(|e| log::warn!("malformed partner: {e}"))
        .ok()
}

/// Request body creating a new partner.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NewPartner<'d> {
    /// Name.
    name: &'d str,

    /// Subject.
    subject: &'d str,

    /// Study mode.
    study_mode: String,

    /// Availability.
    availability_time: &'d str,

    /// Location.
    location: &'d str,

    /// Experience level.
    experience_level: String,

    /// Rating.
    rating: Rating,

    /// Number of accepted connections, always `0`.
    partner_count: u32,

    /// Owner email.
    email: &'d str,

    /// Avatar URL.
    #[serde(rename = "profileimage")]
    profileimage: &'d str,

    /// Biography.
    bio: &'d str,
}

impl<'d> From<&'d Draft> for NewPartner<'d> {
    fn from(draft: &'d Draft) -> Self {
        Self {
            name: draft.name.as_ref(),
            subject: draft.subject.as_ref(),
            study_mode: draft.study_mode.to_string(),
            availability_time: draft.availability.as_ref(),
            location: draft.location.as_ref(),
            experience_level: draft.experience.to_string(),
            rating: draft.rating,
            partner_count: 0,
            email: draft.email.as_ref(),
            profileimage: draft.avatar.stored(),
            bio: draft.bio.as_ref(),
        }
    }
}

/// Request body patching a connection row.
#[derive(Debug, Serialize)]
pub(super) struct PartnerPatch<'p> {
    /// Name.
    name: &'p str,

    /// Subject.
    sub: &'p str,

    /// Study mode.
    #[serde(rename = "stdMode")]
    std_mode: String,

    /// Avatar URL, empty to reset.
    #[serde(rename = "imgURL")]
    img_url: &'p str,
}

impl<'p> From<&'p Patch> for PartnerPatch<'p> {
    fn from(patch: &'p Patch) -> Self {
        Self {
            name: patch.name.as_ref(),
            sub: patch.subject.as_ref(),
            std_mode: patch.study_mode.to_string(),
            img_url: patch.avatar.stored(),
        }
    }
}

/// Response to a partner creation.
#[derive(Debug, Deserialize)]
pub(super) struct Created {
    /// Result of the write.
    result: CreatedResult,
}

/// Result of a partner creation.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CreatedResult {
    /// Indicator whether the write was acknowledged.
    acknowledged: bool,

    /// ID of the created record.
    inserted_id: Option<RawId>,
}

impl From<Created> for Insertion {
    fn from(created: Created) -> Self {
        let CreatedResult {
            acknowledged,
            inserted_id,
        } = created.result;
        Self {
            acknowledged,
            inserted_id: inserted_id.and_then(RawId::into_id),
        }
    }
}

/// Response to a connection deletion.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct Deleted {
    /// Indicator whether the write was acknowledged.
    acknowledged: bool,

    /// Number of deleted records.
    deleted_count: u64,
}

impl From<Deleted> for Deletion {
    fn from(deleted: Deleted) -> Self {
        Self {
            acknowledged: deleted.acknowledged,
            deleted_count: deleted.deleted_count,
        }
    }
}

//! Landing page [`Banner`].

use service::{
    domain::Partner,
    infra::api,
    query,
    read::partner::list::Selector,
};
use tracerr::Traced;

use crate::AsError;

use super::remote::{Remote, Status};

/// Carousel of recently created [`Partner`]s.
#[derive(Clone, Debug, Default)]
pub struct Banner {
    /// Recently created [`Partner`]s.
    remote: Remote<Vec<Partner>>,
}

/// Single slide of a [`Banner`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Slide<'p> {
    /// Presentation key of this [`Slide`], unique within a [`Banner`].
    pub key: &'p str,

    /// Whether this [`Slide`] duplicates another one.
    pub is_clone: bool,

    /// Shown [`Partner`].
    pub partner: &'p Partner,
}

impl Banner {
    /// Suffix of the presentation key of a duplicated [`Slide`].
    pub const CLONE_SUFFIX: &'static str = "-clone";

    /// Loads recently created [`Partner`]s.
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
            .execute(query::partners::List::by(Selector::Recent))
            .await
            .map(Some)
            .map_err(AsError::into_error);
        self.remote.settle(ticket, outcome)
    }

    /// Returns the [`Status`] of this [`Banner`].
    #[must_use]
    pub fn status(&self) -> &Status {
        self.remote.status()
    }

    /// Returns the [`Slide`]s to show.
    ///
    /// A carousel cannot loop over a single slide, so a lone [`Partner`] is
    /// shown twice, the second time under a [`Banner::CLONE_SUFFIX`]ed key.
    #[must_use]
    pub fn slides(&self) -> Vec<Slide<'_>> {
        let partners = self.remote.value().map_or(&[][..], Vec::as_slice);
        let mut slides = partners
            .iter()
            .map(|p| Slide {
                key: p.id.as_ref(),
                is_clone: false,
                partner: p,
            })
            .collect::<Vec<_>>();
        if let [single] = partners {
            slides.push(Slide {
                key: single.id.as_ref(),
                is_clone: true,
                partner: single,
            });
        }
        slides
    }
}

impl Slide<'_> {
    /// Returns the presentation key of this [`Slide`].
    #[must_use]
    pub fn presentation_key(&self) -> String {
        if self.is_clone {
            format!("{}{}", self.key, Banner::CLONE_SUFFIX)
        } else {
            self.key.to_owned()
        }
    }
}

#[cfg(test)]
mod spec {
    use service::{domain::partner::ExperienceLevel as L, infra::api};

    use crate::fixture::{self, partner};

    use super::Banner;

    #[tokio::test]
    async fn duplicates_single_slide() {
        let svc = fixture::service(api::Memory::new([partner(
            "p1",
            "Physics",
            L::Expert,
            4.0,
        )]));
        let mut banner = Banner::default();

        assert!(banner.load(&svc).await);

        let keys = banner
            .slides()
            .iter()
            .map(super::Slide::presentation_key)
            .collect::<Vec<_>>();
        assert_eq!(keys, ["p1", "p1-clone"]);
        assert!(banner.slides().iter().all(|s| s.partner.id.as_ref() == "p1"));
    }

    #[tokio::test]
    async fn shows_recent_first() {
        let svc = fixture::service(api::Memory::new([
            partner("p1", "Physics", L::Expert, 4.0),
            partner("p2", "History", L::Beginner, 2.0),
        ]));
        let mut banner = Banner::default();

        _ = banner.load(&svc).await;

        let keys = banner
            .slides()
            .iter()
            .map(super::Slide::presentation_key)
            .collect::<Vec<_>>();
        assert_eq!(keys, ["p2", "p1"]);
    }
}

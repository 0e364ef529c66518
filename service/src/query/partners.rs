//! [`Query`] collection related to the multiple [`Partner`]s.

use common::operations::By;

use crate::{domain::Partner, read::partner::list};
#[cfg(doc)]
use crate::Query;

use super::ApiQuery;

/// Queries a list of [`Partner`]s.
pub type List = ApiQuery<By<Vec<Partner>, list::Selector>>;

#[cfg(test)]
mod spec {
    use crate::{
        domain::partner::ExperienceLevel,
        fixture,
        infra::{api, identity},
        query::Query as _,
        read::partner::list::{Selector, SortKey, Term},
        Service,
    };

    use super::List;

    fn service() -> Service<identity::Memory, api::Memory> {
        let partners = [
            ("p1", "Mathematics", ExperienceLevel::Beginner, 3.0),
            ("p2", "Physics", ExperienceLevel::Expert, 4.8),
            ("p3", "Mathematics", ExperienceLevel::Intermediate, 4.1),
        ]
        .into_iter()
        .map(|(id, subject, experience, rating)| {
            fixture::partner(id, subject, experience, rating)
        });
        let (svc, _) = Service::new(
            identity::Memory::default(),
            api::Memory::new(partners),
        );
        svc
    }

    async fn ids(
        svc: &Service<identity::Memory, api::Memory>,
        by: Selector,
    ) -> Vec<String> {
        svc.execute(List::by(by))
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id.to_string())
            .collect()
    }

    #[tokio::test]
    async fn lists_by_selector() {
        let svc = service();

        assert_eq!(ids(&svc, Selector::All).await, ["p1", "p2", "p3"]);
        assert_eq!(ids(&svc, Selector::Recent).await, ["p3", "p2", "p1"]);
        assert_eq!(ids(&svc, Selector::Top).await, ["p2", "p3", "p1"]);
        assert_eq!(
            ids(&svc, Selector::Search(Term::new(" math "))).await,
            ["p1", "p3"],
        );
        assert_eq!(
            ids(&svc, Selector::Sorted(SortKey(ExperienceLevel::Intermediate)))
                .await,
            ["p3", "p2", "p1"],
        );
    }
}

//! [`Partner`]-related read definitions.

#[cfg(doc)]
use crate::domain::Partner;

pub mod list {
    //! [`Partner`] list definitions.

    use derive_more::{AsRef, Display};

    use crate::domain::partner::ExperienceLevel;
    #[cfg(doc)]
    use crate::domain::Partner;

    /// Selector of a [`Partner`] list.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub enum Selector {
        /// Every [`Partner`].
        All,

        /// Recently created [`Partner`]s.
        Recent,

        /// Top-rated [`Partner`]s.
        Top,

        /// [`Partner`]s matching the [`Term`].
        Search(Term),

        /// Every [`Partner`] ordered by the [`SortKey`].
        Sorted(SortKey),
    }

    /// Search term of a [`Partner`] list.
    ///
    /// Always trimmed. An empty [`Term`] matches every [`Partner`].
    #[derive(AsRef, Clone, Debug, Default, Display, Eq, PartialEq)]
    #[as_ref(str)]
    pub struct Term(String);

    impl Term {
        /// Creates a new [`Term`] trimming the provided text.
        #[must_use]
        pub fn new(text: impl AsRef<str>) -> Self {
            Self(text.as_ref().trim().to_owned())
        }

        /// Indicates whether this [`Term`] matches every [`Partner`].
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.0.is_empty()
        }

        /// Checks whether the provided `text` contains this [`Term`],
        /// ignoring case.
        #[must_use]
        pub fn matches(&self, text: &str) -> bool {
            text.to_lowercase().contains(&self.0.to_lowercase())
        }
    }

    /// Sort order of a [`Partner`] list, named by the [`ExperienceLevel`]
    /// listed first.
    #[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
    #[display("{_0}")]
    pub struct SortKey(pub ExperienceLevel);

    impl SortKey {
        /// Returns the [`ExperienceLevel`]s in the order this [`SortKey`]
        /// lists them.
        #[must_use]
        pub const fn ranking(self) -> [ExperienceLevel; 3] {
            use ExperienceLevel as L;

            match self.0 {
                L::Expert => [L::Expert, L::Intermediate, L::Beginner],
                L::Intermediate => [L::Intermediate, L::Expert, L::Beginner],
                L::Beginner => [L::Beginner, L::Intermediate, L::Expert],
            }
        }

        /// Returns the position of the provided [`ExperienceLevel`] in this
        /// [`SortKey`] ordering.
        #[must_use]
        pub fn rank(self, level: ExperienceLevel) -> usize {
            self.ranking()
                .iter()
                .position(|l| *l == level)
                .unwrap_or(usize::MAX)
        }
    }

    #[cfg(test)]
    mod spec {
        use std::collections::HashSet;

        use super::{ExperienceLevel as L, SortKey, Term};

        #[test]
        fn every_sort_key_is_a_distinct_total_order() {
            let orders = L::ALL
                .iter()
                .map(|l| SortKey(*l).ranking())
                .collect::<HashSet<_>>();
            assert_eq!(orders.len(), L::ALL.len());

            for key in L::ALL.iter().copied().map(SortKey) {
                let ranks =
                    L::ALL.iter().map(|l| key.rank(*l)).collect::<HashSet<_>>();
                assert_eq!(ranks, HashSet::from([0, 1, 2]));
                assert_eq!(key.rank(key.0), 0);
            }
        }

        #[test]
        fn orders_levels_like_the_selector() {
            assert_eq!(
                SortKey(L::Intermediate).ranking(),
                [L::Intermediate, L::Expert, L::Beginner],
            );
            assert_eq!(
                SortKey(L::Beginner).ranking(),
                [L::Beginner, L::Intermediate, L::Expert],
            );
        }

        #[test]
        fn trims_and_matches_terms() {
            let term = Term::new("  math ");

            assert_eq!(term.as_ref(), "math");
            assert!(term.matches("Mathematics"));
            assert!(!term.matches("Physics"));
            assert!(Term::new("   ").is_empty());
            assert!(Term::default().matches("anything"));
        }
    }
}

//! Background environment for running [`Task`]s.

use std::{
    error::Error,
    future::{Future, IntoFuture},
};

use futures::{future::LocalBoxFuture, FutureExt as _};
use tokio::task::{JoinSet, LocalSet};
use tracing as log;

#[cfg(doc)]
use crate::Task;

/// Error of a [`Task`] running in the [`Background`].
pub type Failure = Box<dyn Error + 'static>;

/// Background environment for running [`Task`]s.
///
/// Resolves once every spawned [`Task`] completes, or on the first failed
/// one.
#[derive(Debug, Default)]
pub struct Background {
    /// Local set the [`Task`]s are driven by.
    set: LocalSet,

    /// Spawned [`Task`]s along with their names.
    tasks: JoinSet<(&'static str, Result<(), Failure>)>,
}

impl Background {
    /// Spawns a new named [`Task`] inside the [`Background`] environment.
    pub fn spawn<F, E>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        log::debug!("spawning `{name}` background task");
        let future = future.map(move |r| (name, r.map_err(Failure::from)));
        _ = self.tasks.spawn_local_on(future, &self.set);
    }

    /// Returns the number of [`Task`]s still running in this [`Background`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Indicates whether no [`Task`]s are running in this [`Background`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl IntoFuture for Background {
    type Output = Result<(), Failure>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, mut tasks } = self;
        async move {
            set.run_until(async move {
                while let Some(joined) = tasks.join_next().await {
                    match joined {
                        Ok((name, Ok(()))) => {
                            log::debug!("`{name}` background task completed");
                        }
                        Ok((name, Err(e))) => {
                            log::error!("`{name}` background task failed: {e}");
                            return Err(e);
                        }
                        Err(e) => return Err(Failure::from(e)),
                    }
                }
                Ok(())
            })
            .await
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod spec {
    use std::fmt;

    use super::Background;

    #[derive(Debug)]
    struct Broken;

    impl fmt::Display for Broken {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "broken")
        }
    }

    impl std::error::Error for Broken {}

    #[tokio::test]
    async fn completes_once_every_task_completes() {
        let mut bg = Background::default();
        bg.spawn("first", async { Ok::<_, Broken>(()) });
        bg.spawn("second", async { Ok::<_, Broken>(()) });
        assert_eq!(bg.len(), 2);

        assert!(bg.await.is_ok());
    }

    #[tokio::test]
    async fn fails_on_first_failed_task() {
        let mut bg = Background::default();
        bg.spawn("ok", async { Ok::<_, Broken>(()) });
        bg.spawn("broken", async { Err::<(), _>(Broken) });

        let err = bg.await.unwrap_err();

        assert_eq!(err.to_string(), "broken");
    }

    #[tokio::test]
    async fn completes_when_empty() {
        let bg = Background::default();
        assert!(bg.is_empty());

        assert!(bg.await.is_ok());
    }
}

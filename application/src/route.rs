//! [`Route`]s and their guarding.

use std::str::FromStr;

use derive_more::Display;
use service::{
    domain::partner,
    session::{Snapshot, State},
};

/// Route of the application.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum Route {
    /// Landing page with the banner and the top partners.
    #[display("/")]
    Home,

    /// Listing of every partner.
    #[display("/partners")]
    Partners,

    /// Details page of a single partner.
    #[display("/partners/{_0}")]
    Partner(partner::Id),

    /// Form creating a new partner profile.
    #[display("/create-partner")]
    CreateProfile,

    /// Accepted connections of the signed-in account.
    #[display("/connections")]
    Connections,

    /// Login form.
    #[display("/login")]
    Login,

    /// Registration form.
    #[display("/register")]
    Register,
}

impl Route {
    /// Indicates whether this [`Route`] requires a signed-in account.
    #[must_use]
    pub fn is_private(&self) -> bool {
        matches!(self, Self::Partner(_) | Self::CreateProfile | Self::Connections)
    }
}

impl FromStr for Route {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim().trim_end_matches('/');
        Ok(match path {
            "" => Self::Home,
            "/partners" => Self::Partners,
            "/create-partner" => Self::CreateProfile,
            "/connections" => Self::Connections,
            "/login" => Self::Login,
            "/register" => Self::Register,
            _ => path
                .strip_prefix("/partners/")
                .and_then(partner::Id::new)
                .map(Self::Partner)
                .ok_or("unknown route")?,
        })
    }
}

/// Decision of a [`guard()`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Decision {
    /// Authentication state is not known yet: render a spinner.
    Pending,

    /// [`Route`] may be rendered.
    Allow,

    /// Visitor should be sent to the `to` [`Route`], remembering the `from`
    /// one to return to afterwards.
    Redirect {
        /// [`Route`] to redirect to.
        to: Route,

        /// Guarded [`Route`].
        from: Route,
    },
}

/// Guards the provided [`Route`] against the current session [`Snapshot`].
///
/// Never redirects while the session is loading.
#[must_use]
pub fn guard(session: &Snapshot, route: &Route) -> Decision {
    if !route.is_private() {
        return Decision::Allow;
    }
    match session.state() {
        State::Uninitialized | State::Loading => Decision::Pending,
        State::Authenticated(_) => Decision::Allow,
        State::Anonymous => Decision::Redirect {
            to: Route::Login,
            from: route.clone(),
        },
    }
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;
    use service::{
        command::{self, Command as _},
        infra::api,
        session::Store,
    };

    use crate::fixture;

    use super::{guard, Decision, Route};

    #[test]
    fn parses_routes() {
        assert_eq!("/".parse(), Ok(Route::Home));
        assert_eq!("/connections/".parse(), Ok(Route::Connections));
        assert_eq!("/partners".parse(), Ok(Route::Partners));
        assert_eq!("/create-partner".parse(), Ok(Route::CreateProfile));
        assert_eq!(
            "/partners/665f1c".parse(),
            Ok(Route::Partner("665f1c".parse().unwrap())),
        );
        assert!("/partners/".parse::<Route>().is_err());
        assert!("/partner/665f1c".parse::<Route>().is_err());
        assert!("/unknown".parse::<Route>().is_err());

        let route = Route::Partner("abc".parse().unwrap());
        assert_eq!(route.to_string(), "/partners/abc");
        assert_eq!(route.to_string().parse(), Ok(route));
    }

    #[test]
    fn lets_public_routes_through() {
        let store = Store::new();

        assert_eq!(guard(&store.snapshot(), &Route::Partners), Decision::Allow);
        assert_eq!(guard(&store.snapshot(), &Route::Login), Decision::Allow);
    }

    #[test]
    fn waits_while_session_is_loading() {
        let store = Store::new();

        assert_eq!(
            guard(&store.snapshot(), &Route::Connections),
            Decision::Pending,
        );
    }

    #[tokio::test]
    async fn redirects_anonymous_visitor_to_login() {
        let (svc, bg) = fixture::spawn(api::Memory::default());

        let snapshot = fixture::settled(&svc, bg).await;

        assert_eq!(
            guard(&snapshot, &Route::CreateProfile),
            Decision::Redirect {
                to: Route::Login,
                from: Route::CreateProfile,
            },
        );
    }

    #[tokio::test]
    async fn lets_signed_in_account_through() {
        let (svc, bg) = fixture::spawn(api::Memory::default());
        _ = svc
            .execute(command::RegisterAccount {
                name: "Ada".parse().unwrap(),
                email: "ada@example.com".parse().unwrap(),
                password: SecretBox::new(Box::new("Secret1".parse().unwrap())),
                photo_url: None,
            })
            .await
            .unwrap();

        let snapshot = fixture::settled(&svc, bg).await;

        assert_eq!(guard(&snapshot, &Route::Connections), Decision::Allow);
    }
}

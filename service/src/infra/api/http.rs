//! HTTP [`PartnerApi`] implementation.

use std::time::Duration;

use common::operations::{By, Delete, Insert, Select, Update};
use derive_more::{Display, Error as StdError, From};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        partner::{self, Draft, Patch},
        Email, Partner,
    },
    read::{partner::list, Connection},
};

use super::{payload, Deletion, Insertion, PartnerApi};

pub use reqwest::Url;

/// [`PartnerApi`] reached over HTTP.
#[derive(Clone, Debug)]
pub struct Http {
    /// Client performing requests.
    client: Client,

    /// Base [`Url`] every endpoint is relative to.
    base: Url,
}

impl Http {
    /// Creates a new [`Http`] API rooted at the provided base [`Url`].
    ///
    /// # Errors
    ///
    /// - If the base [`Url`] cannot have path segments.
    /// - If the HTTP client cannot be initialized.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, Error> {
        if base.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(base));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    /// Builds a request to the endpoint with the provided path segments.
    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            _ = path.pop_if_empty().extend(segments);
        }
        log::debug!("{method} {url}");
        self.client.request(method, url)
    }

    /// Sends the provided request and decodes its JSON response.
    async fn fetch<T: DeserializeOwned>(
        request: RequestBuilder,
    ) -> Result<T, Error> {
        Ok(request.send().await?.error_for_status()?.json().await?)
    }
}

impl PartnerApi<Select<By<Vec<Partner>, list::Selector>>> for Http {
    type Ok = Vec<Partner>;
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Partner>, list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        use list::Selector as S;

        let request = match by.into_inner() {
            S::All => self.request(Method::GET, &["all-partners"]),
            S::Recent => self.request(Method::GET, &["partners", "recent"]),
            S::Top => self.request(Method::GET, &["topPartners"]),
            S::Search(term) => self
                .request(Method::GET, &["partners"])
                .query(&[("search", term.as_ref())]),
            S::Sorted(key) => self
                .request(Method::GET, &["partners", "sort"])
                .query(&[("expSort", key.to_string())]),
        };
        Self::fetch(request)
            .await
            .map(payload::partners)
            .map_err(tracerr::from_and_wrap!(=> super::Error))
    }
}

impl PartnerApi<Select<By<Option<Partner>, partner::Id>>> for Http {
    type Ok = Option<Partner>;
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Partner>, partner::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let response = self
            .request(Method::GET, &["partner", id.as_ref()])
            .send()
            .await
            .map_err(Error::from)
            .map_err(tracerr::from_and_wrap!(=> super::Error))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        async {
            Ok::<_, Error>(response.error_for_status()?.json().await?)
        }
        .await
        .map(payload::partner)
        .map_err(tracerr::from_and_wrap!(=> super::Error))
    }
}

impl PartnerApi<Select<By<Vec<Connection>, Email>>> for Http {
    type Ok = Vec<Connection>;
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Connection>, Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        let email: &str = email.as_ref();
        Self::fetch(self.request(Method::GET, &["partner", "connected", email]))
            .await
            .map(payload::connections)
            .map_err(tracerr::from_and_wrap!(=> super::Error))
    }
}

impl PartnerApi<Insert<Draft>> for Http {
    type Ok = Insertion;
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::fetch::<payload::Created>(
            self.request(Method::POST, &["create", "partner"])
                .json(&payload::NewPartner::from(&draft)),
        )
        .await
        .map(Insertion::from)
        .map_err(tracerr::from_and_wrap!(=> super::Error))
    }
}

impl PartnerApi<Update<(partner::Id, Patch)>> for Http {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Update((id, patch)): Update<(partner::Id, Patch)>,
    ) -> Result<Self::Ok, Self::Err> {
        async {
            _ = self
                .request(Method::PATCH, &["partner", "update", id.as_ref()])
                .json(&payload::PartnerPatch::from(&patch))
                .send()
                .await?
                .error_for_status()?;
            Ok::<_, Error>(())
        }
        .await
        .map_err(tracerr::from_and_wrap!(=> super::Error))
    }
}

impl PartnerApi<Delete<By<Partner, partner::Id>>> for Http {
    type Ok = Deletion;
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Partner, partner::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Self::fetch::<payload::Deleted>(
            self.request(Method::DELETE, &["partner", "delete", id.as_ref()]),
        )
        .await
        .map(Deletion::from)
        .map_err(tracerr::from_and_wrap!(=> super::Error))
    }
}

/// [`Http`] API error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Base [`Url`] cannot have path segments.
    #[display("`{_0}` cannot be used as a base URL")]
    #[from(ignore)]
    InvalidBaseUrl(#[error(not(source))] Url),

    /// HTTP request failed or its response cannot be decoded.
    #[display("HTTP request failed: {_0}")]
    Request(reqwest::Error),
}

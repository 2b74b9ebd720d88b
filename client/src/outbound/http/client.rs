//! Reqwest-backed implementation of the remote data service ports.
//!
//! This adapter owns transport details only: URL resolution, bearer and
//! request-id headers, timeout and status mapping, and envelope decoding.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use super::dto::{self, LoginDto, ProfileDto};
use super::endpoints::{self, ResourcePaths};
use crate::domain::ports::{
    AuthGateway, LoginGrant, RemoteError, ResourceGateway, ShopMetricsQuery, TokenStore,
};
use crate::domain::resources::Resource;
use crate::domain::{Actor, Amount, EntityId, LoginCredentials, Role, SessionToken};

const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Failures while constructing an [`HttpRemote`].
#[derive(Debug, thiserror::Error)]
pub enum HttpRemoteBuildError {
    /// The base URL did not parse or cannot carry paths.
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl {
        /// URL as configured.
        url: String,
        /// Parser detail.
        reason: String,
    },
    /// The reqwest client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

/// Adapter for every endpoint of the remote data service.
pub struct HttpRemote {
    client: Client,
    base: Url,
    tokens: Arc<dyn TokenStore>,
}

impl HttpRemote {
    /// Build an adapter rooted at `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is invalid or the reqwest client cannot
    /// be constructed.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, HttpRemoteBuildError> {
        let base = normalise_base_url(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            tokens,
        })
    }

    /// Base URL every path resolves beneath.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        authorised: bool,
    ) -> Result<RequestBuilder, RemoteError> {
        let url = self
            .base
            .join(path)
            .map_err(|error| RemoteError::transport(format!("invalid path {path:?}: {error}")))?;
        let request_id = Uuid::new_v4();
        debug!(%method, %url, %request_id, "remote request");

        let mut builder = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if authorised {
            if let Some(token) = self.tokens.load() {
                builder = builder.header(AUTHORIZATION, format!("Bearer {}", token.expose()));
            }
        }
        Ok(builder)
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Vec<u8>, RemoteError> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            debug!(status = status.as_u16(), body = %body_preview(&body), "remote call refused");
            return Err(map_status_error(status, &body));
        }
        Ok(body.to_vec())
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RemoteError> {
        let builder = self.request(Method::GET, path, true)?.query(query);
        dto::decode_data(&self.execute(builder).await?)
    }

    async fn send_data<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, RemoteError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method, path, true)?.json(body);
        dto::decode_data(&self.execute(builder).await?)
    }
}

#[async_trait]
impl AuthGateway for HttpRemote {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginGrant, RemoteError> {
        let body = LoginBody {
            email: credentials.email(),
            password: credentials.password(),
        };
        let builder = self.request(Method::POST, endpoints::LOGIN, false)?.json(&body);
        let login: LoginDto = dto::decode_body(&self.execute(builder).await?)?;
        if login.token.trim().is_empty() {
            return Err(RemoteError::decode("login response carried an empty token"));
        }
        Ok(LoginGrant {
            token: SessionToken::new(login.token),
            actor: login.user,
        })
    }

    async fn current_actor(&self) -> Result<Actor, RemoteError> {
        let builder = self.request(Method::GET, endpoints::CURRENT_USER, true)?;
        let profile: ProfileDto = dto::decode_body(&self.execute(builder).await?)?;
        Ok(profile.user)
    }

    async fn list_actors(&self, role: Option<Role>) -> Result<Vec<Actor>, RemoteError> {
        let query: Vec<(&str, String)> = role
            .map(|wanted| ("role", wanted.as_str().to_owned()))
            .into_iter()
            .collect();
        self.get_data(endpoints::USERS, &query).await
    }
}

#[async_trait]
impl ShopMetricsQuery for HttpRemote {
    async fn expense_total(
        &self,
        shop_id: EntityId,
        sale_date: NaiveDate,
    ) -> Result<Amount, RemoteError> {
        let builder = self
            .request(Method::GET, &endpoints::shop_expenses(shop_id), true)?
            .query(&endpoints::sale_date_query(sale_date));
        dto::decode_total(&self.execute(builder).await?)
    }

    async fn latest_sale(&self, shop_id: EntityId) -> Result<Amount, RemoteError> {
        let builder = self.request(Method::GET, &endpoints::shop_latest_sale(shop_id), true)?;
        dto::decode_total(&self.execute(builder).await?)
    }
}

#[async_trait]
impl<R: Resource> ResourceGateway<R> for HttpRemote {
    async fn list(&self) -> Result<Vec<R>, RemoteError> {
        self.get_data(ResourcePaths::for_kind(R::KIND).list(), &[])
            .await
    }

    async fn get(&self, id: EntityId) -> Result<R, RemoteError> {
        self.get_data(&ResourcePaths::for_kind(R::KIND).entity(id), &[])
            .await
    }

    async fn create(&self, draft: &R::Draft) -> Result<R, RemoteError> {
        self.send_data(Method::POST, ResourcePaths::for_kind(R::KIND).create(), draft)
            .await
    }

    async fn edit(&self, id: EntityId, patch: &R::Patch) -> Result<R, RemoteError> {
        self.send_data(
            Method::PATCH,
            &ResourcePaths::for_kind(R::KIND).entity(id),
            patch,
        )
        .await
    }
}

fn normalise_base_url(raw: &str) -> Result<Url, HttpRemoteBuildError> {
    let invalid = |reason: String| HttpRemoteBuildError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason,
    };
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_owned()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).map_err(|error| invalid(error.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry paths".to_owned()));
    }
    Ok(url)
}

fn map_transport_error(error: reqwest::Error) -> RemoteError {
    if error.is_timeout() {
        RemoteError::timeout(error.to_string())
    } else if error.is_decode() {
        RemoteError::decode(error.to_string())
    } else {
        RemoteError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> RemoteError {
    let message = dto::status_message(status.as_u16(), body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::unauthorized(message),
        _ => RemoteError::rejected(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

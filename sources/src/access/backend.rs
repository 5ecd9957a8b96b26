//! Case-data backend specifics
//!
//! Phases:
//! 1. if the site uses `Auth::Token`, POST login & password to the token route and get an
//!    access token back,
//! 2. GET the `cases` route with the token as bearer.
//!
//! The answer is kept as a raw JSON string, parsing it into case records is the engine's job.
//!

use std::time::Duration;

use eyre::Result;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{http_get_auth, http_post, AccessError, Auth, FeedError, Site, SiteKind};

/// Credentials to submit to the site to get the token
///
#[derive(Debug, Serialize)]
struct Credentials {
    /// Email as username
    email: String,
    /// Password
    password: String,
}

/// The different shapes a token answer can take.
///
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TokenReply {
    /// `{ "tokens": { "access": "…", "refresh": "…" } }`
    Nested { tokens: AccessToken },
    /// `{ "access": "…" }`
    Access(AccessToken),
    /// `{ "token": "…" }`
    Plain { token: String },
}

#[derive(Debug, Deserialize)]
struct AccessToken {
    access: String,
}

impl TokenReply {
    fn into_token(self) -> String {
        match self {
            TokenReply::Nested { tokens } => tokens.access,
            TokenReply::Access(t) => t.access,
            TokenReply::Plain { token } => token,
        }
    }
}

/// Backend represent what is needed to connect & auth to and fetch case records from the
/// dashboard REST API.
///
#[derive(Clone, Debug)]
pub struct Backend {
    /// Name of the site
    pub site: String,
    /// Base site url taken from config
    pub base_url: String,
    /// Credentials
    pub auth: Auth,
    /// Add this to `base_url` to fetch the case records
    pub cases: String,
    /// reqwest async client
    pub client: Client,
}

impl Backend {
    #[tracing::instrument]
    pub fn new() -> Self {
        trace!("backend::new");

        Backend {
            site: "NONE".to_string(),
            base_url: "".to_owned(),
            auth: Auth::Anon,
            cases: "".to_owned(),
            client: Client::new(),
        }
    }

    /// Load some data from the configuration file
    ///
    #[tracing::instrument]
    pub fn load(&mut self, site: &Site) -> Result<&mut Self> {
        trace!("backend::load");

        if site.kind != SiteKind::Backend {
            return Err(AccessError::InvalidSite(site.name.clone(), site.kind, "backend").into());
        }
        self.site = site.name.clone();
        self.base_url = site.base_url.to_owned();
        self.auth = site.auth.clone().unwrap_or_default();
        self.cases = site
            .route("cases")
            .ok_or(AccessError::MissingRoute(site.name.clone(), "cases".to_string()))?
            .to_owned();
        Ok(self)
    }

    /// Set the per-request timeout, this rebuilds the client.
    ///
    pub fn timeout(&mut self, timeout: Duration) -> Result<&mut Self> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// Get a bearer token if the site needs one.
    ///
    #[tracing::instrument(skip(self))]
    pub async fn authenticate(&self) -> Result<Option<String>, FeedError> {
        match &self.auth {
            Auth::Anon => Ok(None),
            Auth::Key { api_key } => Ok(Some(api_key.to_owned())),
            Auth::Token {
                login,
                password,
                token,
            } => {
                trace!("authenticate as ({:?})", login);

                let cred = Credentials {
                    email: login.to_owned(),
                    password: password.to_owned(),
                };

                let url = format!("{}{}", self.base_url, token);
                trace!("Fetching token through {}…", url);
                let resp = http_post!(self, url, &cred).await?;

                if resp.status() != StatusCode::OK {
                    return Err(FeedError::Retrieval(login.to_owned()));
                }
                let resp = resp
                    .text()
                    .await
                    .map_err(|_| FeedError::Retrieval(login.to_owned()))?;

                let reply: TokenReply = serde_json::from_str(&resp)
                    .map_err(|_| FeedError::Decoding(login.to_owned()))?;
                Ok(Some(reply.into_token()))
            }
        }
    }

    /// Fetch the raw JSON batch of case records.
    ///
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self) -> Result<String, FeedError> {
        let token = self.authenticate().await?;

        let url = format!("{}{}", self.base_url, self.cases);
        trace!("Fetching cases through {}…", url);

        let resp = http_get_auth!(self, url, token).await?;
        debug!("raw resp={:?}", &resp);

        match resp.status() {
            StatusCode::OK => {}
            code => return Err(FeedError::Status(code.as_u16(), url)),
        }
        Ok(resp.text().await?)
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::new()
    }
}

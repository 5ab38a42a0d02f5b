//! Minimal Apache Solr REST API client
//!
//! A small typed client for the parts of the Solr HTTP API an indexing
//! pipeline needs: the per-core update endpoint (add, delete-by-query,
//! commit), the CoreAdmin endpoint (create, status) and the per-core
//! ping handler. No query serving, no schema management.
//!
//! # Example
//!
//! ```rust,ignore
//! use solr_client::{SolrClient, SolrConfig};
//!
//! let config = SolrConfig::new()
//!     .with_host("search.internal")
//!     .with_credentials("indexer", "secret");
//! let client = SolrClient::new(&config)?;
//!
//! client.delete_by_query("docCore0", "uid:42").await?;
//! client.commit("docCore0").await?;
//! ```

pub mod error;
pub mod types;

pub use error::{Result, SolrError};
pub use types::{
    CommitCommand, CoreAdminResponse, CoreStatusResponse, DeleteByQueryCommand, PingResponse,
    ResponseHeader, UpdateResponse,
};

use std::env;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

/// Connection parameters for a Solr endpoint.
///
/// Covers everything needed to reach one Solr server: scheme, host,
/// port, context path and optional basic-auth credentials. Core names
/// are per-request, not part of the config.
#[derive(Debug, Clone)]
pub struct SolrConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Context path under which Solr is served, usually `solr`.
    pub path: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SolrConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port: 8983,
            path: "solr".to_string(),
            username: None,
            password: None,
            timeout_secs: 10,
        }
    }
}

impl SolrConfig {
    /// Create a config with default values (`http://localhost:8983/solr`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from `SOLR_*` environment variables.
    ///
    /// Unset variables fall back to the defaults; `SOLR_USERNAME` and
    /// `SOLR_PASSWORD` stay unset unless both are present.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let port = match env::var("SOLR_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| SolrError::Config(format!("SOLR_PORT is not a valid port: {raw}")))?,
            Err(_) => defaults.port,
        };

        let username = env::var("SOLR_USERNAME").ok();
        let password = env::var("SOLR_PASSWORD").ok();
        let (username, password) = match (username, password) {
            (Some(user), Some(pass)) => (Some(user), Some(pass)),
            _ => (None, None),
        };

        Ok(Self {
            scheme: env::var("SOLR_SCHEME").unwrap_or(defaults.scheme),
            host: env::var("SOLR_HOST").unwrap_or(defaults.host),
            port,
            path: env::var("SOLR_PATH").unwrap_or(defaults.path),
            username,
            password,
            timeout_secs: defaults.timeout_secs,
        })
    }

    /// Set the scheme (`http` or `https`).
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Set the host name.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the context path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set basic-auth credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the request timeout in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// The base URL for this endpoint, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!(
            "{}://{}:{}/{}",
            self.scheme,
            self.host,
            self.port,
            self.path.trim_matches('/')
        )
    }
}

/// Typed Solr HTTP client.
///
/// Credentials go into an `Authorization` header rather than the URL,
/// so they never show up in logs or error messages.
#[derive(Debug, Clone)]
pub struct SolrClient {
    http_client: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl SolrClient {
    /// Create a new client for the given endpoint.
    pub fn new(config: &SolrConfig) -> Result<Self> {
        let base_url = config.base_url();
        Url::parse(&base_url)
            .map_err(|e| SolrError::Config(format!("invalid Solr base URL {base_url}: {e}")))?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SolrError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Create a client from `SOLR_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(&SolrConfig::from_env()?)
    }

    /// The base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Add one or more documents to a core (add-or-replace by unique key).
    ///
    /// Solr upserts on the unique key field, so re-adding a document with
    /// the same key overwrites the previous version instead of duplicating
    /// it. Changes become visible after [`commit`](Self::commit).
    pub async fn add_documents(&self, core: &str, docs: &[Map<String, Value>]) -> Result<()> {
        let update: UpdateResponse = self
            .post_json(&self.update_url(core), &docs)
            .await?;
        debug!(
            core,
            count = docs.len(),
            q_time = update.response_header.q_time,
            "added documents to Solr core"
        );
        Ok(())
    }

    /// Delete all documents matching a query from a core.
    ///
    /// Deleting documents that do not exist is a success, which makes the
    /// operation safe to repeat.
    pub async fn delete_by_query(&self, core: &str, query: &str) -> Result<()> {
        let command = DeleteByQueryCommand::new(query);
        let update: UpdateResponse = self.post_json(&self.update_url(core), &command).await?;
        debug!(
            core,
            query,
            q_time = update.response_header.q_time,
            "deleted documents from Solr core"
        );
        Ok(())
    }

    /// Commit pending changes on a core, making them visible to searches.
    pub async fn commit(&self, core: &str) -> Result<()> {
        let command = CommitCommand::default();
        let update: UpdateResponse = self.post_json(&self.update_url(core), &command).await?;
        debug!(
            core,
            q_time = update.response_header.q_time,
            "committed Solr core"
        );
        Ok(())
    }

    /// Create a new core via the CoreAdmin API.
    ///
    /// The instance directory is named after the core and the data
    /// directory is the conventional `data`, matching a configset-based
    /// Solr deployment.
    pub async fn create_core(&self, name: &str, config_set: &str) -> Result<()> {
        let url = format!("{}/admin/cores", self.base_url);
        let response = self
            .request(self.http_client.get(&url))
            .query(&[
                ("action", "CREATE"),
                ("name", name),
                ("instanceDir", name),
                ("dataDir", "data"),
                ("configSet", config_set),
                ("wt", "json"),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, core = name, "Solr core creation request failed");
                SolrError::Network(e.to_string())
            })?;

        let admin: CoreAdminResponse = Self::read_json(response).await?;
        if admin.response_header.status != 0 {
            return Err(SolrError::Api {
                status: admin.response_header.status,
                body: format!("CoreAdmin CREATE failed for {name}"),
            });
        }
        debug!(core = name, config_set, "created Solr core");
        Ok(())
    }

    /// Check whether a core exists via the CoreAdmin STATUS action.
    pub async fn core_exists(&self, name: &str) -> Result<bool> {
        let url = format!("{}/admin/cores", self.base_url);
        let response = self
            .request(self.http_client.get(&url))
            .query(&[("action", "STATUS"), ("core", name), ("wt", "json")])
            .send()
            .await
            .map_err(|e| SolrError::Network(e.to_string()))?;

        let status: CoreStatusResponse = Self::read_json(response).await?;
        Ok(status.core_exists(name))
    }

    /// Ping a core's health check handler.
    pub async fn ping(&self, core: &str) -> Result<()> {
        let url = format!("{}/{}/admin/ping", self.base_url, core);
        let response = self
            .request(self.http_client.get(&url))
            .query(&[("wt", "json")])
            .send()
            .await
            .map_err(|e| SolrError::Network(e.to_string()))?;

        let ping: PingResponse = Self::read_json(response).await?;
        match ping.status.as_deref() {
            Some("OK") => Ok(()),
            other => Err(SolrError::Api {
                status: ping.response_header.status,
                body: format!("ping returned {}", other.unwrap_or("no status")),
            }),
        }
    }

    fn update_url(&self, core: &str) -> String {
        format!("{}/{}/update", self.base_url, core)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => builder.basic_auth(user, Some(pass)),
            _ => builder,
        }
    }

    /// POST a JSON body to an update-style endpoint and check both the
    /// HTTP status and the `responseHeader.status` inside the body.
    async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned + AsResponseHeader,
    {
        let response = self
            .request(self.http_client.post(url))
            .query(&[("wt", "json")])
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, url, "Solr request failed");
                SolrError::Network(e.to_string())
            })?;

        let parsed: T = Self::read_json(response).await?;
        let header = parsed.response_header();
        if header.status != 0 {
            warn!(url, status = header.status, "Solr reported a non-zero status");
            return Err(SolrError::Api {
                status: header.status,
                body: "non-zero response status".to_string(),
            });
        }
        Ok(parsed)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %body, "Solr rejected the request");
            return Err(SolrError::Api {
                status: i32::from(status.as_u16()),
                body,
            });
        }
        response
            .json()
            .await
            .map_err(|e| SolrError::Parse(e.to_string()))
    }
}

/// Responses that carry a Solr `responseHeader`.
trait AsResponseHeader {
    fn response_header(&self) -> &ResponseHeader;
}

impl AsResponseHeader for UpdateResponse {
    fn response_header(&self) -> &ResponseHeader {
        &self.response_header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builds_base_url() {
        let config = SolrConfig::new()
            .with_scheme("https")
            .with_host("search.example.org")
            .with_port(8443)
            .with_path("/solr/");

        assert_eq!(config.base_url(), "https://search.example.org:8443/solr");
    }

    #[test]
    fn default_config_points_at_local_solr() {
        assert_eq!(SolrConfig::default().base_url(), "http://localhost:8983/solr");
    }

    #[test]
    fn client_rejects_invalid_base_url() {
        let config = SolrConfig::new().with_scheme("not a scheme");
        assert!(matches!(
            SolrClient::new(&config),
            Err(SolrError::Config(_))
        ));
    }

    #[test]
    fn client_builds_update_url_per_core() {
        let client = SolrClient::new(&SolrConfig::default()).unwrap();
        assert_eq!(
            client.update_url("docCore3"),
            "http://localhost:8983/solr/docCore3/update"
        );
    }
}

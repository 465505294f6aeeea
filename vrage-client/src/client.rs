//! HTTP client for the VRage Remote API.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use std::path::Path;
use std::sync::Arc;

use crate::auth;
use crate::credential::Credential;
use crate::decode;
use crate::error::{Result, VrageError};
use crate::types::{Cheater, Grid, Player, ServerInfo, SpatialEntity};

/// Every endpoint lives under this prefix, and the prefix is part of the signed path.
pub const BASE_PATH: &str = "/vrageremote";

/// Expected echo from the ping endpoint
pub const PONG: &str = "Pong";

pub mod endpoints {
    pub const PING: &str = "/v1/server/ping";
    pub const SERVER: &str = "/v1/server";
    pub const PLANETS: &str = "/v1/session/planets";
    pub const ASTEROIDS: &str = "/v1/session/asteroids";
    pub const GRIDS: &str = "/v1/session/grids";
    pub const BANNED_PLAYERS: &str = "/v1/admin/bannedPlayers";
    pub const KICKED_PLAYERS: &str = "/v1/admin/kickedPlayers";
    pub const CHEATERS: &str = "/v1/admin/cheaters";
}

/// Read-only view of the remote API.
///
/// `fetch` is the only transport hook; the typed calls decode its output.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// GET `path` (relative to [`BASE_PATH`]) and return the raw body.
    async fn fetch(&self, path: &str) -> Result<Vec<u8>>;

    /// Succeeds only when the server answers the ping with [`PONG`].
    async fn ping(&self) -> Result<()> {
        let body = self.fetch(endpoints::PING).await?;
        let data = decode::decode_ping(&body)?;
        if data.result == PONG {
            Ok(())
        } else {
            Err(VrageError::Liveness(data.result))
        }
    }

    async fn server_info(&self) -> Result<ServerInfo> {
        let body = self.fetch(endpoints::SERVER).await?;
        decode::decode_server_info(&body)
    }

    async fn planets(&self) -> Result<Vec<SpatialEntity>> {
        let body = self.fetch(endpoints::PLANETS).await?;
        decode::decode_planets(&body)
    }

    async fn asteroids(&self) -> Result<Vec<SpatialEntity>> {
        let body = self.fetch(endpoints::ASTEROIDS).await?;
        decode::decode_asteroids(&body)
    }

    async fn grids(&self) -> Result<Vec<Grid>> {
        let body = self.fetch(endpoints::GRIDS).await?;
        decode::decode_grids(&body)
    }

    async fn banned_players(&self) -> Result<Vec<Player>> {
        let body = self.fetch(endpoints::BANNED_PLAYERS).await?;
        decode::decode_banned_players(&body)
    }

    async fn kicked_players(&self) -> Result<Vec<Player>> {
        let body = self.fetch(endpoints::KICKED_PLAYERS).await?;
        decode::decode_kicked_players(&body)
    }

    async fn cheaters(&self) -> Result<Vec<Cheater>> {
        let body = self.fetch(endpoints::CHEATERS).await?;
        decode::decode_cheaters(&body)
    }
}

/// Signed client. Cheap to clone; clones share the key and connection pool.
#[derive(Debug, Clone)]
pub struct VRageClient {
    api: String,
    credential: Arc<Credential>,
    http: Client,
}

impl VRageClient {
    /// Build a client, loading the secret key from `key_file` or `key`.
    ///
    /// The key file wins when both are given. Certificate verification is
    /// skipped entirely when `ssl_verify` is false.
    pub fn new(
        api: &str,
        key_file: Option<&Path>,
        key: Option<&str>,
        ssl_verify: bool,
    ) -> Result<Self> {
        let credential = Credential::resolve(key, key_file)?;
        Self::with_credential(api, credential, ssl_verify)
    }

    pub fn with_credential(
        api: &str,
        credential: Credential,
        ssl_verify: bool,
    ) -> Result<Self> {
        let api = api.trim_end_matches('/').to_string();
        let http = Client::builder()
            .danger_accept_invalid_certs(!ssl_verify)
            .build()
            .map_err(|source| VrageError::Transport {
                url: api.clone(),
                source,
            })?;

        if !ssl_verify {
            tracing::warn!("TLS certificate verification disabled for {}", api);
        }

        Ok(Self {
            api,
            credential: Arc::new(credential),
            http,
        })
    }

    pub fn api(&self) -> &str {
        &self.api
    }

    /// Issue one signed request and return the body of a 200 response.
    pub async fn execute(&self, path: &str, method: Method) -> Result<Vec<u8>> {
        let full_path = format!("{}{}", BASE_PATH, path);
        let url = format!("{}{}", self.api, full_path);
        let headers = auth::build_headers(&self.credential, &full_path)?;

        tracing::debug!(url = %url, method = %method, "Request");

        let response = self
            .http
            .request(method.clone(), &url)
            .headers(headers)
            .send()
            .await
            .map_err(|source| VrageError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        tracing::debug!(url = %url, method = %method, status = status.as_u16(), "Response");

        if status != StatusCode::OK {
            return Err(VrageError::UnexpectedStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| VrageError::BodyRead { url, source })?;

        Ok(body.to_vec())
    }
}

#[async_trait]
impl RemoteApi for VRageClient {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        self.execute(path, Method::GET).await
    }
}

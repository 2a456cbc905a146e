//! HTTP access to the simulation service.

use crate::{Error, Result};
use hitstand_types::api::{
    decode_envelope, AgentDescriptor, AgentsResponse, MatchRequest, MatchResponse,
    PlayHandRequest, PlayHandResponse, AGENTS_PATH, MATCH_PATH, PLAY_HAND_PATH,
};
use hitstand_types::MatchResults;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace, warn};
use url::Url;

/// Client for the three service endpoints.
///
/// No request timeout is configured: a request that never completes keeps its caller waiting.
#[derive(Clone, Debug)]
pub struct Client {
    pub base_url: Url,
    pub http_client: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        match base_url.scheme() {
            "http" | "https" => {}
            scheme => return Err(Error::InvalidScheme(scheme.to_string())),
        }
        // Relative joins drop the last path segment unless it ends in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            http_client: reqwest::Client::new(),
        })
    }

    /// `GET /api/agents`
    pub async fn agents(&self) -> Result<Vec<AgentDescriptor>> {
        let url = self.base_url.join(AGENTS_PATH)?;
        debug!(%url, "fetching agents");
        let response = self.http_client.get(url).send().await?;
        let catalog: AgentsResponse = read_body(response).await?;
        Ok(catalog.agents)
    }

    /// `POST /api/play-hand`
    pub async fn play_hand(&self, request: &PlayHandRequest) -> Result<PlayHandResponse> {
        let url = self.base_url.join(PLAY_HAND_PATH)?;
        debug!(agent_id = %request.agent_id, seed = ?request.seed, "requesting hand");
        let response = self.http_client.post(url).json(request).send().await?;
        read_body(response).await
    }

    /// `POST /api/match`
    pub async fn run_match(&self, request: &MatchRequest) -> Result<MatchResults> {
        let url = self.base_url.join(MATCH_PATH)?;
        debug!(num_hands = request.num_hands, seed = ?request.seed, "requesting match");
        let response = self.http_client.post(url).json(request).send().await?;
        let body: MatchResponse = read_body(response).await?;
        Ok(body.results)
    }
}

/// Decode a response, preferring the service's own error envelope over the HTTP status.
async fn read_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let bytes = response.bytes().await?;
    trace!(%status, len = bytes.len(), "received response");
    let value = match serde_json::from_slice::<Value>(&bytes) {
        Ok(value) => value,
        Err(err) if status.is_success() => return Err(Error::InvalidResponse(err)),
        Err(_) => {
            return Err(Error::FailedWithBody {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            })
        }
    };
    let refused = value.get("success").and_then(Value::as_bool) == Some(false);
    if !status.is_success() && !refused {
        return Err(Error::FailedWithBody {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }
    decode_envelope(value).map_err(|err| {
        let err = Error::from(err);
        if err.is_service() {
            warn!(%status, error = %err, "service rejected request");
        }
        err
    })
}

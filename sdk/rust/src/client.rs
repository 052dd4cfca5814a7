use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentValue {
    pub current_value: String,
    pub transactor_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedTransaction {
    pub message: String,
    pub tx_hash: String,
    pub new_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResult {
    pub message: String,
    pub network_value: String,
    pub database_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    #[serde(rename = "match")]
    pub matches: bool,
    pub network_value: String,
    pub database_value: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
struct SetValueBody {
    value: u128,
}

/// Failure talking to the API.
#[derive(Debug)]
pub enum ClientError {
    /// Transport or decoding failure.
    Http(reqwest::Error),
    /// The API answered with a non-success status.
    Api { status: StatusCode, body: String },
}

impl ClientError {
    /// HTTP status of an API error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Http(e) => write!(f, "HTTP error: {}", e),
            ClientError::Api { status, body } => write!(f, "API returned {}: {}", status, body),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e)
    }
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Read the network value and the transactor address.
    pub async fn get_value(&self) -> Result<CurrentValue, ClientError> {
        let resp = self.client.get(format!("{}/value", self.base_url)).send().await?;
        decode(resp).await
    }

    /// Submit a new value. Returns once the transaction is accepted by the node.
    pub async fn set_value(&self, value: u128) -> Result<SubmittedTransaction, ClientError> {
        let resp = self
            .client
            .post(format!("{}/value", self.base_url))
            .json(&SetValueBody { value })
            .send()
            .await?;
        decode(resp).await
    }

    /// Correct the database copy toward the network value.
    pub async fn sync(&self) -> Result<SyncResult, ClientError> {
        let resp = self.client.post(format!("{}/sync", self.base_url)).send().await?;
        decode(resp).await
    }

    /// Compare the network value and the database copy.
    pub async fn check(&self) -> Result<CheckResult, ClientError> {
        let resp = self.client.get(format!("{}/check", self.base_url)).send().await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    Ok(resp.json::<T>().await?)
}

use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::par::Par;

/// Fields requested from the listing endpoint
const LIST_FIELDS: &str = "name,size,etag,md5,timeCreated,timeModified";

/// One entry of a bucket listing. Only `name` is guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_modified: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub objects: Vec<ObjectSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_start_with: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ParClientError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
}

impl ParClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ParClientError::Reqwest(e) => e.status(),
            ParClientError::HttpStatus(status, _) => Some(*status),
        }
    }

    /// Status text for bad statuses, the transport message otherwise
    pub fn detail(&self) -> String {
        match self {
            ParClientError::Reqwest(e) => e.to_string(),
            ParClientError::HttpStatus(status, _) => status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string(),
        }
    }
}

/// Thin HTTP client over the three PAR endpoints:
///  listing (`GET <par>`), fetch (`GET <par><key>`) and write (`PUT <par><key>`)
#[derive(Debug, Clone)]
pub struct ParClient {
    client: Client,
}

impl ParClient {
    pub fn new() -> Result<Self, ParClientError> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client, e.g. one configured with a proxy
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Issue a single listing request against the PAR
    pub async fn list(&self, par: &Par) -> Result<ListResponse, ParClientError> {
        let mut url = par.url().clone();
        url.query_pairs_mut().append_pair("fields", LIST_FIELDS);

        tracing::debug!("listing {}", redact(par.url()));
        let response = self.client.get(url).send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<ListResponse>().await?)
    }

    pub async fn get(&self, url: Url) -> Result<Bytes, ParClientError> {
        tracing::debug!("fetching {}", redact(&url));
        let response = self.client.get(url).send().await?;
        let response = check_status(response).await?;
        Ok(response.bytes().await?)
    }

    /// Overwrite the object at `url`. Last writer wins.
    pub async fn put(
        &self,
        url: Url,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), ParClientError> {
        tracing::debug!("uploading {} bytes to {}", body.len(), redact(&url));
        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ParClientError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ParClientError::HttpStatus(
            response.status(),
            response.text().await?,
        ))
    }
}

// The PAR token sits in the path and is the whole credential,
//  so keep it out of the logs
fn redact(url: &Url) -> String {
    let mut redacted = url.clone();
    redacted.set_query(None);
    let path = url.path();
    if let Some(rest) = path.strip_prefix("/p/") {
        let tail = rest.split_once('/').map(|(_, tail)| tail).unwrap_or("");
        redacted.set_path(&format!("/p/***/{}", tail));
    }
    redacted.to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_list_response_ignores_unknown_fields() {
        let body = r#"{
            "objects": [
                {"name": "a.txt", "size": 12, "storageTier": "Standard"},
                {"name": "dir/b.txt"}
            ],
            "nextStartWith": "dir/c.txt"
        }"#;
        let response: ListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.objects.len(), 2);
        assert_eq!(response.objects[0].size, Some(12));
        assert_eq!(response.objects[1].size, None);
        assert_eq!(response.next_start_with.as_deref(), Some("dir/c.txt"));
    }

    #[test]
    fn test_list_response_requires_objects() {
        assert!(serde_json::from_str::<ListResponse>(r#"{"items": []}"#).is_err());
    }

    #[test]
    fn test_redact_par_token() {
        let url = Url::parse("https://host/p/SECRET/n/ns/b/bucket/o/file?fields=name").unwrap();
        assert_eq!(redact(&url), "https://host/p/***/n/ns/b/bucket/o/file");

        let url = Url::parse("http://localhost:9000/o/file").unwrap();
        assert_eq!(redact(&url), "http://localhost:9000/o/file");
    }

    #[test]
    fn test_error_detail_uses_status_text() {
        let error = ParClientError::HttpStatus(StatusCode::NOT_FOUND, "{}".to_string());
        assert_eq!(error.detail(), "Not Found");
        assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
    }
}

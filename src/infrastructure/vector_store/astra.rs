use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::domain::{ports::VectorStore, DomainError, Embedding, RetrievedDocument};

const API_PATH: &str = "api/json/v1";
const TOKEN_HEADER: &str = "Token";
const CONTENT_FIELD: &str = "content";
const METADATA_FIELD: &str = "metadata";

#[derive(Debug, Error)]
enum AstraError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request rejected with status {0}, check the application token")]
    Unauthorized(u16),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API error: {0}")]
    Api(String),
}

/// Only a rejected token is a configuration problem while attaching.
fn attach_error(e: AstraError) -> DomainError {
    match e {
        rejected @ AstraError::Unauthorized(_) => {
            DomainError::config(format!("cannot attach Astra DB collection: {rejected}"))
        }
        AstraError::Http(e) => DomainError::external(format!("cannot reach Astra DB: {e}")),
        other => DomainError::external(format!("cannot attach Astra DB collection: {other}")),
    }
}

/// Collection in an Astra DB keyspace, queried through the Data API.
pub struct AstraVectorStore {
    http: reqwest::Client,
    keyspace_url: String,
    collection_url: String,
    token: String,
    collection: String,
}

impl AstraVectorStore {
    /// Attaches to `collection`, creating it with a cosine vector index
    /// of `dimension` when the keyspace does not have it yet.
    #[instrument(skip(token))]
    pub async fn connect(
        api_endpoint: &str,
        token: &str,
        namespace: &str,
        collection: &str,
        dimension: usize,
    ) -> Result<Self, DomainError> {
        let keyspace_url = format!(
            "{}/{}/{}",
            api_endpoint.trim_end_matches('/'),
            API_PATH,
            namespace
        );
        let store = Self {
            http: reqwest::Client::new(),
            collection_url: format!("{keyspace_url}/{collection}"),
            keyspace_url,
            token: token.to_string(),
            collection: collection.to_string(),
        };

        store
            .ensure_collection(dimension)
            .await
            .map_err(attach_error)?;

        Ok(store)
    }

    async fn ensure_collection(&self, dimension: usize) -> Result<(), AstraError> {
        let response = self
            .command(&self.keyspace_url, json!({ "findCollections": {} }))
            .await?;

        let exists = response
            .status
            .map(|s| s.collections.iter().any(|c| c == &self.collection))
            .unwrap_or(false);

        if !exists {
            info!(collection = %self.collection, dimension, "creating collection");
            self.command(
                &self.keyspace_url,
                json!({
                    "createCollection": {
                        "name": self.collection,
                        "options": {
                            "vector": { "dimension": dimension, "metric": "cosine" }
                        }
                    }
                }),
            )
            .await?;
        }

        Ok(())
    }

    async fn command(&self, url: &str, body: Value) -> Result<DataApiResponse, AstraError> {
        let response = self
            .http
            .post(url)
            .header(TOKEN_HEADER, &self.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AstraError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AstraError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: DataApiResponse = response.json().await?;
        if let Some(error) = parsed.errors.first() {
            return Err(AstraError::Api(error.to_string()));
        }
        Ok(parsed)
    }
}

fn find_body(query: &Embedding, top_k: usize) -> Value {
    json!({
        "find": {
            "sort": { "$vector": query.as_slice() },
            "projection": { CONTENT_FIELD: 1, METADATA_FIELD: 1 },
            "options": { "limit": top_k, "includeSimilarity": true }
        }
    })
}

/// Documents without a text body are skipped; order is kept as returned.
fn into_documents(response: DataApiResponse) -> Vec<RetrievedDocument> {
    response
        .data
        .map(|d| d.documents)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|doc| {
            let mut retrieved = RetrievedDocument::new(doc.content?);
            retrieved.metadata = doc.metadata.filter(|m| !m.is_null());
            retrieved.score = doc.similarity;
            Some(retrieved)
        })
        .collect()
}

#[async_trait]
impl VectorStore for AstraVectorStore {
    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<RetrievedDocument>, DomainError> {
        let response = self
            .command(&self.collection_url, find_body(query, top_k))
            .await
            .map_err(|e| DomainError::retrieval(format!("Astra DB search failed: {e}")))?;

        let documents = into_documents(response);
        debug!(count = documents.len(), "astra search returned");
        Ok(documents)
    }

    fn collection(&self) -> &str {
        &self.collection
    }
}

#[derive(Debug, Deserialize)]
struct DataApiResponse {
    #[serde(default)]
    status: Option<CommandStatus>,
    #[serde(default)]
    data: Option<FindData>,
    #[serde(default)]
    errors: Vec<DataApiError>,
}

#[derive(Debug, Default, Deserialize)]
struct CommandStatus {
    #[serde(default)]
    collections: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FindData {
    #[serde(default)]
    documents: Vec<StoredDocument>,
}

#[derive(Debug, Deserialize)]
struct StoredDocument {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    metadata: Option<Value>,
    #[serde(rename = "$similarity", default)]
    similarity: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct DataApiError {
    message: String,
    #[serde(rename = "errorCode", default)]
    error_code: Option<String>,
}

impl std::fmt::Display for DataApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error_code {
            Some(code) => write!(f, "{code}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode as HttpStatus, response::IntoResponse, Json, Router};
    use std::sync::Arc;

    /// Serves the Data API locally. Keyspace commands (`findCollections`,
    /// `createCollection`) get `keyspace`, collection commands get `collection`.
    async fn serve_data_api(keyspace: (u16, Value), collection: (u16, Value)) -> String {
        let replies = Arc::new((keyspace, collection));
        let app = Router::new().fallback(move |Json(body): Json<Value>| {
            let replies = replies.clone();
            async move {
                let (status, reply) = if body.get("find").is_some() {
                    &replies.1
                } else {
                    &replies.0
                };
                let status = HttpStatus::from_u16(*status).unwrap();
                (status, Json(reply.clone())).into_response()
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn existing_collection() -> (u16, Value) {
        (200, json!({ "status": { "collections": ["jobs"] } }))
    }

    async fn connect_to(endpoint: &str) -> Result<AstraVectorStore, DomainError> {
        AstraVectorStore::connect(endpoint, "AstraCS:test", "default_keyspace", "jobs", 3).await
    }

    #[tokio::test]
    async fn test_connect_unauthorized_is_configuration() {
        let endpoint = serve_data_api((401, json!({})), (200, json!({}))).await;

        let err = connect_to(&endpoint).await.err().unwrap();

        assert!(matches!(err, DomainError::Configuration(_)), "{err}");
    }

    #[tokio::test]
    async fn test_connect_server_error_is_external() {
        let endpoint =
            serve_data_api((500, json!({ "message": "boom" })), (200, json!({}))).await;

        let err = connect_to(&endpoint).await.err().unwrap();

        assert!(matches!(err, DomainError::ExternalService(_)), "{err}");
    }

    #[tokio::test]
    async fn test_connect_forbidden_is_configuration() {
        let endpoint = serve_data_api((403, json!({})), (200, json!({}))).await;

        let err = connect_to(&endpoint).await.err().unwrap();

        assert!(matches!(err, DomainError::Configuration(_)), "{err}");
    }

    #[tokio::test]
    async fn test_connect_api_errors_body_is_external() {
        let endpoint = serve_data_api(
            (
                200,
                json!({ "errors": [{ "message": "Unknown keyspace", "errorCode": "KEYSPACE_DOES_NOT_EXIST" }] }),
            ),
            (200, json!({})),
        )
        .await;

        let err = connect_to(&endpoint).await.err().unwrap();

        assert!(matches!(err, DomainError::ExternalService(_)), "{err}");
        assert!(err.to_string().contains("KEYSPACE_DOES_NOT_EXIST"));
    }

    #[tokio::test]
    async fn test_connect_unreachable_is_external() {
        let err = connect_to("http://127.0.0.1:1").await.err().unwrap();

        assert!(matches!(err, DomainError::ExternalService(_)), "{err}");
    }

    #[tokio::test]
    async fn test_search_failure_is_retrieval() {
        let endpoint =
            serve_data_api(existing_collection(), (500, json!({ "message": "boom" }))).await;
        let store = connect_to(&endpoint).await.unwrap();

        let err = store
            .search(&Embedding::new(vec![1.0, 0.0, 0.0]), 25)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Retrieval(_)), "{err}");
    }

    #[tokio::test]
    async fn test_search_returns_documents_in_order() {
        let endpoint = serve_data_api(
            existing_collection(),
            (
                200,
                json!({ "data": { "documents": [
                    { "_id": "a", "content": "Data Analyst - remote", "$similarity": 0.9 },
                    { "_id": "b", "content": "BI Analyst - hybrid", "$similarity": 0.8 }
                ] } }),
            ),
        )
        .await;
        let store = connect_to(&endpoint).await.unwrap();

        let docs = store
            .search(&Embedding::new(vec![1.0, 0.0, 0.0]), 25)
            .await
            .unwrap();

        let contents: Vec<&str> = docs.iter().map(|d| d.content.as_str()).collect();
        assert_eq!(contents, vec!["Data Analyst - remote", "BI Analyst - hybrid"]);
        assert_eq!(store.collection(), "jobs");
    }

    #[test]
    fn test_find_body_shape() {
        let body = find_body(&Embedding::new(vec![0.5, 0.25]), 25);

        assert_eq!(body["find"]["options"]["limit"], 25);
        assert_eq!(body["find"]["options"]["includeSimilarity"], true);
        assert_eq!(body["find"]["sort"]["$vector"], json!([0.5, 0.25]));
        assert_eq!(body["find"]["projection"]["content"], 1);
    }

    #[test]
    fn test_into_documents_keeps_order_and_skips_empty() {
        let response: DataApiResponse = serde_json::from_value(json!({
            "data": {
                "documents": [
                    {
                        "_id": "a",
                        "content": "Data Analyst - remote",
                        "metadata": { "source": "alert-1" },
                        "$similarity": 0.91
                    },
                    { "_id": "b", "$similarity": 0.88 },
                    { "_id": "c", "content": "BI Analyst - hybrid", "metadata": null, "$similarity": 0.80 }
                ],
                "nextPageState": null
            }
        }))
        .unwrap();

        let docs = into_documents(response);

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content, "Data Analyst - remote");
        assert_eq!(docs[0].metadata, Some(json!({ "source": "alert-1" })));
        assert_eq!(docs[0].score, Some(0.91));
        assert_eq!(docs[1].content, "BI Analyst - hybrid");
        assert!(docs[1].metadata.is_none());
    }

    #[test]
    fn test_find_collections_status() {
        let response: DataApiResponse = serde_json::from_value(json!({
            "status": { "collections": ["newcollection", "other"] }
        }))
        .unwrap();

        let status = response.status.unwrap();
        assert!(status.collections.iter().any(|c| c == "newcollection"));
        assert!(response.errors.is_empty());
    }

    #[test]
    fn test_api_error_display() {
        let response: DataApiResponse = serde_json::from_value(json!({
            "errors": [{ "message": "Unknown keyspace 'jobs'", "errorCode": "KEYSPACE_DOES_NOT_EXIST" }]
        }))
        .unwrap();

        assert_eq!(
            response.errors[0].to_string(),
            "KEYSPACE_DOES_NOT_EXIST: Unknown keyspace 'jobs'"
        );
    }
}

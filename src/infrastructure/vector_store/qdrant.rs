use async_trait::async_trait;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, SearchPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::{Qdrant, QdrantError};
use tracing::{debug, info};

use crate::domain::{ports::VectorStore, DomainError, Embedding, RetrievedDocument};

const CONTENT_KEY: &str = "content";

// gRPC status codes
const PERMISSION_DENIED: i32 = 7;
const UNAUTHENTICATED: i32 = 16;

fn is_auth_code(code: i32) -> bool {
    code == UNAUTHENTICATED || code == PERMISSION_DENIED
}

/// Rejected credentials are a configuration problem; anything else
/// (refused connection, unavailable server) is the remote side failing.
fn attach_error(e: QdrantError) -> DomainError {
    match &e {
        QdrantError::ResponseError { status } if is_auth_code(status.code() as i32) => {
            DomainError::config(format!("Qdrant rejected the API key: {e}"))
        }
        _ => DomainError::external(format!("cannot attach Qdrant collection: {e}")),
    }
}

pub struct QdrantVectorStore {
    client: Qdrant,
    collection: String,
    dimension: usize,
}

impl QdrantVectorStore {
    pub async fn connect(
        url: &str,
        api_key: Option<&str>,
        collection: &str,
        dimension: usize,
    ) -> Result<Self, DomainError> {
        let mut builder = Qdrant::from_url(url).skip_compatibility_check();
        if let Some(key) = api_key {
            builder = builder.api_key(key.to_string());
        }
        let client = builder
            .build()
            .map_err(|e| DomainError::config(format!("invalid Qdrant settings: {e}")))?;

        let store = Self {
            client,
            collection: collection.to_string(),
            dimension,
        };

        store.ensure_collection().await?;

        Ok(store)
    }

    async fn ensure_collection(&self) -> Result<(), DomainError> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(attach_error)?;

        let exists = collections
            .collections
            .iter()
            .any(|c| c.name == self.collection);

        if !exists {
            info!(collection = %self.collection, dimension = self.dimension, "creating collection");
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection).vectors_config(
                        VectorParamsBuilder::new(self.dimension as u64, Distance::Cosine),
                    ),
                )
                .await
                .map_err(attach_error)?;
        }

        Ok(())
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<RetrievedDocument>, DomainError> {
        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, query.as_slice().to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| DomainError::retrieval(format!("Qdrant search failed: {e}")))?;

        let documents: Vec<RetrievedDocument> = results
            .result
            .into_iter()
            .filter_map(|point| {
                let payload = &point.payload;
                let content = payload.get(CONTENT_KEY)?.as_str()?.to_string();

                let metadata: serde_json::Map<String, serde_json::Value> = payload
                    .iter()
                    .filter(|(key, _)| key.as_str() != CONTENT_KEY)
                    .filter_map(|(key, value)| {
                        value
                            .as_str()
                            .map(|s| (key.clone(), serde_json::Value::String(s.clone())))
                    })
                    .collect();

                let mut document = RetrievedDocument::new(content).with_score(point.score);
                if !metadata.is_empty() {
                    document = document.with_metadata(serde_json::Value::Object(metadata));
                }
                Some(document)
            })
            .collect();

        debug!(count = documents.len(), "qdrant search returned");
        Ok(documents)
    }

    fn collection(&self) -> &str {
        &self.collection
    }
}

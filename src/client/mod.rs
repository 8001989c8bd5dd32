//! HTTP client for the resource endpoints.
//!
//! One request per call: no retries, no timeout, no caching. Transport and server failures come
//! back unchanged as [`ClientError`].

use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resource::Resource;

mod error;

pub use error::{ClientError, ClientResult};

#[async_trait]
pub trait ResourceApi<E: Resource>: Send + Sync {
    async fn list(&self) -> ClientResult<Vec<E>>;

    async fn create(&self, new: &E::New) -> ClientResult<E>;

    async fn get_by_id(&self, id: &str) -> ClientResult<Option<E>>;

    async fn update_by_id(&self, id: &str, changes: &E::Changes) -> ClientResult<E>;

    async fn delete_by_id(&self, id: &str) -> ClientResult<E>;
}

/// Lists the identifiers of a collection; feeds foreign-key selects.
#[async_trait]
pub trait OptionSource: Send + Sync {
    async fn option_ids(&self, collection: &str) -> ClientResult<Vec<String>>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resource<E: Resource>(&self) -> ResourceClient<E> {
        ResourceClient {
            api: self.clone(),
            _entity: PhantomData,
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/api/{}", self.base_url, collection)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        tracing::debug!(%method, url, "Sending request");
        self.http.request(method, url)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status,
                message: error_message(&body),
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned())
}

#[async_trait]
impl OptionSource for ApiClient {
    async fn option_ids(&self, collection: &str) -> ClientResult<Vec<String>> {
        let records: Vec<Value> =
            Self::send(self.request(Method::GET, &self.collection_url(collection))).await?;

        Ok(records
            .iter()
            .filter_map(|record| record.get("id").and_then(Value::as_str))
            .map(str::to_owned)
            .collect())
    }
}

pub struct ResourceClient<E> {
    api: ApiClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for ResourceClient<E> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Resource> ResourceClient<E> {
    fn collection_url(&self) -> String {
        self.api.collection_url(E::SCHEMA.collection)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    async fn send_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> ClientResult<T> {
        ApiClient::send(self.api.request(method, url).json(body)).await
    }
}

#[async_trait]
impl<E: Resource> ResourceApi<E> for ResourceClient<E> {
    async fn list(&self) -> ClientResult<Vec<E>> {
        ApiClient::send(self.api.request(Method::GET, &self.collection_url())).await
    }

    async fn create(&self, new: &E::New) -> ClientResult<E> {
        self.send_json(Method::POST, &self.collection_url(), new).await
    }

    async fn get_by_id(&self, id: &str) -> ClientResult<Option<E>> {
        ApiClient::send(self.api.request(Method::GET, &self.item_url(id))).await
    }

    async fn update_by_id(&self, id: &str, changes: &E::Changes) -> ClientResult<E> {
        self.send_json(Method::PUT, &self.item_url(id), changes).await
    }

    async fn delete_by_id(&self, id: &str) -> ClientResult<E> {
        ApiClient::send(self.api.request(Method::DELETE, &self.item_url(id))).await
    }
}

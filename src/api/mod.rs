use crate::models::{Collection, CollectionId, Document, DocumentId};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Network,
    NotFound,
    Http,
    Parse,
}

#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn not_found(path: &str) -> Self {
        Self {
            kind: ApiErrorKind::NotFound,
            message: format!("Not found: {path}"),
        }
    }

    pub(crate) fn http(status: StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }

    pub(crate) fn is_not_found(&self) -> bool {
        self.kind == ApiErrorKind::NotFound
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct CreatePageRequest {
    pub title: String,
    pub content: String,
}

/// Body of `PUT /api/pages/{id}`.
///
/// `collection_id` is tri-state: `None` omits the key (rename), `Some(None)` sends
/// `null` (clear the assignment), `Some(Some(id))` assigns.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdatePageRequest {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<Option<CollectionId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct CollectionRequest {
    pub name: String,
    pub description: Option<String>,
    pub color: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddPageToCollectionRequest {
    pub page_id: DocumentId,
    pub collection_id: CollectionId,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> ApiResult<reqwest::Response> {
        let client = reqwest::Client::new();
        let mut req = client.request(method.clone(), self.url(path));

        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(|e| {
            leptos::logging::warn!("{method} {path} failed: {e}");
            ApiError::network(e)
        })?;

        if res.status().is_success() {
            Ok(res)
        } else if res.status() == StatusCode::NOT_FOUND {
            Err(ApiError::not_found(path))
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            leptos::logging::warn!("{method} {path} returned {status}");
            Err(ApiError::http(status, body, "Request failed"))
        }
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> ApiResult<T> {
        let res = self.send(method, path, body).await?;
        res.json().await.map_err(ApiError::parse)
    }

    /// For endpoints whose response body carries nothing we use.
    async fn request_discard(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> ApiResult<()> {
        self.send(method, path, body).await.map(|_| ())
    }

    pub async fn list_pages(&self) -> ApiResult<Vec<Document>> {
        self.request(Method::GET, "/api/pages", None::<&()>).await
    }

    pub async fn get_page(&self, id: DocumentId) -> ApiResult<Document> {
        self.request(Method::GET, &format!("/api/pages/{id}"), None::<&()>)
            .await
    }

    pub async fn create_page(&self, title: &str, content: &str) -> ApiResult<Document> {
        self.request(
            Method::POST,
            "/api/pages",
            Some(&CreatePageRequest {
                title: title.to_string(),
                content: content.to_string(),
            }),
        )
        .await
    }

    pub async fn update_page(
        &self,
        id: DocumentId,
        body: &UpdatePageRequest,
    ) -> ApiResult<Document> {
        self.request(Method::PUT, &format!("/api/pages/{id}"), Some(body))
            .await
    }

    pub async fn publish_page(&self, id: DocumentId) -> ApiResult<Document> {
        self.request(
            Method::POST,
            &format!("/api/pages/{id}/publish"),
            None::<&()>,
        )
        .await
    }

    pub async fn delete_page(&self, id: DocumentId) -> ApiResult<()> {
        self.request_discard(Method::DELETE, &format!("/api/pages/{id}"), None::<&()>)
            .await
    }

    pub async fn list_collections(&self) -> ApiResult<Vec<Collection>> {
        self.request(Method::GET, "/api/collections", None::<&()>)
            .await
    }

    pub async fn create_collection(&self, body: &CollectionRequest) -> ApiResult<Collection> {
        self.request(Method::POST, "/api/collections", Some(body))
            .await
    }

    pub async fn update_collection(
        &self,
        id: CollectionId,
        body: &CollectionRequest,
    ) -> ApiResult<Collection> {
        self.request(Method::PUT, &format!("/api/collections/{id}"), Some(body))
            .await
    }

    pub async fn delete_collection(&self, id: CollectionId) -> ApiResult<()> {
        self.request_discard(
            Method::DELETE,
            &format!("/api/collections/{id}"),
            None::<&()>,
        )
        .await
    }

    pub async fn add_page_to_collection(
        &self,
        page_id: DocumentId,
        collection_id: CollectionId,
    ) -> ApiResult<()> {
        self.request_discard(
            Method::POST,
            "/api/collections/add-page",
            Some(&AddPageToCollectionRequest {
                page_id,
                collection_id,
            }),
        )
        .await
    }

    pub async fn remove_page_from_collection(&self, page_id: DocumentId) -> ApiResult<()> {
        self.request_discard(
            Method::DELETE,
            &format!("/api/collections/remove-page/{page_id}"),
            None::<&()>,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_client_new() {
        let client = ApiClient::new("http://localhost:5000".to_string());
        assert_eq!(client.base_url, "http://localhost:5000");
        assert_eq!(client.url("/api/pages/4"), "http://localhost:5000/api/pages/4");
    }

    #[test]
    fn test_update_request_sends_null_collection_to_clear() {
        let req = UpdatePageRequest {
            title: "T".to_string(),
            content: "<p>x</p>".to_string(),
            collection_id: Some(None),
            published: None,
        };
        let v = serde_json::to_value(req).expect("should serialize");
        assert!(v["collectionId"].is_null());
        assert!(v.as_object().is_some_and(|o| o.contains_key("collectionId")));
        assert!(v.get("published").is_none());
    }

    #[test]
    fn test_update_request_omits_collection_for_rename() {
        let req = UpdatePageRequest {
            title: "Renamed".to_string(),
            content: "".to_string(),
            collection_id: None,
            published: None,
        };
        let v = serde_json::to_value(req).expect("should serialize");
        let obj = v.as_object().expect("object");
        assert_eq!(obj.len(), 2);
        assert_eq!(v["title"], "Renamed");
    }

    #[test]
    fn test_unpublish_request_carries_flag_and_collection() {
        let req = UpdatePageRequest {
            title: "T".to_string(),
            content: "c".to_string(),
            collection_id: Some(Some(9)),
            published: Some(false),
        };
        let v = serde_json::to_value(req).expect("should serialize");
        assert_eq!(v["collectionId"], 9);
        assert_eq!(v["published"], false);
    }

    #[test]
    fn test_add_page_request_uses_camel_case() {
        let v = serde_json::to_value(AddPageToCollectionRequest {
            page_id: 4,
            collection_id: 2,
        })
        .expect("should serialize");
        assert_eq!(v["pageId"], 4);
        assert_eq!(v["collectionId"], 2);
    }

    #[test]
    fn test_collection_request_keeps_null_description() {
        let v = serde_json::to_value(CollectionRequest {
            name: "Ideas".to_string(),
            description: None,
            color: "#007bff".to_string(),
        })
        .expect("should serialize");
        assert!(v["description"].is_null());
        assert_eq!(v["color"], "#007bff");
    }

    #[test]
    fn test_http_error_message_includes_context() {
        let e = ApiError::http(StatusCode::BAD_REQUEST, "bad title".to_string(), "Save");
        assert_eq!(e.kind, ApiErrorKind::Http);
        assert_eq!(e.to_string(), "Save (400 Bad Request): bad title");
        assert!(!e.is_not_found());
    }
}

/// HTTP client for the photographies REST backend
///
/// Thin wrappers over the five backend operations. Every response comes
/// wrapped in a `{data: ...}` envelope, and any non-2xx status is turned
/// into an `ApiError::Status` carrying the code so the UI can show it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::data::{Photography, PrintItem};

/// Backend call failure. Cloneable because it travels inside iced messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered, but with a non-2xx status
    #[error("server responded with status {0}")]
    Status(u16),
    /// The request never completed (DNS, connection, body decode, ...)
    #[error("network error: {0}")]
    Network(String),
    /// A local file could not be read for upload
    #[error("could not read file: {0}")]
    Io(String),
    /// The file type is not accepted by the backend
    #[error("unsupported file type: {0}")]
    Unsupported(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::Network(error.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(error: std::io::Error) -> Self {
        ApiError::Io(error.to_string())
    }
}

/// Every backend payload arrives wrapped in this envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Serialize)]
struct DeleteManyBody {
    ids: Vec<String>,
}

#[derive(Serialize)]
struct ConfirmPrintedBody<'a> {
    items: &'a [PrintItem],
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/photographies{}", self.base_url, path)
    }

    /// Upload many image files in one multipart request (repeated `images`
    /// parts). Returns the created records.
    pub async fn upload_photos(&self, paths: Vec<PathBuf>) -> Result<Vec<Photography>, ApiError> {
        let mut form = reqwest::multipart::Form::new();

        for path in &paths {
            let mime = mime_for(path)
                .ok_or_else(|| ApiError::Unsupported(path.display().to_string()))?;
            let bytes = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| "photo".to_string());

            let part = reqwest::multipart::Part::bytes(bytes)
                .file_name(file_name)
                .mime_str(mime)?;
            form = form.part("images", part);
        }

        println!("⬆️  Uploading {} photo(s)...", paths.len());

        let response = self
            .http
            .post(self.endpoint("/upload-multiple"))
            .multipart(form)
            .send()
            .await?;
        let response = check_status(response)?;

        let envelope: Envelope<Vec<Photography>> = response.json().await?;
        Ok(envelope.data)
    }

    /// Fetch the photo list, newest first, optionally filtered by printed
    /// state.
    pub async fn get_photos(&self, printed: Option<bool>) -> Result<Vec<Photography>, ApiError> {
        let mut query: Vec<(&str, String)> = vec![("order", "desc".to_string())];
        if let Some(printed) = printed {
            query.push(("printed", printed.to_string()));
        }

        let response = self
            .http
            .get(self.endpoint(""))
            .query(&query)
            .send()
            .await?;
        let response = check_status(response)?;

        let envelope: Envelope<Vec<Photography>> = response.json().await?;
        Ok(envelope.data)
    }

    /// Delete a single photo by id
    pub async fn delete_photo(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.endpoint(&format!("/{}", id)))
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }

    /// Delete several photos at once. Duplicate ids are collapsed before
    /// sending.
    pub async fn delete_photos(&self, ids: &[String]) -> Result<(), ApiError> {
        let body = DeleteManyBody {
            ids: collapse_ids(ids),
        };

        let response = self
            .http
            .delete(self.endpoint("/delete-multiple"))
            .json(&body)
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }

    /// Report a finished print run. Quantities must already be aggregated
    /// per id (see `Selection::print_items`).
    pub async fn confirm_printed(&self, items: &[PrintItem]) -> Result<(), ApiError> {
        let body = ConfirmPrintedBody { items };

        let response = self
            .http
            .post(self.endpoint("/confirm-printed"))
            .json(&body)
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }

    /// Download raw bytes from an absolute URL (photo images live on the
    /// storage provider, not under the API base).
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.http.get(url).send().await?;
        let response = check_status(response)?;
        Ok(response.bytes().await?.to_vec())
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status.as_u16()));
    }
    Ok(response)
}

/// Collapse duplicate ids while keeping first-seen order
fn collapse_ids(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// MIME type for the image formats the backend accepts (jpeg and png)
fn mime_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_string_lossy().to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_unwraps_data() {
        let json = r#"{"data": [{
            "id": "abc123",
            "code": "P-017",
            "url": "https://photos.example/p017.jpg",
            "width": 3000,
            "height": 2000,
            "public_id": "shop/p017",
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z"
        }]}"#;

        let envelope: Envelope<Vec<Photography>> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.len(), 1);
        assert_eq!(envelope.data[0].code, "P-017");
    }

    #[test]
    fn test_collapse_ids_keeps_first_seen_order() {
        let ids = vec![
            "b".to_string(),
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "a".to_string(),
        ];
        assert_eq!(collapse_ids(&ids), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_mime_for_accepted_extensions() {
        assert_eq!(mime_for(Path::new("x/photo.JPG")), Some("image/jpeg"));
        assert_eq!(mime_for(Path::new("photo.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_for(Path::new("photo.png")), Some("image/png"));
        assert_eq!(mime_for(Path::new("photo.gif")), None);
        assert_eq!(mime_for(Path::new("photo")), None);
    }

    #[test]
    fn test_confirm_body_shape() {
        let items = vec![PrintItem {
            id: "abc".to_string(),
            quantity: 2,
        }];
        let body = ConfirmPrintedBody { items: &items };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"items":[{"id":"abc","quantity":2}]}"#);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(
            client.endpoint("/upload-multiple"),
            "http://localhost:3000/photographies/upload-multiple"
        );
        assert_eq!(client.endpoint(""), "http://localhost:3000/photographies");
    }
}

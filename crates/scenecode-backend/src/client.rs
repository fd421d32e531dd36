//! HTTP client for the backend API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use scenecode_assets::{encode_multipart, AssetError, ImageUploadRequest, ImageUploader, MultipartFile, UploadSlot};

use crate::config::BackendConfig;
use crate::error::{BackendError, Result};
use crate::oauth::error_text;
use crate::token::TokenSource;
use crate::types::{Conversation, FileAttachment, InferenceRequest, Project, ProjectDimensions};

/// Client for project, conversation, file and image endpoints.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    config: BackendConfig,
    tokens: Option<Arc<dyn TokenSource>>,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http,
            config,
            tokens: None,
        })
    }

    /// Authenticate requests with tokens from `tokens`.
    pub fn with_tokens(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn is_configured(&self) -> bool {
        !self.config.base_url.is_empty()
    }

    /// A token when one is available; anonymous otherwise.
    async fn optional_token(&self) -> Option<String> {
        let tokens = self.tokens.as_ref()?;
        match tokens.access_token().await {
            Ok(token) => Some(token),
            Err(err) => {
                debug!(error = %err, "continuing without a bearer token");
                None
            }
        }
    }

    async fn required_token(&self, action: &'static str) -> Result<String> {
        match &self.tokens {
            Some(tokens) => Ok(tokens.access_token().await?),
            None => Err(BackendError::AuthRequired(action)),
        }
    }

    fn api(&self, builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        let mut builder = builder;
        for (name, value) in &self.config.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn checked(response: Response, action: &'static str) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = error_text(response).await;
        warn!(action, status, "backend request failed");
        Err(BackendError::Status {
            action,
            status,
            message,
        })
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
        token: &str,
        action: &'static str,
    ) -> Result<T> {
        let request = self.api(self.http.post(self.config.endpoint(path)), Some(token)).json(body);
        let response = Self::checked(request.send().await?, action).await?;
        Ok(response.json().await?)
    }

    /// Upload files as attachments in one multipart request. An empty
    /// answer is an error.
    pub async fn upload_files(&self, files: &[MultipartFile]) -> Result<Vec<FileAttachment>> {
        let token = self.required_token("upload files").await?;
        let body = encode_multipart(files)?;
        debug!(files = files.len(), bytes = body.body.len(), "uploading files");
        let request = self
            .api(self.http.post(self.config.endpoint("/files")), Some(&token))
            .header(CONTENT_TYPE, body.content_type())
            .body(body.body);
        let response = Self::checked(request.send().await?, "Failed to upload file").await?;
        let attachments: Vec<FileAttachment> = response.json().await?;
        if attachments.is_empty() {
            return Err(BackendError::NothingUploaded);
        }
        Ok(attachments)
    }

    pub async fn create_project(
        &self,
        name: &str,
        description: &str,
        dimensions: ProjectDimensions,
        user_id: &str,
    ) -> Result<Project> {
        let token = self.required_token("create projects").await?;
        let body = json!({
            "id": new_id(),
            "userId": user_id,
            "name": name,
            "description": description,
            "createdAt": chrono::Utc::now().to_rfc3339(),
            "attachments": [],
            "presentationType": "marketingAsset",
            "frames": [],
            "dimensions": dimensions,
            "needsInitialGeneration": true,
        });
        self.post_json("/projects", &body, &token, "Failed to create project").await
    }

    pub async fn create_conversation(&self, project_id: &str, user_id: &str, name: &str) -> Result<Conversation> {
        let token = self.required_token("create conversations").await?;
        let body = json!({
            "id": "",
            "projectId": project_id,
            "name": name,
            "userId": user_id,
            "messages": [],
            "createdAt": chrono::Utc::now().to_rfc3339(),
        });
        self.post_json("/conversations", &body, &token, "Failed to create conversation")
            .await
    }

    /// Start agent inference. The response body is ignored.
    pub async fn perform_inference(&self, request: &InferenceRequest) -> Result<()> {
        let token = self.required_token("perform inference").await?;
        let builder = self
            .api(self.http.post(self.config.endpoint("/infer/agent")), Some(&token))
            .json(request);
        Self::checked(builder.send().await?, "Failed to start inference").await?;
        Ok(())
    }
}

/// Random UUID v4 string.
fn new_id() -> String {
    let mut bytes: [u8; 16] = rand::random();
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    let hex = hex::encode(bytes);
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

#[async_trait]
impl ImageUploader for BackendClient {
    fn is_configured(&self) -> bool {
        BackendClient::is_configured(self)
    }

    async fn request_upload_url(&self, request: &ImageUploadRequest) -> scenecode_assets::Result<UploadSlot> {
        let token = self.optional_token().await;
        let builder = self
            .api(self.http.post(self.config.endpoint("/figma/imageUploadUrl")), token.as_deref())
            .json(request);
        let response = builder
            .send()
            .await
            .map_err(|err| AssetError::Transport(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(AssetError::UploadUrl {
                status,
                message: error_text(response).await,
            });
        }
        response
            .json()
            .await
            .map_err(|err| AssetError::Transport(err.to_string()))
    }

    async fn upload_image(&self, upload_url: &str, bytes: Vec<u8>) -> scenecode_assets::Result<()> {
        let response = self
            .http
            .put(upload_url)
            .header(CONTENT_TYPE, "image/png")
            .header("x-ms-blob-type", "BlockBlob")
            .body(bytes)
            .send()
            .await
            .map_err(|err| AssetError::Transport(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(AssetError::Upload {
                status,
                message: error_text(response).await,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::StaticToken;
    use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn client(server: &MockServer, token: Option<&str>) -> BackendClient {
        let config = BackendConfig::new(server.uri()).with_header("x-client", "scenecode");
        let client = BackendClient::new(config).unwrap();
        match token {
            Some(token) => client.with_tokens(Arc::new(StaticToken(token.to_string()))),
            None => client,
        }
    }

    fn upload_request() -> ImageUploadRequest {
        ImageUploadRequest {
            node_id: "1:2".into(),
            node_name: "Photo".into(),
            width: 40.0,
            height: 30.0,
            format: "PNG".into(),
            timestamp: 0,
        }
    }

    #[tokio::test]
    async fn test_request_upload_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/figma/imageUploadUrl"))
            .and(header("authorization", "Bearer tok"))
            .and(header("x-client", "scenecode"))
            .and(body_partial_json(json!({"nodeId": "1:2", "format": "PNG"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uploadUrl": "https://blob/put",
                "publicUrl": "https://cdn/img.png"
            })))
            .expect(1)
            .mount(&server)
            .await;
        let slot = client(&server, Some("tok"))
            .request_upload_url(&upload_request())
            .await
            .unwrap();
        assert_eq!(slot.public_url, "https://cdn/img.png");
    }

    #[tokio::test]
    async fn test_upload_url_error_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;
        let err = client(&server, None)
            .request_upload_url(&upload_request())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to request upload URL: 500 boom");
    }

    #[tokio::test]
    async fn test_upload_image_put() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/blob"))
            .and(header("content-type", "image/png"))
            .and(header("x-ms-blob-type", "BlockBlob"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/denied"))
            .respond_with(ResponseTemplate::new(403).set_body_string("nope"))
            .mount(&server)
            .await;
        let backend = client(&server, None);
        backend
            .upload_image(&format!("{}/blob", server.uri()), vec![1, 2, 3])
            .await
            .unwrap();
        let err = backend
            .upload_image(&format!("{}/denied", server.uri()), vec![1])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to upload image: 403 nope");
    }

    #[tokio::test]
    async fn test_upload_files_requires_auth() {
        let server = MockServer::start().await;
        let files = [MultipartFile::html("a.html", "<p>a</p>", "A")];
        let err = client(&server, None).upload_files(&files).await.unwrap_err();
        assert_eq!(err.to_string(), "Authentication required to upload files");
        assert!(err.requires_reauthentication());
    }

    #[tokio::test]
    async fn test_upload_files_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .and(header("authorization", "Bearer tok"))
            .and(header_exists("content-type"))
            .respond_with(|request: &Request| {
                let content_type = request
                    .headers
                    .get("content-type")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();
                let body = String::from_utf8_lossy(&request.body);
                if content_type.starts_with("multipart/form-data; boundary=")
                    && body.matches("name=\"file\"").count() == 2
                    && body.matches("name=\"description\"").count() == 2
                {
                    ResponseTemplate::new(200).set_body_json(json!([{"id": "f1"}, {"id": "f2"}]))
                } else {
                    ResponseTemplate::new(400)
                }
            })
            .expect(1)
            .mount(&server)
            .await;
        let files = [
            MultipartFile::html("a.html", "<p>a</p>", "A"),
            MultipartFile::html("b.html", "<p>b</p>", "B"),
        ];
        let attachments = client(&server, Some("tok")).upload_files(&files).await.unwrap();
        let ids: Vec<_> = attachments.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["f1", "f2"]);
    }

    #[tokio::test]
    async fn test_empty_upload_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        let files = [MultipartFile::html("a.html", "<p>a</p>", "A")];
        let err = client(&server, Some("tok")).upload_files(&files).await.unwrap_err();
        assert!(matches!(err, BackendError::NothingUploaded));
    }

    #[tokio::test]
    async fn test_project_conversation_inference() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/projects"))
            .and(body_partial_json(json!({
                "name": "Landing",
                "userId": "u1",
                "dimensions": {"width": 1080, "height": 1080},
                "needsInitialGeneration": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "p1", "name": "Landing"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/conversations"))
            .and(body_partial_json(json!({"projectId": "p1", "name": "Import from Figma"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "c1"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/infer/agent"))
            .and(body_partial_json(json!({
                "projectId": "p1",
                "conversationId": "c1",
                "chatMode": "edit",
                "attachmentIds": ["f1"]
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let backend = client(&server, Some("tok"));
        let project = backend
            .create_project("Landing", "", ProjectDimensions::default(), "u1")
            .await
            .unwrap();
        let conversation = backend
            .create_conversation(&project.id, "u1", "Import from Figma")
            .await
            .unwrap();
        backend
            .perform_inference(&InferenceRequest::new(
                &project.id,
                &conversation.id,
                "Make it pop",
                vec!["f1".to_string()],
                "context",
            ))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_status_error_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
            .mount(&server)
            .await;
        let err = client(&server, Some("tok"))
            .create_project("x", "", ProjectDimensions::default(), "u")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to create project: 500 db down");
        assert!(!err.requires_reauthentication());
    }

    #[test]
    fn test_new_id_shape() {
        let id = new_id();
        assert_eq!(id.len(), 36);
        assert_eq!(&id[14..15], "4");
    }
}

//! The generation orchestrator.
//!
//! Owns the session services (settings, warnings, asset pipeline, backend
//! and auth) and exposes every UI request as a plain async method, so the
//! same calls serve the host's event loop and tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use scenecode_assets::{AssetCache, AssetPipeline, MultipartFile};
use scenecode_backend::pkce::generate_read_key;
use scenecode_backend::{
    AuthError, AuthState, AuthStorage, AuthTokens, AuthUser, BackendClient, BackendConfig, BackendError,
    InferenceRequest, OAuthClient, PollControl, PollOptions, ProjectDimensions, TokenProvider,
};
use scenecode_codegen::{generate_code, retrieve_colors, retrieve_gradients};
use scenecode_core::{ClientStorage, Host, HostExporter, HostNode, PluginSettings, WarningSink};
use scenecode_normalize::{normalize, to_json, IntermediateNode};

use crate::codegen_mode::{blocks_for, CodegenBlock, PanelLanguage};
use crate::config::PluginConfig;
use crate::error::{ConversionError, Result};
use crate::export::{
    attachment_link, check_selection, export_file, export_timestamp, project_link, CONVERSATION_NAME,
    INFERENCE_CONTEXT,
};
use crate::messages::{ConversionData, GenerationStage, InboundMessage, OutboundMessage};
use crate::preview::{html_preview, html_settings};
use crate::settings::SettingsStore;
use crate::state::{RunState, SingleFlight};
use crate::ui::UiSink;

/// Selection name reported when nothing is selected.
pub const DEFAULT_SELECTION_NAME: &str = "New Project";

/// Lifetime assumed for tokens delivered by session polling.
pub const POLLED_TOKEN_LIFETIME_SECS: f64 = 3600.0;

struct Services {
    backend: BackendClient,
    tokens: Arc<TokenProvider>,
    web_app_url: String,
}

pub struct Orchestrator {
    host: Arc<dyn Host>,
    ui: Arc<dyn UiSink>,
    settings: SettingsStore,
    warnings: WarningSink,
    pipeline: AssetPipeline,
    services: Option<Services>,
    flight: SingleFlight,
    auth_poll: Mutex<Option<PollControl>>,
    ui_visible: AtomicBool,
    poll_options: PollOptions,
}

impl Orchestrator {
    /// An orchestrator without a backend: previews work, exports and
    /// login report [`ConversionError::BackendUnavailable`].
    pub fn new<H: Host + 'static>(host: Arc<H>, ui: Arc<dyn UiSink>, storage: Arc<dyn ClientStorage>) -> Self {
        let warnings = WarningSink::new();
        let exporter: Arc<dyn HostExporter> = host.clone();
        let pipeline = AssetPipeline::new(exporter, AssetCache::new(), warnings.clone());
        Self {
            host,
            ui,
            settings: SettingsStore::new(storage),
            warnings,
            pipeline,
            services: None,
            flight: SingleFlight::new(),
            auth_poll: Mutex::new(None),
            ui_visible: AtomicBool::new(true),
            poll_options: PollOptions::default(),
        }
    }

    /// Connect the backend API and the OAuth endpoints. The backend also
    /// becomes the image uploader.
    pub fn with_backend(mut self, config: &PluginConfig) -> Result<Self> {
        let storage = AuthStorage::new(self.settings.storage().clone());
        let oauth = OAuthClient::new(config.oauth.clone());
        let tokens = Arc::new(TokenProvider::new(storage, Arc::new(oauth)));
        let backend = BackendClient::new(config.backend.clone())?.with_tokens(tokens.clone());
        self.pipeline.configure(Arc::new(backend.clone()));
        self.services = Some(Services {
            backend,
            tokens,
            web_app_url: config.web_app_url().to_string(),
        });
        Ok(self)
    }

    pub fn with_poll_options(mut self, options: PollOptions) -> Self {
        self.poll_options = options;
        self
    }

    pub fn settings(&self) -> PluginSettings {
        self.settings.current()
    }

    pub fn warnings(&self) -> &WarningSink {
        &self.warnings
    }

    pub fn state(&self) -> RunState {
        self.flight.state()
    }

    /// Forget every uploaded image URL. Nothing else clears the cache.
    pub fn clear_asset_cache(&self) {
        info!(entries = self.pipeline.cache().len(), "clearing asset cache");
        self.pipeline.cache().clear();
    }

    fn post(&self, message: OutboundMessage) {
        self.ui.post(message);
    }

    fn services(&self) -> Result<&Services> {
        self.services.as_ref().ok_or(ConversionError::BackendUnavailable)
    }

    /// Load settings and tell the UI where things stand.
    pub async fn start(&self) -> Result<()> {
        let settings = self.settings.load().await?;
        self.post(OutboundMessage::PluginSettingsChanged { settings });
        self.post_auth_status().await;
        self.selection_changed();
        Ok(())
    }

    /// Report the current selection to the UI.
    pub fn selection_changed(&self) {
        let selection = self.host.selection();
        let selection_name = selection
            .first()
            .map(|node| node.name.clone())
            .unwrap_or_else(|| DEFAULT_SELECTION_NAME.to_string());
        self.post(OutboundMessage::SelectionState {
            has_selection: !selection.is_empty(),
            selection_name,
            selection_count: selection.len(),
        });
    }

    /// Dispatch one UI request. Failures are reported through outbound
    /// messages.
    pub async fn handle_message(&self, message: InboundMessage) {
        match message {
            InboundMessage::PreviewRequested => {
                let settings = self.settings.current();
                // errors are posted by run
                let _ = self.run(&settings).await;
            }
            InboundMessage::ExportRequested => {
                let settings = self.settings.current();
                let _ = self.export_selection(&settings).await;
            }
            InboundMessage::ProjectGenerationRequest { project_name, prompt } => {
                let settings = self.settings.current();
                let _ = self.generate_project(&settings, &project_name, &prompt).await;
            }
            InboundMessage::PluginSettingWillChange { key, value } => {
                match self.settings.change(&key, value).await {
                    Ok(settings) => self.post(OutboundMessage::PluginSettingsChanged { settings }),
                    Err(err) => {
                        warn!(%key, error = %err, "setting change rejected");
                        self.post(OutboundMessage::Error {
                            error: err.to_string(),
                        });
                        self.post(OutboundMessage::PluginSettingsChanged {
                            settings: self.settings.current(),
                        });
                    }
                }
            }
            InboundMessage::ConfigureImageUpload { config } => {
                if let Err(err) = self.configure_image_upload(config) {
                    self.post(OutboundMessage::Error {
                        error: err.to_string(),
                    });
                }
            }
            InboundMessage::GetSelectionJson => {
                let data = self.selection_json().await;
                self.post(OutboundMessage::SelectionJson { data });
            }
            InboundMessage::AuthInitiate { challenge, verifier } => {
                let result = self.authenticate(&challenge, verifier.as_deref()).await;
                self.report_auth(result);
            }
            InboundMessage::AuthCallback { code, state } => {
                let result = self.complete_redirect(&code, &state).await;
                self.report_auth(result);
            }
            InboundMessage::AuthCancel => self.cancel_auth(),
            InboundMessage::Logout => match self.logout().await {
                Ok(()) => self.post(OutboundMessage::AuthStatus {
                    auth_state: AuthState::default(),
                }),
                Err(err) => self.post(OutboundMessage::AuthError {
                    error: err.to_string(),
                }),
            },
            InboundMessage::AuthStatusRequest => self.post_auth_status().await,
            InboundMessage::UiVisibility { visible } => self.set_ui_visible(visible),
            InboundMessage::ClearAssetCache => self.clear_asset_cache(),
        }
    }

    /// [`Self::handle_message`] for a raw JSON message.
    pub async fn handle_json(&self, raw: &str) {
        match serde_json::from_str::<InboundMessage>(raw) {
            Ok(message) => self.handle_message(message).await,
            Err(err) => {
                warn!(error = %err, "unreadable ui message");
                self.post(OutboundMessage::Error {
                    error: format!("Invalid message: {}", err),
                });
            }
        }
    }

    /// Convert the selection and post the result.
    ///
    /// Returns `Ok(None)` without doing anything while another run,
    /// export or project generation is in progress.
    pub async fn run(&self, settings: &PluginSettings) -> Result<Option<ConversionData>> {
        let Some(guard) = self.flight.try_begin() else {
            return Ok(None);
        };
        match self.convert_and_post(settings).await {
            Ok(data) => {
                guard.succeed();
                self.post(OutboundMessage::ConversionComplete { success: true });
                Ok(Some(data))
            }
            Err(err) => {
                guard.fail();
                error!(error = %err, "conversion failed");
                self.post(OutboundMessage::Error {
                    error: err.to_string(),
                });
                self.post(OutboundMessage::ConversionComplete { success: false });
                Err(err)
            }
        }
    }

    async fn convert_and_post(&self, settings: &PluginSettings) -> Result<ConversionData> {
        self.post(OutboundMessage::ConversionStarted);
        let data = self.convert(settings).await?;
        self.post(OutboundMessage::Code(data.clone()));
        Ok(data)
    }

    async fn convert(&self, settings: &PluginSettings) -> Result<ConversionData> {
        self.warnings.clear();
        let selection = self.host.selection();
        if selection.is_empty() {
            return Err(ConversionError::EmptySelection);
        }

        let started = Instant::now();
        let nodes = self.prepare(&selection, settings).await;
        let generated = generate_code(&nodes, settings)?;
        let data = ConversionData {
            code: generated.code,
            settings: settings.clone(),
            html_preview: html_preview(&nodes, settings)?,
            colors: retrieve_colors(&nodes, settings),
            gradients: retrieve_gradients(&nodes, settings),
            warnings: self.warnings.snapshot(),
        };
        info!(
            framework = settings.framework.as_str(),
            nodes = nodes.len(),
            warnings = data.warnings.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "conversion finished"
        );
        Ok(data)
    }

    /// Normalize host nodes and resolve their assets.
    async fn prepare(&self, selection: &[HostNode], settings: &PluginSettings) -> Vec<IntermediateNode> {
        let mut nodes = normalize(selection, settings, &self.warnings);
        self.pipeline.resolve_tree(&mut nodes, settings).await;
        nodes
    }

    /// One plain-HTML file per selected node.
    async fn export_files(&self, selection: &[HostNode], settings: &PluginSettings) -> Result<Vec<MultipartFile>> {
        let settings = html_settings(settings);
        let timestamp = export_timestamp(Utc::now());
        let mut files = Vec::with_capacity(selection.len());
        for (index, node) in selection.iter().enumerate() {
            let nodes = self.prepare(std::slice::from_ref(node), &settings).await;
            let code = generate_code(&nodes, &settings)?.code;
            files.push(export_file(index, &node.name, code, &timestamp));
        }
        Ok(files)
    }

    /// Convert the selection, upload it as attachments and open the web
    /// app on the first one. Returns the attachment id.
    pub async fn export_selection(&self, settings: &PluginSettings) -> Result<Option<String>> {
        let Some(guard) = self.flight.try_begin() else {
            return Ok(None);
        };
        match self.export(settings).await {
            Ok((attachment_id, deep_link_url)) => {
                guard.succeed();
                info!(%attachment_id, "selection exported");
                self.post(OutboundMessage::ExportSuccess {
                    attachment_id: attachment_id.clone(),
                    deep_link_url: deep_link_url.clone(),
                });
                self.host.open_external(&deep_link_url);
                Ok(Some(attachment_id))
            }
            Err(err) => {
                guard.fail();
                error!(error = %err, "export failed");
                self.post(OutboundMessage::ExportError {
                    error: err.to_string(),
                });
                self.post(OutboundMessage::ConversionComplete { success: false });
                Err(err)
            }
        }
    }

    async fn export(&self, settings: &PluginSettings) -> Result<(String, String)> {
        let selection = self.host.selection();
        check_selection(selection.len())?;
        let services = self.services()?;

        self.convert_and_post(settings).await?;
        let files = self.export_files(&selection, settings).await?;
        let attachments = services.backend.upload_files(&files).await?;
        let first = attachments.first().ok_or(BackendError::NothingUploaded)?;
        Ok((first.id.clone(), attachment_link(&services.web_app_url, &first.id)))
    }

    /// Upload the selection, create a project from it and start the
    /// first generation. Returns the project id.
    pub async fn generate_project(
        &self,
        settings: &PluginSettings,
        project_name: &str,
        prompt: &str,
    ) -> Result<Option<String>> {
        let Some(guard) = self.flight.try_begin() else {
            return Ok(None);
        };
        let mut stage = GenerationStage::Uploading;
        match self.project(settings, project_name, prompt, &mut stage).await {
            Ok((project_id, deep_link_url)) => {
                guard.succeed();
                info!(%project_id, "project generation started");
                self.post(OutboundMessage::ProjectGenerationSuccess {
                    project_id: project_id.clone(),
                    deep_link_url: deep_link_url.clone(),
                });
                self.host.open_external(&deep_link_url);
                Ok(Some(project_id))
            }
            Err(err) => {
                guard.fail();
                error!(error = %err, ?stage, "project generation failed");
                self.post(OutboundMessage::ProjectGenerationError {
                    error: err.to_string(),
                    stage,
                });
                Err(err)
            }
        }
    }

    async fn project(
        &self,
        settings: &PluginSettings,
        project_name: &str,
        prompt: &str,
        stage: &mut GenerationStage,
    ) -> Result<(String, String)> {
        self.enter_stage(stage, GenerationStage::Uploading);
        let selection = self.host.selection();
        check_selection(selection.len())?;
        let services = self.services()?;
        let files = self.export_files(&selection, settings).await?;
        let attachments = services.backend.upload_files(&files).await?;

        self.enter_stage(stage, GenerationStage::Creating);
        let user = services
            .tokens
            .storage()
            .user()
            .await?
            .ok_or(ConversionError::MissingUser)?;
        let project = services
            .backend
            .create_project(project_name, "", ProjectDimensions::default(), &user.id)
            .await?;
        let conversation = services
            .backend
            .create_conversation(&project.id, &user.id, CONVERSATION_NAME)
            .await?;

        self.enter_stage(stage, GenerationStage::Generating);
        let attachment_ids = attachments.into_iter().map(|a| a.id).collect();
        let request = InferenceRequest::new(
            &project.id,
            &conversation.id,
            prompt,
            attachment_ids,
            INFERENCE_CONTEXT,
        );
        services.backend.perform_inference(&request).await?;

        Ok((project.id.clone(), project_link(&services.web_app_url, &project.id)))
    }

    fn enter_stage(&self, current: &mut GenerationStage, next: GenerationStage) {
        *current = next;
        info!(stage = ?next, "project generation stage");
        self.post(OutboundMessage::ProjectGenerationProgress {
            stage: next,
            message: next.message().to_string(),
        });
    }

    /// Replace the image uploader.
    pub fn configure_image_upload(&self, config: BackendConfig) -> Result<()> {
        let mut client = BackendClient::new(config)?;
        if let Some(services) = &self.services {
            client = client.with_tokens(services.tokens.clone());
        }
        info!(base_url = %client.config().base_url, "image upload configured");
        self.pipeline.configure(Arc::new(client));
        Ok(())
    }

    /// Host JSON and the converted tree of the selection, for debugging.
    pub async fn selection_json(&self) -> Value {
        let selection = self.host.selection();
        if selection.is_empty() {
            return json!({ "message": "No nodes selected" });
        }
        let settings = self.settings.current();
        let nodes = self.prepare(&selection, &settings).await;
        json!({
            "json": selection,
            "newConversion": to_json(&nodes),
        })
    }

    /// Code blocks for the inspect panel.
    pub async fn codegen_blocks(&self, language: &str, node: &HostNode) -> Result<Vec<CodegenBlock>> {
        if PanelLanguage::parse(language).is_none() {
            return Ok(Vec::new());
        }
        let settings = self.settings.current();
        let nodes = self.prepare(std::slice::from_ref(node), &settings).await;
        blocks_for(language, &nodes, &settings)
    }

    pub async fn auth_state(&self) -> Result<AuthState> {
        match &self.services {
            Some(services) => Ok(services.tokens.auth_state().await?),
            None => Ok(AuthState::default()),
        }
    }

    async fn post_auth_status(&self) {
        let auth_state = match self.auth_state().await {
            Ok(state) => state,
            Err(err) => {
                warn!(error = %err, "failed to read auth state");
                AuthState::default()
            }
        };
        self.post(OutboundMessage::AuthStatus { auth_state });
    }

    fn report_auth(&self, result: Result<AuthUser>) {
        match result {
            Ok(user) => self.post(OutboundMessage::AuthComplete { user }),
            Err(err) => {
                warn!(error = %err, "authentication failed");
                self.post(OutboundMessage::AuthError {
                    error: err.to_string(),
                });
            }
        }
    }

    /// Log in through a polling session: open the consent page, then
    /// wait for the tokens.
    pub async fn authenticate(&self, challenge: &str, verifier: Option<&str>) -> Result<AuthUser> {
        let services = self.services()?;
        let storage = services.tokens.storage();
        let oauth = services.tokens.oauth();
        if let Some(verifier) = verifier {
            storage.save_pkce_verifier(verifier).await?;
        }

        let read_key = generate_read_key();
        let session = oauth.create_session(&read_key).await?;
        storage.save_oauth_state(&session.write_key).await?;
        self.host
            .open_external(&oauth.build_auth_url(challenge, &session.write_key));

        let control = PollControl::new();
        control.set_visible(self.ui_visible.load(Ordering::SeqCst));
        self.set_poll(Some(control.clone()));
        let polled = oauth
            .poll_for_tokens(&read_key, self.poll_options, &control, |status| {
                self.post(OutboundMessage::AuthPollingStatus {
                    status: status.to_string(),
                })
            })
            .await;
        self.set_poll(None);
        let polled = polled?;

        storage
            .save_tokens(&AuthTokens {
                access_token: polled.access_token,
                refresh_token: polled.refresh_token,
                expires_at: now_secs() + POLLED_TOKEN_LIFETIME_SECS,
            })
            .await?;
        storage.save_user(&polled.user).await?;
        info!(user_id = %polled.user.id, "signed in");
        Ok(polled.user)
    }

    /// Finish the redirect flow with an authorization code.
    pub async fn complete_redirect(&self, code: &str, state: &str) -> Result<AuthUser> {
        let services = self.services()?;
        let storage = services.tokens.storage();
        let oauth = services.tokens.oauth();
        if storage.oauth_state().await?.as_deref() != Some(state) {
            return Err(AuthError::Rejected("Invalid state parameter".to_string()).into());
        }
        let verifier = storage
            .pkce_verifier()
            .await?
            .ok_or_else(|| AuthError::Rejected("Missing PKCE verifier".to_string()))?;

        let response = oauth.exchange_code_for_token(code, &verifier).await?;
        let user = match response.user {
            Some(user) => user,
            None => oauth.user_info(&response.access_token).await?,
        };
        storage
            .save_tokens(&AuthTokens {
                access_token: response.access_token,
                refresh_token: response.refresh_token,
                expires_at: now_secs() + response.expires_in,
            })
            .await?;
        storage.save_user(&user).await?;
        info!(user_id = %user.id, "signed in");
        Ok(user)
    }

    /// Stop a running login poll.
    pub fn cancel_auth(&self) {
        if let Some(control) = self.take_poll() {
            info!("login cancelled");
            control.cancel();
        }
    }

    /// Polling pauses while the UI is hidden.
    pub fn set_ui_visible(&self, visible: bool) {
        self.ui_visible.store(visible, Ordering::SeqCst);
        if let Ok(poll) = self.auth_poll.lock() {
            if let Some(control) = poll.as_ref() {
                control.set_visible(visible);
            }
        }
    }

    /// Revoke the refresh token and forget all auth data. Stored auth is
    /// cleared even when revocation fails.
    pub async fn logout(&self) -> Result<()> {
        let services = self.services()?;
        match services.tokens.storage().tokens().await {
            Ok(Some(tokens)) => services.tokens.oauth().revoke_token(&tokens.refresh_token).await,
            Ok(None) => {}
            Err(err) => warn!(error = %err, "failed to read tokens for revocation"),
        }
        services.tokens.clear().await?;
        info!("signed out");
        Ok(())
    }

    fn set_poll(&self, control: Option<PollControl>) {
        if let Ok(mut poll) = self.auth_poll.lock() {
            *poll = control;
        }
    }

    fn take_poll(&self) -> Option<PollControl> {
        self.auth_poll.lock().ok().and_then(|mut poll| poll.take())
    }
}

fn now_secs() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{image_node, TestHost};
    use scenecode_core::{Framework, ImageUploadMode, MemoryStorage};
    use std::time::Duration;
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Fixture {
        orchestrator: Orchestrator,
        host: Arc<TestHost>,
        storage: Arc<MemoryStorage>,
        rx: UnboundedReceiver<OutboundMessage>,
    }

    impl Fixture {
        fn new(selection: Vec<HostNode>) -> Self {
            let host = Arc::new(TestHost::new(selection));
            let storage = Arc::new(MemoryStorage::new());
            let (tx, rx) = unbounded_channel();
            let orchestrator = Orchestrator::new(host.clone(), Arc::new(tx), storage.clone());
            Self {
                orchestrator,
                host,
                storage,
                rx,
            }
        }

        fn with_backend(mut self, server: &MockServer) -> Self {
            let config = PluginConfig::new(server.uri(), "https://app.test");
            self.orchestrator = self
                .orchestrator
                .with_backend(&config)
                .unwrap()
                .with_poll_options(PollOptions {
                    interval: Duration::from_millis(10),
                    timeout: Duration::from_secs(5),
                });
            self
        }

        async fn sign_in(&self) {
            let auth = AuthStorage::new(self.storage.clone());
            auth.save_tokens(&AuthTokens {
                access_token: "tok".into(),
                refresh_token: "r1".into(),
                expires_at: now_secs() + 3600.0,
            })
            .await
            .unwrap();
            auth.save_user(&AuthUser {
                id: "u1".into(),
                email: "ada@example.com".into(),
                name: "Ada".into(),
            })
            .await
            .unwrap();
        }

        fn messages(&mut self) -> Vec<OutboundMessage> {
            let mut out = Vec::new();
            while let Ok(message) = self.rx.try_recv() {
                out.push(message);
            }
            out
        }
    }

    fn frame(id: &str, name: &str) -> HostNode {
        HostNode::new(id, name, "FRAME").with_geometry(0.0, 0.0, 100.0, 50.0)
    }

    fn count(messages: &[OutboundMessage], pred: impl Fn(&OutboundMessage) -> bool) -> usize {
        messages.iter().filter(|&m| pred(m)).count()
    }

    #[tokio::test]
    async fn test_run_posts_code() {
        let mut fx = Fixture::new(vec![frame("a", "Hero"), frame("b", "Footer")]);
        let data = fx
            .orchestrator
            .run(&PluginSettings::default())
            .await
            .unwrap()
            .unwrap();
        assert!(data.code.contains("<div"));
        assert_eq!(data.html_preview.size.width, 100.0);
        assert_eq!(data.html_preview.size.height, 100.0);
        assert_eq!(fx.orchestrator.state(), RunState::Succeeded);

        let messages = fx.messages();
        assert_eq!(messages.first(), Some(&OutboundMessage::ConversionStarted));
        assert!(matches!(messages[1], OutboundMessage::Code(_)));
        assert_eq!(
            messages.last(),
            Some(&OutboundMessage::ConversionComplete { success: true })
        );
    }

    #[tokio::test]
    async fn test_empty_selection_fails_and_resets() {
        let mut fx = Fixture::new(Vec::new());
        let err = fx
            .orchestrator
            .run(&PluginSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConversionError::EmptySelection));
        assert_eq!(fx.orchestrator.state(), RunState::Idle);
        let messages = fx.messages();
        assert!(messages.contains(&OutboundMessage::Error {
            error: "No layers selected".into()
        }));
        assert_eq!(
            messages.last(),
            Some(&OutboundMessage::ConversionComplete { success: false })
        );
    }

    #[tokio::test]
    async fn test_overlapping_run_is_ignored() {
        let mut fx = Fixture::new(vec![image_node("img")]);
        fx.host.set_export_delay(Duration::from_millis(50));
        let settings = PluginSettings {
            image_upload_mode: ImageUploadMode::Embed,
            ..Default::default()
        };

        let (first, second) = tokio::join!(fx.orchestrator.run(&settings), fx.orchestrator.run(&settings));
        assert!(first.unwrap().is_some());
        assert!(second.unwrap().is_none());
        let messages = fx.messages();
        assert_eq!(count(&messages, |m| matches!(m, OutboundMessage::Code(_))), 1);

        // the guard is released afterwards
        assert!(fx.orchestrator.run(&settings).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_warnings_reset_each_run() {
        let hidden = HostNode {
            is_exportable: false,
            ..frame("x", "Ghost")
        };
        let fx = Fixture::new(vec![frame("a", "Hero"), hidden]);
        let settings = PluginSettings::default();
        let first = fx.orchestrator.run(&settings).await.unwrap().unwrap();
        let second = fx.orchestrator.run(&settings).await.unwrap().unwrap();
        assert_eq!(first.warnings.len(), 1);
        assert_eq!(second.warnings, first.warnings);
    }

    #[tokio::test]
    async fn test_uploads_are_cached_until_cleared() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/figma/imageUploadUrl"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uploadUrl": format!("{}/blob/photo", server.uri()),
                "publicUrl": "https://cdn.test/photo.png"
            })))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/blob/photo"))
            .respond_with(ResponseTemplate::new(201))
            .expect(2)
            .mount(&server)
            .await;
        let fx = Fixture::new(vec![image_node("img")]).with_backend(&server);
        let settings = PluginSettings::default();
        assert_eq!(settings.image_upload_mode, ImageUploadMode::Upload);

        let first = fx.orchestrator.run(&settings).await.unwrap().unwrap();
        assert!(first.code.contains("https://cdn.test/photo.png"));
        fx.orchestrator.run(&settings).await.unwrap();

        fx.orchestrator.handle_message(InboundMessage::ClearAssetCache).await;
        let third = fx.orchestrator.run(&settings).await.unwrap().unwrap();
        assert!(third.code.contains("https://cdn.test/photo.png"));
    }

    #[tokio::test]
    async fn test_settings_change_round_trip() {
        let mut fx = Fixture::new(Vec::new());
        fx.orchestrator.start().await.unwrap();
        fx.orchestrator
            .handle_json(r#"{"type": "pluginSettingWillChange", "key": "framework", "value": "SwiftUI"}"#)
            .await;
        fx.orchestrator
            .handle_json(r#"{"type": "pluginSettingWillChange", "key": "framework", "value": 7}"#)
            .await;
        assert_eq!(fx.orchestrator.settings().framework, Framework::SwiftUi);

        let messages = fx.messages();
        assert!(matches!(messages[0], OutboundMessage::PluginSettingsChanged { .. }));
        assert!(messages.contains(&OutboundMessage::SelectionState {
            has_selection: false,
            selection_name: "New Project".into(),
            selection_count: 0,
        }));
        let errors = count(&messages, |m| matches!(m, OutboundMessage::Error { .. }));
        assert_eq!(errors, 1);
    }

    #[tokio::test]
    async fn test_selection_state_uses_first_name() {
        let mut fx = Fixture::new(vec![frame("a", "Hero"), frame("b", "Footer")]);
        fx.orchestrator.selection_changed();
        assert_eq!(
            fx.messages(),
            [OutboundMessage::SelectionState {
                has_selection: true,
                selection_name: "Hero".into(),
                selection_count: 2,
            }]
        );
    }

    #[tokio::test]
    async fn test_export_without_backend() {
        let mut fx = Fixture::new(vec![frame("a", "Hero")]);
        fx.orchestrator.handle_message(InboundMessage::ExportRequested).await;
        assert!(fx.messages().contains(&OutboundMessage::ExportError {
            error: "Backend is not configured".into()
        }));
    }

    #[tokio::test]
    async fn test_export_rejects_large_selection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let selection = (0..4).map(|i| frame(&i.to_string(), "n")).collect();
        let mut fx = Fixture::new(selection).with_backend(&server);
        fx.sign_in().await;

        let err = fx
            .orchestrator
            .export_selection(&PluginSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConversionError::SelectionLimit { max: 3 }));
        let messages = fx.messages();
        assert!(messages.contains(&OutboundMessage::ExportError {
            error: "Please select a maximum of 3 elements to export".into()
        }));
        assert_eq!(count(&messages, |m| matches!(m, OutboundMessage::Code(_))), 0);
        assert_eq!(fx.orchestrator.state(), RunState::Idle);
    }

    #[tokio::test]
    async fn test_export_uploads_and_opens_link() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "f1"}, {"id": "f2"}])))
            .expect(1)
            .mount(&server)
            .await;
        let mut fx = Fixture::new(vec![frame("a", "Hero"), frame("b", "Footer")]).with_backend(&server);
        fx.sign_in().await;

        let id = fx
            .orchestrator
            .export_selection(&PluginSettings::default())
            .await
            .unwrap();
        assert_eq!(id.as_deref(), Some("f1"));
        let link = "https://app.test?attachmentPreloadIds=[f1]";
        assert_eq!(fx.host.opened(), [link]);
        assert!(fx.messages().contains(&OutboundMessage::ExportSuccess {
            attachment_id: "f1".into(),
            deep_link_url: link.into(),
        }));
    }

    #[tokio::test]
    async fn test_project_generation_stages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "f1"}])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "p1", "name": "Landing"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/conversations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "c1"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/infer/agent"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        let mut fx = Fixture::new(vec![frame("a", "Hero")]).with_backend(&server);
        fx.sign_in().await;

        fx.orchestrator
            .handle_message(InboundMessage::ProjectGenerationRequest {
                project_name: "Landing".into(),
                prompt: "Make it pop".into(),
            })
            .await;

        let messages = fx.messages();
        let stages: Vec<_> = messages
            .iter()
            .filter_map(|m| match m {
                OutboundMessage::ProjectGenerationProgress { stage, .. } => Some(*stage),
                _ => None,
            })
            .collect();
        assert_eq!(
            stages,
            [
                GenerationStage::Uploading,
                GenerationStage::Creating,
                GenerationStage::Generating
            ]
        );
        assert_eq!(
            messages.last(),
            Some(&OutboundMessage::ProjectGenerationSuccess {
                project_id: "p1".into(),
                deep_link_url: "https://app.test/project/p1".into(),
            })
        );
        assert_eq!(fx.host.opened(), ["https://app.test/project/p1"]);
    }

    #[tokio::test]
    async fn test_project_failure_reports_stage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "f1"}])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
            .mount(&server)
            .await;
        let mut fx = Fixture::new(vec![frame("a", "Hero")]).with_backend(&server);
        fx.sign_in().await;

        let err = fx
            .orchestrator
            .generate_project(&PluginSettings::default(), "Landing", "")
            .await
            .unwrap_err();
        assert!(!err.requires_reauthentication());
        assert_eq!(
            fx.messages().last(),
            Some(&OutboundMessage::ProjectGenerationError {
                error: "Failed to create project: 500 db down".into(),
                stage: GenerationStage::Creating,
            })
        );
        assert_eq!(fx.orchestrator.state(), RunState::Idle);
    }

    #[tokio::test]
    async fn test_export_requires_login() {
        let server = MockServer::start().await;
        let mut fx = Fixture::new(vec![frame("a", "Hero")]).with_backend(&server);
        let err = fx
            .orchestrator
            .export_selection(&PluginSettings::default())
            .await
            .unwrap_err();
        assert!(err.requires_reauthentication());
        assert!(fx.messages().contains(&OutboundMessage::ExportError {
            error: "No auth tokens found - user must log in".into()
        }));
    }

    #[tokio::test]
    async fn test_login_by_polling() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/oauth/session"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"writeKey": "w1", "expiresIn": 300})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex("^/api/oauth/session/[0-9a-f]{64}$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": "a1",
                "refreshToken": "r1",
                "user": {"id": "u1", "email": "ada@example.com", "name": "Ada"}
            })))
            .mount(&server)
            .await;
        let mut fx = Fixture::new(Vec::new()).with_backend(&server);

        fx.orchestrator
            .handle_message(InboundMessage::AuthInitiate {
                challenge: "c".into(),
                verifier: None,
            })
            .await;

        let opened = fx.host.opened();
        assert_eq!(opened.len(), 1);
        assert!(opened[0].starts_with("https://app.test/oauth/consent?"));
        assert!(opened[0].contains("state=w1"));
        let messages = fx.messages();
        assert!(matches!(messages.last(), Some(OutboundMessage::AuthComplete { user }) if user.id == "u1"));
        let state = fx.orchestrator.auth_state().await.unwrap();
        assert!(state.is_authenticated);
    }

    #[tokio::test]
    async fn test_login_can_be_cancelled() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/oauth/session"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"writeKey": "w1", "expiresIn": 300})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;
        let mut fx = Fixture::new(Vec::new()).with_backend(&server);

        let cancel = async {
            tokio::time::sleep(Duration::from_millis(60)).await;
            fx.orchestrator.handle_message(InboundMessage::AuthCancel).await;
        };
        tokio::join!(
            fx.orchestrator.handle_message(InboundMessage::AuthInitiate {
                challenge: "c".into(),
                verifier: None,
            }),
            cancel
        );

        let messages = fx.messages();
        assert!(messages
            .iter()
            .any(|m| matches!(m, OutboundMessage::AuthPollingStatus { .. })));
        assert_eq!(
            messages.last(),
            Some(&OutboundMessage::AuthError {
                error: "Authentication cancelled".into()
            })
        );
    }

    #[tokio::test]
    async fn test_redirect_checks_state() {
        let server = MockServer::start().await;
        let mut fx = Fixture::new(Vec::new()).with_backend(&server);
        let auth = AuthStorage::new(fx.storage.clone());
        auth.save_oauth_state("expected").await.unwrap();
        auth.save_pkce_verifier("v").await.unwrap();

        fx.orchestrator
            .handle_message(InboundMessage::AuthCallback {
                code: "code".into(),
                state: "forged".into(),
            })
            .await;
        assert_eq!(
            fx.messages(),
            [OutboundMessage::AuthError {
                error: "Invalid state parameter".into()
            }]
        );
    }

    #[tokio::test]
    async fn test_logout_clears_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/oauth/revoke"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        let mut fx = Fixture::new(Vec::new()).with_backend(&server);
        fx.sign_in().await;
        assert!(fx.orchestrator.auth_state().await.unwrap().is_authenticated);

        fx.orchestrator.handle_message(InboundMessage::Logout).await;
        assert_eq!(
            fx.messages(),
            [OutboundMessage::AuthStatus {
                auth_state: AuthState::default()
            }]
        );
        assert!(!fx.orchestrator.auth_state().await.unwrap().is_authenticated);
    }

    #[tokio::test]
    async fn test_codegen_blocks_use_stored_settings() {
        let fx = Fixture::new(Vec::new());
        let blocks = fx
            .orchestrator
            .codegen_blocks("tailwind_jsx", &frame("a", "Hero"))
            .await
            .unwrap();
        assert_eq!(blocks.len(), 3);
        assert!(fx
            .orchestrator
            .codegen_blocks("kotlin", &frame("a", "Hero"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_selection_json() {
        let mut fx = Fixture::new(vec![frame("a", "Hero")]);
        fx.orchestrator.handle_message(InboundMessage::GetSelectionJson).await;
        let messages = fx.messages();
        let Some(OutboundMessage::SelectionJson { data }) = messages.first() else {
            panic!("expected selection json, got {:?}", messages);
        };
        assert_eq!(data["json"][0]["name"], "Hero");
        assert!(data["newConversion"].is_array());

        let mut empty = Fixture::new(Vec::new());
        empty.orchestrator.handle_message(InboundMessage::GetSelectionJson).await;
        assert_eq!(
            empty.messages(),
            [OutboundMessage::SelectionJson {
                data: json!({"message": "No nodes selected"})
            }]
        );
    }

    #[tokio::test]
    async fn test_invalid_json_is_reported() {
        let mut fx = Fixture::new(Vec::new());
        fx.orchestrator.handle_json(r#"{"type": "teleport"}"#).await;
        assert!(matches!(
            fx.messages().as_slice(),
            [OutboundMessage::Error { error }] if error.starts_with("Invalid message")
        ));
    }
}

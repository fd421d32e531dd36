//! The message protocol between the plugin core and its UI.
//!
//! Both directions are JSON objects tagged by a `type` field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use scenecode_backend::{AuthState, AuthUser, BackendConfig};
use scenecode_core::PluginSettings;
use scenecode_style::{LinearGradientConversion, SolidColorConversion};

/// Messages the UI sends to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InboundMessage {
    PreviewRequested,
    ExportRequested,
    #[serde(rename_all = "camelCase")]
    ProjectGenerationRequest { project_name: String, prompt: String },
    #[serde(rename = "pluginSettingWillChange")]
    PluginSettingWillChange { key: String, value: Value },
    ConfigureImageUpload { config: BackendConfig },
    GetSelectionJson,
    /// Start a login. `verifier` enables the redirect flow.
    AuthInitiate {
        challenge: String,
        #[serde(default)]
        verifier: Option<String>,
    },
    /// Authorization code delivered by the redirect flow.
    AuthCallback { code: String, state: String },
    /// The auth dialog was closed.
    AuthCancel,
    Logout,
    AuthStatusRequest,
    UiVisibility { visible: bool },
    /// Forget uploaded image URLs so the next run uploads again.
    ClearAssetCache,
}

/// Messages the core sends to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OutboundMessage {
    #[serde(rename = "conversionStarted")]
    ConversionStarted,
    Code(ConversionData),
    Error { error: String },
    ConversionComplete { success: bool },
    #[serde(rename_all = "camelCase")]
    ExportSuccess { attachment_id: String, deep_link_url: String },
    ExportError { error: String },
    ProjectGenerationProgress { stage: GenerationStage, message: String },
    #[serde(rename_all = "camelCase")]
    ProjectGenerationSuccess { project_id: String, deep_link_url: String },
    ProjectGenerationError { error: String, stage: GenerationStage },
    #[serde(rename_all = "camelCase")]
    SelectionState {
        has_selection: bool,
        selection_name: String,
        selection_count: usize,
    },
    SelectionJson { data: Value },
    #[serde(rename = "pluginSettingsChanged")]
    PluginSettingsChanged { settings: PluginSettings },
    #[serde(rename_all = "camelCase")]
    AuthStatus { auth_state: AuthState },
    AuthComplete { user: AuthUser },
    AuthError { error: String },
    AuthPollingStatus { status: String },
}

/// Everything the UI shows after a successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionData {
    pub code: String,
    pub settings: PluginSettings,
    pub html_preview: HtmlPreview,
    pub colors: Vec<SolidColorConversion>,
    pub gradients: Vec<LinearGradientConversion>,
    pub warnings: Vec<String>,
}

/// Rendered HTML of the selection and the box it needs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HtmlPreview {
    pub size: PreviewSize,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PreviewSize {
    pub width: f64,
    pub height: f64,
}

/// Steps of project generation, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStage {
    Uploading,
    Creating,
    Generating,
}

impl GenerationStage {
    /// Progress text shown while the stage runs.
    pub fn message(&self) -> &'static str {
        match self {
            GenerationStage::Uploading => "Uploading files...",
            GenerationStage::Creating => "Creating project...",
            GenerationStage::Generating => "Starting generation...",
        }
    }
}

//! User settings that drive a conversion run.
//!
//! Settings are immutable for the duration of a run. They persist as a
//! single JSON blob; loading merges the stored blob against the defaults one
//! key at a time, accepting a stored value only if it has the same JSON type
//! as the default and deserializes for that key. This tolerates schema drift
//! between plugin versions in both directions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SettingsError;

/// Storage key under which settings are persisted.
pub const SETTINGS_STORAGE_KEY: &str = "userPluginSettings";

/// Target output framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Framework {
    #[default]
    #[serde(rename = "HTML")]
    Html,
    Tailwind,
    Flutter,
    #[serde(rename = "SwiftUI")]
    SwiftUi,
}

impl Framework {
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Html => "HTML",
            Framework::Tailwind => "Tailwind",
            Framework::Flutter => "Flutter",
            Framework::SwiftUi => "SwiftUI",
        }
    }
}

/// Markup syntax for the HTML generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HtmlGenerationMode {
    #[default]
    Html,
    Jsx,
    StyledComponents,
    Svelte,
}

/// Markup syntax for the Tailwind generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TailwindGenerationMode {
    Html,
    #[default]
    Jsx,
}

/// Scope of generated Flutter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlutterGenerationMode {
    FullApp,
    Stateless,
    #[default]
    Snippet,
}

/// Scope of generated SwiftUI code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwiftUiGenerationMode {
    Preview,
    Struct,
    #[default]
    Snippet,
}

/// How raster images and non-embedded vectors are referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageUploadMode {
    /// Upload to the backend and reference the public URL
    #[default]
    Upload,
    /// Reference a sized stand-in image, no network
    Placeholder,
    /// Inline exported bytes as data URIs, no network
    Embed,
}

/// Per-run plugin configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginSettings {
    pub framework: Framework,
    pub show_layer_names: bool,
    pub responsive_root: bool,
    pub flutter_generation_mode: FlutterGenerationMode,
    #[serde(rename = "swiftUIGenerationMode")]
    pub swiftui_generation_mode: SwiftUiGenerationMode,
    pub html_generation_mode: HtmlGenerationMode,
    pub tailwind_generation_mode: TailwindGenerationMode,
    pub round_tailwind_values: bool,
    pub round_tailwind_colors: bool,
    pub use_color_variables: bool,
    pub custom_tailwind_prefix: String,
    pub image_upload_mode: ImageUploadMode,
    pub embed_vectors: bool,
    pub base_font_size: f64,
    pub use_tailwind4: bool,
    /// Maximum relative error (percent) when snapping to the Tailwind scale
    pub threshold_percent: f64,
    pub base_font_family: String,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            framework: Framework::Html,
            show_layer_names: false,
            responsive_root: false,
            flutter_generation_mode: FlutterGenerationMode::Snippet,
            swiftui_generation_mode: SwiftUiGenerationMode::Snippet,
            html_generation_mode: HtmlGenerationMode::Html,
            tailwind_generation_mode: TailwindGenerationMode::Jsx,
            round_tailwind_values: true,
            round_tailwind_colors: true,
            use_color_variables: true,
            custom_tailwind_prefix: String::new(),
            image_upload_mode: ImageUploadMode::Upload,
            embed_vectors: true,
            base_font_size: 16.0,
            use_tailwind4: false,
            threshold_percent: 15.0,
            base_font_family: String::new(),
        }
    }
}

impl PluginSettings {
    /// Merge a stored settings blob against the defaults.
    ///
    /// Keys that are missing, of the wrong JSON type, or invalid for their
    /// setting keep their default value. Unknown stored keys are ignored.
    pub fn from_stored(stored: Option<&Value>) -> Self {
        let mut settings = Self::default();
        let Some(Value::Object(stored)) = stored else {
            return settings;
        };
        for (key, value) in stored {
            if let Err(err) = settings.apply_change(key, value.clone()) {
                tracing::debug!(%key, error = %err, "ignoring stored setting");
            }
        }
        settings
    }

    /// Apply a single-key change with the same validation as loading.
    pub fn apply_change(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        let mut current = self.to_map();
        let default = current
            .get(key)
            .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;

        if json_type(default) != json_type(&value) {
            return Err(SettingsError::TypeMismatch {
                key: key.to_string(),
                expected: json_type(default),
            });
        }

        current.insert(key.to_string(), value);
        let updated: PluginSettings =
            serde_json::from_value(Value::Object(current)).map_err(|e| SettingsError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        *self = updated;
        Ok(())
    }

    /// Serialize to a JSON value for persistence or messaging.
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }

    fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! Core types for scenecode.
//!
//! This crate defines the pieces every conversion stage shares:
//!
//! - [`HostNode`] - the read-only host scene graph and its export capability
//! - [`PluginSettings`] - per-run configuration and its persistence rules
//! - [`WarningSink`] - session-scoped, run-cleared user warnings
//! - [`AssetReference`] - how generated code points at images and vectors
//! - [`ClientStorage`] - persistent key/value storage provided by the host

pub mod asset;
pub mod error;
pub mod host;
pub mod settings;
pub mod storage;
pub mod types;
pub mod warnings;

pub use asset::{placeholder_url, AssetReference};
pub use error::{HostError, SettingsError, StorageError};
pub use host::{
    CounterAxisAlign, Effect, EffectType, ExportConstraint, ExportFormat, ExportSettings, Host,
    HostExporter, HostGradientStop, HostLayoutMode, HostNode, HostSizing, LayoutPositioning,
    LayoutWrap, Paint, PaintType, PrimaryAxisAlign, StrokeAlign, StyledSegment, TypeStyle,
};
pub use settings::{
    FlutterGenerationMode, Framework, HtmlGenerationMode, ImageUploadMode, PluginSettings,
    SwiftUiGenerationMode, TailwindGenerationMode, SETTINGS_STORAGE_KEY,
};
pub use storage::{ClientStorage, MemoryStorage};
pub use types::{Point, Rect, Rgb, Rgba};
pub use warnings::WarningSink;

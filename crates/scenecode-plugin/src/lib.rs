//! Plugin core for scenecode.
//!
//! The [`Orchestrator`] turns the host selection into code for the chosen
//! framework and talks to the UI through [`InboundMessage`] and
//! [`OutboundMessage`]:
//!
//! - preview runs: normalize, resolve assets, generate, report
//! - exports and project generation against the backend
//! - login, logout and auth status
//! - persisted settings
//!
//! Only one run, export or project generation is in flight at a time.

pub mod codegen_mode;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod messages;
pub mod orchestrator;
pub mod preview;
pub mod settings;
pub mod state;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;

pub use codegen_mode::{blocks_for, color_list, BlockLanguage, CodegenBlock, PanelLanguage};
pub use config::PluginConfig;
pub use error::{ConversionError, Result};
pub use export::{CONVERSATION_NAME, MAX_EXPORT_NODES};
pub use logging::init_tracing;
pub use messages::{ConversionData, GenerationStage, HtmlPreview, InboundMessage, OutboundMessage, PreviewSize};
pub use orchestrator::{Orchestrator, DEFAULT_SELECTION_NAME};
pub use preview::{html_preview, preview_size};
pub use settings::SettingsStore;
pub use state::{FlightGuard, RunState, SingleFlight};
pub use ui::UiSink;

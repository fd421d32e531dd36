//! Code generation for scenecode.
//!
//! Turns intermediate node trees into source code:
//!
//! - [`generate_code`] - dispatch on the configured framework
//! - [`HtmlGenerator`] - HTML, JSX, styled-components and Svelte with CSS
//! - [`TailwindGenerator`] - HTML or JSX with Tailwind utility classes
//! - [`FlutterGenerator`] - Flutter widget trees
//! - [`SwiftUiGenerator`] - SwiftUI views
//! - [`retrieve_colors`] / [`retrieve_gradients`] - the color panel
//!
//! Generators never mutate their input and never touch the host.

pub mod error;
pub mod generators;
pub mod naming;
pub mod retrieve;
pub mod text_styles;

pub use error::{CodegenError, Result};
pub use generators::{
    css_typography, generate_code, generator_for, tailwind_typography, CodeGenerator,
    FlutterGenerator, GeneratedCode, HtmlGenerator, SwiftUiGenerator, TailwindGenerator,
    TailwindScale, TemplateEngine,
};
pub use naming::{class_name, type_name, UniqueNames};
pub use retrieve::{retrieve_colors, retrieve_gradients};
pub use text_styles::{distinct_typographies, text_styles_report, typography_label};

//! Style and color resolution.
//!
//! Turns host paints, effects and text styles into a
//! [`StyleDescriptor`] that generators consume, names colors against the
//! Tailwind palette, and formats colors and gradients for each target.

pub mod color;
pub mod descriptor;
pub mod gradient;
pub mod literals;
pub mod palette;
pub mod resolver;
pub mod typography;

pub use color::{
    color_export_value, resolve_color_name, tailwind_color_token, LinearGradientConversion,
    NamedColor, SolidColorConversion,
};
pub use descriptor::{
    css_variable_name, ColorSource, ColorSpec, CornerRadius, Fill, Shadow, StyleDescriptor, Stroke,
};
pub use gradient::{GradientKind, GradientSpec, GradientStop};
pub use literals::{css_color, flutter_color, format_number, swiftui_color};
pub use resolver::{resolve_fill, resolve_solid, resolve_style};
pub use typography::{FontWeight, LineHeight, TextAlign, TextCase, TextDecoration, Typography};

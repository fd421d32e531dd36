//! Layout translation for scenecode.
//!
//! Converts host auto-layout and absolute positioning into a
//! [`LayoutBox`]: either an absolute frame or a directional container with
//! a fixed/fill/hug sizing policy per child.

pub mod layout_box;
pub mod translate;

pub use layout_box::{
    Alignment, Axis, ChildSizing, DirectionalLayout, Distribution, LayoutBox, Padding, SizePolicy,
};
pub use translate::{child_sizing, layout_children, relative_frame, translate_layout};

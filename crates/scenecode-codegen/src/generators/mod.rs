//! Code generators for each target framework.
//!
//! Every generator is a pure function of the intermediate tree and the
//! settings: it reads both and returns text, nothing else.

mod flutter;
mod html;
mod markup;
mod swiftui;
mod syntax;
mod tailwind;
mod templates;

pub use flutter::FlutterGenerator;
pub use html::{css_typography, HtmlGenerator};
pub use swiftui::SwiftUiGenerator;
pub use syntax::{
    syntax_for, Element, HtmlSyntax, JsxSyntax, MarkupSyntax, StyleRule, StyleSheet,
    StyledComponentsSyntax, SvelteSyntax,
};
pub use tailwind::{tailwind_typography, TailwindGenerator, TailwindScale};
pub use templates::{indent, TemplateEngine};

use serde::{Deserialize, Serialize};

use scenecode_core::{AssetReference, Framework, PluginSettings};
use scenecode_layout::{Axis, ChildSizing, DirectionalLayout, SizePolicy};
use scenecode_normalize::IntermediateNode;
use scenecode_normalize::TextRun;
use scenecode_style::ColorSpec;

use crate::error::{CodegenError, Result};

/// Output of one generator run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCode {
    pub code: String,
    /// Every distinct text style in the tree, formatted for the target
    pub text_styles: String,
}

/// Common trait for code generators.
pub trait CodeGenerator: Send + Sync {
    /// Target framework.
    fn framework(&self) -> Framework;

    /// Render the trees into source code and a text styles report.
    fn generate(&self, nodes: &[IntermediateNode], settings: &PluginSettings) -> Result<GeneratedCode>;
}

/// The generator for a framework.
pub fn generator_for(framework: Framework) -> Box<dyn CodeGenerator> {
    match framework {
        Framework::Html => Box::new(HtmlGenerator::new()),
        Framework::Tailwind => Box::new(TailwindGenerator::new()),
        Framework::Flutter => Box::new(FlutterGenerator::new()),
        Framework::SwiftUi => Box::new(SwiftUiGenerator::new()),
    }
}

/// Generate code for the framework selected in `settings`.
pub fn generate_code(nodes: &[IntermediateNode], settings: &PluginSettings) -> Result<GeneratedCode> {
    if nodes.is_empty() {
        return Err(CodegenError::EmptyTree);
    }
    let generator = generator_for(settings.framework);
    tracing::debug!(
        framework = generator.framework().as_str(),
        roots = nodes.len(),
        "generating code"
    );
    generator.generate(nodes, settings)
}

/// Where a node sits relative to its parent.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Placement<'a> {
    /// A selected top-level node
    Root,
    /// A child in an auto-layout flow
    Flow {
        layout: &'a DirectionalLayout,
        sizing: ChildSizing,
    },
    /// A child positioned at an explicit offset
    Absolute {
        x: f64,
        y: f64,
        /// Whether the parent lays the other children out in a flow
        in_flow_parent: bool,
    },
}

impl<'a> Placement<'a> {
    pub(crate) fn of_child(parent: &'a IntermediateNode, index: usize, child: &IntermediateNode) -> Self {
        let frame = child.layout.frame();
        match parent.layout.as_directional() {
            Some(layout) => {
                let sizing = parent.layout.child_sizing(index);
                if sizing.absolute {
                    Placement::Absolute {
                        x: frame.x,
                        y: frame.y,
                        in_flow_parent: true,
                    }
                } else {
                    Placement::Flow { layout, sizing }
                }
            }
            None => Placement::Absolute {
                x: frame.x,
                y: frame.y,
                in_flow_parent: false,
            },
        }
    }

    /// Main axis of the parent flow, if any.
    pub(crate) fn flow_axis(&self) -> Option<Axis> {
        match self {
            Placement::Flow { layout, .. } => Some(layout.axis),
            _ => None,
        }
    }
}

/// Resolved size along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Dimension {
    Fixed(f64),
    /// Stretch to the available space
    Fill,
    /// Size to content
    Auto,
}

/// Width and height of a node in its placement.
pub(crate) fn dimensions(
    node: &IntermediateNode,
    placement: Placement<'_>,
    settings: &PluginSettings,
) -> (Dimension, Dimension) {
    let width = Dimension::Fixed(node.width());
    let height = Dimension::Fixed(node.height());
    match placement {
        Placement::Root if settings.responsive_root => (Dimension::Fill, height),
        Placement::Root | Placement::Absolute { .. } => (width, height),
        Placement::Flow { sizing, .. } => (
            from_policy(sizing.horizontal, width),
            from_policy(sizing.vertical, height),
        ),
    }
}

fn from_policy(policy: SizePolicy, fixed: Dimension) -> Dimension {
    match policy {
        SizePolicy::Fixed => fixed,
        SizePolicy::Fill => Dimension::Fill,
        SizePolicy::Hug => Dimension::Auto,
    }
}

/// Children a generator walks into.
pub(crate) fn rendered_children(node: &IntermediateNode) -> &[IntermediateNode] {
    if node.renders_children() {
        &node.children
    } else {
        &[]
    }
}

/// The node's asset, or a sized placeholder when none was resolved.
pub(crate) fn asset_or_placeholder(node: &IntermediateNode) -> AssetReference {
    node.asset()
        .cloned()
        .unwrap_or_else(|| AssetReference::placeholder(node.width(), node.height()))
}

/// Color of a text run, falling back to the node's own fill.
pub(crate) fn run_color<'a>(node: &'a IntermediateNode, run: &'a TextRun) -> Option<&'a ColorSpec> {
    run.color.as_ref().or_else(|| node.style.solid_fill())
}

/// Indent every line after the first.
pub(crate) fn hang(content: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    content
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || line.is_empty() {
                line.to_string()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Type name for the generated component, from the first root.
pub(crate) fn component_name(nodes: &[IntermediateNode]) -> String {
    match nodes {
        [single] => crate::naming::type_name(&single.name),
        _ => "GeneratedComponent".to_string(),
    }
}

//! The tree walk shared by the markup generators.

use scenecode_core::PluginSettings;
use scenecode_normalize::{IntermediateNode, NodeKind, TextData, TextRun};

use super::syntax::{Element, MarkupSyntax, StyleSheet};
use super::{asset_or_placeholder, rendered_children, Placement};
use crate::naming::{class_name, type_name, UniqueNames};

/// Turns a node into styles on an element.
pub(crate) trait Styler {
    /// Layout and box styles, plus text styles for single-run text.
    fn style_node(&self, node: &IntermediateNode, placement: Placement<'_>, element: &mut Element);

    /// Styles of one run in mixed-style text.
    fn style_run(&self, node: &IntermediateNode, run: &TextRun, element: &mut Element);
}

/// Walk the roots and write markup with the given syntax and styler.
pub(crate) fn render_markup(
    nodes: &[IntermediateNode],
    settings: &PluginSettings,
    syntax: &dyn MarkupSyntax,
    styler: &dyn Styler,
) -> String {
    let mut walk = MarkupWalk {
        settings,
        syntax,
        styler,
        class_names: UniqueNames::new(),
        component_names: UniqueNames::new(),
        sheet: StyleSheet::new(),
        lines: Vec::new(),
    };
    for node in nodes {
        walk.node(node, Placement::Root, 0);
    }
    let MarkupWalk { sheet, lines, .. } = walk;
    syntax.finish(lines, &sheet)
}

struct MarkupWalk<'a> {
    settings: &'a PluginSettings,
    syntax: &'a dyn MarkupSyntax,
    styler: &'a dyn Styler,
    class_names: UniqueNames,
    component_names: UniqueNames,
    sheet: StyleSheet,
    lines: Vec<String>,
}

impl MarkupWalk<'_> {
    fn element(&mut self, tag: &'static str, name: &str) -> Element {
        let mut element = Element::new(tag);
        element.class_name = self.class_names.claim(&class_name(name));
        element.component_name = self.component_names.claim(&type_name(name));
        element.show_name = self.settings.show_layer_names;
        element
    }

    fn node(&mut self, node: &IntermediateNode, placement: Placement<'_>, depth: usize) {
        match &node.kind {
            NodeKind::Text(text) => self.text(node, text, placement, depth),
            NodeKind::Unknown { .. } => self.picture(node, placement, depth),
            _ if node.is_picture() && !node.renders_children() => self.picture(node, placement, depth),
            _ => self.container(node, placement, depth),
        }
    }

    fn container(&mut self, node: &IntermediateNode, placement: Placement<'_>, depth: usize) {
        let pad = "  ".repeat(depth);
        let mut element = self.element("div", &node.name);
        self.styler.style_node(node, placement, &mut element);
        let open = self.syntax.open(&element, &mut self.sheet);
        let close = self.syntax.close(&element);

        let children = rendered_children(node);
        if children.is_empty() {
            self.lines.push(format!("{}{}{}", pad, open, close));
            return;
        }
        self.lines.push(format!("{}{}", pad, open));
        for (index, child) in children.iter().enumerate() {
            self.node(child, Placement::of_child(node, index, child), depth + 1);
        }
        self.lines.push(format!("{}{}", pad, close));
    }

    fn picture(&mut self, node: &IntermediateNode, placement: Placement<'_>, depth: usize) {
        let pad = "  ".repeat(depth);
        let mut element = self.element("img", &node.name);
        self.styler.style_node(node, placement, &mut element);
        element.attribute("src", asset_or_placeholder(node).url());
        element.attribute("alt", node.name.clone());
        let tag = self.syntax.open(&element, &mut self.sheet);
        self.lines.push(format!("{}{}", pad, tag));
    }

    fn text(&mut self, node: &IntermediateNode, text: &TextData, placement: Placement<'_>, depth: usize) {
        let pad = "  ".repeat(depth);
        let mut element = self.element("div", &node.name);
        self.styler.style_node(node, placement, &mut element);
        let open = self.syntax.open(&element, &mut self.sheet);
        let close = self.syntax.close(&element);

        if !text.is_mixed() {
            let content = self.syntax.text(&text.characters);
            self.lines.push(format!("{}{}{}{}", pad, open, content, close));
            return;
        }

        self.lines.push(format!("{}{}", pad, open));
        for run in &text.runs {
            let mut span = self.element("span", &format!("{} span", node.name));
            span.show_name = false;
            self.styler.style_run(node, run, &mut span);
            let span_open = self.syntax.open(&span, &mut self.sheet);
            let span_close = self.syntax.close(&span);
            let content = self.syntax.text(&run.characters);
            self.lines.push(format!("{}  {}{}{}", pad, span_open, content, span_close));
        }
        self.lines.push(format!("{}{}", pad, close));
    }
}

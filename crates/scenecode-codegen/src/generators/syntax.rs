//! Output syntaxes for markup generators.
//!
//! The HTML and Tailwind generators share one tree walk; a
//! [`MarkupSyntax`] decides how each element, its styles and its text are
//! written, and what wraps the finished markup.

use convert_case::{Case, Casing};
use indexmap::IndexMap;

use scenecode_core::{HtmlGenerationMode, PluginSettings, TailwindGenerationMode};

/// One element ready to be written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    /// Unique kebab-case name from the layer name
    pub class_name: String,
    /// Unique PascalCase name from the layer name
    pub component_name: String,
    /// Include the layer name as a class
    pub show_name: bool,
    /// CSS declarations in order
    pub declarations: Vec<(String, String)>,
    /// Utility classes
    pub classes: Vec<String>,
    pub attributes: Vec<(&'static str, String)>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            ..Default::default()
        }
    }

    pub fn declare(&mut self, property: &str, value: impl Into<String>) {
        self.declarations.push((property.to_string(), value.into()));
    }

    pub fn class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !class.is_empty() {
            self.classes.push(class);
        }
    }

    pub fn attribute(&mut self, name: &'static str, value: impl Into<String>) {
        self.attributes.push((name, value.into()));
    }

    /// Elements written as a single self-closing tag.
    pub fn is_void(&self) -> bool {
        matches!(self.tag, "img" | "br")
    }

    fn class_list(&self) -> Vec<&str> {
        let mut list = Vec::new();
        if self.show_name && !self.class_name.is_empty() {
            list.push(self.class_name.as_str());
        }
        list.extend(self.classes.iter().map(String::as_str));
        list
    }
}

/// A named style rule collected for syntaxes that emit stylesheets.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub tag: &'static str,
    pub declarations: Vec<(String, String)>,
}

/// Rules in first-use order, keyed by name.
pub type StyleSheet = IndexMap<String, StyleRule>;

/// How markup is spelled.
pub trait MarkupSyntax: Send + Sync {
    /// Opening tag, or the whole tag for void elements.
    fn open(&self, element: &Element, sheet: &mut StyleSheet) -> String;

    fn close(&self, element: &Element) -> String;

    /// Escape text content.
    fn text(&self, text: &str) -> String;

    /// Wrap the finished markup lines.
    fn finish(&self, lines: Vec<String>, sheet: &StyleSheet) -> String;
}

/// The syntax for a framework's generation mode.
pub fn syntax_for_html(mode: HtmlGenerationMode) -> Box<dyn MarkupSyntax> {
    match mode {
        HtmlGenerationMode::Html => Box::new(HtmlSyntax),
        HtmlGenerationMode::Jsx => Box::new(JsxSyntax),
        HtmlGenerationMode::StyledComponents => Box::new(StyledComponentsSyntax),
        HtmlGenerationMode::Svelte => Box::new(SvelteSyntax),
    }
}

/// The syntax used by the generator selected in `settings`.
pub fn syntax_for(settings: &PluginSettings, tailwind: bool) -> Box<dyn MarkupSyntax> {
    if tailwind {
        match settings.tailwind_generation_mode {
            TailwindGenerationMode::Html => Box::new(HtmlSyntax),
            TailwindGenerationMode::Jsx => Box::new(JsxSyntax),
        }
    } else {
        syntax_for_html(settings.html_generation_mode)
    }
}

/// Plain HTML with inline `style` attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSyntax;

impl MarkupSyntax for HtmlSyntax {
    fn open(&self, element: &Element, _sheet: &mut StyleSheet) -> String {
        let mut attrs = Vec::new();
        let classes = element.class_list();
        if !classes.is_empty() {
            attrs.push(format!("class=\"{}\"", classes.join(" ")));
        }
        if !element.declarations.is_empty() {
            attrs.push(format!("style=\"{}\"", inline_css(&element.declarations)));
        }
        attrs.extend(plain_attributes(element));
        tag(element, &attrs)
    }

    fn close(&self, element: &Element) -> String {
        format!("</{}>", element.tag)
    }

    fn text(&self, text: &str) -> String {
        escape_markup(text, false)
    }

    fn finish(&self, lines: Vec<String>, _sheet: &StyleSheet) -> String {
        lines.join("\n")
    }
}

/// JSX with `className` and style objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsxSyntax;

impl MarkupSyntax for JsxSyntax {
    fn open(&self, element: &Element, _sheet: &mut StyleSheet) -> String {
        let mut attrs = Vec::new();
        let classes = element.class_list();
        if !classes.is_empty() {
            attrs.push(format!("className=\"{}\"", classes.join(" ")));
        }
        if !element.declarations.is_empty() {
            attrs.push(format!("style={{{{{}}}}}", style_object(&element.declarations)));
        }
        attrs.extend(plain_attributes(element));
        tag(element, &attrs)
    }

    fn close(&self, element: &Element) -> String {
        format!("</{}>", element.tag)
    }

    fn text(&self, text: &str) -> String {
        escape_markup(text, true)
    }

    fn finish(&self, lines: Vec<String>, _sheet: &StyleSheet) -> String {
        lines.join("\n")
    }
}

/// styled-components: one styled component per styled element.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyledComponentsSyntax;

impl StyledComponentsSyntax {
    fn tag_name<'e>(&self, element: &'e Element) -> &'e str {
        if element.declarations.is_empty() {
            element.tag
        } else {
            &element.component_name
        }
    }
}

impl MarkupSyntax for StyledComponentsSyntax {
    fn open(&self, element: &Element, sheet: &mut StyleSheet) -> String {
        if !element.declarations.is_empty() {
            sheet.insert(
                element.component_name.clone(),
                StyleRule {
                    tag: element.tag,
                    declarations: element.declarations.clone(),
                },
            );
        }
        let mut attrs = Vec::new();
        let classes = element.class_list();
        if !classes.is_empty() {
            attrs.push(format!("className=\"{}\"", classes.join(" ")));
        }
        attrs.extend(plain_attributes(element));
        let name = self.tag_name(element);
        if element.is_void() {
            format!("<{}{} />", name, join_attributes(&attrs))
        } else {
            format!("<{}{}>", name, join_attributes(&attrs))
        }
    }

    fn close(&self, element: &Element) -> String {
        format!("</{}>", self.tag_name(element))
    }

    fn text(&self, text: &str) -> String {
        escape_markup(text, true)
    }

    fn finish(&self, lines: Vec<String>, sheet: &StyleSheet) -> String {
        let mut out = vec!["import styled from \"styled-components\";".to_string(), String::new()];
        for (name, rule) in sheet {
            out.push(format!("const {} = styled.{}`", name, rule.tag));
            for (property, value) in &rule.declarations {
                out.push(format!("  {}: {};", property, value));
            }
            out.push("`;".to_string());
            out.push(String::new());
        }
        out.extend(lines);
        out.join("\n")
    }
}

/// Svelte markup with a scoped `<style>` block.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvelteSyntax;

impl MarkupSyntax for SvelteSyntax {
    fn open(&self, element: &Element, sheet: &mut StyleSheet) -> String {
        let mut classes = element.class_list();
        if !element.declarations.is_empty() {
            sheet.insert(
                element.class_name.clone(),
                StyleRule {
                    tag: element.tag,
                    declarations: element.declarations.clone(),
                },
            );
            if !classes.contains(&element.class_name.as_str()) {
                classes.insert(0, element.class_name.as_str());
            }
        }
        let mut attrs = Vec::new();
        if !classes.is_empty() {
            attrs.push(format!("class=\"{}\"", classes.join(" ")));
        }
        attrs.extend(plain_attributes(element));
        tag(element, &attrs)
    }

    fn close(&self, element: &Element) -> String {
        format!("</{}>", element.tag)
    }

    fn text(&self, text: &str) -> String {
        escape_markup(text, true)
    }

    fn finish(&self, mut lines: Vec<String>, sheet: &StyleSheet) -> String {
        if !sheet.is_empty() {
            lines.push(String::new());
            lines.push("<style>".to_string());
            for (name, rule) in sheet {
                lines.push(format!("  .{} {{", name));
                for (property, value) in &rule.declarations {
                    lines.push(format!("    {}: {};", property, value));
                }
                lines.push("  }".to_string());
            }
            lines.push("</style>".to_string());
        }
        lines.join("\n")
    }
}

fn tag(element: &Element, attrs: &[String]) -> String {
    if element.is_void() {
        format!("<{}{} />", element.tag, join_attributes(attrs))
    } else {
        format!("<{}{}>", element.tag, join_attributes(attrs))
    }
}

fn join_attributes(attrs: &[String]) -> String {
    attrs.iter().map(|a| format!(" {}", a)).collect()
}

fn plain_attributes(element: &Element) -> impl Iterator<Item = String> + '_ {
    element
        .attributes
        .iter()
        .map(|(name, value)| format!("{}=\"{}\"", name, escape_attribute(value)))
}

fn inline_css(declarations: &[(String, String)]) -> String {
    declarations
        .iter()
        .map(|(p, v)| format!("{}: {}", p, v.replace('"', "'")))
        .collect::<Vec<_>>()
        .join("; ")
}

fn style_object(declarations: &[(String, String)]) -> String {
    declarations
        .iter()
        .map(|(p, v)| {
            format!(
                "{}: \"{}\"",
                p.to_case(Case::Camel),
                v.replace('\\', "\\\\").replace('"', "\\\"")
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

fn escape_markup(text: &str, braces: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '{' if braces => out.push_str("&#123;"),
            '}' if braces => out.push_str("&#125;"),
            '\n' => out.push_str("<br />"),
            _ => out.push(c),
        }
    }
    out
}

//! Text styles report: every distinct typography in a tree.

use scenecode_normalize::{IntermediateNode, NodeKind};
use scenecode_style::{format_number, Typography};

/// Distinct typographies in depth-first order of first use.
pub fn distinct_typographies(nodes: &[IntermediateNode]) -> Vec<Typography> {
    let mut found: Vec<Typography> = Vec::new();
    for root in nodes {
        root.walk(&mut |node| {
            if let NodeKind::Text(text) = &node.kind {
                for run in &text.runs {
                    if !found.contains(&run.typography) {
                        found.push(run.typography.clone());
                    }
                }
            }
        });
    }
    found
}

/// Short human label, e.g. `Inter 16px 700`.
pub fn typography_label(typography: &Typography) -> String {
    let family = if typography.family.is_empty() {
        "Default"
    } else {
        typography.family.as_str()
    };
    format!(
        "{} {}px {}{}",
        family,
        format_number(typography.size),
        typography.weight.as_str(),
        if typography.italic { " italic" } else { "" }
    )
}

/// One labelled entry per typography, separated by blank lines.
pub fn text_styles_report(typographies: &[Typography], format: impl Fn(&Typography) -> String) -> String {
    typographies
        .iter()
        .map(|t| format!("// {}\n{}", typography_label(t), format(t)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

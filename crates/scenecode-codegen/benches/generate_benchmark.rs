//! Code generation benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scenecode_codegen::generate_code;
use scenecode_core::{
    Framework, HostLayoutMode, HostNode, Paint, PluginSettings, Rgba, TypeStyle, WarningSink,
};
use scenecode_normalize::normalize;

fn card(index: usize) -> HostNode {
    let title = HostNode {
        characters: Some(format!("Card {}", index)),
        style: Some(TypeStyle {
            font_family: "Inter".into(),
            font_size: 16.0,
            font_weight: 600.0,
            ..Default::default()
        }),
        ..HostNode::new(format!("t{}", index), "Title", "TEXT").with_geometry(0.0, 0.0, 200.0, 24.0)
    };
    let button = HostNode::new(format!("b{}", index), "Button", "FRAME")
        .with_geometry(0.0, 32.0, 120.0, 40.0)
        .with_fill(Paint::solid(Rgba::new(0.23, 0.51, 0.96, 1.0)));
    HostNode {
        layout_mode: HostLayoutMode::Vertical,
        item_spacing: 8.0,
        padding_top: 16.0,
        padding_left: 16.0,
        ..HostNode::new(format!("c{}", index), "Card", "FRAME")
            .with_geometry(0.0, index as f64 * 120.0, 240.0, 112.0)
            .with_fill(Paint::solid(Rgba::new(1.0, 1.0, 1.0, 1.0)))
            .with_child(title)
            .with_child(button)
    }
}

fn page(cards: usize) -> HostNode {
    (0..cards).fold(
        HostNode::new("page", "Page", "FRAME").with_geometry(0.0, 0.0, 1280.0, cards as f64 * 120.0),
        |page, i| page.with_child(card(i)),
    )
}

fn generate_all(c: &mut Criterion) {
    let selection = [page(50)];
    for framework in [Framework::Html, Framework::Tailwind, Framework::Flutter, Framework::SwiftUi] {
        let settings = PluginSettings {
            framework,
            ..Default::default()
        };
        let nodes = normalize(&selection, &settings, &WarningSink::new());
        c.bench_function(&format!("generate_{}", framework.as_str()), |b| {
            b.iter(|| generate_code(black_box(&nodes), black_box(&settings)))
        });
    }
}

fn normalize_page(c: &mut Criterion) {
    let selection = [page(50)];
    let settings = PluginSettings::default();
    c.bench_function("normalize_page", |b| {
        b.iter(|| normalize(black_box(&selection), black_box(&settings), &WarningSink::new()))
    });
}

criterion_group!(benches, normalize_page, generate_all);
criterion_main!(benches);

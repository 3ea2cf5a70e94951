//! Criterion benchmarks for the page builder.
//!
//! Run with: `cargo bench`
//!
//! These measure the hot paths of an editing session on pages of growing
//! size: resolving styles, rendering the canvas, and handling a drop.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use page_builder::core::{Block, BlockId, BlockTree, Breakpoint, Placement, StyleMap};
use page_builder::render::{BlockRenderer, EditorView, RenderMode};
use page_builder::runtime::canvas::resolve_drop;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `sections` sections, each holding a heading, a text and a card.
fn build_page(sections: usize) -> BlockTree {
    let mut blocks = Vec::with_capacity(sections * 4);
    for s in 0..sections {
        let section = format!("s{}", s);
        blocks.push(
            Block::new(section.as_str(), "section")
                .at_position(s)
                .with_styles(Breakpoint::Desktop, StyleMap::new().with("padding", 32i64))
                .with_styles(Breakpoint::Mobile, StyleMap::new().with("padding", 12i64)),
        );
        blocks.push(
            Block::new(format!("{}-h", section), "heading")
                .with_parent(section.as_str(), 0)
                .with_prop("text", "Top sights"),
        );
        blocks.push(Block::new(format!("{}-t", section), "text").with_parent(section.as_str(), 1));
        blocks.push(
            Block::new(format!("{}-c", section), "card")
                .with_parent(section.as_str(), 2)
                .with_prop("title", "Belém Tower"),
        );
    }
    BlockTree::from_blocks(blocks).unwrap()
}

// ---------------------------------------------------------------------------
// Style cascade
// ---------------------------------------------------------------------------

fn bench_style_resolve(c: &mut Criterion) {
    let tree = build_page(1);
    let styles = &tree.get(&BlockId::from("s0")).unwrap().styles;
    let mut group = c.benchmark_group("style_resolve");
    for bp in [Breakpoint::Desktop, Breakpoint::Mobile, Breakpoint::Wide] {
        group.bench_with_input(BenchmarkId::from_parameter(bp), &bp, |b, &bp| {
            b.iter(|| black_box(styles.resolve(bp)));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn bench_render_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_page");
    for sections in [10, 100, 500] {
        let tree = build_page(sections);
        group.bench_with_input(BenchmarkId::new("preview", sections), &tree, |b, tree| {
            b.iter(|| black_box(BlockRenderer::new(tree, Breakpoint::Desktop).render_page().to_html()));
        });
        group.bench_with_input(BenchmarkId::new("edit", sections), &tree, |b, tree| {
            let view = EditorView {
                selected: Some(BlockId::from("s0-h")),
                show_outlines: true,
                ..EditorView::default()
            };
            b.iter(|| {
                black_box(
                    BlockRenderer::new(tree, Breakpoint::Mobile)
                        .with_mode(RenderMode::Edit(view.clone()))
                        .render_page(),
                )
            });
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Drag and drop
// ---------------------------------------------------------------------------

fn bench_drop(c: &mut Criterion) {
    let mut group = c.benchmark_group("drop");
    for sections in [10, 100, 500] {
        let tree = build_page(sections);
        let dragged = BlockId::from("s0-c");
        let target = BlockId::from(format!("s{}", sections - 1));

        group.bench_with_input(BenchmarkId::new("resolve", sections), &tree, |b, tree| {
            b.iter(|| black_box(resolve_drop(tree, &dragged, Some(&target))));
        });
        group.bench_with_input(BenchmarkId::new("move", sections), &tree, |b, tree| {
            b.iter(|| {
                let mut tree = tree.clone();
                tree.move_to(&dragged, Placement::inside(target.clone(), 0)).unwrap();
                black_box(tree.len())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_style_resolve, bench_render_page, bench_drop);
criterion_main!(benches);

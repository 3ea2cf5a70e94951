//! Tree operations on realistic page layouts

use crate::core::{Block, BlockId, BlockTree, Breakpoint, Placement, StyleMap, TreeError};
use crate::runtime::canvas::resolve_drop;

fn landing_page() -> BlockTree {
    BlockTree::from_blocks(vec![
        Block::new("hero", "hero").with_prop("title", "Visit Lisbon"),
        Block::new("intro", "section").at_position(1),
        Block::new("intro-h", "heading")
            .with_parent("intro", 0)
            .with_prop("text", "Why Lisbon"),
        Block::new("intro-p", "text").with_parent("intro", 1),
        Block::new("cols", "columns").with_parent("intro", 2),
        Block::new("col-a", "card").with_parent("cols", 0),
        Block::new("col-b", "card").with_parent("cols", 1),
        Block::new("footer", "section").at_position(2),
    ])
    .unwrap()
}

fn ids(tree: &BlockTree, parent: Option<&str>) -> Vec<String> {
    let parent = parent.map(BlockId::from);
    tree.children_of(parent.as_ref())
        .iter()
        .map(|b| b.id.to_string())
        .collect()
}

#[test]
fn test_document_order_is_depth_first() {
    let tree = landing_page();
    let order: Vec<String> = tree.to_vec().iter().map(|b| b.id.to_string()).collect();
    assert_eq!(
        order,
        vec!["hero", "intro", "intro-h", "intro-p", "cols", "col-a", "col-b", "footer"]
    );
}

#[test]
fn test_stored_gaps_are_repaired() {
    let mut tree = BlockTree::from_blocks(vec![
        Block::new("a", "text").at_position(3),
        Block::new("b", "text").at_position(7),
        Block::new("c", "text").at_position(10),
    ])
    .unwrap();

    assert!(tree.normalize());
    assert_eq!(ids(&tree, None), vec!["a", "b", "c"]);
    let positions: Vec<usize> = tree.roots().iter().map(|b| b.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
    assert!(!tree.normalize());
}

#[test]
fn test_drag_card_between_sections() {
    let mut tree = landing_page();
    let dragged = BlockId::from("col-b");
    let target = BlockId::from("footer");

    let placement = resolve_drop(&tree, &dragged, Some(&target)).unwrap();
    assert_eq!(placement, Placement::inside(target.clone(), 0));
    tree.move_to(&dragged, placement).unwrap();

    assert_eq!(ids(&tree, Some("cols")), vec!["col-a"]);
    assert_eq!(ids(&tree, Some("footer")), vec!["col-b"]);
    assert_eq!(tree.get(&BlockId::from("col-a")).unwrap().position, 0);
}

#[test]
fn test_drop_on_sibling_takes_its_slot() {
    let mut tree = landing_page();
    let dragged = BlockId::from("intro-p");
    let target = BlockId::from("intro-h");

    let placement = resolve_drop(&tree, &dragged, Some(&target)).unwrap();
    tree.move_to(&dragged, placement).unwrap();
    assert_eq!(ids(&tree, Some("intro")), vec!["intro-p", "intro-h", "cols"]);
}

#[test]
fn test_drop_into_own_subtree_is_ignored() {
    let tree = landing_page();
    let intro = BlockId::from("intro");
    assert!(resolve_drop(&tree, &intro, Some(&BlockId::from("col-a"))).is_none());
    assert!(resolve_drop(&tree, &intro, Some(&BlockId::from("cols"))).is_none());
    assert!(resolve_drop(&tree, &intro, Some(&intro)).is_none());
    assert!(resolve_drop(&tree, &intro, None).is_none());
    assert!(resolve_drop(&tree, &intro, Some(&BlockId::from("missing"))).is_none());
}

#[test]
fn test_move_into_leaf_is_rejected() {
    let mut tree = landing_page();
    let before = tree.clone();
    let err = tree
        .move_to(&BlockId::from("footer"), Placement::inside(BlockId::from("intro-h"), 0))
        .unwrap_err();
    assert_eq!(err, TreeError::NotAContainer(BlockId::from("intro-h")));
    assert_eq!(tree, before);
}

#[test]
fn test_duplicate_section_copies_subtree() {
    let mut tree = landing_page();
    let copy = tree.duplicate(&BlockId::from("intro")).unwrap();

    assert_eq!(tree.len(), 8 + 5);
    assert_eq!(ids(&tree, None)[2], copy.to_string());
    assert_eq!(tree.get(&BlockId::from("footer")).unwrap().position, 3);

    let copied_children = tree.children_of(Some(&copy));
    assert_eq!(copied_children.len(), 3);
    assert_eq!(copied_children[0].prop("text").and_then(|v| v.as_string()), Some("Why Lisbon"));
    let copied_cols = copied_children[2].id.clone();
    assert_ne!(copied_cols, BlockId::from("cols"));
    assert_eq!(tree.child_count(Some(&copied_cols)), 2);
    // the original is untouched
    assert_eq!(tree.child_count(Some(&BlockId::from("cols"))), 2);
}

#[test]
fn test_remove_section_removes_descendants() {
    let mut tree = landing_page();
    let removed = tree.remove(&BlockId::from("intro")).unwrap();
    assert_eq!(removed.len(), 6);
    assert_eq!(removed[0].id, BlockId::from("intro"));
    assert_eq!(ids(&tree, None), vec!["hero", "footer"]);
    assert_eq!(tree.get(&BlockId::from("footer")).unwrap().position, 1);
}

#[test]
fn test_style_overrides_survive_move() {
    let mut tree = landing_page();
    let id = BlockId::from("intro-h");
    tree.set_style(&id, Breakpoint::Desktop, "fontSize", Some(40i64.into())).unwrap();
    tree.set_style(&id, Breakpoint::Mobile, "fontSize", Some(24i64.into())).unwrap();
    tree.move_to(&id, Placement::root(0)).unwrap();

    let block = tree.get(&id).unwrap();
    assert_eq!(block.parent_id, None);
    assert_eq!(
        block.styles.resolve(Breakpoint::Tablet),
        StyleMap::new().with("fontSize", 40i64)
    );
    assert_eq!(
        block.styles.resolve(Breakpoint::Mobile),
        StyleMap::new().with("fontSize", 24i64)
    );
}

#[test]
fn test_serialized_rows_round_trip_through_tree() {
    let tree = landing_page();
    let json = serde_json::to_string(&tree.to_vec()).unwrap();
    let rows: Vec<Block> = serde_json::from_str(&json).unwrap();
    let reloaded = BlockTree::from_blocks(rows).unwrap();
    assert_eq!(reloaded, tree);
}

#[test]
fn test_null_columns_load_as_defaults() {
    let row = r#"{"id":"x","type":"text","parent_id":null,"position":null,"props":null,
        "styles":null,"is_locked":null,"is_hidden":null,"name":null}"#;
    let block: Block = serde_json::from_str(row).unwrap();
    assert_eq!(block, Block::new("x", "text"));
}

#[test]
fn test_odd_style_values_are_dropped() {
    let row = r#"{"id":"x","type":"heading","styles":{
        "desktop":{"color":null,"bold":true,"shadow":{"x":1},"fontSize":32,"margin":"0 auto"},
        "mobile":{"fontSize":[1,2]}}}"#;
    let block: Block = serde_json::from_str(row).unwrap();

    let desktop = block.styles.at(Breakpoint::Desktop).unwrap();
    assert_eq!(desktop, &StyleMap::new().with("fontSize", 32i64).with("margin", "0 auto"));
    // the mobile bag had nothing usable
    assert!(block.styles.at(Breakpoint::Mobile).is_none());
}

#[test]
fn test_unknown_breakpoint_keys_are_skipped() {
    let row = r#"{"id":"x","type":"text","styles":{
        "xl":{"fontSize":40},"Tablet":{"fontSize":18},"desktop":7}}"#;
    let block: Block = serde_json::from_str(row).unwrap();

    assert!(block.styles.at(Breakpoint::Desktop).is_none());
    assert_eq!(
        block.styles.resolve(Breakpoint::Tablet),
        StyleMap::new().with("fontSize", 18i64)
    );
}

#[test]
fn test_one_odd_row_does_not_reject_the_page() {
    let rows = r#"[
        {"id":"s","type":"section"},
        {"id":"h","type":"heading","parent_id":"s","position":0,"name":null,
         "styles":{"xl":{"color":"red"},"desktop":{"color":false}}},
        {"id":"t","type":"text","parent_id":"s","position":1,"props":{"text":"Sunset cruise"}}
    ]"#;
    let blocks: Vec<Block> = serde_json::from_str(rows).unwrap();
    let tree = BlockTree::from_blocks(blocks).unwrap();

    assert_eq!(ids(&tree, Some("s")), vec!["h", "t"]);
    assert!(tree.get(&BlockId::from("h")).unwrap().styles.is_empty());
}

fn page_with_nested_leaf() -> BlockTree {
    let mut tree = BlockTree::from_blocks(vec![
        Block::new("s", "section"),
        Block::new("h", "heading").with_parent("s", 0),
        Block::new("caption", "text").with_parent("h", 0),
        Block::new("t", "text").with_parent("s", 1),
    ])
    .unwrap();
    tree.lift_from_leaves();
    tree
}

#[test]
fn test_drop_on_block_lifted_from_leaf_takes_its_slot() {
    let mut tree = page_with_nested_leaf();
    assert_eq!(ids(&tree, Some("s")), vec!["h", "caption", "t"]);

    let dragged = BlockId::from("t");
    let target = BlockId::from("caption");
    let placement = resolve_drop(&tree, &dragged, Some(&target)).unwrap();
    assert_eq!(placement, Placement::inside(BlockId::from("s"), 1));
    tree.move_to(&dragged, placement).unwrap();
    assert_eq!(ids(&tree, Some("s")), vec!["h", "t", "caption"]);
}

#[test]
fn test_duplicate_block_lifted_from_leaf() {
    let mut tree = page_with_nested_leaf();
    let copy = tree.duplicate(&BlockId::from("caption")).unwrap();

    assert_eq!(tree.get(&copy).unwrap().parent_id, Some(BlockId::from("s")));
    assert_eq!(ids(&tree, Some("s")), vec!["h", "caption", &copy.to_string(), "t"]);
    assert_eq!(tree.child_count(Some(&BlockId::from("h"))), 0);
}

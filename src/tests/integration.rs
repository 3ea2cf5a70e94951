//! Integration tests: a full editing session
//!
//! These walk through what a content editor does on one page:
//!   library search → drop blocks → drag to reorder → edit in the panel
//!                  → preview per breakpoint → save

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::config::EditorConfig;
    use crate::core::registry::BlockCatalog;
    use crate::core::{BlockId, BlockType, Breakpoint};
    use crate::render::SortableAction;
    use crate::runtime::library::LibrarySearch;
    use crate::runtime::panel::PropPath;
    use crate::runtime::store::{MemoryPageStore, PageStore};
    use crate::runtime::timer::ManualClock;
    use crate::runtime::toolbar::ToolbarAction;
    use crate::runtime::PageBuilder;

    fn editor() -> (PageBuilder, MemoryPageStore) {
        let store = MemoryPageStore::new();
        let editor = PageBuilder::new(
            BlockCatalog::standard(),
            EditorConfig::default(),
            Arc::new(store.clone()),
        );
        (editor, store)
    }

    #[test]
    fn test_search_then_drop_into_section() {
        let (mut editor, _) = editor();
        editor.begin_load("home");
        assert!(editor.render().find(&|el| el.has_class("canvas-loading")).is_some());
        editor.finish_load(Vec::new()).unwrap();

        let clock = ManualClock::new();
        let mut search = LibrarySearch::with_clock(editor.catalog().clone(), 300, Arc::new(clock.clone()));
        search.input("he");
        search.input("hero");
        assert!(!search.poll());
        clock.advance(300.0);
        assert!(search.poll());
        let groups = search.results();
        assert_eq!(groups.len(), 1);
        let hero_type = groups[0].blocks[0].block_type.clone();
        assert_eq!(hero_type, BlockType::Hero);

        let section = editor.drop_new_block("section", None).unwrap();
        let hero = editor.drop_new_block(hero_type.as_str(), Some(&section)).unwrap();
        let heading = editor.drop_new_block("heading", Some(&hero)).unwrap();

        let order: Vec<BlockId> = editor
            .tree()
            .children_of(Some(&section))
            .iter()
            .map(|b| b.id.clone())
            .collect();
        // dropping on a leaf takes the leaf's slot
        assert_eq!(order, vec![heading.clone(), hero.clone()]);
        assert_eq!(editor.selected(), Some(&heading));
    }

    #[test]
    fn test_drag_reorders_and_undo_restores() {
        let (mut editor, _) = editor();
        let first = editor.add_block("heading", None).unwrap();
        let second = editor.add_block("text", None).unwrap();
        let third = editor.add_block("button", None).unwrap();

        editor.drag_start(&third).unwrap();
        editor.drag_over(Some(&first));
        assert_eq!(editor.drag_session().over_target(), Some(&first));
        let overlay = editor.render();
        assert!(overlay.find_by_attr("data-dragging", third.as_str()).is_some());

        assert!(editor.drag_end(Some(&first)).unwrap());
        assert!(!editor.drag_session().is_dragging());
        let roots: Vec<BlockId> = editor.tree().roots().iter().map(|b| b.id.clone()).collect();
        assert_eq!(roots, vec![third.clone(), first.clone(), second.clone()]);

        // releasing on itself changes nothing and records nothing
        editor.drag_start(&third).unwrap();
        assert!(!editor.drag_end(Some(&third)).unwrap());

        assert!(editor.undo());
        let roots: Vec<BlockId> = editor.tree().roots().iter().map(|b| b.id.clone()).collect();
        assert_eq!(roots, vec![first, second, third]);
    }

    #[test]
    fn test_action_bar_buttons() {
        let (mut editor, _) = editor();
        let section = editor.add_block("section", None).unwrap();
        editor.add_block("text", None).unwrap();

        editor.apply_block_action(&section, SortableAction::Duplicate).unwrap();
        let copy = editor.selected().cloned().unwrap();
        assert_ne!(copy, section);
        assert_eq!(editor.tree().len(), 4);
        assert_eq!(editor.tree().get(&copy).unwrap().position, 1);

        editor.apply_block_action(&copy, SortableAction::ToggleLock).unwrap();
        assert!(editor.tree().get(&copy).unwrap().is_locked);

        editor.apply_block_action(&copy, SortableAction::ToggleVisibility).unwrap();
        assert!(editor.tree().get(&copy).unwrap().is_hidden);
        assert!(editor.render().find_by_attr("data-sortable-id", copy.as_str()).is_none());
        editor.toggle_outlines();
        assert!(editor.render().find_by_attr("data-sortable-id", copy.as_str()).is_some());

        editor.apply_block_action(&copy, SortableAction::Delete).unwrap();
        assert_eq!(editor.tree().len(), 2);
        assert_eq!(editor.selected(), None);
    }

    #[test]
    fn test_panel_edits_show_up_in_preview() {
        let (mut editor, _) = editor();
        let heading = editor.add_block("heading", None).unwrap();
        editor
            .set_prop(&heading, &"text".parse::<PropPath>().unwrap(), "Explore the Algarve".into())
            .unwrap();
        editor
            .set_prop(&heading, &"level".parse::<PropPath>().unwrap(), 1i64.into())
            .unwrap();
        editor.set_style(&heading, "color", Some("#0f766e".into())).unwrap();
        editor.set_breakpoint(Breakpoint::Mobile);
        editor.set_style(&heading, "fontSize", Some(20i64.into())).unwrap();

        let panel = editor.panel().unwrap();
        assert_eq!(panel.breakpoint, Breakpoint::Mobile);
        assert_eq!(
            panel.field("text").unwrap().value.as_string(),
            Some("Explore the Algarve")
        );
        let color = panel.section("Style").unwrap().field("color").unwrap();
        assert!(color.value.is_none());
        assert_eq!(color.inherited.as_ref().and_then(|v| v.as_text()), Some("#0f766e"));

        editor.toggle_preview();
        let html = editor.render().to_html();
        assert!(html.contains("<h1"));
        assert!(html.contains("Explore the Algarve"));
        assert!(html.contains("font-size: 20px"));
        assert!(!html.contains("sortable-block"));
    }

    #[tokio::test]
    async fn test_session_ends_with_save() {
        let (mut editor, store) = editor();
        editor.load("algarve").await.unwrap();
        editor.add_block("destination_grid", None).unwrap();
        editor.add_block("map_embed", None).unwrap();

        assert!(editor.toolbar().can_save);
        editor.apply(ToolbarAction::Save).await.unwrap();
        assert!(!editor.toolbar().can_save);

        let saved = store.load_blocks("algarve").await.unwrap();
        assert_eq!(saved.len(), 2);
        assert!(editor.validate().valid);
    }
}

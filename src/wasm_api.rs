//! WASM API: `#[wasm_bindgen]` exports for the editor front end.
//!
//! This module is only compiled when targeting `wasm32`. It provides:
//! - `init_editor` / `destroy_editor`: lifecycle
//! - `begin_load` / `load_page` / `export_blocks` / `save_page` / `publish_page`
//! - `render_canvas` / `render_tree`: canvas output as HTML or a node tree
//! - drag session, selection and block action-bar calls
//! - prop and style edits, undo/redo, toolbar state and actions
//! - library search, property panel, validation and notifications
//!
//! Every export returns a JSON string; failures are `{"error": "..."}`.

use std::cell::RefCell;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use tokio::sync::broadcast::Receiver;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::EditorConfig;
use crate::core::parameter::PropValue;
use crate::core::registry::BlockCatalog;
use crate::core::style::StyleValue;
use crate::core::{Block, BlockId};
use crate::render::SortableAction;
use crate::runtime::library::LibrarySearch;
use crate::runtime::notify::{self, Notification};
use crate::runtime::panel::PropPath;
use crate::runtime::store::MemoryPageStore;
use crate::runtime::toolbar::ToolbarAction;
use crate::runtime::PageBuilder;

// ── Trivial async executor for WASM ─────────────────────────────────────────
//
// The in-memory store never awaits anything, so its futures are ready on
// the first poll.

fn block_on<F: std::future::Future>(fut: F) -> anyhow::Result<F::Output> {
    let mut fut = std::pin::pin!(fut);
    let waker = noop_waker();
    let mut cx = std::task::Context::from_waker(&waker);
    match fut.as_mut().poll(&mut cx) {
        std::task::Poll::Ready(result) => Ok(result),
        std::task::Poll::Pending => Err(anyhow!("store call did not complete synchronously")),
    }
}

fn noop_waker() -> std::task::Waker {
    use std::task::{RawWaker, RawWakerVTable};

    fn no_op(_: *const ()) {}
    fn clone(p: *const ()) -> RawWaker {
        RawWaker::new(p, &VTABLE)
    }

    static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);

    unsafe { std::task::Waker::from_raw(RawWaker::new(std::ptr::null(), &VTABLE)) }
}

// ── Global state ────────────────────────────────────────────────────────────

struct WasmEditor {
    editor: PageBuilder,
    library: LibrarySearch,
    notifications: Receiver<Notification>,
}

thread_local! {
    static EDITOR: RefCell<Option<WasmEditor>> = RefCell::new(None);
}

fn with_editor<R>(f: impl FnOnce(&mut WasmEditor) -> anyhow::Result<R>) -> anyhow::Result<R> {
    EDITOR.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let rt = borrow
            .as_mut()
            .ok_or_else(|| anyhow!("Editor not initialized. Call init_editor() first."))?;
        f(rt)
    })
}

// ── JSON responses ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct OkResponse {
    ok: bool,
}

#[derive(Serialize)]
struct IdResponse {
    id: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct ChangedResponse {
    changed: bool,
}

#[derive(Serialize)]
struct SavedResponse {
    saved: bool,
}

#[derive(Serialize)]
struct PublishedResponse {
    version: u64,
}

fn json_err(msg: impl Into<String>) -> String {
    serde_json::to_string(&ErrorResponse { error: msg.into() }).unwrap_or_default()
}

fn respond<T: Serialize>(result: anyhow::Result<T>) -> String {
    match result.and_then(|value| serde_json::to_string(&value).context("Failed to encode response")) {
        Ok(json) => json,
        Err(e) => json_err(format!("{:#}", e)),
    }
}

fn ok() -> anyhow::Result<OkResponse> {
    Ok(OkResponse { ok: true })
}

/// Empty string means "no block".
fn opt_id(raw: &str) -> Option<BlockId> {
    (!raw.is_empty()).then(|| BlockId::from(raw))
}

// ── Lifecycle ───────────────────────────────────────────────────────────────

#[wasm_bindgen]
pub fn init_editor(config_json: &str) -> String {
    console_error_panic_hook::set_once();

    let config = if config_json.trim().is_empty() {
        Ok(EditorConfig::default())
    } else {
        EditorConfig::from_json(config_json)
    };
    let config = match config {
        Ok(c) => c,
        Err(e) => return json_err(e.to_string()),
    };

    let catalog = BlockCatalog::standard();
    let library = LibrarySearch::new(catalog.clone(), config.search_debounce_ms);
    let editor = PageBuilder::new(catalog, config, Arc::new(MemoryPageStore::new()));
    let notifications = editor.notifications().subscribe();

    EDITOR.with(|cell| {
        *cell.borrow_mut() = Some(WasmEditor {
            editor,
            library,
            notifications,
        });
    });
    respond(ok())
}

#[wasm_bindgen]
pub fn destroy_editor() {
    EDITOR.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

// ── Loading and persistence ─────────────────────────────────────────────────

#[wasm_bindgen]
pub fn begin_load(page_id: &str) -> String {
    respond(with_editor(|rt| {
        rt.editor.begin_load(page_id);
        ok()
    }))
}

/// Install blocks fetched by the host; returns the validation report.
#[wasm_bindgen]
pub fn load_page(page_id: &str, blocks_json: &str) -> String {
    respond(with_editor(|rt| {
        let blocks: Vec<Block> = serde_json::from_str(blocks_json).context("Invalid blocks JSON")?;
        if rt.editor.page_id() != Some(page_id) || !rt.editor.is_loading() {
            rt.editor.begin_load(page_id);
        }
        Ok(rt.editor.finish_load(blocks)?)
    }))
}

#[wasm_bindgen]
pub fn export_blocks() -> String {
    respond(with_editor(|rt| Ok(rt.editor.blocks())))
}

/// Called by the host once it has persisted `export_blocks()`.
#[wasm_bindgen]
pub fn mark_saved() -> String {
    respond(with_editor(|rt| {
        rt.editor.mark_saved();
        ok()
    }))
}

#[wasm_bindgen]
pub fn save_page() -> String {
    respond(with_editor(|rt| {
        let saved = block_on(rt.editor.save())??;
        Ok(SavedResponse { saved })
    }))
}

#[wasm_bindgen]
pub fn publish_page() -> String {
    respond(with_editor(|rt| {
        let version = block_on(rt.editor.publish())??;
        Ok(PublishedResponse { version })
    }))
}

// ── Rendering ───────────────────────────────────────────────────────────────

#[wasm_bindgen]
pub fn render_canvas() -> String {
    with_editor(|rt| Ok(rt.editor.render().to_html())).unwrap_or_else(|e| json_err(e.to_string()))
}

#[wasm_bindgen]
pub fn render_tree() -> String {
    respond(with_editor(|rt| Ok(rt.editor.render())))
}

// ── Drag session ────────────────────────────────────────────────────────────

#[wasm_bindgen]
pub fn drag_start(block_id: &str) -> String {
    respond(with_editor(|rt| {
        rt.editor.drag_start(&BlockId::from(block_id))?;
        ok()
    }))
}

#[wasm_bindgen]
pub fn drag_over(target_id: &str) -> String {
    respond(with_editor(|rt| {
        rt.editor.drag_over(opt_id(target_id).as_ref());
        ok()
    }))
}

#[wasm_bindgen]
pub fn drag_end(target_id: &str) -> String {
    respond(with_editor(|rt| {
        let changed = rt.editor.drag_end(opt_id(target_id).as_ref())?;
        Ok(ChangedResponse { changed })
    }))
}

#[wasm_bindgen]
pub fn drag_cancel() -> String {
    respond(with_editor(|rt| {
        rt.editor.drag_cancel();
        ok()
    }))
}

// ── Selection and block actions ─────────────────────────────────────────────

#[wasm_bindgen]
pub fn select_block(block_id: &str) -> String {
    respond(with_editor(|rt| {
        match opt_id(block_id) {
            Some(id) => rt.editor.select(&id)?,
            None => rt.editor.clear_selection(),
        }
        ok()
    }))
}

#[wasm_bindgen]
pub fn hover_block(block_id: &str) -> String {
    respond(with_editor(|rt| {
        rt.editor.hover(opt_id(block_id).as_ref());
        ok()
    }))
}

#[wasm_bindgen]
pub fn background_click() -> String {
    respond(with_editor(|rt| {
        rt.editor.background_click();
        ok()
    }))
}

/// Insert a library block; `target_id` is the block it was dropped on, or
/// empty for a click in the library.
#[wasm_bindgen]
pub fn add_block(block_type: &str, target_id: &str) -> String {
    respond(with_editor(|rt| {
        let id = match opt_id(target_id) {
            Some(target) => rt.editor.drop_new_block(block_type, Some(&target))?,
            None => rt.editor.add_block(block_type, None)?,
        };
        Ok(IdResponse { id: id.to_string() })
    }))
}

#[wasm_bindgen]
pub fn block_action(block_id: &str, action: &str) -> String {
    respond(with_editor(|rt| {
        let action = SortableAction::from_str(action).map_err(|_| anyhow!("Unknown block action: {}", action))?;
        rt.editor.apply_block_action(&BlockId::from(block_id), action)?;
        ok()
    }))
}

#[wasm_bindgen]
pub fn rename_block(block_id: &str, name: &str) -> String {
    respond(with_editor(|rt| {
        rt.editor.rename_block(&BlockId::from(block_id), name)?;
        ok()
    }))
}

// ── Props and styles ────────────────────────────────────────────────────────

#[wasm_bindgen]
pub fn set_prop(block_id: &str, path: &str, value_json: &str) -> String {
    respond(with_editor(|rt| {
        let path = PropPath::from_str(path)?;
        let value: serde_json::Value = serde_json::from_str(value_json).context("Invalid value JSON")?;
        rt.editor.set_prop(&BlockId::from(block_id), &path, PropValue::from(value))?;
        ok()
    }))
}

#[wasm_bindgen]
pub fn add_prop_item(block_id: &str, path: &str) -> String {
    respond(with_editor(|rt| {
        let path = PropPath::from_str(path)?;
        let index = rt.editor.add_prop_item(&BlockId::from(block_id), &path)?;
        Ok(serde_json::json!({ "index": index }))
    }))
}

#[wasm_bindgen]
pub fn remove_prop_item(block_id: &str, path: &str, index: usize) -> String {
    respond(with_editor(|rt| {
        let path = PropPath::from_str(path)?;
        rt.editor.remove_prop_item(&BlockId::from(block_id), &path, index)?;
        ok()
    }))
}

/// Set a style override at the current breakpoint; `null` clears it.
#[wasm_bindgen]
pub fn set_style(block_id: &str, key: &str, value_json: &str) -> String {
    respond(with_editor(|rt| {
        let value: Option<StyleValue> = serde_json::from_str(value_json).context("Invalid style value JSON")?;
        rt.editor.set_style(&BlockId::from(block_id), key, value)?;
        ok()
    }))
}

// ── History and toolbar ─────────────────────────────────────────────────────

#[wasm_bindgen]
pub fn undo() -> String {
    respond(with_editor(|rt| Ok(ChangedResponse { changed: rt.editor.undo() })))
}

#[wasm_bindgen]
pub fn redo() -> String {
    respond(with_editor(|rt| Ok(ChangedResponse { changed: rt.editor.redo() })))
}

#[wasm_bindgen]
pub fn toolbar_state() -> String {
    respond(with_editor(|rt| Ok(rt.editor.toolbar())))
}

#[wasm_bindgen]
pub fn toolbar_action(action_json: &str) -> String {
    respond(with_editor(|rt| {
        let action: ToolbarAction = serde_json::from_str(action_json).context("Invalid toolbar action JSON")?;
        block_on(rt.editor.apply(action))??;
        Ok(rt.editor.toolbar())
    }))
}

// ── Library, panel, validation, notifications ───────────────────────────────

/// Feed the search box; results update once the query settles.
#[wasm_bindgen]
pub fn library_input(query: &str) -> String {
    respond(with_editor(|rt| {
        rt.library.input(query);
        ok()
    }))
}

/// Grouped library entries for the settled query
#[wasm_bindgen]
pub fn library_results() -> String {
    respond(with_editor(|rt| {
        rt.library.poll();
        Ok(rt.library.results())
    }))
}

#[wasm_bindgen]
pub fn property_panel() -> String {
    respond(with_editor(|rt| Ok(rt.editor.panel())))
}

#[wasm_bindgen]
pub fn validate_page() -> String {
    respond(with_editor(|rt| Ok(rt.editor.validate())))
}

/// Notifications published since the last call
#[wasm_bindgen]
pub fn drain_notifications() -> String {
    respond(with_editor(|rt| Ok(notify::drain(&mut rt.notifications))))
}

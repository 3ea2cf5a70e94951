//! Editor runtime
//!
//! The state container ([`editor::PageBuilder`]) and the views and services
//! around it: canvas and drag session, property panel, toolbar, library
//! search, persistence, history, notifications and drawers.

pub mod canvas;
pub mod debounce;
pub mod drawer;
pub mod editor;
pub mod history;
pub mod library;
pub mod notify;
pub mod panel;
pub mod store;
pub mod timer;
pub mod toolbar;
pub mod validation;

pub use canvas::{resolve_drop, Canvas, DragSession, Viewport};
pub use editor::{EditorError, PageBuilder, ViewSettings};
pub use notify::{Notification, NotificationBus, NotificationKind};
pub use panel::{PanelView, PropPath, PropertyPanel};
#[cfg(not(target_arch = "wasm32"))]
pub use store::JsonFilePageStore;
pub use store::{MemoryPageStore, PageStore, StoreError};
pub use toolbar::{ToolbarAction, ToolbarState};
pub use validation::{TreeValidationResult, TreeValidator};

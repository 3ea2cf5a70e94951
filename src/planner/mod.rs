//! Trip itinerary board
//!
//! A trip's itinerary is a row of day columns plus a dock of items that are
//! not scheduled yet. Items are dragged between the dock and days; each item
//! lives in exactly one place. Presence and comment counts come from the
//! collaboration channel and are only displayed here.

mod board;
mod export;

pub use board::{DropZone, ItemLocation, ItineraryBoard, ItineraryDay, ItineraryItem, Viewer};

/// Planner errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlannerError {
    #[error("Itinerary item not found: {0}")]
    ItemNotFound(String),

    #[error("Itinerary item already on the board: {0}")]
    DuplicateItem(String),

    #[error("Trip has no day {0}")]
    DayNotFound(usize),

    #[error("Invalid trip dates: {0}")]
    InvalidDates(String),
}

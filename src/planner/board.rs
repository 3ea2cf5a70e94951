//! Itinerary board
//!
//! One column per trip day plus an unscheduled dock. Items move between them
//! by drop zone. Viewer presence per day and comment counts per item feed
//! the collaboration badges.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use time::macros::format_description;
use time::Date;

use super::PlannerError;

/// Longest trip the board lays out, in days
pub const MAX_TRIP_DAYS: usize = 90;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub destination_slug: Option<String>,
    /// Free-form time of day, e.g. "09:30"
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ItineraryItem {
    pub fn new(title: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            destination_slug: None,
            start_time: None,
            notes: None,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn at_destination(mut self, slug: &str) -> Self {
        self.destination_slug = Some(slug.to_string());
        self
    }

    pub fn at_time(mut self, time: &str) -> Self {
        self.start_time = Some(time.to_string());
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItineraryDay {
    pub index: usize,
    pub date: Option<Date>,
    pub items: Vec<ItineraryItem>,
}

impl ItineraryDay {
    /// Column heading, e.g. "Day 2 · Tue, May 7"
    pub fn label(&self) -> String {
        let format = format_description!("[weekday repr:short], [month repr:short] [day padding:none]");
        match self.date.and_then(|d| d.format(&format).ok()) {
            Some(date) => format!("Day {} · {}", self.index + 1, date),
            None => format!("Day {}", self.index + 1),
        }
    }
}

/// Where a dragged item was released
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "zone", rename_all = "lowercase")]
pub enum DropZone {
    Dock {
        #[serde(default)]
        position: Option<usize>,
    },
    Day {
        day: usize,
        #[serde(default)]
        position: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemLocation {
    Dock { position: usize },
    Day { day: usize, position: usize },
}

/// Someone currently looking at the trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewer {
    pub user_id: String,
    pub name: String,
    /// Day column the viewer has focused, if any
    #[serde(default)]
    pub day: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItineraryBoard {
    pub trip_id: String,
    days: Vec<ItineraryDay>,
    dock: Vec<ItineraryItem>,
    presence: BTreeMap<String, Viewer>,
    comment_counts: HashMap<String, u32>,
}

impl ItineraryBoard {
    /// Board with one column per day from `start` to `end` inclusive. A trip
    /// without both dates gets a single undated day.
    pub fn new(trip_id: &str, start: Option<Date>, end: Option<Date>) -> Result<Self, PlannerError> {
        let dates = match (start, end) {
            (Some(start), Some(end)) => {
                if end < start {
                    return Err(PlannerError::InvalidDates(format!("{} is before {}", end, start)));
                }
                let span = (end - start).whole_days() as usize + 1;
                if span > MAX_TRIP_DAYS {
                    return Err(PlannerError::InvalidDates(format!(
                        "{} days is longer than {} days",
                        span, MAX_TRIP_DAYS
                    )));
                }
                std::iter::successors(Some(start), |d| d.next_day())
                    .take(span)
                    .map(Some)
                    .collect()
            }
            (Some(single), None) | (None, Some(single)) => vec![Some(single)],
            (None, None) => vec![None],
        };

        Ok(Self {
            trip_id: trip_id.to_string(),
            days: dates
                .into_iter()
                .enumerate()
                .map(|(index, date)| ItineraryDay {
                    index,
                    date,
                    items: Vec::new(),
                })
                .collect(),
            dock: Vec::new(),
            presence: BTreeMap::new(),
            comment_counts: HashMap::new(),
        })
    }

    pub fn days(&self) -> &[ItineraryDay] {
        &self.days
    }

    pub fn day(&self, day: usize) -> Option<&ItineraryDay> {
        self.days.get(day)
    }

    pub fn dock(&self) -> &[ItineraryItem] {
        &self.dock
    }

    pub fn find(&self, item_id: &str) -> Option<ItemLocation> {
        if let Some(position) = self.dock.iter().position(|i| i.id == item_id) {
            return Some(ItemLocation::Dock { position });
        }
        self.days.iter().find_map(|day| {
            day.items
                .iter()
                .position(|i| i.id == item_id)
                .map(|position| ItemLocation::Day {
                    day: day.index,
                    position,
                })
        })
    }

    pub fn item(&self, item_id: &str) -> Option<&ItineraryItem> {
        self.dock
            .iter()
            .chain(self.days.iter().flat_map(|d| d.items.iter()))
            .find(|i| i.id == item_id)
    }

    pub fn add_to_dock(&mut self, item: ItineraryItem) -> Result<(), PlannerError> {
        if self.find(&item.id).is_some() {
            return Err(PlannerError::DuplicateItem(item.id));
        }
        self.dock.push(item);
        Ok(())
    }

    fn take(&mut self, item_id: &str) -> Result<ItineraryItem, PlannerError> {
        match self.find(item_id) {
            Some(ItemLocation::Dock { position }) => Ok(self.dock.remove(position)),
            Some(ItemLocation::Day { day, position }) => Ok(self.days[day].items.remove(position)),
            None => Err(PlannerError::ItemNotFound(item_id.to_string())),
        }
    }

    /// Put an item (from the dock or another day) on `day` at `position`,
    /// clamped to the day's length.
    pub fn schedule(&mut self, item_id: &str, day: usize, position: usize) -> Result<(), PlannerError> {
        if day >= self.days.len() {
            return Err(PlannerError::DayNotFound(day));
        }
        let item = self.take(item_id)?;
        let items = &mut self.days[day].items;
        let index = position.min(items.len());
        items.insert(index, item);
        tracing::debug!(trip = %self.trip_id, item = item_id, day, position = index, "scheduled item");
        Ok(())
    }

    /// Send an item back to the end of the dock.
    pub fn unschedule(&mut self, item_id: &str) -> Result<(), PlannerError> {
        let item = self.take(item_id)?;
        self.dock.push(item);
        Ok(())
    }

    /// Apply a drop. Items dropped without a position go to the end.
    pub fn handle_drop(&mut self, item_id: &str, zone: DropZone) -> Result<(), PlannerError> {
        match zone {
            DropZone::Dock { position } => {
                let item = self.take(item_id)?;
                let index = position.unwrap_or(self.dock.len()).min(self.dock.len());
                self.dock.insert(index, item);
                Ok(())
            }
            DropZone::Day { day, position } => {
                if day >= self.days.len() {
                    return Err(PlannerError::DayNotFound(day));
                }
                let position = position.unwrap_or(usize::MAX);
                self.schedule(item_id, day, position)
            }
        }
    }

    pub fn remove(&mut self, item_id: &str) -> Result<ItineraryItem, PlannerError> {
        let item = self.take(item_id)?;
        self.comment_counts.remove(item_id);
        Ok(item)
    }

    /// Number of scheduled items
    pub fn scheduled_count(&self) -> usize {
        self.days.iter().map(|d| d.items.len()).sum()
    }

    // ── Collaboration display ───────────────────────────────────────────

    /// Replace the presence list with the channel's latest snapshot.
    pub fn set_presence(&mut self, viewers: Vec<Viewer>) {
        self.presence = viewers.into_iter().map(|v| (v.user_id.clone(), v)).collect();
    }

    pub fn viewers(&self) -> impl Iterator<Item = &Viewer> {
        self.presence.values()
    }

    pub fn viewers_of(&self, day: usize) -> Vec<&Viewer> {
        self.presence.values().filter(|v| v.day == Some(day)).collect()
    }

    pub fn set_comment_count(&mut self, item_id: &str, count: u32) {
        if count == 0 {
            self.comment_counts.remove(item_id);
        } else {
            self.comment_counts.insert(item_id.to_string(), count);
        }
    }

    pub fn comment_count(&self, item_id: &str) -> u32 {
        self.comment_counts.get(item_id).copied().unwrap_or(0)
    }
}

//! Travel blocks
//!
//! Placeholders for content the site fills from its destination and trip
//! tables. The builder only stores the lookup key; the page renders a
//! placeholder that the host hydrates.

use super::LibraryCategory;
use crate::core::block::BlockType;
use crate::core::parameter::{Parameter, ParameterConstraints};
use crate::core::registry::BlockDefinition;

pub fn definitions() -> Vec<BlockDefinition> {
    vec![
        BlockDefinition::new(BlockType::DestinationCard, "Destination card", LibraryCategory::Travel)
            .description("Card for a single destination, looked up by slug")
            .icon("map-pin")
            .param(Parameter::string("slug", "Destination slug", ""))
            .tag("destinations"),
        BlockDefinition::new(BlockType::DestinationGrid, "Destination grid", LibraryCategory::Travel)
            .description("Grid of destinations, optionally filtered by city")
            .icon("map")
            .param(Parameter::string("city", "City", ""))
            .param(
                Parameter::number("limit", "Limit", 6.0)
                    .with_constraints(ParameterConstraints::new().with_min(1.0).with_max(48.0)),
            )
            .tag("destinations"),
        BlockDefinition::new(BlockType::TripSummary, "Trip summary", LibraryCategory::Travel)
            .description("Dates, stops and collaborators of a trip")
            .icon("calendar")
            .param(Parameter::string("tripId", "Trip", ""))
            .tag("trips"),
        BlockDefinition::new(BlockType::MapEmbed, "Map", LibraryCategory::Travel)
            .description("Embedded map centred on a place or query")
            .icon("globe")
            .param(Parameter::string("query", "Place or address", ""))
            .param(
                Parameter::number("zoom", "Zoom", 12.0)
                    .with_constraints(ParameterConstraints::new().with_min(1.0).with_max(20.0)),
            ),
    ]
}

//! Layout blocks
//!
//! Container-like blocks own child blocks and accept drops; spacer and
//! divider are leaf helpers that only shape the flow between siblings.

use super::LibraryCategory;
use crate::core::block::BlockType;
use crate::core::breakpoint::Breakpoint;
use crate::core::parameter::{Parameter, ParameterConstraints, ParameterUIHint, WidgetType};
use crate::core::registry::BlockDefinition;

fn gap() -> Parameter {
    Parameter::number("gap", "Gap", 16.0)
        .with_constraints(ParameterConstraints::new().with_min(0.0).with_max(128.0))
        .with_ui_hint(ParameterUIHint::new(WidgetType::Slider).with_step(4.0).with_unit("px"))
}

pub fn definitions() -> Vec<BlockDefinition> {
    vec![
        BlockDefinition::new(BlockType::Container, "Container", LibraryCategory::Layout)
            .description("Generic wrapper for grouping blocks")
            .icon("box")
            .style(Breakpoint::Desktop, "padding", 16i64),
        BlockDefinition::new(BlockType::Section, "Section", LibraryCategory::Layout)
            .description("Full-width page section")
            .icon("layout")
            .param(
                Parameter::boolean("fullWidth", "Full width", false)
                    .with_ui_hint(ParameterUIHint::new(WidgetType::Checkbox)),
            )
            .style(Breakpoint::Desktop, "padding", "48px 24px")
            .style(Breakpoint::Mobile, "padding", "24px 16px"),
        BlockDefinition::new(BlockType::Columns, "Columns", LibraryCategory::Layout)
            .description("Side-by-side columns that stack on small screens")
            .icon("columns")
            .param(
                Parameter::number("columns", "Columns", 2.0)
                    .with_constraints(ParameterConstraints::new().with_min(1.0).with_max(6.0))
                    .with_ui_hint(ParameterUIHint::new(WidgetType::Slider).with_step(1.0)),
            )
            .param(gap()),
        BlockDefinition::new(BlockType::Grid, "Grid", LibraryCategory::Layout)
            .description("Responsive grid of equally sized cells")
            .icon("grid")
            .param(
                Parameter::number("columns", "Columns", 3.0)
                    .with_constraints(ParameterConstraints::new().with_min(1.0).with_max(12.0))
                    .with_ui_hint(ParameterUIHint::new(WidgetType::Slider).with_step(1.0)),
            )
            .param(gap()),
        BlockDefinition::new(BlockType::Spacer, "Spacer", LibraryCategory::Layout)
            .description("Vertical whitespace")
            .icon("move-vertical")
            .param(
                Parameter::number("height", "Height", 32.0)
                    .with_constraints(ParameterConstraints::new().with_min(0.0).with_max(512.0))
                    .with_ui_hint(ParameterUIHint::new(WidgetType::Slider).with_step(8.0).with_unit("px")),
            ),
        BlockDefinition::new(BlockType::Divider, "Divider", LibraryCategory::Layout)
            .description("Horizontal rule")
            .icon("minus")
            .param(
                Parameter::number("thickness", "Thickness", 1.0)
                    .with_constraints(ParameterConstraints::new().with_min(1.0).with_max(16.0)),
            )
            .param(
                Parameter::string("color", "Color", "#e5e7eb")
                    .with_ui_hint(ParameterUIHint::new(WidgetType::ColorPicker)),
            ),
    ]
}

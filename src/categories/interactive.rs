//! Interactive blocks
//!
//! Accordion and tabs keep their panels in array props; each element is an
//! object, so the property panel edits them through nested field groups.

use super::LibraryCategory;
use crate::core::block::BlockType;
use crate::core::content::DEFAULT_BUTTON_LABEL;
use crate::core::parameter::{
    Parameter, ParameterConstraints, ParameterUIHint, PropValue, WidgetType,
};
use crate::core::registry::BlockDefinition;

fn panel(title_key: &str, title_label: &str, default_title: &str) -> Parameter {
    Parameter::object(
        "item",
        "Item",
        vec![
            Parameter::string(title_key, title_label, default_title).required(),
            Parameter::string("content", "Content", "")
                .with_ui_hint(ParameterUIHint::new(WidgetType::Textarea)),
        ],
    )
}

pub fn definitions() -> Vec<BlockDefinition> {
    let accordion_item = panel("title", "Title", "Accordion item");
    let tab_item = panel("label", "Label", "Tab");

    vec![
        BlockDefinition::new(BlockType::Button, "Button", LibraryCategory::Interactive)
            .description("Link styled as a button")
            .icon("mouse-pointer")
            .param(Parameter::string("label", "Label", DEFAULT_BUTTON_LABEL).required())
            .param(
                Parameter::string("href", "Link", "")
                    .with_ui_hint(ParameterUIHint::new(WidgetType::Url)),
            )
            .param(Parameter::enumeration(
                "variant",
                "Variant",
                &["primary", "secondary", "outline", "ghost"],
                "primary",
            )),
        BlockDefinition::new(BlockType::Accordion, "Accordion", LibraryCategory::Interactive)
            .description("Collapsible question and answer panels")
            .icon("list")
            .param(
                Parameter::array(
                    "items",
                    "Items",
                    accordion_item.clone(),
                    vec![accordion_item.default_value.clone()],
                )
                .with_constraints(ParameterConstraints::new().with_length_range(Some(1), Some(20))),
            ),
        BlockDefinition::new(BlockType::Tabs, "Tabs", LibraryCategory::Interactive)
            .description("Content switched by a row of tabs")
            .icon("folder")
            .param(
                Parameter::array(
                    "tabs",
                    "Tabs",
                    tab_item.clone(),
                    vec![tab_item.default_value.clone()],
                )
                .with_constraints(ParameterConstraints::new().with_length_range(Some(1), Some(8))),
            )
            .param(
                Parameter::number("activeTab", "Active tab", 0.0)
                    .with_constraints(ParameterConstraints::new().with_min(0.0)),
            ),
    ]
}

//! Media blocks

use super::LibraryCategory;
use crate::core::block::BlockType;
use crate::core::breakpoint::Breakpoint;
use crate::core::content::{DEFAULT_CARD_TITLE, DEFAULT_HERO_TITLE};
use crate::core::parameter::{Parameter, ParameterUIHint, WidgetType};
use crate::core::registry::BlockDefinition;

fn url(id: &str, name: &str) -> Parameter {
    Parameter::string(id, name, "").with_ui_hint(ParameterUIHint::new(WidgetType::Url))
}

pub fn definitions() -> Vec<BlockDefinition> {
    vec![
        BlockDefinition::new(BlockType::Image, "Image", LibraryCategory::Media)
            .description("Single responsive image")
            .icon("image")
            .param(url("src", "Source"))
            .param(
                Parameter::string("alt", "Alt text", "")
                    .with_description("Describe the image for screen readers"),
            )
            .style(Breakpoint::Desktop, "width", "100%"),
        BlockDefinition::new(BlockType::Hero, "Hero", LibraryCategory::Media)
            .description("Large banner with title, subtitle and call to action")
            .icon("sparkles")
            .param(Parameter::string("title", "Title", DEFAULT_HERO_TITLE).required())
            .param(Parameter::string("subtitle", "Subtitle", ""))
            .param(Parameter::string("ctaLabel", "Button label", "Explore"))
            .param(url("ctaHref", "Button link"))
            .param(url("backgroundImage", "Background image"))
            .style(Breakpoint::Desktop, "minHeight", 480i64)
            .style(Breakpoint::Mobile, "minHeight", 320i64),
        BlockDefinition::new(BlockType::Card, "Card", LibraryCategory::Media)
            .description("Image, title and short body")
            .icon("square")
            .param(Parameter::string("title", "Title", DEFAULT_CARD_TITLE))
            .param(
                Parameter::string("body", "Body", "")
                    .with_ui_hint(ParameterUIHint::new(WidgetType::Textarea)),
            )
            .param(url("image", "Image"))
            .style(Breakpoint::Desktop, "borderRadius", 12i64),
    ]
}

//! Typography blocks

use super::LibraryCategory;
use crate::core::block::BlockType;
use crate::core::breakpoint::Breakpoint;
use crate::core::content::{DEFAULT_HEADING, DEFAULT_TEXT};
use crate::core::parameter::{Parameter, ParameterConstraints, ParameterUIHint, WidgetType};
use crate::core::registry::BlockDefinition;

pub fn definitions() -> Vec<BlockDefinition> {
    vec![
        BlockDefinition::new(BlockType::Heading, "Heading", LibraryCategory::Typography)
            .description("Section title, h1 to h6")
            .icon("heading")
            .param(Parameter::string("text", "Text", DEFAULT_HEADING).required())
            .param(
                Parameter::number("level", "Level", 2.0)
                    .with_constraints(ParameterConstraints::new().with_min(1.0).with_max(6.0))
                    .with_ui_hint(ParameterUIHint::new(WidgetType::Slider).with_step(1.0)),
            )
            .style(Breakpoint::Desktop, "fontSize", 32i64)
            .style(Breakpoint::Mobile, "fontSize", 24i64),
        BlockDefinition::new(BlockType::Text, "Text", LibraryCategory::Typography)
            .description("Paragraph of body copy")
            .icon("type")
            .param(
                Parameter::string("content", "Content", DEFAULT_TEXT)
                    .with_ui_hint(ParameterUIHint::new(WidgetType::Textarea)),
            ),
        BlockDefinition::new(BlockType::Code, "Code", LibraryCategory::Typography)
            .description("Preformatted code snippet")
            .icon("code")
            .param(
                Parameter::string("code", "Code", "")
                    .with_ui_hint(ParameterUIHint::new(WidgetType::Code)),
            )
            .param(Parameter::enumeration(
                "language",
                "Language",
                &["plaintext", "html", "css", "javascript", "json", "rust"],
                "plaintext",
            )),
    ]
}

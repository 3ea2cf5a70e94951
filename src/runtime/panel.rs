//! Property panel
//!
//! Builds a serialisable description of the form for the selected block:
//! one field per schema parameter (object and array parameters recurse into
//! the same field builder) and fixed style, layout and spacing sections bound
//! to the current breakpoint. Fields address their values with a
//! [`PropPath`] such as `items.0.title`.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::core::block::{BlockError, Props};
use crate::core::parameter::{Parameter, ParameterType, PropValue, WidgetType};
use crate::core::registry::BlockCatalog;
use crate::core::style::StyleValue;
use crate::core::{Block, BlockId, Breakpoint};

// ── Prop paths ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Dotted address of a value inside a block's props
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropPath(Vec<PathSegment>);

impl PropPath {
    pub fn key(key: &str) -> Self {
        Self(vec![PathSegment::Key(key.to_string())])
    }

    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.to_string()));
        Self(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    fn invalid(&self) -> BlockError {
        BlockError::InvalidPath(self.to_string())
    }

    fn split_root(&self) -> Result<(&str, &[PathSegment]), BlockError> {
        match self.0.split_first() {
            Some((PathSegment::Key(key), rest)) => Ok((key, rest)),
            _ => Err(self.invalid()),
        }
    }

    pub fn get<'a>(&self, props: &'a Props) -> Option<&'a PropValue> {
        let (root, rest) = self.split_root().ok()?;
        rest.iter().try_fold(props.get(root)?, |value, segment| match segment {
            PathSegment::Key(key) => value.as_object()?.get(key),
            PathSegment::Index(i) => value.as_array()?.get(*i),
        })
    }

    /// Walk to the addressed slot, creating objects for missing keys.
    fn slot<'a>(&self, props: &'a mut Props) -> Result<&'a mut PropValue, BlockError> {
        let (root, rest) = self.split_root()?;
        let mut current = props.entry(root.to_string()).or_default();
        for segment in rest {
            current = match segment {
                PathSegment::Key(key) => {
                    if current.is_null() {
                        *current = PropValue::Object(Default::default());
                    }
                    current
                        .as_object_mut()
                        .ok_or_else(|| self.invalid())?
                        .entry(key.clone())
                        .or_default()
                }
                PathSegment::Index(i) => current
                    .as_array_mut()
                    .and_then(|items| items.get_mut(*i))
                    .ok_or_else(|| self.invalid())?,
            };
        }
        Ok(current)
    }

    pub fn set(&self, props: &mut Props, value: PropValue) -> Result<(), BlockError> {
        *self.slot(props)? = value;
        Ok(())
    }

    /// Append `item` to the array at this path; a missing value becomes a
    /// one-element array. Returns the new item's index.
    pub fn push_item(&self, props: &mut Props, item: PropValue) -> Result<usize, BlockError> {
        let slot = self.slot(props)?;
        if slot.is_null() {
            *slot = PropValue::Array(Vec::new());
        }
        let items = slot.as_array_mut().ok_or_else(|| self.invalid())?;
        items.push(item);
        Ok(items.len() - 1)
    }

    pub fn remove_item(&self, props: &mut Props, index: usize) -> Result<PropValue, BlockError> {
        let items = self
            .slot(props)?
            .as_array_mut()
            .ok_or_else(|| self.invalid())?;
        if index >= items.len() {
            return Err(BlockError::InvalidPath(format!("{}.{}", self, index)));
        }
        Ok(items.remove(index))
    }
}

impl fmt::Display for PropPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                PathSegment::Key(key) => f.write_str(key)?,
                PathSegment::Index(index) => write!(f, "{}", index)?,
            }
        }
        Ok(())
    }
}

impl FromStr for PropPath {
    type Err = BlockError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let segments: Vec<PathSegment> = raw
            .split('.')
            .map(|part| match part.parse::<usize>() {
                Ok(index) => PathSegment::Index(index),
                Err(_) => PathSegment::Key(part.to_string()),
            })
            .collect();
        let well_formed = matches!(segments.first(), Some(PathSegment::Key(k)) if !k.is_empty())
            && segments
                .iter()
                .all(|s| !matches!(s, PathSegment::Key(k) if k.is_empty()));
        if !well_formed {
            return Err(BlockError::InvalidPath(raw.to_string()));
        }
        Ok(Self(segments))
    }
}

// ── Form description ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Toggle,
    Select,
    Group,
    List,
}

impl From<ParameterType> for FieldKind {
    fn from(param_type: ParameterType) -> Self {
        match param_type {
            ParameterType::String => FieldKind::Text,
            ParameterType::Number => FieldKind::Number,
            ParameterType::Boolean => FieldKind::Toggle,
            ParameterType::Enum => FieldKind::Select,
            ParameterType::Object => FieldKind::Group,
            ParameterType::Array => FieldKind::List,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub path: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget: Option<WidgetType>,
    pub value: PropValue,
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PropValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FieldView>,
}

impl FieldView {
    fn build(parameter: &Parameter, path: PropPath, label: String, value: Option<&PropValue>) -> Self {
        let value = value
            .filter(|v| !v.is_null())
            .cloned()
            .unwrap_or_else(|| parameter.default_value.clone());
        let kind = FieldKind::from(parameter.param_type);
        let check = parameter.validate(&value);

        // Groups and lists only report their own problems; members report theirs.
        let own_prefix = format!("{} ", parameter.name);
        let errors = match kind {
            FieldKind::Group | FieldKind::List => check
                .errors
                .into_iter()
                .filter(|e| e.starts_with(&own_prefix))
                .collect(),
            _ => check.errors,
        };

        let children = match kind {
            FieldKind::Group => parameter
                .fields
                .iter()
                .map(|field| {
                    let member = value.as_object().and_then(|obj| obj.get(&field.id));
                    FieldView::build(field, path.child(&field.id), field.name.clone(), member)
                })
                .collect(),
            FieldKind::List => match (&parameter.item, value.as_array()) {
                (Some(item), Some(items)) => items
                    .iter()
                    .enumerate()
                    .map(|(i, element)| {
                        FieldView::build(item, path.index(i), format!("{} {}", item.name, i + 1), Some(element))
                    })
                    .collect(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };

        let constraints = parameter.constraints.clone().unwrap_or_default();
        let hint = parameter.ui_hint.as_ref();
        Self {
            path: path.to_string(),
            label,
            kind,
            widget: hint.map(|h| h.widget),
            value,
            required: parameter.required,
            options: constraints.allowed_values.unwrap_or_default(),
            min: constraints.min,
            max: constraints.max,
            unit: hint.and_then(|h| h.unit.clone()),
            help: hint
                .and_then(|h| h.help_text.clone())
                .or_else(|| (!parameter.description.is_empty()).then(|| parameter.description.clone())),
            errors,
            children,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.children.iter().any(FieldView::has_errors)
    }

    /// Field at `path` in this subtree
    pub fn find(&self, path: &str) -> Option<&FieldView> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(path))
    }
}

struct StyleProperty {
    key: &'static str,
    label: &'static str,
    widget: WidgetType,
    unit: Option<&'static str>,
}

const fn prop(key: &'static str, label: &'static str, widget: WidgetType, unit: Option<&'static str>) -> StyleProperty {
    StyleProperty {
        key,
        label,
        widget,
        unit,
    }
}

const PX: Option<&str> = Some("px");

const STYLE_PROPERTIES: &[StyleProperty] = &[
    prop("color", "Text color", WidgetType::ColorPicker, None),
    prop("backgroundColor", "Background", WidgetType::ColorPicker, None),
    prop("fontSize", "Font size", WidgetType::Input, PX),
    prop("fontWeight", "Font weight", WidgetType::Select, None),
    prop("textAlign", "Alignment", WidgetType::Select, None),
    prop("borderRadius", "Corner radius", WidgetType::Input, PX),
    prop("opacity", "Opacity", WidgetType::Slider, None),
];

const LAYOUT_PROPERTIES: &[StyleProperty] = &[
    prop("display", "Display", WidgetType::Select, None),
    prop("width", "Width", WidgetType::Input, None),
    prop("maxWidth", "Max width", WidgetType::Input, None),
    prop("height", "Height", WidgetType::Input, None),
    prop("flexDirection", "Direction", WidgetType::Select, None),
    prop("justifyContent", "Justify", WidgetType::Select, None),
    prop("alignItems", "Align", WidgetType::Select, None),
    prop("gap", "Gap", WidgetType::Input, PX),
];

const SPACING_PROPERTIES: &[StyleProperty] = &[
    prop("paddingTop", "Padding top", WidgetType::Input, PX),
    prop("paddingRight", "Padding right", WidgetType::Input, PX),
    prop("paddingBottom", "Padding bottom", WidgetType::Input, PX),
    prop("paddingLeft", "Padding left", WidgetType::Input, PX),
    prop("marginTop", "Margin top", WidgetType::Input, PX),
    prop("marginRight", "Margin right", WidgetType::Input, PX),
    prop("marginBottom", "Margin bottom", WidgetType::Input, PX),
    prop("marginLeft", "Margin left", WidgetType::Input, PX),
];

/// One style property as shown at the current breakpoint
#[derive(Debug, Clone, Serialize)]
pub struct StyleField {
    pub key: String,
    pub label: String,
    pub widget: WidgetType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Override set at this breakpoint
    pub value: Option<StyleValue>,
    /// Value that applies without an override here
    pub inherited: Option<StyleValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StyleSection {
    pub title: String,
    pub fields: Vec<StyleField>,
}

impl StyleSection {
    fn build(title: &str, properties: &[StyleProperty], block: &Block, breakpoint: Breakpoint) -> Self {
        let own = block.styles.at(breakpoint);
        let inherited = block.styles.inherited(breakpoint);
        Self {
            title: title.to_string(),
            fields: properties
                .iter()
                .map(|p| StyleField {
                    key: p.key.to_string(),
                    label: p.label.to_string(),
                    widget: p.widget,
                    unit: p.unit.map(str::to_string),
                    value: own.and_then(|bag| bag.get(p.key)).cloned(),
                    inherited: inherited.get(p.key).cloned(),
                })
                .collect(),
        }
    }

    pub fn field(&self, key: &str) -> Option<&StyleField> {
        self.fields.iter().find(|f| f.key == key)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PanelView {
    pub block_id: BlockId,
    pub block_type: String,
    pub label: String,
    pub name: String,
    pub breakpoint: Breakpoint,
    pub is_locked: bool,
    pub is_hidden: bool,
    /// The type has no catalog definition, so there is no prop form.
    pub unknown_type: bool,
    pub fields: Vec<FieldView>,
    pub sections: Vec<StyleSection>,
}

impl PanelView {
    pub fn field(&self, path: &str) -> Option<&FieldView> {
        self.fields.iter().find_map(|f| f.find(path))
    }

    pub fn section(&self, title: &str) -> Option<&StyleSection> {
        self.sections.iter().find(|s| s.title == title)
    }
}

pub struct PropertyPanel;

impl PropertyPanel {
    pub fn build(catalog: &BlockCatalog, block: &Block, breakpoint: Breakpoint) -> PanelView {
        let definition = catalog.get(block.block_type.as_str()).ok();
        let fields = definition
            .as_ref()
            .map(|def| {
                def.schema
                    .iter()
                    .map(|p| FieldView::build(p, PropPath::key(&p.id), p.name.clone(), block.prop(&p.id)))
                    .collect()
            })
            .unwrap_or_default();

        PanelView {
            block_id: block.id.clone(),
            block_type: block.block_type.to_string(),
            label: definition
                .as_ref()
                .map(|d| d.label.clone())
                .unwrap_or_else(|| block.block_type.to_string()),
            name: block.name.clone(),
            breakpoint,
            is_locked: block.is_locked,
            is_hidden: block.is_hidden,
            unknown_type: definition.is_none(),
            fields,
            sections: vec![
                StyleSection::build("Style", STYLE_PROPERTIES, block, breakpoint),
                StyleSection::build("Layout", LAYOUT_PROPERTIES, block, breakpoint),
                StyleSection::build("Spacing", SPACING_PROPERTIES, block, breakpoint),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::style::StyleMap;

    fn item(title: &str) -> PropValue {
        PropValue::Object([("title".to_string(), PropValue::from(title))].into_iter().collect())
    }

    #[test]
    fn test_path_parse_and_display() {
        let path: PropPath = "items.0.title".parse().unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Key("items".into()),
                PathSegment::Index(0),
                PathSegment::Key("title".into())
            ]
        );
        assert_eq!(path.to_string(), "items.0.title");
        assert!("0.title".parse::<PropPath>().is_err());
        assert!("items..title".parse::<PropPath>().is_err());
    }

    #[test]
    fn test_path_edits() {
        let mut props = Props::new();
        let items = PropPath::key("items");
        assert_eq!(items.push_item(&mut props, item("One")).unwrap(), 0);
        assert_eq!(items.push_item(&mut props, item("Two")).unwrap(), 1);

        let title: PropPath = "items.1.title".parse().unwrap();
        title.set(&mut props, "Second".into()).unwrap();
        assert_eq!(title.get(&props), Some(&PropValue::from("Second")));

        items.remove_item(&mut props, 0).unwrap();
        assert_eq!(props["items"].as_array().unwrap().len(), 1);
        assert!(items.remove_item(&mut props, 5).is_err());
        assert!("items.3.title".parse::<PropPath>().unwrap().set(&mut props, "x".into()).is_err());
    }

    #[test]
    fn test_nested_key_creates_objects() {
        let mut props = Props::new();
        let path: PropPath = "seo.title".parse().unwrap();
        path.set(&mut props, "Lisbon".into()).unwrap();
        assert_eq!(path.get(&props), Some(&PropValue::from("Lisbon")));
    }

    #[test]
    fn test_panel_fields_follow_schema() {
        let catalog = BlockCatalog::standard();
        let block = catalog.instantiate("accordion").unwrap();
        let panel = PropertyPanel::build(&catalog, &block, Breakpoint::Desktop);
        let items = panel.field("items").unwrap();
        assert_eq!(items.kind, FieldKind::List);
        assert!(!items.children.is_empty());
        let first = &items.children[0];
        assert_eq!(first.kind, FieldKind::Group);
        assert_eq!(first.path, "items.0");
        assert!(panel.field("items.0.title").is_some());
        assert_eq!(panel.sections.len(), 3);
    }

    #[test]
    fn test_required_field_reports_error() {
        let catalog = BlockCatalog::standard();
        let block = Block::new("h", "heading").with_prop("text", PropValue::Null);
        let panel = PropertyPanel::build(&catalog, &block, Breakpoint::Desktop);
        // A null value falls back to the default in the form.
        assert!(!panel.field("text").unwrap().has_errors());

        let block = Block::new("h", "heading").with_prop("text", 5i64);
        let panel = PropertyPanel::build(&catalog, &block, Breakpoint::Desktop);
        assert!(panel.field("text").unwrap().has_errors());
    }

    #[test]
    fn test_style_section_shows_inherited_value() {
        let catalog = BlockCatalog::standard();
        let block = Block::new("t", "text")
            .with_styles(Breakpoint::Desktop, StyleMap::new().with("color", "red"))
            .with_styles(Breakpoint::Mobile, StyleMap::new().with("paddingTop", 8i64));
        let panel = PropertyPanel::build(&catalog, &block, Breakpoint::Mobile);

        let color = panel.section("Style").unwrap().field("color").unwrap();
        assert_eq!(color.value, None);
        assert_eq!(color.inherited, Some("red".into()));

        let padding = panel.section("Spacing").unwrap().field("paddingTop").unwrap();
        assert_eq!(padding.value, Some(8i64.into()));
    }

    #[test]
    fn test_unknown_type_has_no_fields() {
        let catalog = BlockCatalog::standard();
        let panel = PropertyPanel::build(&catalog, &Block::new("x", "carousel"), Breakpoint::Desktop);
        assert!(panel.unknown_type);
        assert!(panel.fields.is_empty());
        assert_eq!(panel.label, "carousel");
    }
}

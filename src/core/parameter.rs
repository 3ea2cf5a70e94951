//! Prop schema for block configuration
//!
//! Every block definition declares the props it understands as a list of
//! [`Parameter`]s. The property panel renders a form from this schema and
//! the validator checks stored props against it. Validation reports problems
//! but never stops a block from rendering.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One prop in a block's schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Prop key this parameter binds to
    pub id: String,
    /// Field label in the panel
    pub name: String,
    pub param_type: ParameterType,
    #[serde(default)]
    pub description: String,
    pub default_value: PropValue,
    /// Missing or null values are an error
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub constraints: Option<ParameterConstraints>,
    #[serde(default)]
    pub ui_hint: Option<ParameterUIHint>,
    /// Element schema for `Array` parameters
    #[serde(default)]
    pub item: Option<Box<Parameter>>,
    /// Member schemas for `Object` parameters
    #[serde(default)]
    pub fields: Vec<Parameter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterType {
    String,
    Number,
    Boolean,
    /// One of a fixed set of strings
    Enum,
    Object,
    Array,
}

impl Parameter {
    fn base(id: &str, name: &str, param_type: ParameterType, default_value: PropValue) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            param_type,
            description: String::new(),
            default_value,
            required: false,
            constraints: None,
            ui_hint: None,
            item: None,
            fields: Vec::new(),
        }
    }

    pub fn string(id: &str, name: &str, default: &str) -> Self {
        Self::base(id, name, ParameterType::String, PropValue::from(default))
    }

    pub fn number(id: &str, name: &str, default: f64) -> Self {
        Self::base(id, name, ParameterType::Number, PropValue::Number(default))
    }

    pub fn boolean(id: &str, name: &str, default: bool) -> Self {
        Self::base(id, name, ParameterType::Boolean, PropValue::Boolean(default))
    }

    /// Enumeration over string options; the default must be one of them.
    pub fn enumeration(id: &str, name: &str, options: &[&str], default: &str) -> Self {
        let allowed = options.iter().map(|o| PropValue::from(*o)).collect();
        let mut param = Self::base(id, name, ParameterType::Enum, PropValue::from(default));
        param.constraints = Some(ParameterConstraints::new().with_allowed_values(allowed));
        param.ui_hint = Some(ParameterUIHint::new(WidgetType::Select));
        param
    }

    /// Object parameter; the default is assembled from the field defaults.
    pub fn object(id: &str, name: &str, fields: Vec<Parameter>) -> Self {
        let default = PropValue::Object(
            fields
                .iter()
                .map(|f| (f.id.clone(), f.default_value.clone()))
                .collect(),
        );
        let mut param = Self::base(id, name, ParameterType::Object, default);
        param.fields = fields;
        param
    }

    pub fn array(id: &str, name: &str, item: Parameter, default: Vec<PropValue>) -> Self {
        let mut param = Self::base(id, name, ParameterType::Array, PropValue::Array(default));
        param.item = Some(Box::new(item));
        param
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_constraints(mut self, constraints: ParameterConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn with_ui_hint(mut self, hint: ParameterUIHint) -> Self {
        self.ui_hint = Some(hint);
        self
    }

    /// Value for a freshly appended array element
    pub fn item_default(&self) -> PropValue {
        self.item
            .as_ref()
            .map(|item| item.default_value.clone())
            .unwrap_or(PropValue::Null)
    }

    /// Validate a value against this parameter and its nested schemas.
    pub fn validate(&self, value: &PropValue) -> ValidationResult {
        self.validate_at(&self.name, value)
    }

    fn validate_at(&self, label: &str, value: &PropValue) -> ValidationResult {
        if value.is_null() {
            return if self.required {
                ValidationResult::error(format!("{} is required", label))
            } else {
                ValidationResult::ok()
            };
        }

        let mut result = ValidationResult::ok();
        let constraints = self.constraints.clone().unwrap_or_default();

        match self.param_type {
            ParameterType::String => match value.as_string() {
                Some(s) => {
                    result = result.merge(constraints.check_length(label, s.chars().count()));
                }
                None => return ValidationResult::error(format!("{} must be text", label)),
            },
            ParameterType::Number => match value.as_number() {
                Some(n) => {
                    if let Some(min) = constraints.min {
                        if n < min {
                            result = result.merge(ValidationResult::error(format!(
                                "{} must be at least {}",
                                label, min
                            )));
                        }
                    }
                    if let Some(max) = constraints.max {
                        if n > max {
                            result = result.merge(ValidationResult::error(format!(
                                "{} must be at most {}",
                                label, max
                            )));
                        }
                    }
                }
                None => return ValidationResult::error(format!("{} must be a number", label)),
            },
            ParameterType::Boolean => {
                if value.as_bool().is_none() {
                    return ValidationResult::error(format!("{} must be true or false", label));
                }
            }
            ParameterType::Enum => {
                if let Some(allowed) = &constraints.allowed_values {
                    if !allowed.contains(value) {
                        return ValidationResult::error(format!(
                            "{} has unsupported value {}",
                            label,
                            value.to_display()
                        ));
                    }
                }
            }
            ParameterType::Array => match value.as_array() {
                Some(items) => {
                    result = result.merge(constraints.check_length(label, items.len()));
                    if let Some(item) = &self.item {
                        for (i, element) in items.iter().enumerate() {
                            let element_label = format!("{}[{}]", label, i);
                            result = result.merge(item.validate_at(&element_label, element));
                        }
                    }
                }
                None => return ValidationResult::error(format!("{} must be a list", label)),
            },
            ParameterType::Object => match value.as_object() {
                Some(members) => {
                    for field in &self.fields {
                        let member = members.get(&field.id).unwrap_or(&PropValue::Null);
                        let member_label = format!("{}.{}", label, field.name);
                        result = result.merge(field.validate_at(&member_label, member));
                    }
                }
                None => return ValidationResult::error(format!("{} must be an object", label)),
            },
        }

        result
    }
}

/// Prop value: the JSON-like payload stored in a block's props
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    /// Null value
    #[default]
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer number
    Integer(i64),
    /// Floating point number
    Number(f64),
    /// String value
    String(String),
    /// Array of values
    Array(Vec<PropValue>),
    /// Object with key-value pairs
    Object(BTreeMap<String, PropValue>),
}

impl PropValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PropValue::Null)
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            PropValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Integer view; fractional numbers truncate.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropValue::Integer(i) => Some(*i),
            PropValue::Number(n) => Some(*n as i64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<PropValue>> {
        match self {
            PropValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<PropValue>> {
        match self {
            PropValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, PropValue>> {
        match self {
            PropValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut BTreeMap<String, PropValue>> {
        match self {
            PropValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Short human-readable form used in validation messages
    pub fn to_display(&self) -> String {
        match self {
            PropValue::Null => "null".into(),
            PropValue::Boolean(b) => b.to_string(),
            PropValue::Integer(i) => i.to_string(),
            PropValue::Number(n) => n.to_string(),
            PropValue::String(s) => format!("\"{}\"", s),
            PropValue::Array(items) => format!("[{} items]", items.len()),
            PropValue::Object(members) => format!("{{{} fields}}", members.len()),
        }
    }
}

impl From<serde_json::Value> for PropValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => PropValue::Null,
            serde_json::Value::Bool(b) => PropValue::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => PropValue::Integer(i),
                None => n.as_f64().map(PropValue::Number).unwrap_or(PropValue::Null),
            },
            serde_json::Value::String(s) => PropValue::String(s),
            serde_json::Value::Array(items) => {
                PropValue::Array(items.into_iter().map(PropValue::from).collect())
            }
            serde_json::Value::Object(members) => PropValue::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (k, PropValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::String(s)
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::String(s.to_string())
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        PropValue::Number(n)
    }
}

impl From<i64> for PropValue {
    fn from(i: i64) -> Self {
        PropValue::Integer(i)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Boolean(b)
    }
}

impl From<Vec<PropValue>> for PropValue {
    fn from(items: Vec<PropValue>) -> Self {
        PropValue::Array(items)
    }
}

/// Bounds a prop value must respect. Number bounds apply to numbers, length
/// bounds to strings and lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterConstraints {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Choices of an enumeration prop
    pub allowed_values: Option<Vec<PropValue>>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl ParameterConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_allowed_values(mut self, values: Vec<PropValue>) -> Self {
        self.allowed_values = Some(values);
        self
    }

    /// Entry count bounds for lists, character bounds for text
    pub fn with_length_range(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    fn check_length(&self, label: &str, len: usize) -> ValidationResult {
        let mut errors = Vec::new();
        if let Some(min) = self.min_length {
            if len < min {
                errors.push(format!("{} needs at least {} entries", label, min));
            }
        }
        if let Some(max) = self.max_length {
            if len > max {
                errors.push(format!("{} allows at most {} entries", label, max));
            }
        }
        if errors.is_empty() {
            ValidationResult::ok()
        } else {
            ValidationResult::errors(errors)
        }
    }
}

/// How the property panel draws a prop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterUIHint {
    pub widget: WidgetType,
    /// Slider increment
    pub step: Option<f64>,
    /// Suffix shown after the input, e.g. "px"
    pub unit: Option<String>,
    pub help_text: Option<String>,
}

impl ParameterUIHint {
    pub fn new(widget: WidgetType) -> Self {
        Self {
            widget,
            step: None,
            unit: None,
            help_text: None,
        }
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn with_help_text(mut self, help_text: &str) -> Self {
        self.help_text = Some(help_text.to_string());
        self
    }
}

/// Panel control for a prop or style property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetType {
    Input,
    Slider,
    Select,
    Checkbox,
    Textarea,
    /// Link or media picker
    Url,
    ColorPicker,
    /// Monospace editor for the code block
    Code,
}

/// Outcome of checking props against a schema. Warnings never make the
/// result invalid.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            valid: false,
            errors: vec![msg.into()],
            warnings: Vec::new(),
        }
    }

    pub fn errors(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, msg: impl Into<String>) -> Self {
        self.warnings.push(msg.into());
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Combine two results; invalid if either is.
    pub fn merge(mut self, other: ValidationResult) -> Self {
        self.valid &= other.valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self
    }
}

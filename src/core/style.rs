//! Per-breakpoint block styles
//!
//! Styles are authored as CSS-like property bags keyed by breakpoint. At render
//! time the bags along the breakpoint's cascade are shallow-merged; later
//! breakpoints override earlier ones key by key.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

use super::breakpoint::Breakpoint;

/// Properties that take a bare number rather than a pixel length.
const UNITLESS_PROPERTIES: &[&str] = &[
    "opacity",
    "z-index",
    "font-weight",
    "line-height",
    "flex",
    "flex-grow",
    "flex-shrink",
    "order",
];

/// A single style value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl StyleValue {
    /// Render the value for the given kebab-case CSS property.
    pub fn to_css(&self, property: &str) -> String {
        match self {
            StyleValue::Text(s) => s.clone(),
            StyleValue::Number(n) if UNITLESS_PROPERTIES.contains(&property) || *n == 0.0 => {
                format_number(*n)
            }
            StyleValue::Number(n) => format!("{}px", format_number(*n)),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StyleValue::Text(s) => Some(s),
            StyleValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => Some(*n),
            StyleValue::Text(_) => None,
        }
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::Text(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        StyleValue::Text(s)
    }
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        StyleValue::Number(n)
    }
}

impl From<i64> for StyleValue {
    fn from(n: i64) -> Self {
        StyleValue::Number(n as f64)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Convert a camelCase property name into its kebab-case CSS form.
pub fn to_kebab_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len() + 4);
    for ch in property.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// CSS-like property bag, keyed by property name as authored (camelCase)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StyleMap(BTreeMap<String, StyleValue>);

/// Stored bags are read leniently: `null` is an empty bag and entries that
/// are neither text nor a number are dropped.
impl<'de> Deserialize<'de> for StyleMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
        let mut map = BTreeMap::new();
        for (key, value) in raw {
            match value {
                Value::String(s) => {
                    map.insert(key, StyleValue::Text(s));
                }
                Value::Number(n) => match n.as_f64() {
                    Some(n) => {
                        map.insert(key, StyleValue::Number(n));
                    }
                    None => tracing::warn!(property = %key, "dropping out-of-range style number"),
                },
                Value::Null => {}
                other => tracing::warn!(property = %key, value = %other, "dropping non-scalar style value"),
            }
        }
        Ok(Self(map))
    }
}

impl StyleMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<StyleValue> {
        self.0.remove(key)
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &StyleValue)> {
        self.0.iter()
    }

    /// Shallow merge: keys from `other` overwrite keys in `self`.
    pub fn merge(&mut self, other: &StyleMap) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Inline CSS declaration list, e.g. `font-size: 24px; opacity: 0.5`.
    pub fn to_css(&self) -> String {
        self.0
            .iter()
            .map(|(key, value)| {
                let property = to_kebab_case(key);
                let value = value.to_css(&property);
                format!("{}: {}", property, value)
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl FromIterator<(String, StyleValue)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (String, StyleValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Styles of one block, one bag per breakpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BlockStyles(BTreeMap<Breakpoint, StyleMap>);

/// Unknown breakpoint keys and bags that are not objects are skipped with a
/// warning so one bad column never rejects the whole row.
impl<'de> Deserialize<'de> for BlockStyles {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
        let mut styles = BTreeMap::new();
        for (key, value) in raw {
            let Ok(breakpoint) = Breakpoint::from_str(&key) else {
                tracing::warn!(breakpoint = %key, "skipping styles for unknown breakpoint");
                continue;
            };
            match StyleMap::deserialize(value) {
                Ok(bag) if bag.is_empty() => {}
                Ok(bag) => {
                    styles.insert(breakpoint, bag);
                }
                Err(e) => tracing::warn!(%breakpoint, error = %e, "skipping malformed style bag"),
            }
        }
        Ok(Self(styles))
    }
}

impl BlockStyles {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Style bag authored for exactly this breakpoint
    pub fn at(&self, breakpoint: Breakpoint) -> Option<&StyleMap> {
        self.0.get(&breakpoint)
    }

    /// Mutable bag for this breakpoint, created on first use
    pub fn at_mut(&mut self, breakpoint: Breakpoint) -> &mut StyleMap {
        self.0.entry(breakpoint).or_default()
    }

    pub fn set(&mut self, breakpoint: Breakpoint, key: impl Into<String>, value: impl Into<StyleValue>) {
        self.at_mut(breakpoint).set(key, value);
    }

    /// Remove an override; drops the bag when it becomes empty.
    pub fn remove(&mut self, breakpoint: Breakpoint, key: &str) -> Option<StyleValue> {
        let bag = self.0.get_mut(&breakpoint)?;
        let removed = bag.remove(key);
        if bag.is_empty() {
            self.0.remove(&breakpoint);
        }
        removed
    }

    pub fn with(mut self, breakpoint: Breakpoint, styles: StyleMap) -> Self {
        self.0.insert(breakpoint, styles);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(StyleMap::is_empty)
    }

    /// Effective style at `breakpoint`: merge every bag along
    /// [`Breakpoint::cascade`] in order.
    pub fn resolve(&self, breakpoint: Breakpoint) -> StyleMap {
        let mut resolved = StyleMap::new();
        for bp in breakpoint.cascade() {
            if let Some(bag) = self.0.get(bp) {
                resolved.merge(bag);
            }
        }
        resolved
    }

    /// Effective style one step up the cascade, i.e. what `breakpoint`
    /// would inherit if it had no overrides of its own.
    pub fn inherited(&self, breakpoint: Breakpoint) -> StyleMap {
        match breakpoint.cascade_index() {
            0 => StyleMap::new(),
            i => self.resolve(Breakpoint::CASCADE[i - 1]),
        }
    }
}

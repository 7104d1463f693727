//! Schema node model.
//!
//! A document is a finite, acyclic tree of `SchemaNode` values: objects own
//! named children, arrays own a single shared items definition, everything
//! else is a leaf. Each variant carries only the fields legal for its kind,
//! so "field exists only sometimes" is a compile-time property rather than a
//! runtime convention.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// The tag distinguishing node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Integer => "integer",
            Kind::Boolean => "boolean",
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::Null => "null",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized `format` tags for string nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StringFormat {
    DateTime,
    Date,
    Time,
    Email,
    Hostname,
    Ipv4,
    Ipv6,
    Uri,
    Uuid,
}

/// Insertion-ordered property mapping of an object node.
///
/// Property order is semantically visible (the UI renders it, JSON
/// round-trips it), so equality here is order-sensitive: two maps with the
/// same entries in a different order are different documents. `IndexMap`'s
/// own `PartialEq` ignores order, hence the wrapper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyMap(IndexMap<String, SchemaNode>);

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PartialEq for PropertyMap {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().eq(other.0.iter())
    }
}

impl Deref for PropertyMap {
    type Target = IndexMap<String, SchemaNode>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PropertyMap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromIterator<(String, SchemaNode)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (String, SchemaNode)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A single typed entry in the schema tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SchemaNode {
    String {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        default: Option<String>,
        /// Non-empty when present; an empty list collapses to absent.
        #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
        enum_values: Option<Vec<String>>,
        #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
        min_length: Option<u64>,
        #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
        max_length: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        format: Option<StringFormat>,
    },

    Number {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        default: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        minimum: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        maximum: Option<f64>,
        #[serde(rename = "exclusiveMinimum", skip_serializing_if = "Option::is_none")]
        exclusive_minimum: Option<f64>,
        #[serde(rename = "exclusiveMaximum", skip_serializing_if = "Option::is_none")]
        exclusive_maximum: Option<f64>,
        #[serde(rename = "multipleOf", skip_serializing_if = "Option::is_none")]
        multiple_of: Option<f64>,
    },

    Integer {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        default: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        minimum: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        maximum: Option<i64>,
        #[serde(rename = "exclusiveMinimum", skip_serializing_if = "Option::is_none")]
        exclusive_minimum: Option<i64>,
        #[serde(rename = "exclusiveMaximum", skip_serializing_if = "Option::is_none")]
        exclusive_maximum: Option<i64>,
        #[serde(rename = "multipleOf", skip_serializing_if = "Option::is_none")]
        multiple_of: Option<i64>,
    },

    Boolean {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        default: Option<bool>,
    },

    Object {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default)]
        properties: PropertyMap,
        /// Always a subset of `properties` keys; the canonical form of the
        /// empty set is absent.
        #[serde(skip_serializing_if = "Option::is_none")]
        required: Option<Vec<String>>,
        #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none")]
        additional_properties: Option<bool>,
    },

    Array {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// One definition shared by every element; absent means the user has
        /// not chosen an items type yet.
        #[serde(skip_serializing_if = "Option::is_none")]
        items: Option<Box<SchemaNode>>,
        #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
        min_items: Option<u64>,
        #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
        max_items: Option<u64>,
        #[serde(rename = "uniqueItems", skip_serializing_if = "Option::is_none")]
        unique_items: Option<bool>,
    },

    Null {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl SchemaNode {
    /// A node of the given kind with every optional field absent.
    ///
    /// An empty object is seeded with `additionalProperties = false`; an
    /// empty array has no items definition.
    pub fn empty(kind: Kind) -> SchemaNode {
        match kind {
            Kind::String => SchemaNode::String {
                title: None,
                description: None,
                default: None,
                enum_values: None,
                min_length: None,
                max_length: None,
                pattern: None,
                format: None,
            },
            Kind::Number => SchemaNode::Number {
                title: None,
                description: None,
                default: None,
                minimum: None,
                maximum: None,
                exclusive_minimum: None,
                exclusive_maximum: None,
                multiple_of: None,
            },
            Kind::Integer => SchemaNode::Integer {
                title: None,
                description: None,
                default: None,
                minimum: None,
                maximum: None,
                exclusive_minimum: None,
                exclusive_maximum: None,
                multiple_of: None,
            },
            Kind::Boolean => SchemaNode::Boolean {
                title: None,
                description: None,
                default: None,
            },
            Kind::Object => SchemaNode::Object {
                title: None,
                description: None,
                properties: PropertyMap::new(),
                required: None,
                additional_properties: Some(false),
            },
            Kind::Array => SchemaNode::Array {
                title: None,
                description: None,
                items: None,
                min_items: None,
                max_items: None,
                unique_items: None,
            },
            Kind::Null => SchemaNode::Null {
                title: None,
                description: None,
            },
        }
    }

    /// An object node with the given properties, in iteration order.
    pub fn object<I: IntoIterator<Item = (String, SchemaNode)>>(properties: I) -> SchemaNode {
        match SchemaNode::empty(Kind::Object) {
            SchemaNode::Object {
                title,
                description,
                required,
                additional_properties,
                ..
            } => SchemaNode::Object {
                title,
                description,
                properties: properties.into_iter().collect(),
                required,
                additional_properties,
            },
            _ => unreachable!(),
        }
    }

    /// An array node with the given items definition.
    pub fn array_of(items: SchemaNode) -> SchemaNode {
        match SchemaNode::empty(Kind::Array) {
            SchemaNode::Array {
                title,
                description,
                min_items,
                max_items,
                unique_items,
                ..
            } => SchemaNode::Array {
                title,
                description,
                items: Some(Box::new(items)),
                min_items,
                max_items,
                unique_items,
            },
            _ => unreachable!(),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            SchemaNode::String { .. } => Kind::String,
            SchemaNode::Number { .. } => Kind::Number,
            SchemaNode::Integer { .. } => Kind::Integer,
            SchemaNode::Boolean { .. } => Kind::Boolean,
            SchemaNode::Object { .. } => Kind::Object,
            SchemaNode::Array { .. } => Kind::Array,
            SchemaNode::Null { .. } => Kind::Null,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            SchemaNode::String { title, .. }
            | SchemaNode::Number { title, .. }
            | SchemaNode::Integer { title, .. }
            | SchemaNode::Boolean { title, .. }
            | SchemaNode::Object { title, .. }
            | SchemaNode::Array { title, .. }
            | SchemaNode::Null { title, .. } => title.as_deref(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            SchemaNode::String { description, .. }
            | SchemaNode::Number { description, .. }
            | SchemaNode::Integer { description, .. }
            | SchemaNode::Boolean { description, .. }
            | SchemaNode::Object { description, .. }
            | SchemaNode::Array { description, .. }
            | SchemaNode::Null { description, .. } => description.as_deref(),
        }
    }

    pub fn set_title(&mut self, value: Option<String>) {
        match self {
            SchemaNode::String { title, .. }
            | SchemaNode::Number { title, .. }
            | SchemaNode::Integer { title, .. }
            | SchemaNode::Boolean { title, .. }
            | SchemaNode::Object { title, .. }
            | SchemaNode::Array { title, .. }
            | SchemaNode::Null { title, .. } => *title = value,
        }
    }

    pub fn set_description(&mut self, value: Option<String>) {
        match self {
            SchemaNode::String { description, .. }
            | SchemaNode::Number { description, .. }
            | SchemaNode::Integer { description, .. }
            | SchemaNode::Boolean { description, .. }
            | SchemaNode::Object { description, .. }
            | SchemaNode::Array { description, .. }
            | SchemaNode::Null { description, .. } => *description = value,
        }
    }

    /// Named children of an object node.
    pub fn properties(&self) -> Option<&PropertyMap> {
        match self {
            SchemaNode::Object { properties, .. } => Some(properties),
            _ => None,
        }
    }

    /// Required-set of an object node, if any names are required.
    pub fn required(&self) -> Option<&[String]> {
        match self {
            SchemaNode::Object { required, .. } => required.as_deref(),
            _ => None,
        }
    }

    /// Items definition of an array node.
    pub fn items(&self) -> Option<&SchemaNode> {
        match self {
            SchemaNode::Array { items, .. } => items.as_deref(),
            _ => None,
        }
    }

    /// The node reshaped to a new kind, keeping only what is legal there.
    ///
    /// `title` and `description` survive any change. Other fields are copied
    /// when the new kind declares them, dropped silently otherwise; this is
    /// a lossy, intentional operation. Between `number` and `integer` the
    /// numeric constraints carry over when losslessly representable. A
    /// retype to `array` always clears `items` so the user re-chooses the
    /// element type; a retype to `object` starts from an empty, closed
    /// property set unless the node already was an object.
    pub fn retyped(&self, kind: Kind) -> SchemaNode {
        let mut next = SchemaNode::empty(kind);
        next.set_title(self.title().map(str::to_owned));
        next.set_description(self.description().map(str::to_owned));

        match (self, &mut next) {
            (
                SchemaNode::String {
                    default,
                    enum_values,
                    min_length,
                    max_length,
                    pattern,
                    format,
                    ..
                },
                SchemaNode::String {
                    default: next_default,
                    enum_values: next_enum,
                    min_length: next_min,
                    max_length: next_max,
                    pattern: next_pattern,
                    format: next_format,
                    ..
                },
            ) => {
                *next_default = default.clone();
                *next_enum = enum_values.clone();
                *next_min = *min_length;
                *next_max = *max_length;
                *next_pattern = pattern.clone();
                *next_format = *format;
            }

            (
                SchemaNode::Number {
                    default,
                    minimum,
                    maximum,
                    exclusive_minimum,
                    exclusive_maximum,
                    multiple_of,
                    ..
                },
                SchemaNode::Number {
                    default: next_default,
                    minimum: next_minimum,
                    maximum: next_maximum,
                    exclusive_minimum: next_exclusive_minimum,
                    exclusive_maximum: next_exclusive_maximum,
                    multiple_of: next_multiple_of,
                    ..
                },
            ) => {
                *next_default = *default;
                *next_minimum = *minimum;
                *next_maximum = *maximum;
                *next_exclusive_minimum = *exclusive_minimum;
                *next_exclusive_maximum = *exclusive_maximum;
                *next_multiple_of = *multiple_of;
            }

            (
                SchemaNode::Number {
                    default,
                    minimum,
                    maximum,
                    exclusive_minimum,
                    exclusive_maximum,
                    multiple_of,
                    ..
                },
                SchemaNode::Integer {
                    default: next_default,
                    minimum: next_minimum,
                    maximum: next_maximum,
                    exclusive_minimum: next_exclusive_minimum,
                    exclusive_maximum: next_exclusive_maximum,
                    multiple_of: next_multiple_of,
                    ..
                },
            ) => {
                *next_default = default.and_then(integral);
                *next_minimum = minimum.and_then(integral);
                *next_maximum = maximum.and_then(integral);
                *next_exclusive_minimum = exclusive_minimum.and_then(integral);
                *next_exclusive_maximum = exclusive_maximum.and_then(integral);
                *next_multiple_of = multiple_of.and_then(integral);
            }

            (
                SchemaNode::Integer {
                    default,
                    minimum,
                    maximum,
                    exclusive_minimum,
                    exclusive_maximum,
                    multiple_of,
                    ..
                },
                SchemaNode::Integer {
                    default: next_default,
                    minimum: next_minimum,
                    maximum: next_maximum,
                    exclusive_minimum: next_exclusive_minimum,
                    exclusive_maximum: next_exclusive_maximum,
                    multiple_of: next_multiple_of,
                    ..
                },
            ) => {
                *next_default = *default;
                *next_minimum = *minimum;
                *next_maximum = *maximum;
                *next_exclusive_minimum = *exclusive_minimum;
                *next_exclusive_maximum = *exclusive_maximum;
                *next_multiple_of = *multiple_of;
            }

            (
                SchemaNode::Integer {
                    default,
                    minimum,
                    maximum,
                    exclusive_minimum,
                    exclusive_maximum,
                    multiple_of,
                    ..
                },
                SchemaNode::Number {
                    default: next_default,
                    minimum: next_minimum,
                    maximum: next_maximum,
                    exclusive_minimum: next_exclusive_minimum,
                    exclusive_maximum: next_exclusive_maximum,
                    multiple_of: next_multiple_of,
                    ..
                },
            ) => {
                *next_default = default.map(|v| v as f64);
                *next_minimum = minimum.map(|v| v as f64);
                *next_maximum = maximum.map(|v| v as f64);
                *next_exclusive_minimum = exclusive_minimum.map(|v| v as f64);
                *next_exclusive_maximum = exclusive_maximum.map(|v| v as f64);
                *next_multiple_of = multiple_of.map(|v| v as f64);
            }

            (
                SchemaNode::Boolean { default, .. },
                SchemaNode::Boolean {
                    default: next_default,
                    ..
                },
            ) => {
                *next_default = *default;
            }

            (
                SchemaNode::Object {
                    properties,
                    required,
                    additional_properties,
                    ..
                },
                SchemaNode::Object {
                    properties: next_properties,
                    required: next_required,
                    additional_properties: next_additional,
                    ..
                },
            ) => {
                *next_properties = properties.clone();
                *next_required = required.clone();
                *next_additional = *additional_properties;
            }

            // items is deliberately not carried: a retype to array forces an
            // explicit re-selection of the element type.
            (
                SchemaNode::Array {
                    min_items,
                    max_items,
                    unique_items,
                    ..
                },
                SchemaNode::Array {
                    min_items: next_min,
                    max_items: next_max,
                    unique_items: next_unique,
                    ..
                },
            ) => {
                *next_min = *min_items;
                *next_max = *max_items;
                *next_unique = *unique_items;
            }

            _ => {}
        }

        next
    }

    /// Recursive invariant repair for documents arriving from outside.
    ///
    /// Drops `required` entries that name no property, de-duplicates them,
    /// collapses empty `required` and empty `enum` to absent, and recurses
    /// through children.
    pub fn normalize(&mut self) {
        match self {
            SchemaNode::Object {
                properties,
                required,
                ..
            } => {
                if let Some(names) = required {
                    let mut kept: Vec<String> = Vec::with_capacity(names.len());
                    for name in names.drain(..) {
                        if properties.contains_key(&name) && !kept.contains(&name) {
                            kept.push(name);
                        }
                    }
                    *required = if kept.is_empty() { None } else { Some(kept) };
                }
                for child in properties.values_mut() {
                    child.normalize();
                }
            }
            SchemaNode::Array { items, .. } => {
                if let Some(items) = items {
                    items.normalize();
                }
            }
            SchemaNode::String { enum_values, .. } => {
                if matches!(enum_values.as_deref(), Some([])) {
                    *enum_values = None;
                }
            }
            _ => {}
        }
    }
}

/// `f64` to `i64` when the value is finite and integral.
fn integral(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64
    {
        Some(value as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_with_constraints() -> SchemaNode {
        serde_json::from_str(r#"{"type":"string","title":"T","minLength":3,"pattern":"^a"}"#)
            .unwrap()
    }

    #[test]
    fn retype_drops_fields_illegal_for_new_kind() {
        let node = string_with_constraints();
        let retyped = node.retyped(Kind::Boolean);

        assert_eq!(retyped.kind(), Kind::Boolean);
        assert_eq!(retyped.title(), Some("T"));

        let json = serde_json::to_value(&retyped).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "boolean", "title": "T"})
        );
    }

    #[test]
    fn retype_to_object_seeds_closed_property_set() {
        let node = SchemaNode::empty(Kind::String);
        let retyped = node.retyped(Kind::Object);

        match retyped {
            SchemaNode::Object {
                properties,
                required,
                additional_properties,
                ..
            } => {
                assert!(properties.is_empty());
                assert!(required.is_none());
                assert_eq!(additional_properties, Some(false));
            }
            other => panic!("expected object, got {:?}", other.kind()),
        }
    }

    #[test]
    fn retype_to_array_always_clears_items() {
        let node = SchemaNode::array_of(SchemaNode::empty(Kind::String));
        let retyped = node.retyped(Kind::Array);
        assert!(retyped.items().is_none());
    }

    #[test]
    fn number_to_integer_keeps_only_integral_constraints() {
        let node: SchemaNode =
            serde_json::from_str(r#"{"type":"number","minimum":1.0,"maximum":2.5}"#).unwrap();
        let retyped = node.retyped(Kind::Integer);

        match retyped {
            SchemaNode::Integer {
                minimum, maximum, ..
            } => {
                assert_eq!(minimum, Some(1));
                assert_eq!(maximum, None);
            }
            other => panic!("expected integer, got {:?}", other.kind()),
        }
    }

    #[test]
    fn integer_to_number_widens_constraints() {
        let node: SchemaNode =
            serde_json::from_str(r#"{"type":"integer","minimum":2,"multipleOf":4}"#).unwrap();
        let retyped = node.retyped(Kind::Number);

        match retyped {
            SchemaNode::Number {
                minimum,
                multiple_of,
                ..
            } => {
                assert_eq!(minimum, Some(2.0));
                assert_eq!(multiple_of, Some(4.0));
            }
            other => panic!("expected number, got {:?}", other.kind()),
        }
    }

    #[test]
    fn property_order_is_part_of_equality() {
        let forward = SchemaNode::object(vec![
            ("a".to_string(), SchemaNode::empty(Kind::String)),
            ("b".to_string(), SchemaNode::empty(Kind::String)),
        ]);
        let reversed = SchemaNode::object(vec![
            ("b".to_string(), SchemaNode::empty(Kind::String)),
            ("a".to_string(), SchemaNode::empty(Kind::String)),
        ]);

        assert_ne!(forward, reversed);
        assert_eq!(forward, forward.clone());
    }

    #[test]
    fn normalize_repairs_required_and_enum() {
        let mut node: SchemaNode = serde_json::from_str(
            r#"{
                "type": "object",
                "properties": {
                    "name": {"type": "string", "enum": []},
                    "ghosted": {"type": "object", "properties": {}, "required": ["gone"]}
                },
                "required": ["name", "missing", "name"]
            }"#,
        )
        .unwrap();
        node.normalize();

        assert_eq!(node.required(), Some(&["name".to_string()][..]));
        let props = node.properties().unwrap();
        assert!(matches!(
            props.get("name"),
            Some(SchemaNode::String {
                enum_values: None,
                ..
            })
        ));
        assert_eq!(props.get("ghosted").unwrap().required(), None);
    }

    #[test]
    fn json_round_trip_preserves_field_names_and_order() {
        let source = r#"{"type":"object","properties":{"zeta":{"type":"string","minLength":1},"alpha":{"type":"integer"}},"required":["zeta"],"additionalProperties":true}"#;
        let node: SchemaNode = serde_json::from_str(source).unwrap();

        let keys: Vec<&str> = node.properties().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha"]);

        let encoded = serde_json::to_string(&node).unwrap();
        let reparsed: SchemaNode = serde_json::from_str(&encoded).unwrap();
        assert_eq!(node, reparsed);
        assert!(encoded.contains("\"minLength\":1"));
        assert!(encoded.contains("\"additionalProperties\":true"));
    }
}

//! Document mutations.
//!
//! High-level semantic operations on schema documents. Every operation takes
//! the current root plus the focus path and returns a new root; the input
//! root is never touched.
//!
//! ## Mutation semantics
//!
//! - Operations target the focus node's children by name, except
//!   `UpdateDescription`, which edits the focus node itself.
//! - Preconditions that do not hold (focus is not an object, the named
//!   property is absent, the focus path is stale) degrade to silent no-ops:
//!   the same root value comes back. Nothing here returns an error.
//! - Invariants are restored atomically with the edit: removing or renaming
//!   a property updates `required` in the same step, and an empty `required`
//!   collapses to absent, its canonical form.

use crate::config::DEFAULT_PROPERTY_PREFIX;
use blueprint_schema::{with_edit_at, Kind, NodePath, PropertyMap, SchemaNode, StringFormat};
use serde::{Deserialize, Serialize};

/// Semantic operations on the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Mutation {
    /// Insert a fresh string property on the focus object, named
    /// `{prefix}{n}` with the smallest positive `n` not used by a sibling.
    AddProperty { prefix: Option<String> },

    /// Remove a property and its `required` entry.
    RemoveProperty { name: String },

    /// Relabel a property's slot, preserving declaration order and
    /// rewriting `required`.
    RenameProperty { from: String, to: String },

    /// Patch one field of the named child of the focus object.
    UpdateField { name: String, patch: FieldPatch },

    /// Flip the named property's membership in the focus object's
    /// `required` set.
    ToggleRequired { name: String },

    /// Set or unset the description of the focus node itself.
    UpdateDescription { text: Option<String> },
}

/// A JSON number as it arrives from the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberValue {
    Integer(i64),
    Number(f64),
}

impl NumberValue {
    pub fn as_number(&self) -> f64 {
        match self {
            NumberValue::Integer(value) => *value as f64,
            NumberValue::Number(value) => *value,
        }
    }

    /// The value as an integer, when it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            NumberValue::Integer(value) => Some(*value),
            NumberValue::Number(value) => {
                if value.is_finite()
                    && value.fract() == 0.0
                    && *value >= i64::MIN as f64
                    && *value <= i64::MAX as f64
                {
                    Some(*value as i64)
                } else {
                    None
                }
            }
        }
    }
}

/// The polymorphic `default` payload; which shapes apply depends on the
/// target node's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(String),
}

impl DefaultValue {
    fn as_number(&self) -> Option<f64> {
        match self {
            DefaultValue::Integer(value) => Some(*value as f64),
            DefaultValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    fn as_integer(&self) -> Option<i64> {
        match self {
            DefaultValue::Integer(value) => Some(*value),
            DefaultValue::Number(value) => NumberValue::Number(*value).as_integer(),
            _ => None,
        }
    }
}

/// One field assignment. `None` payloads unset the field.
///
/// A patch naming a field the target's kind does not declare is a no-op, so
/// a stale UI form can never smuggle an illegal field onto a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldPatch {
    /// Replace the node with its retyped self; migrates the field set and
    /// assigns the new kind in one step.
    Kind(Kind),
    Title(Option<String>),
    Description(Option<String>),
    Default(Option<DefaultValue>),
    Enum(Option<Vec<String>>),
    MinLength(Option<u64>),
    MaxLength(Option<u64>),
    Pattern(Option<String>),
    Format(Option<StringFormat>),
    Minimum(Option<NumberValue>),
    Maximum(Option<NumberValue>),
    ExclusiveMinimum(Option<NumberValue>),
    ExclusiveMaximum(Option<NumberValue>),
    MultipleOf(Option<NumberValue>),
    AdditionalProperties(Option<bool>),
    Items(Option<SchemaNode>),
    MinItems(Option<u64>),
    MaxItems(Option<u64>),
    UniqueItems(Option<bool>),
}

impl Mutation {
    /// Apply to `root` at the node `focus` designates, returning the new
    /// root. Stale focus and unmet preconditions return an equal root.
    pub fn apply(&self, root: &SchemaNode, focus: &NodePath) -> SchemaNode {
        match self {
            Mutation::AddProperty { prefix } => {
                let prefix = prefix
                    .as_deref()
                    .unwrap_or(DEFAULT_PROPERTY_PREFIX)
                    .to_string();
                with_edit_at(root, focus, move |node| {
                    if let SchemaNode::Object { properties, .. } = node {
                        let name = vacant_name(properties, &prefix);
                        properties.insert(name, SchemaNode::empty(Kind::String));
                    }
                })
            }

            Mutation::RemoveProperty { name } => with_edit_at(root, focus, |node| {
                if let SchemaNode::Object {
                    properties,
                    required,
                    ..
                } = node
                {
                    if properties.shift_remove(name).is_some() {
                        remove_required(required, name);
                    }
                }
            }),

            Mutation::RenameProperty { from, to } => {
                if to.trim().is_empty() || to == from {
                    tracing::trace!(%from, %to, "rename rejected");
                    return root.clone();
                }
                with_edit_at(root, focus, |node| {
                    if let SchemaNode::Object {
                        properties,
                        required,
                        ..
                    } = node
                    {
                        if properties.contains_key(from) {
                            *properties = rename_slot(properties, from, to);
                            rewrite_required(required, from, to);
                        }
                    }
                })
            }

            Mutation::UpdateField { name, patch } => with_edit_at(root, focus, |node| {
                if let SchemaNode::Object { properties, .. } = node {
                    if let Some(child) = properties.get_mut(name) {
                        patch.apply_to(child);
                    }
                }
            }),

            Mutation::ToggleRequired { name } => with_edit_at(root, focus, |node| {
                if let SchemaNode::Object {
                    properties,
                    required,
                    ..
                } = node
                {
                    if properties.contains_key(name) {
                        toggle_required(required, name);
                    }
                }
            }),

            Mutation::UpdateDescription { text } => with_edit_at(root, focus, |node| {
                node.set_description(text.clone());
            }),
        }
    }
}

impl FieldPatch {
    /// Apply this patch to a node; fields illegal for the node's kind are
    /// left alone.
    pub fn apply_to(&self, node: &mut SchemaNode) {
        if let FieldPatch::Kind(kind) = self {
            let next = node.retyped(*kind);
            *node = next;
            return;
        }

        match (self, node) {
            // An empty title is the same as no title.
            (FieldPatch::Title(value), node) => {
                node.set_title(value.clone().filter(|text| !text.is_empty()));
            }
            (FieldPatch::Description(value), node) => node.set_description(value.clone()),

            (FieldPatch::Default(value), SchemaNode::String { default, .. }) => match value {
                None => *default = None,
                Some(DefaultValue::String(text)) => *default = Some(text.clone()),
                Some(_) => {}
            },
            (FieldPatch::Default(value), SchemaNode::Number { default, .. }) => match value {
                None => *default = None,
                Some(given) => {
                    if let Some(number) = given.as_number() {
                        *default = Some(number);
                    }
                }
            },
            (FieldPatch::Default(value), SchemaNode::Integer { default, .. }) => match value {
                None => *default = None,
                Some(given) => {
                    if let Some(integer) = given.as_integer() {
                        *default = Some(integer);
                    }
                }
            },
            (FieldPatch::Default(value), SchemaNode::Boolean { default, .. }) => match value {
                None => *default = None,
                Some(DefaultValue::Boolean(flag)) => *default = Some(*flag),
                Some(_) => {}
            },

            // An empty enum list collapses to absent.
            (FieldPatch::Enum(value), SchemaNode::String { enum_values, .. }) => {
                *enum_values = value.clone().filter(|list| !list.is_empty());
            }
            (FieldPatch::MinLength(value), SchemaNode::String { min_length, .. }) => {
                *min_length = *value;
            }
            (FieldPatch::MaxLength(value), SchemaNode::String { max_length, .. }) => {
                *max_length = *value;
            }
            (FieldPatch::Pattern(value), SchemaNode::String { pattern, .. }) => {
                *pattern = value.clone();
            }
            (FieldPatch::Format(value), SchemaNode::String { format, .. }) => {
                *format = *value;
            }

            (FieldPatch::Minimum(value), SchemaNode::Number { minimum, .. }) => {
                assign_number(minimum, value);
            }
            (FieldPatch::Maximum(value), SchemaNode::Number { maximum, .. }) => {
                assign_number(maximum, value);
            }
            (
                FieldPatch::ExclusiveMinimum(value),
                SchemaNode::Number {
                    exclusive_minimum, ..
                },
            ) => assign_number(exclusive_minimum, value),
            (
                FieldPatch::ExclusiveMaximum(value),
                SchemaNode::Number {
                    exclusive_maximum, ..
                },
            ) => assign_number(exclusive_maximum, value),
            (FieldPatch::MultipleOf(value), SchemaNode::Number { multiple_of, .. }) => {
                assign_number(multiple_of, value);
            }

            (FieldPatch::Minimum(value), SchemaNode::Integer { minimum, .. }) => {
                assign_integer(minimum, value);
            }
            (FieldPatch::Maximum(value), SchemaNode::Integer { maximum, .. }) => {
                assign_integer(maximum, value);
            }
            (
                FieldPatch::ExclusiveMinimum(value),
                SchemaNode::Integer {
                    exclusive_minimum, ..
                },
            ) => assign_integer(exclusive_minimum, value),
            (
                FieldPatch::ExclusiveMaximum(value),
                SchemaNode::Integer {
                    exclusive_maximum, ..
                },
            ) => assign_integer(exclusive_maximum, value),
            (FieldPatch::MultipleOf(value), SchemaNode::Integer { multiple_of, .. }) => {
                assign_integer(multiple_of, value);
            }

            (
                FieldPatch::AdditionalProperties(value),
                SchemaNode::Object {
                    additional_properties,
                    ..
                },
            ) => *additional_properties = *value,

            (FieldPatch::Items(value), SchemaNode::Array { items, .. }) => {
                *items = value.clone().map(Box::new);
            }
            (FieldPatch::MinItems(value), SchemaNode::Array { min_items, .. }) => {
                *min_items = *value;
            }
            (FieldPatch::MaxItems(value), SchemaNode::Array { max_items, .. }) => {
                *max_items = *value;
            }
            (FieldPatch::UniqueItems(value), SchemaNode::Array { unique_items, .. }) => {
                *unique_items = *value;
            }

            _ => {}
        }
    }
}

/// Smallest `{prefix}{n}`, n >= 1, not already a sibling name.
fn vacant_name(properties: &PropertyMap, prefix: &str) -> String {
    let mut n: usize = 1;
    loop {
        let candidate = format!("{prefix}{n}");
        if !properties.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Rebuild the ordered mapping with `from`'s slot relabeled to `to`.
///
/// A collision with an existing sibling follows object-literal semantics:
/// the colliding key keeps the position of its first write and the value of
/// its last write.
fn rename_slot(properties: &PropertyMap, from: &str, to: &str) -> PropertyMap {
    let mut next = PropertyMap::new();
    for (key, value) in properties.iter() {
        if key == from {
            next.insert(to.to_string(), value.clone());
        } else {
            next.insert(key.clone(), value.clone());
        }
    }
    next
}

fn remove_required(required: &mut Option<Vec<String>>, name: &str) {
    if let Some(names) = required {
        names.retain(|entry| entry != name);
        if names.is_empty() {
            *required = None;
        }
    }
}

fn rewrite_required(required: &mut Option<Vec<String>>, from: &str, to: &str) {
    if let Some(names) = required {
        let mut next: Vec<String> = Vec::with_capacity(names.len());
        for name in names.drain(..) {
            let name = if name == from { to.to_string() } else { name };
            if !next.contains(&name) {
                next.push(name);
            }
        }
        *required = if next.is_empty() { None } else { Some(next) };
    }
}

fn toggle_required(required: &mut Option<Vec<String>>, name: &str) {
    match required {
        Some(names) if names.iter().any(|entry| entry == name) => {
            names.retain(|entry| entry != name);
            if names.is_empty() {
                *required = None;
            }
        }
        Some(names) => names.push(name.to_string()),
        None => *required = Some(vec![name.to_string()]),
    }
}

fn assign_number(slot: &mut Option<f64>, value: &Option<NumberValue>) {
    match value {
        None => *slot = None,
        Some(given) => *slot = Some(given.as_number()),
    }
}

/// A fractional payload against an integer field is a no-op, not a rounding.
fn assign_integer(slot: &mut Option<i64>, value: &Option<NumberValue>) {
    match value {
        None => *slot = None,
        Some(given) => {
            if let Some(integer) = given.as_integer() {
                *slot = Some(integer);
            }
        }
    }
}

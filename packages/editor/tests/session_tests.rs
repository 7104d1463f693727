//! Session-level tests: navigation, dirty tracking, stale-focus recovery,
//! and the JSON round trip the persistence collaborator relies on.

use anyhow::Result;
use blueprint_editor::{
    Document, EditSession, FieldPatch, Kind, Mutation, NodePath, SchemaNode,
};

const NESTED: &str = r#"{
    "type": "object",
    "properties": {
        "user": {
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "address": {
                    "type": "object",
                    "properties": {"street": {"type": "string"}}
                }
            },
            "required": ["name"]
        },
        "tags": {"type": "array", "items": {"type": "string"}}
    }
}"#;

fn nested_session() -> EditSession {
    EditSession::new(Document::from_json(NESTED).unwrap())
}

#[test]
fn back_jump_truncates_the_trail() {
    let mut session = nested_session();
    let user = NodePath::root().child("user");
    let address = user.child("address");

    session.navigate(user.clone(), "user");
    session.navigate(address, "address");
    assert_eq!(session.navigation().depth(), 3);

    session.navigate(user.clone(), "");

    let labels: Vec<&str> = session
        .navigation()
        .trail()
        .iter()
        .map(|crumb| crumb.label.as_str())
        .collect();
    assert_eq!(labels, ["Root", "user"]);
    assert_eq!(session.focus(), &user);
}

#[test]
fn mutations_apply_at_the_focus_node() {
    let mut session = nested_session();
    session.navigate(NodePath::root().child("user"), "user");

    session.add_property();

    let user = session
        .document()
        .root()
        .properties()
        .unwrap()
        .get("user")
        .unwrap();
    assert!(user.properties().unwrap().contains_key("newProperty1"));
    // the sibling subtree is untouched
    assert!(session
        .document()
        .root()
        .properties()
        .unwrap()
        .contains_key("tags"));
}

#[test]
fn items_paths_reach_into_array_definitions() {
    let mut session = nested_session();
    session.navigate(NodePath::root().child("tags").items(), "tags items");

    session.update_description(Some("one tag".to_string()));

    let items = session
        .document()
        .root()
        .properties()
        .unwrap()
        .get("tags")
        .unwrap()
        .items()
        .unwrap();
    assert_eq!(items.description(), Some("one tag"));
}

#[test]
fn dirty_flag_follows_the_edit_save_cycle() {
    let mut session = nested_session();
    assert!(!session.is_dirty());

    session.navigate(NodePath::root().child("user"), "user");
    let result = session.toggle_required("name");
    assert!(result.changed);
    assert!(session.is_dirty());

    session.mark_saved();
    assert!(!session.is_dirty());

    session.toggle_required("name");
    assert!(session.is_dirty());

    session.mark_saved();
    assert!(!session.is_dirty());
}

#[test]
fn noop_mutations_never_dirty_the_document() {
    let mut session = nested_session();

    session.remove_property("ghost");
    session.rename_property("user", "user");
    session.toggle_required("ghost");

    assert!(!session.is_dirty());
    assert_eq!(session.document().version(), 0);
}

#[test]
fn rebase_snaps_focus_to_the_nearest_surviving_ancestor() {
    let mut session = nested_session();
    let user = NodePath::root().child("user");
    session.navigate(user.clone(), "user");
    session.navigate(user.child("address"), "address");

    // the document is reloaded underneath the session with `address` gone
    let reloaded = Document::from_json(
        r#"{
            "type": "object",
            "properties": {
                "user": {
                    "type": "object",
                    "properties": {"name": {"type": "string"}}
                }
            }
        }"#,
    )
    .unwrap();
    session.rebase(reloaded);

    assert_eq!(session.focus(), &user);
    assert_eq!(session.navigation().depth(), 2);
    assert!(!session.is_dirty());

    // editing continues at the surviving ancestor
    let result = session.apply(Mutation::AddProperty { prefix: None });
    assert!(result.changed);
    assert!(session
        .focus_node()
        .unwrap()
        .properties()
        .unwrap()
        .contains_key("newProperty1"));
}

#[test]
fn rebase_keeps_the_trail_where_it_still_resolves() {
    let mut session = nested_session();
    session.navigate(NodePath::root().child("user"), "user");

    session.rebase(Document::from_json(NESTED).unwrap());

    assert_eq!(session.navigation().depth(), 2);
    assert!(session.focus_node().is_some());
}

#[test]
fn navigating_to_a_dead_path_recovers_to_root() {
    let mut session = nested_session();
    session.navigate(NodePath::root().child("user").child("ghost"), "ghost");

    assert!(session.focus_node().is_none());
    let result = session.toggle_required("anything");

    assert!(!result.changed);
    assert!(session.focus().is_root());
}

#[test]
fn retype_under_the_focus_invalidates_deeper_paths() {
    let mut session = nested_session();
    let address = NodePath::root().child("user").child("address");

    // retype user → string from the root focus, then jump to the old path
    session.update_field("user", FieldPatch::Kind(Kind::String));
    session.navigate(address, "address");

    let result = session.add_property();

    assert!(!result.changed);
    assert!(session.focus().is_root());
}

#[test]
fn json_round_trip_is_lossless_and_order_preserving() -> Result<()> {
    let mut session = nested_session();
    session.navigate(NodePath::root().child("user"), "user");
    session.add_property();
    session.rename_property("newProperty1", "email");
    session.update_field("email", FieldPatch::MinLength(Some(5)));
    session.toggle_required("email");

    let encoded = session.document().to_json()?;
    let reparsed = Document::from_json(&encoded)?;

    assert_eq!(reparsed.root(), session.document().root());

    let user = reparsed.root().properties().unwrap().get("user").unwrap();
    let names: Vec<&str> = user.properties().unwrap().keys().map(String::as_str).collect();
    assert_eq!(names, ["name", "address", "email"]);
    assert_eq!(
        user.required(),
        Some(&["name".to_string(), "email".to_string()][..])
    );
    Ok(())
}

#[test]
fn a_full_editing_pass_holds_the_document_together() -> Result<()> {
    let mut session = EditSession::new(Document::from_json(
        r#"{"type":"object","properties":{}}"#,
    )?);

    session.add_property();
    session.rename_property("newProperty1", "person");
    session.update_field("person", FieldPatch::Kind(Kind::Object));

    session.navigate(NodePath::root().child("person"), "person");
    session.add_property();
    session.rename_property("newProperty1", "age");
    session.update_field("age", FieldPatch::Kind(Kind::Integer));
    session.toggle_required("age");

    session.navigate(NodePath::root(), "");
    session.update_description(Some("people registry".to_string()));

    let root = session.document().root();
    assert_eq!(root.description(), Some("people registry"));

    let person = root.properties().unwrap().get("person").unwrap();
    assert_eq!(person.kind(), Kind::Object);
    assert_eq!(person.required(), Some(&["age".to_string()][..]));
    assert_eq!(
        person.properties().unwrap().get("age").unwrap().kind(),
        Kind::Integer
    );

    assert!(session.is_dirty());
    let encoded = session.document().to_json()?;
    assert_eq!(Document::from_json(&encoded)?.root(), root);
    Ok(())
}

#[test]
fn session_surfaces_schema_values_for_the_ui() {
    let mut session = nested_session();
    session.navigate(NodePath::root().child("tags"), "tags");

    let node: &SchemaNode = session.focus_node().unwrap();
    assert_eq!(node.kind(), Kind::Array);
    assert_eq!(node.items().unwrap().kind(), Kind::String);
}

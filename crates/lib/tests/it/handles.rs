//! Tests for live map/list handles: write-through, sharing and staleness.

use jsondict::{JsonDict, Value};

fn dict_with_user() -> JsonDict {
    let dict = JsonDict::new();
    dict.set("user", Value::empty_map()).unwrap();
    let user = dict.get("user").unwrap().unwrap().into_map().unwrap();
    user.set("name", "Alice").unwrap();
    user.set("tags", Value::empty_list()).unwrap();
    dict
}

#[test]
fn test_nested_mutation_is_visible_from_root() {
    let dict = dict_with_user();
    let user = dict.get("user").unwrap().unwrap().into_map().unwrap();
    user.set("name", "Bob").unwrap();

    let snapshot = dict.snapshot().unwrap();
    let root = snapshot.as_map().unwrap();
    assert_eq!(root["user"].as_map().unwrap()["name"], "Bob");
}

#[test]
fn test_two_handles_to_the_same_location_share_state() {
    let dict = dict_with_user();
    let first = dict.get("user").unwrap().unwrap().into_map().unwrap();
    let second = dict.get("user").unwrap().unwrap().into_map().unwrap();

    first.set("email", "a@example.com").unwrap();
    assert_eq!(
        second.get_or("email", Value::Null).unwrap(),
        "a@example.com"
    );
}

#[test]
fn test_deeply_nested_handles_extend_their_path() {
    let dict = JsonDict::new();
    dict.set("a", Value::empty_map()).unwrap();
    let a = dict.get("a").unwrap().unwrap().into_map().unwrap();
    a.set("b", Value::empty_map()).unwrap();
    let b = a.get("b").unwrap().unwrap().into_map().unwrap();
    b.set("c", Value::empty_list()).unwrap();
    let c = b.get("c").unwrap().unwrap().into_list().unwrap();

    assert_eq!(b.path().to_string(), "a.b");
    assert_eq!(c.path().to_string(), "a.b.c");

    c.push(Value::empty_map()).unwrap();
    let elem = c.get(0).unwrap().into_map().unwrap();
    assert_eq!(elem.path().to_string(), "a.b.c[0]");
    elem.set("leaf", 1).unwrap();

    let snapshot = dict.snapshot().unwrap();
    let root = snapshot.as_map().unwrap();
    let leaf = &root["a"].as_map().unwrap()["b"].as_map().unwrap()["c"]
        .as_list()
        .unwrap()[0];
    assert_eq!(leaf.as_map().unwrap()["leaf"], 1);
}

#[test]
fn test_list_handle_mutations() {
    let dict = dict_with_user();
    let user = dict.get("user").unwrap().unwrap().into_map().unwrap();
    let tags = user.get("tags").unwrap().unwrap().into_list().unwrap();

    tags.push("admin").unwrap();
    tags.extend(["ops", "dev"]).unwrap();
    tags.insert(1, "staff").unwrap();
    assert_eq!(tags.len().unwrap(), 4);

    tags.set(0, "root").unwrap();
    assert_eq!(tags.get(0).unwrap().as_text(), Some("root"));

    assert_eq!(tags.pop().unwrap(), "dev");
    assert_eq!(tags.pop_at(0).unwrap(), "root");
    tags.remove_value(&Value::Text("staff".to_string())).unwrap();

    let remaining: Vec<Value> = tags.iter().unwrap().collect();
    assert_eq!(remaining, vec![Value::Text("ops".to_string())]);
}

#[test]
fn test_list_bounds_are_checked() {
    let dict = dict_with_user();
    let user = dict.get("user").unwrap().unwrap().into_map().unwrap();
    let tags = user.get("tags").unwrap().unwrap().into_list().unwrap();

    assert!(tags.get(0).unwrap_err().is_out_of_range());
    assert!(tags.set(0, "x").unwrap_err().is_out_of_range());
    assert!(tags.pop().unwrap_err().is_out_of_range());
    assert!(tags.insert(1, "x").unwrap_err().is_out_of_range());

    // insert at len is an append
    tags.insert(0, "first").unwrap();
    assert_eq!(tags.len().unwrap(), 1);
}

#[test]
fn test_handle_goes_stale_when_target_removed() {
    let dict = dict_with_user();
    let user = dict.get("user").unwrap().unwrap().into_map().unwrap();
    let tags = user.get("tags").unwrap().unwrap().into_list().unwrap();

    dict.remove("user").unwrap();

    assert!(user.get("name").unwrap_err().is_stale());
    assert!(user.set("name", "x").unwrap_err().is_stale());
    assert!(tags.push("x").unwrap_err().is_stale());
    assert!(tags.iter().unwrap_err().is_stale());
}

#[test]
fn test_handle_goes_stale_when_target_changes_kind() {
    let dict = dict_with_user();
    let user = dict.get("user").unwrap().unwrap().into_map().unwrap();

    // Same path, different container kind
    dict.set("user", Value::empty_list()).unwrap();
    assert!(user.len().unwrap_err().is_stale());

    // And a scalar at the path of a former list
    let dict = dict_with_user();
    let user = dict.get("user").unwrap().unwrap().into_map().unwrap();
    let tags = user.get("tags").unwrap().unwrap().into_list().unwrap();
    user.set("tags", 42).unwrap();
    assert!(tags.len().unwrap_err().is_stale());
}

#[test]
fn test_stale_handle_recovers_when_path_resolves_again() {
    let dict = dict_with_user();
    let user = dict.get("user").unwrap().unwrap().into_map().unwrap();
    dict.remove("user").unwrap();
    assert!(user.len().unwrap_err().is_stale());

    // A new map at the same path revives the handle; it addresses the
    // location, not the original object
    dict.set("user", Value::empty_map()).unwrap();
    user.set("name", "Carol").unwrap();
    assert_eq!(user.get_or("name", Value::Null).unwrap(), "Carol");
}

#[test]
fn test_index_paths_address_positions_not_elements() {
    let dict = JsonDict::new();
    dict.set(
        "rows",
        Value::List(vec![
            Value::Map([("id".to_string(), Value::Int(0))].into_iter().collect()),
            Value::Map([("id".to_string(), Value::Int(1))].into_iter().collect()),
        ]),
    )
    .unwrap();
    let rows = dict.get("rows").unwrap().unwrap().into_list().unwrap();
    let second = rows.get(1).unwrap().into_map().unwrap();

    // Removing the first element shifts the second into index 0; the handle
    // at index 1 now dangles
    rows.pop_at(0).unwrap();
    assert!(second.len().unwrap_err().is_stale());
}

#[test]
fn test_map_handle_clear_and_to_value() {
    let dict = dict_with_user();
    let user = dict.get("user").unwrap().unwrap().into_map().unwrap();

    let snapshot = user.to_value().unwrap();
    user.clear().unwrap();
    assert!(user.is_empty().unwrap());

    // The earlier snapshot is unaffected
    assert_eq!(snapshot.as_map().unwrap()["name"], "Alice");
}

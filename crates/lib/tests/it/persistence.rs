//! Tests for save/load, backing paths and JSON output options.

use jsondict::{JsonDict, Value, WriteOptions, from_json_str};
use tempfile::tempdir;

fn populated() -> JsonDict {
    let dict = JsonDict::new();
    dict.set("zeta", 1).unwrap();
    dict.set("alpha", Value::Map([("k".to_string(), Value::Text("v".to_string()))].into_iter().collect()))
        .unwrap();
    dict.set("items", Value::List(vec![Value::Int(1), Value::Bool(true), Value::Null]))
        .unwrap();
    dict
}

#[test]
fn test_save_and_open_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");

    let dict = populated();
    dict.save_to(&path).unwrap();

    let reloaded = JsonDict::open(&path).unwrap();
    assert_eq!(reloaded.snapshot().unwrap(), dict.snapshot().unwrap());

    // Insertion order survives the disk round trip
    let keys: Vec<String> = reloaded.keys().unwrap().collect();
    assert_eq!(keys, vec!["zeta", "alpha", "items"]);
}

#[test]
fn test_open_missing_file_starts_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let dict = JsonDict::open(&path).unwrap();
    assert!(dict.is_empty().unwrap());
    assert_eq!(dict.backing_path(), Some(path.as_path()));

    // save() now uses the remembered path
    dict.set("k", 1).unwrap();
    dict.save().unwrap();
    assert!(path.exists());
}

#[test]
fn test_save_overwrites_atomically() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");

    let dict = JsonDict::open(&path).unwrap();
    dict.set("version", 1).unwrap();
    dict.save().unwrap();
    dict.set("version", 2).unwrap();
    dict.save().unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let value = from_json_str(&text).unwrap();
    assert_eq!(value.as_map().unwrap()["version"], 2);

    // No temp file litter left next to the target
    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["data.json"]);
}

#[test]
fn test_save_default_output_is_two_space_indented() {
    let dict = JsonDict::new();
    dict.set("a", Value::List(vec![Value::Int(1)])).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("pretty.json");
    dict.save_to(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "{\n  \"a\": [\n    1\n  ]\n}");
}

#[test]
fn test_save_with_custom_options() {
    let dict = JsonDict::new();
    dict.set("note", "héllo").unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("escaped.json");
    let options = WriteOptions {
        indent: None,
        escape_non_ascii: true,
    };
    dict.save_with(Some(&path), &options).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "{\"note\":\"h\\u00e9llo\"}");

    // Escaped text loads back to the original value
    let reloaded = JsonDict::open(&path).unwrap();
    assert_eq!(reloaded.get_or("note", Value::Null).unwrap(), "héllo");
}

#[test]
fn test_to_json_string_matches_saved_file() {
    let dict = populated();
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    dict.save_to(&path).unwrap();

    let text = dict.to_json_string(&WriteOptions::default()).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
}

#[test]
fn test_load_replaces_previous_contents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");

    let writer = JsonDict::open(&path).unwrap();
    writer.set("from_disk", true).unwrap();
    writer.save().unwrap();

    let dict = JsonDict::open(&path).unwrap();
    dict.set("in_memory_only", 1).unwrap();
    dict.load().unwrap();

    assert!(!dict.contains_key("in_memory_only").unwrap());
    assert_eq!(dict.get_or("from_disk", Value::Null).unwrap(), true);
}

#[test]
fn test_load_failure_keeps_previous_tree() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");

    let dict = JsonDict::open(&path).unwrap();
    dict.set("keep", 1).unwrap();

    // Missing file
    let err = dict.load().unwrap_err();
    assert!(err.is_io_error());
    assert_eq!(dict.get_or("keep", Value::Null).unwrap(), 1);

    // Malformed JSON
    std::fs::write(&path, "{not json").unwrap();
    let err = dict.load().unwrap_err();
    assert!(err.is_malformed_json());
    assert_eq!(dict.get_or("keep", Value::Null).unwrap(), 1);

    // Valid JSON with a non-map root
    std::fs::write(&path, "[1, 2, 3]").unwrap();
    let err = dict.load().unwrap_err();
    assert!(!err.is_malformed_json());
    assert_eq!(err.module(), "store");
    assert_eq!(dict.get_or("keep", Value::Null).unwrap(), 1);
}

#[test]
fn test_open_rejects_non_map_root() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("list.json");
    std::fs::write(&path, "[1]").unwrap();
    assert!(JsonDict::open(&path).is_err());
}

#[test]
fn test_save_and_load_without_path_fail() {
    let dict = JsonDict::new();
    assert!(dict.save().unwrap_err().is_no_path());
    assert!(dict.load().unwrap_err().is_no_path());
    assert_eq!(dict.backing_path(), None);

    // An explicit path still works
    let dir = tempdir().unwrap();
    dict.set("k", 1).unwrap();
    dict.save_to(dir.path().join("out.json")).unwrap();
}

#[test]
fn test_closed_dict_cannot_save_or_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    let dict = JsonDict::open(&path).unwrap();
    dict.set("k", 1).unwrap();
    dict.save().unwrap();

    dict.close();
    assert!(dict.save().unwrap_err().is_closed());
    assert!(dict.load().unwrap_err().is_closed());
}

#[test]
fn test_float_and_int_survive_round_trip_distinctly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nums.json");

    let dict = JsonDict::open(&path).unwrap();
    dict.set("int", 3).unwrap();
    dict.set("float", 3.0).unwrap();
    dict.save().unwrap();

    let reloaded = JsonDict::open(&path).unwrap();
    assert_eq!(
        reloaded.get_or("int", Value::Null).unwrap(),
        Value::Int(3)
    );
    assert_eq!(
        reloaded.get_or("float", Value::Null).unwrap(),
        Value::Float(3.0)
    );
}

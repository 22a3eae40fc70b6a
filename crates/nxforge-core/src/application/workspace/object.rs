//! JSON object key ordering.

use serde_json::{Map, Value};

/// Sort the keys of `map` in place.
pub fn sort_object_keys(map: &mut Map<String, Value>) {
    let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    map.extend(entries);
}

/// Sort keys of `map` and of every object nested inside it.
pub fn sort_object_keys_recursive(map: &mut Map<String, Value>) {
    sort_object_keys(map);
    for value in map.values_mut() {
        sort_value(value);
    }
}

fn sort_value(value: &mut Value) {
    match value {
        Value::Object(map) => sort_object_keys_recursive(map),
        Value::Array(items) => items.iter_mut().for_each(sort_value),
        _ => {}
    }
}

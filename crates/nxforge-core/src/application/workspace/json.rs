//! JSON files in the tree.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::application::ApplicationError;
use crate::application::tree::Tree;
use crate::domain::DomainError;
use crate::error::ForgeResult;

fn parse<T: DeserializeOwned>(path: &str, content: &str) -> ForgeResult<T> {
    serde_json::from_str(content).map_err(|e| {
        DomainError::ParseFailed {
            path: path.to_string(),
            format: "json",
            reason: e.to_string(),
        }
        .into()
    })
}

/// Serialize as 2-space indented JSON with a trailing newline.
pub fn to_json_string<T: Serialize + ?Sized>(path: &str, value: &T) -> ForgeResult<String> {
    let mut out = serde_json::to_string_pretty(value).map_err(|e| ApplicationError::SerializeFailed {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    out.push('\n');
    Ok(out)
}

pub fn read_json<T: DeserializeOwned>(tree: &Tree<'_>, path: &str) -> ForgeResult<T> {
    let content = tree.read_required(path)?;
    parse(path, &content)
}

pub fn read_json_if_exists<T: DeserializeOwned>(
    tree: &Tree<'_>,
    path: &str,
) -> ForgeResult<Option<T>> {
    match tree.read(path)? {
        Some(content) => parse(path, &content).map(Some),
        None => Ok(None),
    }
}

pub fn write_json<T: Serialize + ?Sized>(tree: &mut Tree<'_>, path: &str, value: &T) -> ForgeResult<()> {
    let content = to_json_string(path, value)?;
    tree.write(path, content);
    Ok(())
}

/// Read, modify and write back a JSON file that must exist.
pub fn update_json<T, R, F>(tree: &mut Tree<'_>, path: &str, update: F) -> ForgeResult<R>
where
    T: DeserializeOwned + Serialize,
    F: FnOnce(&mut T) -> ForgeResult<R>,
{
    let mut value: T = read_json(tree, path)?;
    let result = update(&mut value)?;
    write_json(tree, path, &value)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn writes_pretty_json_with_newline() {
        let mut tree = Tree::empty();
        write_json(&mut tree, "a.json", &json!({ "b": [1] })).unwrap();
        assert_eq!(
            tree.read("a.json").unwrap().unwrap(),
            "{\n  \"b\": [\n    1\n  ]\n}\n"
        );
    }

    #[test]
    fn update_keeps_key_order() {
        let mut tree = Tree::empty();
        tree.write("p.json", r#"{"z": 1, "a": 2}"#);
        update_json(&mut tree, "p.json", |value: &mut Value| {
            value["m"] = json!(3);
            Ok(())
        })
        .unwrap();
        let text = tree.read("p.json").unwrap().unwrap();
        assert!(text.find("\"z\"").unwrap() < text.find("\"a\"").unwrap());
        assert!(text.find("\"a\"").unwrap() < text.find("\"m\"").unwrap());
    }

    #[test]
    fn parse_errors_name_the_file() {
        let mut tree = Tree::empty();
        tree.write("bad.json", "{ nope");
        let err = read_json::<Value>(&tree, "bad.json").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse json file bad.json"));
    }
}

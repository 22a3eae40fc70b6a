//! Naming helpers shared by every generator.
//!
//! Generated projects need the same user-supplied name in several casings:
//! directories and npm packages use kebab-case, Python modules use
//! snake_case, CDK constructs use PascalCase class names.
//!
//! | Input           | kebab             | snake             | class           |
//! |-----------------|-------------------|-------------------|-----------------|
//! | `MyApi`         | `my-api`          | `my_api`          | `MyApi`         |
//! | `my_api`        | `my-api`          | `my_api`          | `MyApi`         |
//! | `HTTPHandler`   | `http-handler`    | `http_handler`    | `HttpHandler`   |
//! | `@scope/my.api` | `scope-my-api`    | `scope_my_api`    | `ScopeMyApi`    |

use crate::domain::error::DomainError;

/// Convert a string to kebab-case.
pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// Convert a string to snake_case.
pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// Convert a string to SCREAMING_SNAKE_CASE.
pub fn to_upper_snake_case(s: &str) -> String {
    to_snake_case(s).to_uppercase()
}

/// Convert a string to a PascalCase class name.
pub fn to_class_name(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// Convert a string to camelCase.
pub fn to_camel_case(s: &str) -> String {
    let words = split_words(s);
    let mut out = String::new();
    for (i, w) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(w);
        } else {
            out.push_str(&capitalize(w));
        }
    }
    out
}

/// Relative path from a project root back to the workspace root.
///
/// `packages/api` → `../../`, `` → ``.
pub fn offset_from_root(root: &str) -> String {
    root.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .map(|_| "../")
        .collect()
}

/// Prefix a package name with an npm scope.
///
/// The scope may be given with or without its leading `@`.
pub fn to_scoped_name(scope: Option<&str>, name: &str) -> String {
    match scope {
        Some(scope) if !scope.trim_start_matches('@').is_empty() => {
            format!("@{}/{}", scope.trim_start_matches('@'), name)
        }
        _ => name.to_string(),
    }
}

/// `@scope/name` → `name`; unscoped names are returned as-is.
pub fn strip_scope(name: &str) -> &str {
    match name.strip_prefix('@').and_then(|rest| rest.split_once('/')) {
        Some((_, bare)) => bare,
        None => name,
    }
}

/// Python import name for a project: `scope_name`.
pub fn python_module_name(scope: Option<&str>, name: &str) -> String {
    match scope {
        Some(scope) => format!("{}_{}", to_snake_case(scope), to_snake_case(name)),
        None => to_snake_case(name),
    }
}

/// Python distribution/project name: `scope.name`.
pub fn python_project_name(scope: Option<&str>, name: &str) -> String {
    match scope {
        Some(scope) => format!("{}.{}", to_snake_case(scope), to_snake_case(name)),
        None => to_snake_case(name),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::new();
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// Split a string into lowercase words.
///
/// Boundaries: any non-alphanumeric character, a lower→upper transition
/// (`myApi`), and the last capital of an acronym run (`HTTPServer` →
/// `http` + `server`).
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            if (c.is_lowercase() || c.is_ascii_digit()) && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}

/// Check a user-supplied project or component name.
///
/// Names must start with a letter and contain only letters, digits, `-`,
/// `_`, `.` or spaces.
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    let Some(first) = name.chars().next() else {
        return Err(invalid("name cannot be empty"));
    };
    if !first.is_ascii_alphabetic() {
        return Err(invalid("must start with a letter"));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ')))
    {
        return Err(invalid(&format!("contains invalid character '{c}'")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_names() {
        assert!(validate_name("first-api").is_ok());
        assert!(validate_name("My Api_2").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("1api").is_err());
        let err = validate_name("api/../x").unwrap_err();
        assert!(err.to_string().contains("invalid character '/'"));
    }

    #[test]
    fn kebab_case_variants() {
        assert_eq!(to_kebab_case("MyApi"), "my-api");
        assert_eq!(to_kebab_case("my_api"), "my-api");
        assert_eq!(to_kebab_case("my api"), "my-api");
        assert_eq!(to_kebab_case("HTTPHandler"), "http-handler");
        assert_eq!(to_kebab_case("@scope/my.api"), "scope-my-api");
        assert_eq!(to_kebab_case("api2Gateway"), "api2-gateway");
    }

    #[test]
    fn snake_and_class_names() {
        assert_eq!(to_snake_case("first-api"), "first_api");
        assert_eq!(to_upper_snake_case("first-api"), "FIRST_API");
        assert_eq!(to_class_name("first-api"), "FirstApi");
        assert_eq!(to_camel_case("first-api"), "firstApi");
    }

    #[test]
    fn offset_counts_segments() {
        assert_eq!(offset_from_root("packages/api"), "../../");
        assert_eq!(offset_from_root("./packages/common/constructs"), "../../../");
        assert_eq!(offset_from_root(""), "");
    }

    #[test]
    fn scoped_names() {
        assert_eq!(to_scoped_name(Some("@acme"), "api"), "@acme/api");
        assert_eq!(to_scoped_name(Some("acme"), "api"), "@acme/api");
        assert_eq!(to_scoped_name(None, "api"), "api");
        assert_eq!(strip_scope("@acme/api"), "api");
        assert_eq!(strip_scope("api"), "api");
    }

    #[test]
    fn python_names() {
        assert_eq!(python_module_name(Some("acme"), "first-api"), "acme_first_api");
        assert_eq!(python_project_name(Some("acme"), "first-api"), "acme.first_api");
        assert_eq!(python_project_name(None, "first-api"), "first_api");
    }
}

//! `{{VAR}}` substitution for generator templates.

use std::collections::BTreeMap;

use crate::domain::names::{to_class_name, to_kebab_case, to_snake_case};

/// Variables available to one template render.
///
/// Built from a name, every context carries:
///
/// | Variable      | `my api`  |
/// |---------------|-----------|
/// | `NAME`        | `my api`  |
/// | `NAME_KEBAB`  | `my-api`  |
/// | `NAME_SNAKE`  | `my_api`  |
/// | `NAME_CLASS`  | `MyApi`   |
///
/// Unknown placeholders are left in the output verbatim.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new(name: &str) -> Self {
        Self::default()
            .with_variable("NAME", name)
            .with_variable("NAME_KEBAB", to_kebab_case(name))
            .with_variable("NAME_SNAKE", to_snake_case(name))
            .with_variable("NAME_CLASS", to_class_name(name))
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Replace every `{{KEY}}` whose key is defined.
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => match self.get(after[..end].trim()) {
                    Some(value) => {
                        out.push_str(value);
                        rest = &after[end + 2..];
                    }
                    None => {
                        out.push_str("{{");
                        rest = after;
                    }
                },
                None => {
                    out.push_str(&rest[start..]);
                    return out;
                }
            }
        }

        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_name_casings() {
        let ctx = RenderContext::new("first api");
        assert_eq!(
            ctx.render("{{NAME_KEBAB}} {{NAME_SNAKE}} {{NAME_CLASS}}"),
            "first-api first_api FirstApi"
        );
    }

    #[test]
    fn leaves_unknown_placeholders() {
        let ctx = RenderContext::new("x").with_variable("PORT", "8000");
        assert_eq!(ctx.render("{{PORT}} {{OTHER}}"), "8000 {{OTHER}}");
        assert_eq!(ctx.render("trailing {{PORT"), "trailing {{PORT");
    }

    #[test]
    fn does_not_rescan_substituted_values() {
        let ctx = RenderContext::default()
            .with_variable("A", "{{B}}")
            .with_variable("B", "b");
        assert_eq!(ctx.render("{{A}}"), "{{B}}");
    }

    #[test]
    fn keeps_template_literal_braces() {
        let ctx = RenderContext::new("x");
        assert_eq!(ctx.render("`${a} {b}`"), "`${a} {b}`");
    }
}

//! `bundle` targets for deployable TypeScript and Python projects.
//!
//! TypeScript projects share one `rolldown.config.ts` per project: every
//! Lambda handler or server entry point a generator adds becomes one more
//! element of its `defineConfig([...])` array.

use tracing::{debug, instrument};

use crate::application::tree::{Tree, join_path};
use crate::application::workspace::ast::append_call_array_entry;
use crate::application::workspace::package_json::add_dependencies_to_package_json;
use crate::application::workspace::projects::{ensure_dependency, update_project};
use crate::domain::names::offset_from_root;
use crate::domain::{PythonPlatform, TargetConfiguration};
use crate::error::ForgeResult;

pub const BUNDLE_TARGET: &str = "bundle";
pub const ROLLDOWN_CONFIG: &str = "rolldown.config.ts";
const ROLLDOWN_CONFIG_STUB: &str = "import { defineConfig } from 'rolldown';\n\nexport default defineConfig([]);\n";
const BUNDLE_OUTPUT: &str = "{workspaceRoot}/dist/{projectRoot}/bundle";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeScriptBundleOptions {
    /// Entry point, relative to the project root.
    pub target_file_path: String,
    /// Directory under `dist/<root>/bundle` for this entry's output.
    pub bundle_output_dir: String,
    /// Module patterns left out of the bundle.
    pub external: Vec<String>,
    pub platform: String,
}

impl TypeScriptBundleOptions {
    pub fn new(target_file_path: impl Into<String>, bundle_output_dir: impl Into<String>) -> Self {
        Self {
            target_file_path: target_file_path.into(),
            bundle_output_dir: bundle_output_dir.into(),
            external: Vec::new(),
            platform: "node".into(),
        }
    }

    pub fn with_external<I, S>(mut self, external: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.external.extend(external.into_iter().map(Into::into));
        self
    }

    fn config_entry(&self, project_root: &str) -> String {
        let mut output = format!("{}dist/{}/bundle", offset_from_root(project_root), project_root);
        let sub_dir = self.bundle_output_dir.trim_matches('/');
        if !sub_dir.is_empty() {
            output.push('/');
            output.push_str(sub_dir);
        }
        let mut entry = format!(
            "{{\n    input: '{input}',\n    output: {{\n      file: '{output}/index.js',\n      format: 'cjs',\n      inlineDynamicImports: true,\n    }},\n    platform: '{platform}',\n",
            input = self.target_file_path,
            platform = self.platform,
        );
        if !self.external.is_empty() {
            let external: Vec<String> = self.external.iter().map(|e| external_pattern(e)).collect();
            entry.push_str(&format!("    external: [{}],\n", external.join(", ")));
        }
        entry.push_str("  }");
        entry
    }
}

/// Externals ending in `*` become a regex (`@aws-sdk/*` → `/^@aws-sdk\/.*/`).
fn external_pattern(external: &str) -> String {
    match external.strip_suffix('*') {
        Some(prefix) => format!("/^{}.*/", prefix.replace('/', "\\/")),
        None => format!("'{external}'"),
    }
}

/// Ensure the project's `bundle` target and rolldown config exist, and add
/// one rolldown entry for `options.target_file_path`.
#[instrument(skip(tree, options), fields(entry = %options.target_file_path))]
pub fn add_typescript_bundle_target(
    tree: &mut Tree<'_>,
    project_name: &str,
    options: &TypeScriptBundleOptions,
) -> ForgeResult<()> {
    let root = update_project(tree, project_name, |project| {
        project.add_target_if_not_present(
            BUNDLE_TARGET,
            TargetConfiguration::run_commands(format!("rolldown -c {ROLLDOWN_CONFIG}"))
                .cwd("{projectRoot}")
                .output(BUNDLE_OUTPUT)
                .cached()
                .depends_on(["compile"]),
        );
        ensure_dependency(project, "build", BUNDLE_TARGET);
        Ok(project.root.clone())
    })?;

    let config_path = join_path(&root, ROLLDOWN_CONFIG);
    if !tree.exists(&config_path) {
        tree.write(&config_path, ROLLDOWN_CONFIG_STUB);
    }
    let added = append_call_array_entry(
        tree,
        &config_path,
        "defineConfig",
        "input",
        &options.target_file_path,
        &options.config_entry(&root),
    )?;
    debug!(added, path = %config_path, "Rolldown entry");

    add_dependencies_to_package_json(tree, "package.json", &[], &["rolldown"])
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PythonBundleOptions {
    pub python_platform: PythonPlatform,
}

/// Ensure a `bundle` target that exports the project's locked dependencies
/// and installs them, with the project itself, into the bundle directory.
#[instrument(skip(tree))]
pub fn add_python_bundle_target(
    tree: &mut Tree<'_>,
    project_name: &str,
    options: PythonBundleOptions,
) -> ForgeResult<()> {
    update_project(tree, project_name, |project| {
        let bundle_dir = format!("dist/{}/bundle", project.root);
        let requirements = format!("dist/{}/bundle-requirements.txt", project.root);
        project.add_target_if_not_present(
            BUNDLE_TARGET,
            TargetConfiguration::run_commands_sequence([
                format!(
                    "uv export --frozen --no-dev --no-editable --project {root} --package {name} -o {requirements}",
                    root = project.root,
                    name = project.name,
                ),
                format!(
                    "uv pip install -n --no-deps --no-installer-metadata --no-compile-bytecode --python-platform {platform} --target {bundle_dir} -r {requirements}",
                    platform = options.python_platform,
                ),
            ])
            .option("cwd", "{workspaceRoot}")
            .output(BUNDLE_OUTPUT)
            .cached()
            .depends_on(["compile"]),
        );
        ensure_dependency(project, "build", BUNDLE_TARGET);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::workspace::json::read_json;
    use crate::application::workspace::projects::{
        add_project_configuration, read_project_configuration,
    };
    use crate::domain::ProjectConfiguration;
    use crate::domain::ast::SourceFile;
    use serde_json::Value;

    fn workspace() -> Tree<'static> {
        let mut tree = Tree::empty();
        tree.write("package.json", r#"{ "name": "@acme/source" }"#);
        add_project_configuration(&mut tree, &ProjectConfiguration::new("@acme/api", "packages/api"))
            .unwrap();
        tree
    }

    #[test]
    fn accumulates_one_entry_per_input() {
        let mut tree = workspace();
        let handler = TypeScriptBundleOptions::new("src/handler.ts", "handler")
            .with_external(["@aws-sdk/*"]);
        let other = TypeScriptBundleOptions::new("src/other.ts", "other");
        for options in [&handler, &other, &handler] {
            add_typescript_bundle_target(&mut tree, "api", options).unwrap();
        }

        let config = tree.read("packages/api/rolldown.config.ts").unwrap().unwrap();
        let file = SourceFile::parse(&config).unwrap();
        let array = &file.call_array("defineConfig").unwrap().array;
        assert_eq!(array.elements.len(), 2);
        assert!(array.has_object_with("input", "src/handler.ts"));
        assert!(config.contains("external: [/^@aws-sdk\\/.*/]"));
        assert!(config.contains("file: '../../dist/packages/api/bundle/handler/index.js'"));

        let project = read_project_configuration(&tree, "@acme/api").unwrap();
        assert_eq!(
            project.targets["build"].dependency_names().collect::<Vec<_>>(),
            vec!["bundle"]
        );
        assert_eq!(
            project.targets["bundle"].command_line(),
            Some("rolldown -c rolldown.config.ts")
        );

        let package: Value = read_json(&tree, "package.json").unwrap();
        assert!(package["devDependencies"]["rolldown"].is_string());
    }

    #[test]
    fn python_bundle_is_idempotent() {
        let mut tree = workspace();
        for _ in 0..2 {
            add_python_bundle_target(&mut tree, "api", PythonBundleOptions::default()).unwrap();
        }
        let project = read_project_configuration(&tree, "@acme/api").unwrap();
        assert_eq!(project.targets["build"].depends_on.len(), 1);
        let commands = project.targets["bundle"].options["commands"].as_array().unwrap();
        assert!(commands[1].as_str().unwrap().contains("x86_64-manylinux2014"));
    }
}

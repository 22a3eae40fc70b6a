//! `ts#infra`: a CDK application that deploys the shared constructs.

use tracing::{info, instrument};

use crate::application::generators::ts_project::{TsProjectGenerator, TsProjectOptions};
use crate::application::generators::{Generator, GeneratorCallback, install_node_dependencies};
use crate::application::shared::{ensure_infra_config, ensure_scripts, ensure_shared_constructs};
use crate::application::templates;
use crate::application::tree::{Tree, join_path};
use crate::application::workspace::{
    OverwriteStrategy, TypeScriptBundleOptions, add_dependencies_to_package_json,
    add_gitignore_entries, add_typescript_bundle_target, ensure_dependency, ensure_plugin_config,
    generate_files, update_project,
};
use crate::domain::names::{offset_from_root, validate_name};
use crate::domain::{GeneratorInfo, ProjectType, RenderContext, TargetConfiguration, metadata};
use crate::error::ForgeResult;

pub const DEFAULT_DIRECTORY: &str = "packages";

const DEPENDENCIES: &[&str] = &["aws-cdk-lib", "cdk-nag", "constructs", "source-map-support"];
const DEV_DEPENDENCIES: &[&str] = &["aws-cdk"];

const CDK_OUT: &str = "{workspaceRoot}/dist/{projectRoot}/cdk.out";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsInfraOptions {
    pub name: String,
    pub directory: String,
}

impl TsInfraOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directory: DEFAULT_DIRECTORY.into(),
        }
    }
}

pub struct TsInfraGenerator {
    options: TsInfraOptions,
}

impl TsInfraGenerator {
    pub fn new(options: TsInfraOptions) -> Self {
        Self { options }
    }
}

impl Generator for TsInfraGenerator {
    fn info(&self) -> &'static GeneratorInfo {
        &metadata::TS_INFRA
    }

    #[instrument(skip_all, fields(name = %self.options.name))]
    fn generate(&self, tree: &mut Tree<'_>) -> ForgeResult<GeneratorCallback> {
        let options = &self.options;
        validate_name(&options.name)?;

        let constructs = ensure_shared_constructs(tree)?;
        let infra_config = ensure_infra_config(tree)?;
        ensure_scripts(tree)?;

        let project = TsProjectGenerator::new(
            TsProjectOptions::new(&options.name).with_directory(&options.directory),
        )
        .create(tree)?;
        tree.delete(&join_path(&project.source_root, "index.ts"))?;

        let context = RenderContext::new(&options.name)
            .with_variable("OFFSET", offset_from_root(&project.root))
            .with_variable("PROJECT_ROOT", project.root.as_str())
            .with_variable("CONSTRUCTS_PACKAGE", constructs.name.as_str())
            .with_variable("INFRA_CONFIG_PACKAGE", infra_config.name.as_str());
        generate_files(
            tree,
            templates::ts_infra::FILES,
            &project.root,
            &context,
            OverwriteStrategy::Overwrite,
        )?;
        add_dependencies_to_package_json(tree, "package.json", DEPENDENCIES, DEV_DEPENDENCIES)?;

        add_typescript_bundle_target(
            tree,
            &project.name,
            &TypeScriptBundleOptions::new("src/main.ts", ""),
        )?;

        update_project(tree, &project.name, |config| {
            config.project_type = Some(ProjectType::Application);
            config.add_generator_metadata(&metadata::TS_INFRA);
            config.add_target_if_not_present(
                "synth",
                TargetConfiguration::run_commands("cdk synth")
                    .cwd("{projectRoot}")
                    .output(CDK_OUT)
                    .cached()
                    .depends_on(["^build", "bundle"]),
            );
            config.add_target_if_not_present(
                "deploy",
                TargetConfiguration::run_commands(format!("cdk deploy --require-approval=never --app {CDK_OUT}"))
                    .cwd("{projectRoot}")
                    .depends_on(["synth"]),
            );
            config.add_target_if_not_present(
                "destroy",
                TargetConfiguration::run_commands(format!("cdk destroy --app {CDK_OUT}"))
                    .cwd("{projectRoot}")
                    .depends_on(["synth"]),
            );
            ensure_dependency(config, "build", "synth");
            Ok(())
        })?;

        ensure_plugin_config(tree)?;
        add_gitignore_entries(tree, "", &["cdk.out"])?;

        info!(project = %project.name, constructs = %constructs.name, "Created CDK application");
        Ok(install_node_dependencies(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IacProvider;
    use crate::application::workspace::{get_projects, read_plugin_config, read_project_configuration};

    fn workspace() -> Tree<'static> {
        let mut tree = Tree::empty();
        tree.write("package.json", r#"{ "name": "@acme/source" }"#);
        tree
    }

    #[test]
    fn creates_app_with_shared_packages() {
        let mut tree = workspace();
        TsInfraGenerator::new(TsInfraOptions::new("infra"))
            .generate(&mut tree)
            .unwrap();

        let projects = get_projects(&tree).unwrap();
        for name in [
            "@acme/infra",
            "@acme/common-constructs",
            "@acme/common-infra-config",
            "@acme/common-scripts",
        ] {
            assert!(projects.contains_key(name), "missing {name}");
        }

        let project = read_project_configuration(&tree, "@acme/infra").unwrap();
        assert_eq!(project.generator_id(), Some("ts#infra"));
        assert!(project.targets["build"].dependency_names().any(|d| d == "synth"));
        assert_eq!(
            project.targets["synth"].dependency_names().collect::<Vec<_>>(),
            vec!["^build", "bundle"]
        );

        let main = tree.read("packages/infra/src/main.ts").unwrap().unwrap();
        assert!(main.contains("from '@acme/common-constructs'"));
        assert!(main.contains("from '@acme/common-infra-config'"));
        assert!(!tree.is_file("packages/infra/src/index.ts"));

        let config = read_plugin_config(&tree).unwrap().unwrap();
        assert_eq!(config.iac.provider, IacProvider::Cdk);
    }

    #[test]
    fn second_app_reuses_shared_packages() {
        let mut tree = workspace();
        TsInfraGenerator::new(TsInfraOptions::new("infra"))
            .generate(&mut tree)
            .unwrap();
        TsInfraGenerator::new(TsInfraOptions::new("sandbox"))
            .generate(&mut tree)
            .unwrap();
        assert_eq!(get_projects(&tree).unwrap().len(), 5);
    }
}

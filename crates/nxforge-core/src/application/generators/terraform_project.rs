//! `terraform#project`: a Terraform root module that consumes the shared
//! Terraform modules.

use serde_json::Value;
use tracing::{info, instrument};

use crate::application::generators::{Generator, GeneratorCallback};
use crate::application::shared::ensure_shared_terraform;
use crate::application::templates;
use crate::application::tree::{Tree, join_path};
use crate::application::workspace::{
    OverwriteStrategy, add_gitignore_entries, add_project_configuration, generate_files,
    get_npm_scope, read_plugin_config, update_plugin_config,
};
use crate::domain::names::{to_kebab_case, to_scoped_name, validate_name};
use crate::domain::{
    GeneratorInfo, IacProvider, ProjectConfiguration, ProjectType, RenderContext,
    TargetConfiguration, metadata,
};
use crate::error::ForgeResult;

pub const DEFAULT_DIRECTORY: &str = "packages";

const PLAN_FILE: &str = "{workspaceRoot}/dist/{projectRoot}/tfplan";
const VAR_FILE: &str = "-var-file=env/dev.tfvars";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerraformProjectOptions {
    pub name: String,
    pub directory: String,
    pub project_type: ProjectType,
}

impl TerraformProjectOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directory: DEFAULT_DIRECTORY.into(),
            project_type: ProjectType::Application,
        }
    }
}

pub struct TerraformProjectGenerator {
    options: TerraformProjectOptions,
}

impl TerraformProjectGenerator {
    pub fn new(options: TerraformProjectOptions) -> Self {
        Self { options }
    }
}

fn terraform(command: impl Into<String>) -> TargetConfiguration {
    TargetConfiguration::run_commands(command).cwd("{projectRoot}/src")
}

impl Generator for TerraformProjectGenerator {
    fn info(&self) -> &'static GeneratorInfo {
        &metadata::TERRAFORM_PROJECT
    }

    #[instrument(skip_all, fields(name = %self.options.name, directory = %self.options.directory))]
    fn generate(&self, tree: &mut Tree<'_>) -> ForgeResult<GeneratorCallback> {
        let options = &self.options;
        validate_name(&options.name)?;

        let shared = ensure_shared_terraform(tree)?;
        let scope = get_npm_scope(tree)?;
        let kebab = to_kebab_case(&options.name);
        let name = to_scoped_name(scope.as_deref(), &kebab);
        let root = join_path(&options.directory, &kebab);

        let mut project = ProjectConfiguration::new(&name, &root)
            .with_source_root(join_path(&root, "src"))
            .with_project_type(options.project_type)
            .with_target("init", terraform("terraform init"))
            .with_target(
                "plan",
                terraform(format!("terraform plan {VAR_FILE} -out={PLAN_FILE}"))
                    .output(PLAN_FILE)
                    .depends_on(["init", "^build"]),
            )
            .with_target(
                "apply",
                terraform(format!("terraform apply {PLAN_FILE}")).depends_on(["plan"]),
            )
            .with_target(
                "destroy",
                terraform(format!("terraform destroy {VAR_FILE}")).depends_on(["init"]),
            )
            .with_target("fmt", terraform("terraform fmt -recursive"))
            .with_target(
                "validate",
                terraform("terraform validate").cached().depends_on(["init"]),
            )
            .with_target(
                "build",
                TargetConfiguration::noop().depends_on(["fmt", "validate"]),
            );
        project.add_generator_metadata(&metadata::TERRAFORM_PROJECT);
        project.extra.insert(
            "implicitDependencies".into(),
            Value::Array(vec![Value::String(shared.name.clone())]),
        );
        add_project_configuration(tree, &project)?;

        let context = RenderContext::new(&options.name)
            .with_variable("COMMON_TERRAFORM_ROOT", shared.root.as_str());
        generate_files(
            tree,
            templates::terraform_project::FILES,
            &root,
            &context,
            OverwriteStrategy::Overwrite,
        )?;
        add_gitignore_entries(tree, "", &[".terraform", "*.tfstate", "*.tfstate.backup"])?;

        // The first IaC project in a workspace picks the default provider.
        if read_plugin_config(tree)?.is_none() {
            update_plugin_config(tree, |config| config.iac.provider = IacProvider::Terraform)?;
        }

        info!(project = %name, root = %root, "Created Terraform project");
        Ok(GeneratorCallback::none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::workspace::read_project_configuration;

    #[test]
    fn creates_root_module_and_shared_modules() {
        let mut tree = Tree::empty();
        tree.write("package.json", r#"{ "name": "@acme/source" }"#);
        TerraformProjectGenerator::new(TerraformProjectOptions::new("platform"))
            .generate(&mut tree)
            .unwrap();

        let project = read_project_configuration(&tree, "@acme/platform").unwrap();
        assert_eq!(project.generator_id(), Some("terraform#project"));
        for target in ["init", "plan", "apply", "destroy", "fmt", "validate", "build"] {
            assert!(project.targets.contains_key(target), "missing {target}");
        }
        assert_eq!(
            project.targets["plan"].command_line(),
            Some("terraform plan -var-file=env/dev.tfvars -out={workspaceRoot}/dist/{projectRoot}/tfplan")
        );
        assert_eq!(project.extra["implicitDependencies"][0], "@acme/common-terraform");
        assert!(tree.is_file("packages/platform/src/env/dev.tfvars"));
        assert!(tree.is_file("packages/common/terraform/project.json"));
        assert!(tree.read(".gitignore").unwrap().unwrap().contains(".terraform"));
    }

    #[test]
    fn keeps_existing_provider_choice() {
        let mut tree = Tree::empty();
        tree.write("nxforge.config.json", r#"{ "iac": { "provider": "CDK" } }"#);
        TerraformProjectGenerator::new(TerraformProjectOptions::new("platform"))
            .generate(&mut tree)
            .unwrap();
        let config = read_plugin_config(&tree).unwrap().unwrap();
        assert_eq!(config.iac.provider, IacProvider::Cdk);
    }

    #[test]
    fn defaults_workspace_to_terraform() {
        let mut tree = Tree::empty();
        TerraformProjectGenerator::new(TerraformProjectOptions::new("platform"))
            .generate(&mut tree)
            .unwrap();
        let config = read_plugin_config(&tree).unwrap().unwrap();
        assert_eq!(config.iac.provider, IacProvider::Terraform);
    }
}

//! `ts#react-website`: a Vite + React single page app hosted on S3 and
//! CloudFront.

use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::application::generators::ts_project::{
    DEFAULT_DIRECTORY, TsProjectGenerator, TsProjectOptions,
};
use crate::application::generators::{Generator, GeneratorCallback, install_node_dependencies};
use crate::application::shared::{StaticWebsiteConstructOptions, add_static_website_construct};
use crate::application::templates;
use crate::application::tree::{Tree, join_path};
use crate::application::workspace::{
    OverwriteStrategy, add_dependencies_to_package_json, generate_files, resolve_iac_provider,
    update_json, update_project,
};
use crate::domain::names::{offset_from_root, validate_name};
use crate::domain::{
    DomainError, GeneratorInfo, IacProviderOption, ProjectType, RenderContext,
    TargetConfiguration, metadata,
};
use crate::error::ForgeResult;

const DEPENDENCIES: &[&str] = &["react", "react-dom"];
const DEV_DEPENDENCIES: &[&str] = &["@types/react", "@types/react-dom", "@vitejs/plugin-react"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactWebsiteOptions {
    pub name: String,
    pub directory: String,
    pub iac_provider: IacProviderOption,
}

impl ReactWebsiteOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directory: DEFAULT_DIRECTORY.into(),
            iac_provider: IacProviderOption::default(),
        }
    }
}

pub struct ReactWebsiteGenerator {
    options: ReactWebsiteOptions,
}

impl ReactWebsiteGenerator {
    pub fn new(options: ReactWebsiteOptions) -> Self {
        Self { options }
    }
}

impl Generator for ReactWebsiteGenerator {
    fn info(&self) -> &'static GeneratorInfo {
        &metadata::TS_REACT_WEBSITE
    }

    #[instrument(skip_all, fields(name = %self.options.name))]
    fn generate(&self, tree: &mut Tree<'_>) -> ForgeResult<GeneratorCallback> {
        let options = &self.options;
        validate_name(&options.name)?;
        let provider = resolve_iac_provider(tree, options.iac_provider)?;

        let project = TsProjectGenerator::new(
            TsProjectOptions::new(&options.name).with_directory(&options.directory),
        )
        .create(tree)?;
        tree.delete(&join_path(&project.source_root, "index.ts"))?;

        let context = RenderContext::new(&options.name)
            .with_variable("OFFSET", offset_from_root(&project.root))
            .with_variable("PROJECT_ROOT", project.root.as_str());
        generate_files(
            tree,
            templates::ts_react_website::FILES,
            &project.root,
            &context,
            OverwriteStrategy::Overwrite,
        )?;

        let tsconfig = join_path(&project.root, "tsconfig.json");
        update_json(tree, &tsconfig, |config: &mut Value| {
            let Some(config) = config.as_object_mut() else {
                return Err(DomainError::UnexpectedShape {
                    path: tsconfig.clone(),
                    reason: "expected a JSON object".into(),
                }
                .into());
            };
            config.insert("compilerOptions".into(), json!({ "jsx": "react-jsx" }));
            Ok(())
        })?;
        add_dependencies_to_package_json(tree, "package.json", DEPENDENCIES, DEV_DEPENDENCIES)?;

        let bundle_dir = format!("dist/{}/bundle", project.root);
        update_project(tree, &project.name, |config| {
            config.project_type = Some(ProjectType::Application);
            config.add_generator_metadata(&metadata::TS_REACT_WEBSITE);
            config.targets.insert(
                "build".into(),
                TargetConfiguration::run_commands("vite build")
                    .cwd("{projectRoot}")
                    .output("{workspaceRoot}/dist/{projectRoot}/bundle")
                    .cached()
                    .depends_on(["lint", "compile", "test"]),
            );
            config.targets.insert(
                "serve".into(),
                TargetConfiguration::run_commands("vite")
                    .cwd("{projectRoot}")
                    .continuous(),
            );
            config.targets.insert(
                "preview".into(),
                TargetConfiguration::run_commands("vite preview")
                    .cwd("{projectRoot}")
                    .continuous()
                    .depends_on(["build"]),
            );
            Ok(())
        })?;

        add_static_website_construct(
            tree,
            provider,
            &StaticWebsiteConstructOptions {
                website_name: options.name.clone(),
                project_name: project.name.clone(),
                bundle_dir,
            },
        )?;

        info!(project = %project.name, provider = %provider, "Created React website");
        Ok(install_node_dependencies(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::workspace::{read_json, read_project_configuration};

    fn workspace() -> Tree<'static> {
        let mut tree = Tree::empty();
        tree.write("package.json", r#"{ "name": "@acme/source" }"#);
        tree
    }

    #[test]
    fn builds_with_vite_and_hosts_bundle() {
        let mut tree = workspace();
        ReactWebsiteGenerator::new(ReactWebsiteOptions::new("storefront"))
            .generate(&mut tree)
            .unwrap();

        let project = read_project_configuration(&tree, "@acme/storefront").unwrap();
        assert_eq!(project.targets["build"].command_line(), Some("vite build"));
        assert!(project.targets.contains_key("serve"));
        assert!(project.targets.contains_key("preview"));
        assert!(tree.is_file("packages/storefront/src/main.tsx"));
        assert!(!tree.is_file("packages/storefront/src/index.ts"));

        let vite = tree.read("packages/storefront/vite.config.ts").unwrap().unwrap();
        assert!(vite.contains("outDir: '../../dist/packages/storefront/bundle'"));
        let tsconfig: Value = read_json(&tree, "packages/storefront/tsconfig.json").unwrap();
        assert_eq!(tsconfig["compilerOptions"]["jsx"], "react-jsx");

        let construct = tree
            .read("packages/common/constructs/src/app/static-websites/storefront.ts")
            .unwrap()
            .unwrap();
        assert!(construct.contains("export class Storefront extends StaticWebsite"));
        let constructs = read_project_configuration(&tree, "@acme/common-constructs").unwrap();
        assert!(constructs.targets["build"]
            .dependency_names()
            .any(|d| d == "@acme/storefront:build"));
    }

    #[test]
    fn terraform_hosting_module() {
        let mut tree = workspace();
        let mut options = ReactWebsiteOptions::new("storefront");
        options.iac_provider = IacProviderOption::Terraform;
        ReactWebsiteGenerator::new(options).generate(&mut tree).unwrap();
        let module = tree
            .read("packages/common/terraform/src/app/static-websites/storefront/storefront.tf")
            .unwrap()
            .unwrap();
        assert!(module.contains("website_content_path = \"${path.module}/"));
    }
}

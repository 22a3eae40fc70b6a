//! Infrastructure for one standalone Lambda function.

use tracing::{info, instrument};

use crate::application::shared::constructs::ensure_shared_constructs;
use crate::application::shared::terraform::ensure_shared_terraform;
use crate::application::shared::{
    LambdaRuntime, SharedPackage, TERRAFORM_CORE_OFFSET, cdk_asset_path, export_app_module,
    terraform_asset_path,
};
use crate::application::templates;
use crate::application::tree::Tree;
use crate::application::workspace::{BUNDLE_TARGET, OverwriteStrategy, generate_files};
use crate::domain::names::to_kebab_case;
use crate::domain::{IacProvider, RenderContext};
use crate::error::ForgeResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionConstructOptions {
    /// Construct name, e.g. `MyApiHelloFunction`.
    pub function_name: String,
    pub project_name: String,
    /// Function bundle, workspace-relative.
    pub bundle_dir: String,
    pub runtime: LambdaRuntime,
    pub handler: String,
}

#[instrument(skip_all, fields(function = %options.function_name, provider = %provider))]
pub fn add_function_construct(
    tree: &mut Tree<'_>,
    provider: IacProvider,
    options: &FunctionConstructOptions,
) -> ForgeResult<SharedPackage> {
    let name = to_kebab_case(&options.function_name);
    let context = RenderContext::new(&options.function_name)
        .with_variable("HANDLER", options.handler.as_str());

    let package = match provider {
        IacProvider::Cdk => {
            let package = ensure_shared_constructs(tree)?;
            let context = context
                .with_variable("RUNTIME", options.runtime.cdk())
                .with_variable(
                    "BUNDLE_PATH",
                    cdk_asset_path(&package, "lambda-functions", &options.bundle_dir),
                );
            generate_files(
                tree,
                templates::constructs::FUNCTION,
                &package.root,
                &context,
                OverwriteStrategy::Overwrite,
            )?;
            export_app_module(tree, &package, "lambda-functions", &name)?;
            package
        }
        IacProvider::Terraform => {
            let package = ensure_shared_terraform(tree)?;
            generate_files(
                tree,
                templates::terraform::CORE_LAMBDA_FUNCTION,
                &package.root,
                &RenderContext::default(),
                OverwriteStrategy::KeepExisting,
            )?;
            let context = context
                .with_variable("CORE_OFFSET", TERRAFORM_CORE_OFFSET)
                .with_variable("TF_RUNTIME", options.runtime.terraform())
                .with_variable(
                    "BUNDLE_PATH",
                    terraform_asset_path(&package, "lambda-functions", &name, &options.bundle_dir),
                );
            generate_files(
                tree,
                templates::terraform::FUNCTION,
                &package.root,
                &context,
                OverwriteStrategy::Overwrite,
            )?;
            package
        }
    };

    package.depend_build_on(tree, &format!("{}:{BUNDLE_TARGET}", options.project_name))?;
    info!(package = %package.name, "Added function construct");
    Ok(package)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdk_function_construct_points_at_bundle() {
        let mut tree = Tree::empty();
        tree.write("package.json", r#"{ "name": "@acme/source" }"#);
        let options = FunctionConstructOptions {
            function_name: "ApiHelloFunction".into(),
            project_name: "@acme/api".into(),
            bundle_dir: "dist/packages/api/bundle/lambda/hello".into(),
            runtime: LambdaRuntime::Node,
            handler: "index.handler".into(),
        };
        add_function_construct(&mut tree, IacProvider::Cdk, &options).unwrap();
        add_function_construct(&mut tree, IacProvider::Cdk, &options).unwrap();

        let root = "packages/common/constructs/src/app";
        let construct = tree
            .read(&format!("{root}/lambda-functions/api-hello-function.ts"))
            .unwrap()
            .unwrap();
        assert!(construct.contains("export class ApiHelloFunction extends Function"));
        assert!(construct.contains("dist/packages/api/bundle/lambda/hello'"));
        assert_eq!(
            tree.read(&format!("{root}/lambda-functions/index.ts")).unwrap().unwrap(),
            "export * from './api-hello-function.js';\n"
        );
    }
}

//! Infrastructure for one API: a Lambda handler behind API Gateway.

use tracing::{info, instrument};

use crate::application::shared::constructs::ensure_shared_constructs;
use crate::application::shared::terraform::ensure_shared_terraform;
use crate::application::shared::{
    LambdaRuntime, SharedPackage, TERRAFORM_CORE_OFFSET, cdk_asset_path, export_app_module,
    export_core_module, terraform_asset_path,
};
use crate::application::templates;
use crate::application::tree::Tree;
use crate::application::workspace::{BUNDLE_TARGET, OverwriteStrategy, generate_files};
use crate::domain::names::{to_class_name, to_kebab_case};
use crate::domain::{ApiBackend, Auth, ComputeType, IacProvider, RenderContext};
use crate::error::ForgeResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConstructOptions {
    pub api_name: String,
    /// Project whose `bundle` target produces the handler code.
    pub project_name: String,
    pub project_root: String,
    pub backend: ApiBackend,
    pub compute_type: ComputeType,
    pub auth: Auth,
    /// Lambda handler, e.g. `acme_api.main.handler`.
    pub handler: String,
}

impl ApiConstructOptions {
    fn runtime(&self) -> LambdaRuntime {
        match self.backend {
            ApiBackend::FastApi => LambdaRuntime::Python,
            ApiBackend::Trpc => LambdaRuntime::Node,
        }
    }

    fn bundle_dir(&self) -> String {
        format!("dist/{}/bundle", self.project_root)
    }

    fn context(&self) -> RenderContext {
        RenderContext::new(&self.api_name)
            .with_variable("CORE_CONSTRUCT", to_class_name(self.compute_type.core_construct()))
            .with_variable("CORE_FILE", self.compute_type.core_construct())
            .with_variable("HANDLER", self.handler.as_str())
            .with_variable("AUTH", self.auth.as_str())
    }
}

/// Write the API's construct (and the core API Gateway construct for its
/// compute type, once), export it, and make the shared package's `build`
/// depend on the API project's `bundle`.
#[instrument(skip_all, fields(api = %options.api_name, provider = %provider))]
pub fn add_api_construct(
    tree: &mut Tree<'_>,
    provider: IacProvider,
    options: &ApiConstructOptions,
) -> ForgeResult<SharedPackage> {
    let package = match provider {
        IacProvider::Cdk => add_cdk_api(tree, options)?,
        IacProvider::Terraform => add_terraform_api(tree, options)?,
    };
    package.depend_build_on(tree, &format!("{}:{BUNDLE_TARGET}", options.project_name))?;
    info!(package = %package.name, "Added API construct");
    Ok(package)
}

fn add_cdk_api(tree: &mut Tree<'_>, options: &ApiConstructOptions) -> ForgeResult<SharedPackage> {
    let package = ensure_shared_constructs(tree)?;
    let core = match options.compute_type {
        ComputeType::ServerlessApiGatewayRestApi => templates::constructs::REST_API,
        ComputeType::ServerlessApiGatewayHttpApi => templates::constructs::HTTP_API,
    };
    generate_files(
        tree,
        core,
        &package.root,
        &RenderContext::default(),
        OverwriteStrategy::KeepExisting,
    )?;
    export_core_module(tree, &package, &format!("api/{}", options.compute_type.core_construct()))?;

    let context = options
        .context()
        .with_variable("RUNTIME", options.runtime().cdk())
        .with_variable("BUNDLE_PATH", cdk_asset_path(&package, "apis", &options.bundle_dir()));
    generate_files(
        tree,
        templates::constructs::API,
        &package.root,
        &context,
        OverwriteStrategy::Overwrite,
    )?;
    export_app_module(tree, &package, "apis", &to_kebab_case(&options.api_name))?;
    Ok(package)
}

fn add_terraform_api(tree: &mut Tree<'_>, options: &ApiConstructOptions) -> ForgeResult<SharedPackage> {
    let package = ensure_shared_terraform(tree)?;
    let core = match options.compute_type {
        ComputeType::ServerlessApiGatewayRestApi => templates::terraform::REST_API,
        ComputeType::ServerlessApiGatewayHttpApi => templates::terraform::HTTP_API,
    };
    for files in [templates::terraform::CORE_LAMBDA_FUNCTION, core] {
        generate_files(
            tree,
            files,
            &package.root,
            &RenderContext::default(),
            OverwriteStrategy::KeepExisting,
        )?;
    }

    let name = to_kebab_case(&options.api_name);
    let context = options
        .context()
        .with_variable("CORE_OFFSET", TERRAFORM_CORE_OFFSET)
        .with_variable("TF_RUNTIME", options.runtime().terraform())
        .with_variable(
            "BUNDLE_PATH",
            terraform_asset_path(&package, "apis", &name, &options.bundle_dir()),
        );
    generate_files(
        tree,
        templates::terraform::API,
        &package.root,
        &context,
        OverwriteStrategy::Overwrite,
    )?;
    Ok(package)
}

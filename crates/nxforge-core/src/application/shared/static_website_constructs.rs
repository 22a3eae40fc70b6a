//! S3 + CloudFront hosting for a built website.

use tracing::instrument;

use crate::application::shared::constructs::ensure_shared_constructs;
use crate::application::shared::terraform::ensure_shared_terraform;
use crate::application::shared::{
    SharedPackage, TERRAFORM_CORE_OFFSET, cdk_asset_path, export_app_module, export_core_module,
    terraform_asset_path,
};
use crate::application::templates;
use crate::application::tree::Tree;
use crate::application::workspace::{OverwriteStrategy, generate_files};
use crate::domain::names::to_kebab_case;
use crate::domain::{IacProvider, RenderContext};
use crate::error::ForgeResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticWebsiteConstructOptions {
    pub website_name: String,
    pub project_name: String,
    /// Built site, workspace-relative.
    pub bundle_dir: String,
}

#[instrument(skip_all, fields(website = %options.website_name, provider = %provider))]
pub fn add_static_website_construct(
    tree: &mut Tree<'_>,
    provider: IacProvider,
    options: &StaticWebsiteConstructOptions,
) -> ForgeResult<SharedPackage> {
    let name = to_kebab_case(&options.website_name);
    let package = match provider {
        IacProvider::Cdk => {
            let package = ensure_shared_constructs(tree)?;
            generate_files(
                tree,
                templates::constructs::CORE_STATIC_WEBSITE,
                &package.root,
                &RenderContext::default(),
                OverwriteStrategy::KeepExisting,
            )?;
            export_core_module(tree, &package, "static-website")?;
            let context = RenderContext::new(&options.website_name).with_variable(
                "BUNDLE_PATH",
                cdk_asset_path(&package, "static-websites", &options.bundle_dir),
            );
            generate_files(
                tree,
                templates::constructs::STATIC_WEBSITE,
                &package.root,
                &context,
                OverwriteStrategy::Overwrite,
            )?;
            export_app_module(tree, &package, "static-websites", &name)?;
            package
        }
        IacProvider::Terraform => {
            let package = ensure_shared_terraform(tree)?;
            generate_files(
                tree,
                templates::terraform::CORE_STATIC_WEBSITE,
                &package.root,
                &RenderContext::default(),
                OverwriteStrategy::KeepExisting,
            )?;
            let context = RenderContext::new(&options.website_name)
                .with_variable("CORE_OFFSET", TERRAFORM_CORE_OFFSET)
                .with_variable(
                    "BUNDLE_PATH",
                    terraform_asset_path(&package, "static-websites", &name, &options.bundle_dir),
                );
            generate_files(
                tree,
                templates::terraform::STATIC_WEBSITE,
                &package.root,
                &context,
                OverwriteStrategy::Overwrite,
            )?;
            package
        }
    };

    package.depend_build_on(tree, &format!("{}:build", options.project_name))?;
    Ok(package)
}

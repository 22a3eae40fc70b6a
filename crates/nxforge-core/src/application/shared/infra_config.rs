//! The shared deployment stage config library, `<scope>/common-infra-config`.

use tracing::instrument;

use crate::application::shared::{SharedPackage, ensure_shared_ts_package};
use crate::application::templates;
use crate::application::tree::Tree;
use crate::domain::RenderContext;
use crate::error::ForgeResult;

pub const INFRA_CONFIG_ROOT: &str = "packages/common/infra-config";

#[instrument(skip_all)]
pub fn ensure_infra_config(tree: &mut Tree<'_>) -> ForgeResult<SharedPackage> {
    ensure_shared_ts_package(
        tree,
        "infra-config",
        templates::infra_config::FILES,
        &RenderContext::new("common-infra-config"),
    )
}

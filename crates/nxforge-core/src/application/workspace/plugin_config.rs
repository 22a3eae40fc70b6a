//! Workspace-wide generator settings in `nxforge.config.json`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::application::tree::Tree;
use crate::application::workspace::json::{read_json_if_exists, write_json};
use crate::domain::{IacProvider, IacProviderOption};
use crate::error::ForgeResult;

pub const PLUGIN_CONFIG_PATH: &str = "nxforge.config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IacConfig {
    pub provider: IacProvider,
}

impl Default for IacConfig {
    fn default() -> Self {
        Self {
            provider: IacProvider::Cdk,
        }
    }
}

/// Contents of `nxforge.config.json`. Keys this crate does not know are
/// kept as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(default)]
    pub iac: IacConfig,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub fn read_plugin_config(tree: &Tree<'_>) -> ForgeResult<Option<PluginConfig>> {
    read_json_if_exists(tree, PLUGIN_CONFIG_PATH)
}

/// Create `nxforge.config.json` with defaults when it does not exist, and
/// return the effective config either way.
pub fn ensure_plugin_config(tree: &mut Tree<'_>) -> ForgeResult<PluginConfig> {
    if let Some(config) = read_plugin_config(tree)? {
        return Ok(config);
    }
    let config = PluginConfig::default();
    write_json(tree, PLUGIN_CONFIG_PATH, &config)?;
    info!(path = PLUGIN_CONFIG_PATH, provider = %config.iac.provider, "Created plugin config");
    Ok(config)
}

pub fn update_plugin_config<F>(tree: &mut Tree<'_>, update: F) -> ForgeResult<PluginConfig>
where
    F: FnOnce(&mut PluginConfig),
{
    let mut config = ensure_plugin_config(tree)?;
    update(&mut config);
    write_json(tree, PLUGIN_CONFIG_PATH, &config)?;
    Ok(config)
}

/// Turn a generator's `iac_provider` option into a concrete provider.
pub fn resolve_iac_provider(tree: &mut Tree<'_>, option: IacProviderOption) -> ForgeResult<IacProvider> {
    if let Some(provider) = option.explicit() {
        return Ok(provider);
    }
    let provider = ensure_plugin_config(tree)?.iac.provider;
    debug!(provider = %provider, "Inherited IaC provider from workspace");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inherit_creates_default_config() {
        let mut tree = Tree::empty();
        let provider = resolve_iac_provider(&mut tree, IacProviderOption::Inherit).unwrap();
        assert_eq!(provider, IacProvider::Cdk);
        let written = tree.read(PLUGIN_CONFIG_PATH).unwrap().unwrap();
        assert!(written.contains(r#""provider": "CDK""#));
    }

    #[test]
    fn explicit_option_ignores_config() {
        let mut tree = Tree::empty();
        tree.write(PLUGIN_CONFIG_PATH, r#"{ "iac": { "provider": "CDK" } }"#);
        let provider = resolve_iac_provider(&mut tree, IacProviderOption::Terraform).unwrap();
        assert_eq!(provider, IacProvider::Terraform);
    }

    #[test]
    fn update_keeps_unknown_keys() {
        let mut tree = Tree::empty();
        tree.write(
            PLUGIN_CONFIG_PATH,
            r#"{ "iac": { "provider": "CDK" }, "tags": ["x"] }"#,
        );
        update_plugin_config(&mut tree, |config| config.iac.provider = IacProvider::Terraform)
            .unwrap();
        let config = read_plugin_config(&tree).unwrap().unwrap();
        assert_eq!(config.iac.provider, IacProvider::Terraform);
        assert_eq!(config.extra["tags"], serde_json::json!(["x"]));
        assert_eq!(
            resolve_iac_provider(&mut tree, IacProviderOption::Inherit).unwrap(),
            IacProvider::Terraform
        );
    }
}

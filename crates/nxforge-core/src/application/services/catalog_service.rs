//! Catalog Service - read-only queries over the generator registry.

use serde::Serialize;

use crate::{
    application::ApplicationError,
    domain::{GENERATOR_REGISTRY, GeneratorInfo, find_generator},
    error::ForgeResult,
};

/// Information about a generator for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorSummary {
    pub id: String,
    /// `ts`, `py` or `terraform`, the prefix of the id.
    pub language: String,
    pub name: String,
    pub description: String,
    pub metric: String,
}

impl From<&GeneratorInfo> for GeneratorSummary {
    fn from(info: &GeneratorInfo) -> Self {
        let (language, name) = info.id.split_once('#').unwrap_or(("", info.id));
        Self {
            id: info.id.to_string(),
            language: language.to_string(),
            name: name.to_string(),
            description: info.description.to_string(),
            metric: info.metric.to_string(),
        }
    }
}

/// Service for generator catalogue lookups.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogService;

impl CatalogService {
    pub fn new() -> Self {
        Self
    }

    /// List all generators, in catalogue order.
    pub fn list(&self) -> Vec<GeneratorSummary> {
        GENERATOR_REGISTRY.iter().map(GeneratorSummary::from).collect()
    }

    /// Generators whose id starts with `language#`.
    pub fn by_language(&self, language: &str) -> Vec<GeneratorSummary> {
        self.list()
            .into_iter()
            .filter(|g| g.language.eq_ignore_ascii_case(language))
            .collect()
    }

    /// Look up a generator by id (`ts#project`). The CLI spelling
    /// (`ts-project`) is accepted too.
    pub fn get(&self, id: &str) -> ForgeResult<&'static GeneratorInfo> {
        find_generator(id)
            .or_else(|| {
                GENERATOR_REGISTRY
                    .iter()
                    .find(|info| info.id.replacen('#', "-", 1) == id)
            })
            .ok_or_else(|| ApplicationError::UnknownGenerator { id: id.to_string() }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_generator_in_order() {
        let catalog = CatalogService::new();
        let all = catalog.list();
        assert_eq!(all.len(), 10);
        assert_eq!(all[0].id, "ts#project");
        assert_eq!(all[0].language, "ts");
        assert_eq!(all[0].name, "project");
    }

    #[test]
    fn filters_by_language() {
        let python: Vec<_> = CatalogService::new()
            .by_language("py")
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(python, vec!["py#project", "py#fast-api", "py#lambda-function"]);
    }

    #[test]
    fn accepts_both_spellings() {
        let catalog = CatalogService::new();
        assert_eq!(catalog.get("ts#infra").unwrap().id, "ts#infra");
        assert_eq!(catalog.get("terraform-project").unwrap().id, "terraform#project");
        let err = catalog.get("rust#crate").unwrap_err();
        assert_eq!(err.to_string(), "Unknown generator 'rust#crate'");
    }
}

//! Pinned dependency versions for generated projects.
//!
//! Every dependency a generator adds to a `package.json` or `pyproject.toml`
//! must be listed here, so one workspace never ends up with two versions of
//! the same package because two generators disagreed.

use std::collections::BTreeMap;

use crate::domain::error::DomainError;

/// TypeScript/npm packages and their pinned semver ranges.
pub static TS_VERSIONS: &[(&str, &str)] = &[
    ("@aws-lambda-powertools/logger", "^2.28.1"),
    ("@aws-lambda-powertools/metrics", "^2.28.1"),
    ("@aws-lambda-powertools/parameters", "^2.28.1"),
    ("@aws-lambda-powertools/tracer", "^2.28.1"),
    ("@aws-sdk/client-bedrock-agentcore", "^3.922.0"),
    ("@modelcontextprotocol/inspector", "^0.17.2"),
    ("@modelcontextprotocol/sdk", "^1.21.0"),
    ("@nx/eslint", "~22.0.2"),
    ("@nx/js", "~22.0.2"),
    ("@nx/vite", "~22.0.2"),
    ("@tanstack/react-router", "^1.134.4"),
    ("@trpc/server", "^11.7.1"),
    ("@types/aws-lambda", "^8.10.157"),
    ("@types/express", "^5.0.5"),
    ("@types/node", "^22.19.0"),
    ("@types/react", "^19.2.2"),
    ("@types/react-dom", "^19.2.2"),
    ("@vitejs/plugin-react", "^5.1.0"),
    ("aws-cdk", "^2.1031.1"),
    ("aws-cdk-lib", "^2.222.0"),
    ("cdk-nag", "^2.37.55"),
    ("constructs", "^10.4.2"),
    ("esbuild", "^0.25.12"),
    ("eslint", "^9.39.1"),
    ("express", "^5.1.0"),
    ("react", "^19.2.0"),
    ("react-dom", "^19.2.0"),
    ("rolldown", "1.0.0-beta.46"),
    ("source-map-support", "^0.5.21"),
    ("tsx", "^4.20.6"),
    ("typescript", "~5.9.3"),
    ("vite", "^7.2.1"),
    ("vitest", "^4.0.7"),
    ("zod", "^4.1.12"),
];

/// Python packages and their pinned PEP 440 versions.
pub static PY_VERSIONS: &[(&str, &str)] = &[
    ("aws-lambda-powertools", "3.22.1"),
    ("aws-lambda-powertools[parser]", "3.22.1"),
    ("aws-xray-sdk", "2.15.0"),
    ("bedrock-agentcore", "1.0.5"),
    ("boto3", "1.40.68"),
    ("fastapi", "0.121.0"),
    ("fastapi[standard]", "0.121.0"),
    ("mangum", "0.19.0"),
    ("mcp", "1.20.0"),
    ("pytest", "8.4.2"),
    ("pytest-cov", "7.0.0"),
    ("pytest-sugar", "1.1.1"),
    ("ruff", "0.14.3"),
    ("strands-agents", "1.14.0"),
    ("uvicorn", "0.38.0"),
];

/// Look up the pinned version of a TypeScript package.
pub fn ts_version(name: &str) -> Option<&'static str> {
    lookup(TS_VERSIONS, name)
}

/// Look up the pinned version of a Python package.
pub fn py_version(name: &str) -> Option<&'static str> {
    lookup(PY_VERSIONS, name)
}

/// Resolve a list of TypeScript packages to a `name → version` map.
///
/// # Errors
///
/// [`DomainError::UnknownDependency`] for the first package that has no pin.
pub fn with_versions(names: &[&str]) -> Result<BTreeMap<String, String>, DomainError> {
    names
        .iter()
        .map(|name| {
            ts_version(name)
                .map(|version| ((*name).to_string(), version.to_string()))
                .ok_or_else(|| DomainError::UnknownDependency {
                    name: (*name).to_string(),
                    ecosystem: "npm",
                })
        })
        .collect()
}

/// Resolve a list of Python packages to `name==version` requirement strings.
pub fn with_py_versions(names: &[&str]) -> Result<Vec<String>, DomainError> {
    names
        .iter()
        .map(|name| {
            py_version(name)
                .map(|version| format!("{name}=={version}"))
                .ok_or_else(|| DomainError::UnknownDependency {
                    name: (*name).to_string(),
                    ecosystem: "python",
                })
        })
        .collect()
}

fn lookup(table: &'static [(&'static str, &'static str)], name: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, version)| *version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_versions_resolves_known_packages() {
        let deps = with_versions(&["typescript", "rolldown"]).unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps["rolldown"], "1.0.0-beta.46");
    }

    #[test]
    fn with_versions_rejects_unknown_package() {
        let err = with_versions(&["typescript", "left-pad"]).unwrap_err();
        assert!(matches!(
            err,
            DomainError::UnknownDependency { ref name, ecosystem: "npm" } if name == "left-pad"
        ));
    }

    #[test]
    fn py_versions_render_requirements() {
        let reqs = with_py_versions(&["fastapi", "mangum"]).unwrap();
        assert_eq!(reqs, vec!["fastapi==0.121.0", "mangum==0.19.0"]);
    }

    #[test]
    fn registries_have_no_duplicate_names() {
        for table in [TS_VERSIONS, PY_VERSIONS] {
            let mut names: Vec<_> = table.iter().map(|(n, _)| *n).collect();
            let before = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(before, names.len());
        }
    }
}

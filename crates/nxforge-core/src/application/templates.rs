//! Template files compiled into the binary.
//!
//! Each entry pairs a destination path (relative to the directory a
//! generator renders into) with its content. Both may contain `{{VAR}}`
//! placeholders.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: &'static str,
    pub content: &'static str,
}

impl TemplateFile {
    pub const fn new(path: &'static str, content: &'static str) -> Self {
        Self { path, content }
    }
}

macro_rules! template {
    ($src:literal => $dest:literal) => {
        TemplateFile::new(
            $dest,
            include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/", $src)),
        )
    };
}

pub mod ts_project {
    use super::TemplateFile;

    pub const FILES: &[TemplateFile] = &[
        template!("ts-project/tsconfig.json" => "tsconfig.json"),
        template!("ts-project/tsconfig.lib.json" => "tsconfig.lib.json"),
        template!("ts-project/tsconfig.spec.json" => "tsconfig.spec.json"),
        template!("ts-project/vite.config.ts" => "vite.config.ts"),
        template!("ts-project/src/index.ts" => "src/index.ts"),
        template!("ts-project/README.md" => "README.md"),
    ];
}

pub mod py_project {
    use super::TemplateFile;

    pub const FILES: &[TemplateFile] = &[
        template!("py-project/pyproject.toml" => "pyproject.toml"),
        template!("py-project/README.md" => "README.md"),
        template!("py-project/.python-version" => ".python-version"),
        template!("py-project/module/__init__.py" => "{{MODULE}}/__init__.py"),
        template!("py-project/module/hello.py" => "{{MODULE}}/hello.py"),
        template!("py-project/tests/__init__.py" => "tests/__init__.py"),
        template!("py-project/tests/test_hello.py" => "tests/test_hello.py"),
    ];
}

pub mod py_fast_api {
    use super::TemplateFile;

    pub const FILES: &[TemplateFile] = &[
        template!("py-fast-api/module/init.py" => "{{MODULE}}/init.py"),
        template!("py-fast-api/module/main.py" => "{{MODULE}}/main.py"),
        template!("py-fast-api/tests/test_main.py" => "tests/test_main.py"),
    ];
}

pub mod ts_trpc_api {
    use super::TemplateFile;

    pub const FILES: &[TemplateFile] = &[
        template!("ts-trpc-api/src/index.ts" => "src/index.ts"),
        template!("ts-trpc-api/src/init.ts" => "src/init.ts"),
        template!("ts-trpc-api/src/router.ts" => "src/router.ts"),
        template!("ts-trpc-api/src/local-server.ts" => "src/local-server.ts"),
        template!("ts-trpc-api/src/procedures/echo.ts" => "src/procedures/echo.ts"),
    ];
}

pub mod lambda_function {
    use super::TemplateFile;

    pub const TS_HANDLER: &[TemplateFile] =
        &[template!("ts-lambda-function/handler.ts" => "{{HANDLER_FILE}}")];
    pub const PY_HANDLER: &[TemplateFile] =
        &[template!("py-lambda-function/handler.py" => "{{HANDLER_FILE}}")];
}

pub mod ts_mcp_server {
    use super::TemplateFile;

    pub const FILES: &[TemplateFile] = &[
        template!("ts-mcp-server/server.ts" => "server.ts"),
        template!("ts-mcp-server/stdio.ts" => "stdio.ts"),
        template!("ts-mcp-server/http.ts" => "http.ts"),
    ];
    pub const DOCKERFILE: &[TemplateFile] = &[template!("ts-mcp-server/Dockerfile" => "Dockerfile")];
}

pub mod ts_infra {
    use super::TemplateFile;

    pub const FILES: &[TemplateFile] = &[
        template!("ts-infra/cdk.json" => "cdk.json"),
        template!("ts-infra/src/main.ts" => "src/main.ts"),
        template!("ts-infra/src/stacks/application-stage.ts" => "src/stacks/application-stage.ts"),
        template!("ts-infra/src/stacks/application-stack.ts" => "src/stacks/application-stack.ts"),
    ];
}

pub mod terraform_project {
    use super::TemplateFile;

    pub const FILES: &[TemplateFile] = &[
        template!("terraform-project/src/providers.tf" => "src/providers.tf"),
        template!("terraform-project/src/main.tf" => "src/main.tf"),
        template!("terraform-project/src/variables.tf" => "src/variables.tf"),
        template!("terraform-project/src/outputs.tf" => "src/outputs.tf"),
        template!("terraform-project/src/dev.tfvars" => "src/env/dev.tfvars"),
    ];
}

pub mod ts_react_website {
    use super::TemplateFile;

    pub const FILES: &[TemplateFile] = &[
        template!("ts-react-website/index.html" => "index.html"),
        template!("ts-react-website/vite.config.ts" => "vite.config.ts"),
        template!("ts-react-website/src/main.tsx" => "src/main.tsx"),
        template!("ts-react-website/src/app.tsx" => "src/app.tsx"),
        template!("ts-react-website/src/styles.css" => "src/styles.css"),
    ];
}

/// Shared CDK constructs package (`packages/common/constructs`).
pub mod constructs {
    use super::TemplateFile;

    pub const SCAFFOLD: &[TemplateFile] = &[
        template!("shared/constructs/src/index.ts" => "src/index.ts"),
        template!("shared/constructs/src/core/index.ts" => "src/core/index.ts"),
        template!("shared/constructs/src/core/app.ts" => "src/core/app.ts"),
        template!("shared/constructs/src/core/runtime-config.ts" => "src/core/runtime-config.ts"),
        template!("shared/constructs/src/app/index.ts" => "src/app/index.ts"),
    ];
    pub const REST_API: &[TemplateFile] =
        &[template!("shared/constructs/src/core/api/rest-api.ts" => "src/core/api/rest-api.ts")];
    pub const HTTP_API: &[TemplateFile] =
        &[template!("shared/constructs/src/core/api/http-api.ts" => "src/core/api/http-api.ts")];
    pub const API: &[TemplateFile] =
        &[template!("shared/constructs/src/app/api.ts" => "src/app/apis/{{NAME_KEBAB}}.ts")];
    pub const FUNCTION: &[TemplateFile] = &[template!(
        "shared/constructs/src/app/function.ts" => "src/app/lambda-functions/{{NAME_KEBAB}}.ts"
    )];
    pub const AGENT_CORE_RUNTIME: &[TemplateFile] = &[template!(
        "shared/constructs/src/core/agent-core/runtime.ts" => "src/core/agent-core/runtime.ts"
    )];
    pub const MCP_SERVER: &[TemplateFile] = &[template!(
        "shared/constructs/src/app/mcp-server.ts" => "src/app/mcp-servers/{{NAME_KEBAB}}.ts"
    )];
    pub const CORE_STATIC_WEBSITE: &[TemplateFile] = &[template!(
        "shared/constructs/src/core/static-website.ts" => "src/core/static-website.ts"
    )];
    pub const STATIC_WEBSITE: &[TemplateFile] = &[template!(
        "shared/constructs/src/app/static-website.ts" => "src/app/static-websites/{{NAME_KEBAB}}.ts"
    )];
}

/// Shared Terraform modules package (`packages/common/terraform`).
pub mod terraform {
    use super::TemplateFile;

    pub const CORE_LAMBDA_FUNCTION: &[TemplateFile] = &[template!(
        "shared/terraform/core/lambda-function.tf" => "src/core/lambda-function/lambda-function.tf"
    )];
    pub const REST_API: &[TemplateFile] = &[template!(
        "shared/terraform/core/api/rest-api.tf" => "src/core/api/rest-api/rest-api.tf"
    )];
    pub const HTTP_API: &[TemplateFile] = &[template!(
        "shared/terraform/core/api/http-api.tf" => "src/core/api/http-api/http-api.tf"
    )];
    pub const AGENT_CORE_RUNTIME: &[TemplateFile] = &[template!(
        "shared/terraform/core/agent-core-runtime.tf" => "src/core/agent-core/agent-core.tf"
    )];
    pub const CORE_STATIC_WEBSITE: &[TemplateFile] = &[template!(
        "shared/terraform/core/static-website.tf" => "src/core/static-website/static-website.tf"
    )];
    pub const API: &[TemplateFile] = &[template!(
        "shared/terraform/app/api.tf" => "src/app/apis/{{NAME_KEBAB}}/{{NAME_KEBAB}}.tf"
    )];
    pub const FUNCTION: &[TemplateFile] = &[template!(
        "shared/terraform/app/function.tf" => "src/app/lambda-functions/{{NAME_KEBAB}}/{{NAME_KEBAB}}.tf"
    )];
    pub const MCP_SERVER: &[TemplateFile] = &[template!(
        "shared/terraform/app/mcp-server.tf" => "src/app/mcp-servers/{{NAME_KEBAB}}/{{NAME_KEBAB}}.tf"
    )];
    pub const STATIC_WEBSITE: &[TemplateFile] = &[template!(
        "shared/terraform/app/static-website.tf" => "src/app/static-websites/{{NAME_KEBAB}}/{{NAME_KEBAB}}.tf"
    )];
}

pub mod infra_config {
    use super::TemplateFile;

    pub const FILES: &[TemplateFile] = &[
        template!("shared/infra-config/src/index.ts" => "src/index.ts"),
        template!("shared/infra-config/src/stages.config.ts" => "src/stages.config.ts"),
    ];
}

pub mod scripts {
    use super::TemplateFile;

    pub const FILES: &[TemplateFile] = &[
        template!("shared/scripts/src/index.ts" => "src/index.ts"),
        template!("shared/scripts/src/stage-credentials.ts" => "src/stage-credentials.ts"),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_templates_are_not_empty() {
        let groups: &[&[TemplateFile]] = &[
            ts_project::FILES,
            py_fast_api::FILES,
            ts_trpc_api::FILES,
            constructs::API,
            terraform::API,
        ];
        for file in groups.iter().flat_map(|g| g.iter()) {
            assert!(!file.content.trim().is_empty(), "{} is empty", file.path);
        }
    }

    #[test]
    fn constructs_app_index_starts_as_placeholder() {
        let index = constructs::SCAFFOLD
            .iter()
            .find(|f| f.path == "src/app/index.ts")
            .unwrap();
        assert_eq!(index.content, "export {};\n");
    }
}

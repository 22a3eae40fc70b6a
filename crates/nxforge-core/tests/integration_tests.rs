//! Integration tests for nxforge-core.
//!
//! Each generator run goes through `GeneratorService`, so every test sees
//! the workspace exactly as the previous run left it on "disk".

use std::path::Path;

use nxforge_adapters::MemoryFilesystem;
use nxforge_core::{
    application::ports::Filesystem,
    domain::{DomainError, ProjectConfiguration},
    error::ForgeError,
    prelude::*,
};

fn workspace() -> MemoryFilesystem {
    MemoryFilesystem::with_files([
        ("package.json", "{\n  \"name\": \"@acme/source\"\n}\n"),
        ("nx.json", "{}\n"),
    ])
}

fn run(fs: &MemoryFilesystem, generator: &dyn Generator) -> ForgeResult<GenerationReport> {
    GeneratorService::new(Box::new(fs.clone())).run(generator, false)
}

fn project(fs: &MemoryFilesystem, root: &str) -> ProjectConfiguration {
    let raw = fs
        .contents(format!("{root}/project.json"))
        .unwrap_or_else(|| panic!("no project.json under {root}"));
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn test_fast_api_ports_across_runs() {
    let fs = workspace();
    for name in ["first-api", "second-api", "third-api"] {
        run(&fs, &FastApiGenerator::new(FastApiOptions::new(name))).unwrap();
    }

    for (root, port) in [
        ("packages/first_api", 8000),
        ("packages/second_api", 8001),
        ("packages/third_api", 8002),
    ] {
        let serve = project(&fs, root).targets["serve"]
            .command_line()
            .unwrap()
            .to_string();
        assert!(serve.contains(&format!("--port {port}")), "{root}: {serve}");
    }
}

#[test]
fn test_shared_constructs_created_once() {
    let fs = workspace();
    run(&fs, &TrpcApiGenerator::new(TrpcApiOptions::new("orders"))).unwrap();
    let second = run(&fs, &TrpcApiGenerator::new(TrpcApiOptions::new("billing"))).unwrap();

    // The second run only touches the constructs package, it never recreates it.
    assert!(
        second
            .changes
            .iter()
            .filter(|c| c.path == "packages/common/constructs/project.json")
            .all(|c| c.kind == ChangeKind::Update)
    );

    let apis = fs
        .contents("packages/common/constructs/src/app/apis/index.ts")
        .unwrap();
    assert_eq!(
        apis,
        "export * from './orders.js';\nexport * from './billing.js';\n"
    );

    let constructs = project(&fs, "packages/common/constructs");
    let edges: Vec<_> = constructs.targets["build"].dependency_names().collect();
    assert_eq!(edges.iter().filter(|d| **d == "@acme/orders:bundle").count(), 1);
    assert_eq!(edges.iter().filter(|d| **d == "@acme/billing:bundle").count(), 1);
}

#[test]
fn test_dry_run_leaves_workspace_untouched() {
    let fs = workspace();
    let before = fs.paths();
    let report = GeneratorService::new(Box::new(fs.clone()))
        .run(&TsProjectGenerator::new(TsProjectOptions::new("utils")), true)
        .unwrap();

    assert!(report.dry_run);
    assert!(report.count(ChangeKind::Create) > 0);
    assert_eq!(fs.paths(), before);
}

#[test]
fn test_failed_generator_writes_nothing() {
    let fs = workspace();
    run(&fs, &TsProjectGenerator::new(TsProjectOptions::new("utils"))).unwrap();
    run(
        &fs,
        &TsLambdaFunctionGenerator::new(TsLambdaFunctionOptions::new("utils", "resize")),
    )
    .unwrap();
    let before = fs.paths();

    let err = run(
        &fs,
        &TsLambdaFunctionGenerator::new(TsLambdaFunctionOptions::new("utils", "resize")),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ForgeError::Domain(DomainError::ComponentExists { .. })
    ));
    assert_eq!(fs.paths(), before);
}

#[test]
fn test_rerunning_project_generator_is_rejected() {
    let fs = workspace();
    run(&fs, &PyProjectGenerator::new(PyProjectOptions::new("jobs"))).unwrap();
    let err = run(&fs, &PyProjectGenerator::new(PyProjectOptions::new("jobs"))).unwrap_err();
    assert!(matches!(err, ForgeError::Domain(DomainError::ProjectExists { .. })));
}

#[test]
fn test_infra_then_website_share_constructs() {
    let fs = workspace();
    run(&fs, &TsInfraGenerator::new(TsInfraOptions::new("infra"))).unwrap();
    let report = run(
        &fs,
        &ReactWebsiteGenerator::new(ReactWebsiteOptions::new("storefront")),
    )
    .unwrap();

    assert_eq!(
        report.callback.tasks(),
        &[PostGenerateTask::InstallNodeDependencies]
    );
    let index = fs.contents("packages/common/constructs/src/app/index.ts").unwrap();
    assert!(index.contains("export * from './static-websites/index.js';"));
    assert!(fs.is_file(Path::new("packages/infra/cdk.json")));

    // Written JSON is normalized.
    let root_package = fs.contents("package.json").unwrap();
    assert!(root_package.starts_with("{\n  \"name\": \"@acme/source\""));
    assert!(root_package.ends_with("}\n"));
}

#[test]
fn test_terraform_project_then_lambda_uses_terraform() {
    let fs = workspace();
    run(
        &fs,
        &TerraformProjectGenerator::new(TerraformProjectOptions::new("platform")),
    )
    .unwrap();
    run(&fs, &PyProjectGenerator::new(PyProjectOptions::new("jobs"))).unwrap();
    run(
        &fs,
        &PyLambdaFunctionGenerator::new(PyLambdaFunctionOptions::new("jobs", "cleanup")),
    )
    .unwrap();

    assert!(fs.paths().iter().any(|p| p
        .to_string_lossy()
        .starts_with("packages/common/terraform/src/app/lambda-functions/")));
    assert!(!fs.exists(Path::new("packages/common/constructs")));
}

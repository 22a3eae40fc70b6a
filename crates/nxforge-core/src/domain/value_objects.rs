//! Domain value objects: generator option enums.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! Each has an `as_str` (the spelling used in generated files and
//! metadata), a `Display` that delegates to it, and a case-insensitive
//! `FromStr` parser.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

// ── IaC provider ──────────────────────────────────────────────────────────────

/// A resolved infrastructure-as-code backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IacProvider {
    #[serde(rename = "CDK")]
    Cdk,
    #[serde(rename = "Terraform")]
    Terraform,
}

impl IacProvider {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cdk => "CDK",
            Self::Terraform => "Terraform",
        }
    }
}

impl fmt::Display for IacProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IacProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cdk" => Ok(Self::Cdk),
            "terraform" | "tf" => Ok(Self::Terraform),
            _ => Err(DomainError::UnsupportedIacProvider { value: s.into() }),
        }
    }
}

/// The IaC provider as requested on a generator: a concrete provider, or
/// `Inherit` to use the workspace default from `nxforge.config.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IacProviderOption {
    #[serde(rename = "CDK")]
    Cdk,
    #[serde(rename = "Terraform")]
    Terraform,
    #[default]
    Inherit,
}

impl IacProviderOption {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cdk => "CDK",
            Self::Terraform => "Terraform",
            Self::Inherit => "Inherit",
        }
    }

    /// The concrete provider, if one was requested explicitly.
    pub const fn explicit(&self) -> Option<IacProvider> {
        match self {
            Self::Cdk => Some(IacProvider::Cdk),
            Self::Terraform => Some(IacProvider::Terraform),
            Self::Inherit => None,
        }
    }
}

impl fmt::Display for IacProviderOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IacProviderOption {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("inherit") {
            return Ok(Self::Inherit);
        }
        IacProvider::from_str(s).map(|provider| match provider {
            IacProvider::Cdk => Self::Cdk,
            IacProvider::Terraform => Self::Terraform,
        })
    }
}

// ── API options ───────────────────────────────────────────────────────────────

/// Where an API is hosted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComputeType {
    #[default]
    ServerlessApiGatewayRestApi,
    ServerlessApiGatewayHttpApi,
}

impl ComputeType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ServerlessApiGatewayRestApi => "ServerlessApiGatewayRestApi",
            Self::ServerlessApiGatewayHttpApi => "ServerlessApiGatewayHttpApi",
        }
    }

    /// File stem of the core construct implementing this compute type.
    pub const fn core_construct(&self) -> &'static str {
        match self {
            Self::ServerlessApiGatewayRestApi => "rest-api",
            Self::ServerlessApiGatewayHttpApi => "http-api",
        }
    }
}

impl fmt::Display for ComputeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComputeType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "serverlessapigatewayrestapi" | "rest" | "rest-api" => {
                Ok(Self::ServerlessApiGatewayRestApi)
            }
            "serverlessapigatewayhttpapi" | "http" | "http-api" => {
                Ok(Self::ServerlessApiGatewayHttpApi)
            }
            _ => Err(DomainError::UnsupportedOption {
                option: "computeType",
                value: s.into(),
            }),
        }
    }
}

/// How API callers authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Auth {
    #[default]
    #[serde(rename = "IAM")]
    Iam,
    Cognito,
    None,
}

impl Auth {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Iam => "IAM",
            Self::Cognito => "Cognito",
            Self::None => "None",
        }
    }
}

impl fmt::Display for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Auth {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iam" => Ok(Self::Iam),
            "cognito" => Ok(Self::Cognito),
            "none" => Ok(Self::None),
            _ => Err(DomainError::UnsupportedOption {
                option: "auth",
                value: s.into(),
            }),
        }
    }
}

/// The backend technology behind an API construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiBackend {
    FastApi,
    Trpc,
}

impl ApiBackend {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FastApi => "fast-api",
            Self::Trpc => "trpc",
        }
    }
}

impl fmt::Display for ApiBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── MCP server hosting ────────────────────────────────────────────────────────

/// Where an MCP server runs once deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum McpComputeType {
    None,
    #[default]
    BedrockAgentCoreRuntime,
}

impl McpComputeType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::BedrockAgentCoreRuntime => "BedrockAgentCoreRuntime",
        }
    }
}

impl fmt::Display for McpComputeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for McpComputeType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "bedrockagentcoreruntime" | "agentcore" => Ok(Self::BedrockAgentCoreRuntime),
            _ => Err(DomainError::UnsupportedOption {
                option: "computeType",
                value: s.into(),
            }),
        }
    }
}

// ── Project kinds ─────────────────────────────────────────────────────────────

/// Nx `projectType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Application,
    #[default]
    Library,
}

impl ProjectType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Library => "library",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "application" | "app" => Ok(Self::Application),
            "library" | "lib" => Ok(Self::Library),
            _ => Err(DomainError::UnsupportedOption {
                option: "projectType",
                value: s.into(),
            }),
        }
    }
}

// ── Lambda options ────────────────────────────────────────────────────────────

/// The event a Lambda handler is typed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EventSource {
    #[default]
    Any,
    ApiGatewayProxy,
    Sqs,
    S3,
    EventBridge,
}

impl EventSource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "Any",
            Self::ApiGatewayProxy => "APIGatewayProxyEventModel",
            Self::Sqs => "SqsModel",
            Self::S3 => "S3Model",
            Self::EventBridge => "EventBridgeModel",
        }
    }

    /// TypeScript event type from `@types/aws-lambda`.
    pub const fn ts_type(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::ApiGatewayProxy => "APIGatewayProxyEvent",
            Self::Sqs => "SQSEvent",
            Self::S3 => "S3Event",
            Self::EventBridge => "EventBridgeEvent<string, unknown>",
        }
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventSource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" => Ok(Self::Any),
            "apigatewayproxyeventmodel" | "apigateway" | "api-gateway" => {
                Ok(Self::ApiGatewayProxy)
            }
            "sqsmodel" | "sqs" => Ok(Self::Sqs),
            "s3model" | "s3" => Ok(Self::S3),
            "eventbridgemodel" | "eventbridge" => Ok(Self::EventBridge),
            _ => Err(DomainError::UnsupportedOption {
                option: "eventSource",
                value: s.into(),
            }),
        }
    }
}

/// Target platform for Python Lambda bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PythonPlatform {
    #[default]
    X86_64,
    Arm64,
}

impl PythonPlatform {
    /// `uv pip install --python-platform` value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64-manylinux2014",
            Self::Arm64 => "aarch64-manylinux2014",
        }
    }
}

impl fmt::Display for PythonPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iac_provider_parses_case_insensitively() {
        assert_eq!("cdk".parse::<IacProvider>().unwrap(), IacProvider::Cdk);
        assert_eq!(
            "TERRAFORM".parse::<IacProvider>().unwrap(),
            IacProvider::Terraform
        );
        assert_eq!(
            "Inherit".parse::<IacProviderOption>().unwrap(),
            IacProviderOption::Inherit
        );
    }

    #[test]
    fn unsupported_iac_provider_message() {
        let err = "Pulumi".parse::<IacProviderOption>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported iacProvider Pulumi");
    }

    #[test]
    fn iac_provider_serializes_with_canonical_spelling() {
        assert_eq!(serde_json::to_string(&IacProvider::Cdk).unwrap(), "\"CDK\"");
        let parsed: IacProviderOption = serde_json::from_str("\"Terraform\"").unwrap();
        assert_eq!(parsed.explicit(), Some(IacProvider::Terraform));
    }

    #[test]
    fn compute_type_maps_to_core_construct() {
        assert_eq!(
            "http".parse::<ComputeType>().unwrap().core_construct(),
            "http-api"
        );
        assert!("fargate".parse::<ComputeType>().is_err());
    }
}

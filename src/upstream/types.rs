//! Typed views of the platform objects selected by [`super::operations`].
//!
//! Unknown fields in upstream payloads are ignored on deserialization, so a
//! schema addition upstream never leaks through to the dashboard.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// Relay-style connections
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

// ============================================================================
// Shared fragments
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSource {
    pub repo: Option<String>,
    pub image: Option<String>,
}

/// Deployment status. Values this build does not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentStatus {
    Building,
    Crashed,
    Deploying,
    Failed,
    Initializing,
    Queued,
    Removed,
    Removing,
    Skipped,
    Success,
    Waiting,
    #[serde(untagged)]
    Other(String),
}

// ============================================================================
// me
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Me {
    pub id: String,
    pub projects: Connection<ProjectSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
    pub base_environment: Option<EnvironmentRef>,
    pub environments: Connection<EnvironmentRef>,
    pub services: Connection<ServiceRef>,
}

// ============================================================================
// getProject
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
    pub base_environment: Option<EnvironmentRef>,
    pub environments: Connection<EnvironmentRef>,
    pub services: Connection<ProjectService>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectService {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub created_at: String,
    pub service_instances: Connection<ProjectServiceInstance>,
    pub deployments: Connection<DeploymentSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectServiceInstance {
    pub created_at: String,
    pub domains: Domains,
    pub source: Option<ServiceSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domains {
    pub custom_domains: Vec<Domain>,
    pub service_domains: Vec<Domain>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSummary {
    pub id: String,
    pub url: Option<String>,
    pub static_url: Option<String>,
    pub status: DeploymentStatus,
    pub created_at: String,
}

// ============================================================================
// getService
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub created_at: String,
    pub service_instances: Connection<ServiceInstance>,
    pub deployments: Connection<Deployment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstance {
    pub id: String,
    pub created_at: String,
    pub source: Option<ServiceSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: String,
    pub url: Option<String>,
    pub static_url: Option<String>,
    pub status: DeploymentStatus,
    pub can_redeploy: bool,
    pub created_at: String,
    pub environment: EnvironmentRef,
}

// ============================================================================
// listGithubRepos / listTemplates / listDeploymentLogs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubRepo {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub default_branch: String,
    pub installation_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub code: String,
    pub metadata: Value,
    pub services: Connection<TemplateService>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateService {
    pub id: String,
    pub config: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogLine {
    pub message: String,
    pub severity: Option<String>,
    pub timestamp: String,
    pub tags: Option<LogTags>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogTags {
    pub deployment_id: Option<String>,
    pub deployment_instance_id: Option<String>,
    pub service_id: Option<String>,
}

// ============================================================================
// Mutation payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProject {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub base_environment: Option<EnvironmentRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedService {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub service_instances: Connection<CreatedServiceInstance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedServiceInstance {
    pub id: String,
    pub environment_id: String,
    pub nixpacks_plan: Option<Value>,
    pub healthcheck_path: Option<String>,
    pub healthcheck_timeout: Option<i64>,
    pub start_command: Option<String>,
    pub build_command: Option<String>,
    pub builder: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDeployPayload {
    pub project_id: String,
    pub workflow_id: Option<String>,
}

// ============================================================================
// Mutation inputs
// ============================================================================

/// Where a new service is built from: exactly one of a repo or an image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceSourceInput {
    Repo(String),
    Image(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCreateInput {
    pub project_id: String,
    pub branch: Option<String>,
    pub environment_id: Option<String>,
    pub source: ServiceSourceInput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDeployInput {
    pub project_id: String,
    pub template_code: String,
    pub services: Vec<TemplateDeployService>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDeployService {
    pub id: String,
    pub has_domain: bool,
    pub is_private: bool,
    pub owner: String,
    pub name: String,
    pub service_name: String,
    pub template: String,
    pub variables: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_source_input_serializes_as_single_key_object() {
        let repo = serde_json::to_value(ServiceSourceInput::Repo("acme/api".into())).unwrap();
        assert_eq!(repo, json!({"repo": "acme/api"}));

        let image = serde_json::to_value(ServiceSourceInput::Image("nginx:1".into())).unwrap();
        assert_eq!(image, json!({"image": "nginx:1"}));
    }

    #[test]
    fn test_unknown_deployment_status_is_passed_through() {
        let status: DeploymentStatus = serde_json::from_value(json!("SLEEPING")).unwrap();
        assert_eq!(status, DeploymentStatus::Other("SLEEPING".to_string()));
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("SLEEPING"));

        let status: DeploymentStatus = serde_json::from_value(json!("SUCCESS")).unwrap();
        assert_eq!(status, DeploymentStatus::Success);
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("SUCCESS"));
    }

    #[test]
    fn test_missing_optional_fields_become_none() {
        let line: LogLine = serde_json::from_value(json!({
            "message": "listening on :8080",
            "timestamp": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(line.severity, None);
        assert_eq!(line.tags, None);
    }
}

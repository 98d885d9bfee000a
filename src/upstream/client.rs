// ============================================================================
// Platform Client
// ============================================================================
//
// Typed wrapper over the transport: one method per named operation. Each
// method issues exactly one upstream call and decodes the fields its
// document selects. Failures are tagged with the operation name so the
// route can log them without exposing them.
//
// ============================================================================

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::session::BearerToken;
use crate::upstream::operations::{self, Operation};
use crate::upstream::transport::{GraphQlRequest, GraphQlTransport};
use crate::upstream::types::{
    Connection, CreatedProject, CreatedService, GithubRepo, LogLine, Me, Project, Service,
    ServiceCreateInput, Template, TemplateDeployInput, TemplateDeployPayload,
};

#[derive(Deserialize)]
struct MeData {
    me: Me,
}

#[derive(Deserialize)]
struct ProjectData {
    project: Project,
}

#[derive(Deserialize)]
struct ServiceData {
    service: Service,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GithubReposData {
    github_repos: Vec<GithubRepo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GithubScopesData {
    github_writable_scopes: Vec<String>,
}

#[derive(Deserialize)]
struct TemplatesData {
    templates: Connection<Template>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentLogsData {
    deployment_logs: Vec<LogLine>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectCreateData {
    project_create: CreatedProject,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceCreateData {
    service_create: CreatedService,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceDeleteData {
    service_delete: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentRemoveData {
    deployment_remove: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentCancelData {
    deployment_cancel: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentRestartData {
    deployment_restart: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplateDeployData {
    template_deploy: TemplateDeployPayload,
}

/// Typed access to the platform API
#[derive(Clone)]
pub struct PlatformClient {
    transport: Arc<dyn GraphQlTransport>,
}

impl PlatformClient {
    pub fn new(transport: Arc<dyn GraphQlTransport>) -> Self {
        Self { transport }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: Operation,
        token: &BearerToken,
        variables: Value,
    ) -> AppResult<T> {
        let data = self
            .transport
            .execute(token, GraphQlRequest::new(operation, variables))
            .await
            .map_err(|e| AppError::upstream(operation.name, e))?;

        serde_json::from_value(data).map_err(|e| AppError::upstream(operation.name, e.into()))
    }

    pub async fn me(&self, token: &BearerToken) -> AppResult<Me> {
        let data: MeData = self.execute(operations::ME, token, json!({})).await?;
        Ok(data.me)
    }

    pub async fn project(&self, token: &BearerToken, id: Uuid) -> AppResult<Project> {
        let data: ProjectData = self
            .execute(operations::GET_PROJECT, token, json!({ "id": id.to_string() }))
            .await?;
        Ok(data.project)
    }

    pub async fn project_create(&self, token: &BearerToken) -> AppResult<CreatedProject> {
        let data: ProjectCreateData = self
            .execute(operations::PROJECT_CREATE, token, json!({ "input": {} }))
            .await?;
        Ok(data.project_create)
    }

    pub async fn github_repos(&self, token: &BearerToken) -> AppResult<Vec<GithubRepo>> {
        let data: GithubReposData = self
            .execute(operations::LIST_GITHUB_REPOS, token, json!({}))
            .await?;
        Ok(data.github_repos)
    }

    pub async fn github_writable_scopes(&self, token: &BearerToken) -> AppResult<Vec<String>> {
        let data: GithubScopesData = self
            .execute(operations::GITHUB_WRITABLE_SCOPES, token, json!({}))
            .await?;
        Ok(data.github_writable_scopes)
    }

    pub async fn templates(&self, token: &BearerToken) -> AppResult<Connection<Template>> {
        let data: TemplatesData = self
            .execute(operations::LIST_TEMPLATES, token, json!({}))
            .await?;
        Ok(data.templates)
    }

    pub async fn service(&self, token: &BearerToken, id: Uuid) -> AppResult<Service> {
        let data: ServiceData = self
            .execute(operations::GET_SERVICE, token, json!({ "id": id.to_string() }))
            .await?;
        Ok(data.service)
    }

    pub async fn service_create(
        &self,
        token: &BearerToken,
        input: ServiceCreateInput,
    ) -> AppResult<CreatedService> {
        let data: ServiceCreateData = self
            .execute(operations::SERVICE_CREATE, token, json!({ "input": input }))
            .await?;
        Ok(data.service_create)
    }

    pub async fn service_delete(
        &self,
        token: &BearerToken,
        id: Uuid,
        environment_id: Uuid,
    ) -> AppResult<bool> {
        let variables = json!({
            "id": id.to_string(),
            "environmentId": environment_id.to_string(),
        });
        let data: ServiceDeleteData = self
            .execute(operations::SERVICE_DELETE, token, variables)
            .await?;
        Ok(data.service_delete)
    }

    pub async fn deployment_remove(&self, token: &BearerToken, id: Uuid) -> AppResult<bool> {
        let data: DeploymentRemoveData = self
            .execute(operations::DEPLOYMENT_REMOVE, token, json!({ "id": id.to_string() }))
            .await?;
        Ok(data.deployment_remove)
    }

    pub async fn deployment_cancel(&self, token: &BearerToken, id: Uuid) -> AppResult<bool> {
        let data: DeploymentCancelData = self
            .execute(operations::DEPLOYMENT_CANCEL, token, json!({ "id": id.to_string() }))
            .await?;
        Ok(data.deployment_cancel)
    }

    pub async fn deployment_restart(&self, token: &BearerToken, id: Uuid) -> AppResult<bool> {
        let data: DeploymentRestartData = self
            .execute(operations::DEPLOYMENT_RESTART, token, json!({ "id": id.to_string() }))
            .await?;
        Ok(data.deployment_restart)
    }

    pub async fn deployment_logs(&self, token: &BearerToken, id: Uuid) -> AppResult<Vec<LogLine>> {
        let variables = json!({ "deploymentId": id.to_string() });
        let data: DeploymentLogsData = self
            .execute(operations::LIST_DEPLOYMENT_LOGS, token, variables)
            .await?;
        Ok(data.deployment_logs)
    }

    pub async fn template_deploy(
        &self,
        token: &BearerToken,
        input: TemplateDeployInput,
    ) -> AppResult<TemplateDeployPayload> {
        let data: TemplateDeployData = self
            .execute(operations::TEMPLATE_DEPLOY, token, json!({ "input": input }))
            .await?;
        Ok(data.template_deploy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::UpstreamError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every request and answers with a fixed `data` value
    struct RecordingTransport {
        response: Result<Value, fn() -> UpstreamError>,
        seen: Mutex<Vec<(String, GraphQlRequest)>>,
    }

    #[async_trait]
    impl GraphQlTransport for RecordingTransport {
        async fn execute(
            &self,
            token: &BearerToken,
            request: GraphQlRequest,
        ) -> Result<Value, UpstreamError> {
            self.seen
                .lock()
                .unwrap()
                .push((token.expose().to_string(), request));
            match &self.response {
                Ok(value) => Ok(value.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn client(response: Result<Value, fn() -> UpstreamError>) -> (PlatformClient, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport {
            response,
            seen: Mutex::new(Vec::new()),
        });
        (PlatformClient::new(transport.clone()), transport)
    }

    #[tokio::test]
    async fn test_service_delete_sends_both_ids() {
        let (client, transport) = client(Ok(json!({ "serviceDelete": true })));
        let id = Uuid::new_v4();
        let env = Uuid::new_v4();

        let deleted = client
            .service_delete(&BearerToken::new("tok"), id, env)
            .await
            .unwrap();
        assert!(deleted);

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (token, request) = &seen[0];
        assert_eq!(token, "tok");
        assert_eq!(request.operation_name, "serviceDelete");
        assert_eq!(request.variables["id"], id.to_string());
        assert_eq!(request.variables["environmentId"], env.to_string());
    }

    #[tokio::test]
    async fn test_project_create_sends_empty_input() {
        let (client, transport) = client(Ok(json!({
            "projectCreate": {
                "id": "p1",
                "name": "silly-name",
                "createdAt": "2024-01-01T00:00:00Z",
                "baseEnvironment": null
            }
        })));

        let project = client.project_create(&BearerToken::new("tok")).await.unwrap();
        assert_eq!(project.name, "silly-name");

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].1.variables, json!({ "input": {} }));
    }

    #[tokio::test]
    async fn test_shape_mismatch_is_upstream_error() {
        let (client, _) = client(Ok(json!({ "me": { "id": 42 } })));
        let err = client.me(&BearerToken::new("tok")).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Upstream {
                operation: "me",
                source: UpstreamError::Decode(_)
            }
        ));
    }

    #[tokio::test]
    async fn test_transport_error_is_tagged_with_operation() {
        let (client, _) = client(Err(|| UpstreamError::MissingData));
        let err = client
            .deployment_remove(&BearerToken::new("tok"), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Upstream {
                operation: "deploymentRemove",
                ..
            }
        ));
    }
}

// ============================================================================
// Request Validation
// ============================================================================
//
// Request bodies as the dashboard sends them, and their conversion into the
// typed upstream inputs. Every failure names the offending field so the
// client can tell which input was rejected.
//
// ============================================================================

use serde::Deserialize;
use std::collections::BTreeMap;
use url::Url;
use uuid::Uuid;

use crate::error::AppError;
use crate::upstream::types::{
    ServiceCreateInput, ServiceSourceInput, TemplateDeployInput, TemplateDeployService,
};

/// Length of the canonical hyphenated form
const UUID_LEN: usize = 36;

/// Parse a UUID in its canonical `8-4-4-4-12` form.
///
/// Braced, URN and unhyphenated spellings are rejected.
pub fn parse_uuid(field: &str, value: &str) -> Result<Uuid, AppError> {
    if value.len() != UUID_LEN {
        return Err(invalid_uuid(field));
    }
    Uuid::parse_str(value).map_err(|_| invalid_uuid(field))
}

fn invalid_uuid(field: &str) -> AppError {
    AppError::validation(format!("{}: Invalid uuid", field))
}

fn required(field: &str) -> AppError {
    AppError::validation(format!("{}: Required", field))
}

// ============================================================================
// POST /sessions
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(rename = "apiKey", default)]
    api_key: Option<String>,
}

impl LoginForm {
    /// The API key, checked to be a canonical UUID and returned as sent
    pub fn into_api_key(self) -> Result<String, AppError> {
        let api_key = self.api_key.ok_or_else(|| required("apiKey"))?;
        parse_uuid("apiKey", &api_key)?;
        Ok(api_key)
    }
}

// ============================================================================
// POST /project/:id/services
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    #[serde(default)]
    branch: Option<String>,
    #[serde(default)]
    environment_id: Option<String>,
    #[serde(default)]
    source: Option<SourceBody>,
}

#[derive(Debug, Deserialize)]
struct SourceBody {
    #[serde(default)]
    repo: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

impl SourceBody {
    fn into_input(self) -> Result<ServiceSourceInput, AppError> {
        match (self.repo, self.image) {
            (Some(repo), None) => Ok(ServiceSourceInput::Repo(repo)),
            (None, Some(image)) => Ok(ServiceSourceInput::Image(image)),
            (Some(_), Some(_)) => Err(AppError::validation(
                "source: Expected exactly one of repo or image",
            )),
            (None, None) => Err(AppError::validation(
                "source: Expected one of repo or image",
            )),
        }
    }
}

impl CreateServiceRequest {
    pub fn into_input(self, project_id: Uuid) -> Result<ServiceCreateInput, AppError> {
        let environment_id = self
            .environment_id
            .map(|id| parse_uuid("environmentId", &id).map(|_| id))
            .transpose()?;
        let source = self.source.ok_or_else(|| required("source"))?.into_input()?;

        Ok(ServiceCreateInput {
            project_id: project_id.to_string(),
            branch: self.branch,
            environment_id,
            source,
        })
    }
}

// ============================================================================
// DELETE /services/:id
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteServiceRequest {
    #[serde(default)]
    environment_id: Option<String>,
}

impl DeleteServiceRequest {
    pub fn environment_id(&self) -> Result<Uuid, AppError> {
        let id = self
            .environment_id
            .as_deref()
            .ok_or_else(|| required("environmentId"))?;
        parse_uuid("environmentId", id)
    }
}

// ============================================================================
// POST /project/:id/deploy-template
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployTemplateRequest {
    #[serde(default)]
    template_code: Option<String>,
    #[serde(default)]
    services: Option<Vec<TemplateServiceBody>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplateServiceBody {
    id: String,
    has_domain: bool,
    is_private: bool,
    owner: String,
    name: String,
    service_name: String,
    template: String,
    variables: BTreeMap<String, String>,
}

impl DeployTemplateRequest {
    pub fn into_input(self, project_id: Uuid) -> Result<TemplateDeployInput, AppError> {
        let template_code = self.template_code.ok_or_else(|| required("templateCode"))?;
        let services = self
            .services
            .ok_or_else(|| required("services"))?
            .into_iter()
            .enumerate()
            .map(|(index, service)| service.into_input(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TemplateDeployInput {
            project_id: project_id.to_string(),
            template_code,
            services,
        })
    }
}

impl TemplateServiceBody {
    fn into_input(self, index: usize) -> Result<TemplateDeployService, AppError> {
        parse_uuid(&format!("services.{}.id", index), &self.id)?;
        Url::parse(&self.template).map_err(|_| {
            AppError::validation(format!("services.{}.template: Invalid url", index))
        })?;

        Ok(TemplateDeployService {
            id: self.id,
            has_domain: self.has_domain,
            is_private: self.is_private,
            owner: self.owner,
            name: self.name,
            service_name: self.service_name,
            template: self.template,
            variables: self.variables,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const KEY: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_uuid_accepts_canonical_form() {
        assert_eq!(parse_uuid("id", KEY).unwrap().to_string(), KEY);
        assert!(parse_uuid("id", &KEY.to_uppercase()).is_ok());
    }

    #[test]
    fn test_parse_uuid_rejects_other_spellings() {
        for value in [
            "not-a-uuid",
            "",
            "550e8400e29b41d4a716446655440000",
            "{550e8400-e29b-41d4-a716-446655440000}",
            "urn:uuid:550e8400-e29b-41d4-a716-446655440000",
        ] {
            let err = parse_uuid("id", value).unwrap_err();
            assert_eq!(message(err), "id: Invalid uuid", "value: {}", value);
        }
    }

    #[test]
    fn test_login_form_requires_uuid_key() {
        let form = LoginForm {
            api_key: Some(KEY.to_string()),
        };
        assert_eq!(form.into_api_key().unwrap(), KEY);

        let err = LoginForm { api_key: None }.into_api_key().unwrap_err();
        assert_eq!(message(err), "apiKey: Required");

        let err = LoginForm {
            api_key: Some("hunter2".to_string()),
        }
        .into_api_key()
        .unwrap_err();
        assert_eq!(message(err), "apiKey: Invalid uuid");
    }

    #[test]
    fn test_create_service_defaults_branch_and_environment() {
        let body: CreateServiceRequest =
            serde_json::from_value(json!({ "source": { "image": "nginx:latest" } })).unwrap();
        let project = Uuid::parse_str(KEY).unwrap();
        let input = body.into_input(project).unwrap();

        assert_eq!(input.project_id, KEY);
        assert_eq!(input.branch, None);
        assert_eq!(input.environment_id, None);
        assert_eq!(input.source, ServiceSourceInput::Image("nginx:latest".into()));
    }

    #[test]
    fn test_create_service_source_must_have_exactly_one_key() {
        let project = Uuid::parse_str(KEY).unwrap();

        let missing: CreateServiceRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(message(missing.into_input(project).unwrap_err()), "source: Required");

        let empty: CreateServiceRequest =
            serde_json::from_value(json!({ "source": {} })).unwrap();
        assert!(message(empty.into_input(project).unwrap_err()).starts_with("source:"));

        let both: CreateServiceRequest = serde_json::from_value(
            json!({ "source": { "repo": "acme/api", "image": "nginx" } }),
        )
        .unwrap();
        assert!(message(both.into_input(project).unwrap_err()).starts_with("source:"));
    }

    #[test]
    fn test_create_service_rejects_non_string_source() {
        let result: Result<CreateServiceRequest, _> =
            serde_json::from_value(json!({ "source": { "repo": 42 } }));
        assert!(result.is_err());
    }

    #[test]
    fn test_create_service_checks_environment_id() {
        let body: CreateServiceRequest = serde_json::from_value(json!({
            "environmentId": "prod",
            "source": { "repo": "acme/api" }
        }))
        .unwrap();
        let err = body.into_input(Uuid::parse_str(KEY).unwrap()).unwrap_err();
        assert_eq!(message(err), "environmentId: Invalid uuid");
    }

    #[test]
    fn test_delete_service_requires_environment_id() {
        let body: DeleteServiceRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(message(body.environment_id().unwrap_err()), "environmentId: Required");

        let body: DeleteServiceRequest =
            serde_json::from_value(json!({ "environmentId": KEY })).unwrap();
        assert_eq!(body.environment_id().unwrap().to_string(), KEY);
    }

    #[test]
    fn test_deploy_template_validates_each_service() {
        let service = json!({
            "id": KEY,
            "hasDomain": true,
            "isPrivate": false,
            "owner": "railwayapp",
            "name": "postgres",
            "serviceName": "Postgres",
            "template": "https://github.com/railwayapp-templates/postgres-ssl",
            "variables": { "PGPORT": "5432" }
        });
        let project = Uuid::parse_str(KEY).unwrap();

        let body: DeployTemplateRequest = serde_json::from_value(json!({
            "templateCode": "postgres",
            "services": [service.clone()]
        }))
        .unwrap();
        let input = body.into_input(project).unwrap();
        assert_eq!(input.template_code, "postgres");
        assert_eq!(input.services[0].variables["PGPORT"], "5432");

        let mut bad = service;
        bad["template"] = json!("not a url");
        let body: DeployTemplateRequest = serde_json::from_value(json!({
            "templateCode": "postgres",
            "services": [bad]
        }))
        .unwrap();
        assert_eq!(
            message(body.into_input(project).unwrap_err()),
            "services.0.template: Invalid url"
        );
    }
}

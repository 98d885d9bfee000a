//! Response shapes returned to the dashboard.
//!
//! Each route projects a fixed subset of the upstream payload. Connections
//! are flattened to their edge lists where the dashboard expects a list.

use serde::Serialize;

use crate::upstream::types::{
    Connection, CreatedProject, CreatedService, CreatedServiceInstance, Deployment, Edge,
    EnvironmentRef, Me, Project, ProjectService, ProjectSummary, Service, ServiceInstance,
    Template, TemplateDeployPayload,
};

/// `GET /sessions`
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: String,
    pub projects: Vec<Edge<ProjectSummary>>,
}

impl From<Me> for SessionView {
    fn from(me: Me) -> Self {
        Self {
            id: me.id,
            projects: me.projects.edges,
        }
    }
}

/// `POST /projects`
#[derive(Debug, Serialize)]
pub struct CreatedProjectView {
    pub id: String,
    pub name: String,
}

impl From<CreatedProject> for CreatedProjectView {
    fn from(project: CreatedProject) -> Self {
        Self {
            id: project.id,
            name: project.name,
        }
    }
}

/// `GET /projects/:id`
///
/// Services stay wrapped in their connection; environments are flattened.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub base_environment: Option<EnvironmentRef>,
    pub environments: Vec<Edge<EnvironmentRef>>,
    pub services: Connection<ProjectService>,
}

impl From<Project> for ProjectView {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            base_environment: project.base_environment,
            environments: project.environments.edges,
            services: project.services,
        }
    }
}

/// `POST /project/:id/services`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedServiceView {
    pub id: String,
    pub name: String,
    pub service_instances: Vec<Edge<CreatedServiceInstance>>,
}

impl From<CreatedService> for CreatedServiceView {
    fn from(service: CreatedService) -> Self {
        Self {
            id: service.id,
            name: service.name,
            service_instances: service.service_instances.edges,
        }
    }
}

/// `GET /services/:id`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceView {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub icon: Option<String>,
    pub service_instances: Vec<Edge<ServiceInstance>>,
    pub deployments: Vec<Edge<Deployment>>,
}

impl From<Service> for ServiceView {
    fn from(service: Service) -> Self {
        Self {
            id: service.id,
            name: service.name,
            created_at: service.created_at,
            icon: service.icon,
            service_instances: service.service_instances.edges,
            deployments: service.deployments.edges,
        }
    }
}

/// `POST /project/:id/deploy-template`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDeployView {
    pub project_id: String,
    pub workflow_id: Option<String>,
}

impl From<TemplateDeployPayload> for TemplateDeployView {
    fn from(payload: TemplateDeployPayload) -> Self {
        Self {
            project_id: payload.project_id,
            workflow_id: payload.workflow_id,
        }
    }
}

/// `GET /templates`
pub fn template_edges(templates: Connection<Template>) -> Vec<Edge<Template>> {
    templates.edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_view_drops_unselected_fields() {
        let upstream = json!({
            "id": "6a0f7e0c-5a4e-4f39-9f0e-1a2b3c4d5e6f",
            "name": "api",
            "description": null,
            "createdAt": "2024-01-01T00:00:00Z",
            "extraField": "should not leak",
            "baseEnvironment": { "id": "env-1", "name": "production" },
            "environments": { "edges": [ { "node": { "id": "env-1", "name": "production" } } ] },
            "services": { "edges": [] }
        });
        let project: Project = serde_json::from_value(upstream).unwrap();
        let view = serde_json::to_value(ProjectView::from(project)).unwrap();

        assert_eq!(
            view,
            json!({
                "id": "6a0f7e0c-5a4e-4f39-9f0e-1a2b3c4d5e6f",
                "name": "api",
                "description": null,
                "baseEnvironment": { "id": "env-1", "name": "production" },
                "environments": [ { "node": { "id": "env-1", "name": "production" } } ],
                "services": { "edges": [] }
            })
        );
    }

    #[test]
    fn test_session_view_flattens_projects() {
        let me: Me = serde_json::from_value(json!({
            "id": "user-1",
            "projects": { "edges": [ { "node": {
                "id": "p1",
                "name": "api",
                "description": "backend",
                "createdAt": "2024-01-01T00:00:00Z",
                "baseEnvironment": null,
                "environments": { "edges": [] },
                "services": { "edges": [] }
            } } ] }
        }))
        .unwrap();

        let view = serde_json::to_value(SessionView::from(me)).unwrap();
        assert_eq!(view["id"], "user-1");
        assert_eq!(view["projects"][0]["node"]["name"], "api");
        assert!(view["projects"].is_array());
    }

    #[test]
    fn test_created_project_view_is_id_and_name() {
        let view = CreatedProjectView::from(CreatedProject {
            id: "p1".into(),
            name: "silly-name".into(),
            created_at: "2024-01-01T00:00:00Z".into(),
            base_environment: None,
        });
        assert_eq!(
            serde_json::to_value(view).unwrap(),
            json!({ "id": "p1", "name": "silly-name" })
        );
    }

    #[test]
    fn test_template_deploy_view_keeps_null_workflow() {
        let view = TemplateDeployView::from(TemplateDeployPayload {
            project_id: "p1".into(),
            workflow_id: None,
        });
        assert_eq!(
            serde_json::to_value(view).unwrap(),
            json!({ "projectId": "p1", "workflowId": null })
        );
    }
}

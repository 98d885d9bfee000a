//! Named GraphQL operations forwarded to the platform API.
//!
//! Each route maps to exactly one of these. Multi-resource views (a project
//! with its environments, services and deployments) are a single document
//! with nested selections, never several round trips.

/// A named GraphQL document
#[derive(Debug, Clone, Copy)]
pub struct Operation {
    pub name: &'static str,
    pub document: &'static str,
}

pub const ME: Operation = Operation {
    name: "me",
    document: r#"query me {
  me {
    id
    projects {
      edges {
        node {
          id
          name
          description
          createdAt
          baseEnvironment { id name }
          environments { edges { node { id name } } }
          services { edges { node { id name } } }
        }
      }
    }
  }
}"#,
};

pub const GET_PROJECT: Operation = Operation {
    name: "getProject",
    document: r#"query getProject($id: String!) {
  project(id: $id) {
    id
    name
    description
    createdAt
    baseEnvironment { id name }
    environments { edges { node { id name } } }
    services {
      edges {
        node {
          id
          name
          icon
          createdAt
          serviceInstances {
            edges {
              node {
                createdAt
                domains {
                  customDomains { domain }
                  serviceDomains { domain }
                }
                source { repo image }
              }
            }
          }
          deployments {
            edges {
              node { id url staticUrl status createdAt }
            }
          }
        }
      }
    }
  }
}"#,
};

pub const GET_SERVICE: Operation = Operation {
    name: "getService",
    document: r#"query getService($id: String!) {
  service(id: $id) {
    id
    name
    icon
    createdAt
    serviceInstances {
      edges {
        node {
          id
          createdAt
          source { repo image }
        }
      }
    }
    deployments {
      edges {
        node {
          id
          url
          staticUrl
          status
          canRedeploy
          createdAt
          environment { id name }
        }
      }
    }
  }
}"#,
};

pub const LIST_GITHUB_REPOS: Operation = Operation {
    name: "listGithubRepos",
    document: r#"query listGithubRepos {
  githubRepos { id name fullName defaultBranch installationId }
}"#,
};

pub const GITHUB_WRITABLE_SCOPES: Operation = Operation {
    name: "githubWritableScopes",
    document: r#"query githubWritableScopes {
  githubWritableScopes
}"#,
};

pub const LIST_TEMPLATES: Operation = Operation {
    name: "listTemplates",
    document: r#"query listTemplates {
  templates {
    edges {
      node {
        id
        code
        metadata
        services { edges { node { id config } } }
      }
    }
  }
}"#,
};

pub const LIST_DEPLOYMENT_LOGS: Operation = Operation {
    name: "listDeploymentLogs",
    document: r#"query listDeploymentLogs($deploymentId: String!) {
  deploymentLogs(deploymentId: $deploymentId) {
    message
    severity
    timestamp
    tags { deploymentId deploymentInstanceId serviceId }
  }
}"#,
};

pub const PROJECT_CREATE: Operation = Operation {
    name: "projectCreate",
    document: r#"mutation projectCreate($input: ProjectCreateInput!) {
  projectCreate(input: $input) {
    id
    name
    createdAt
    baseEnvironment { id name }
  }
}"#,
};

pub const SERVICE_CREATE: Operation = Operation {
    name: "serviceCreate",
    document: r#"mutation serviceCreate($input: ServiceCreateInput!) {
  serviceCreate(input: $input) {
    id
    name
    createdAt
    serviceInstances {
      edges {
        node {
          id
          environmentId
          nixpacksPlan
          healthcheckPath
          healthcheckTimeout
          startCommand
          buildCommand
          builder
        }
      }
    }
  }
}"#,
};

pub const SERVICE_DELETE: Operation = Operation {
    name: "serviceDelete",
    document: r#"mutation serviceDelete($environmentId: String!, $id: String!) {
  serviceDelete(environmentId: $environmentId, id: $id)
}"#,
};

pub const DEPLOYMENT_REMOVE: Operation = Operation {
    name: "deploymentRemove",
    document: r#"mutation deploymentRemove($id: String!) {
  deploymentRemove(id: $id)
}"#,
};

pub const DEPLOYMENT_CANCEL: Operation = Operation {
    name: "deploymentCancel",
    document: r#"mutation deploymentCancel($id: String!) {
  deploymentCancel(id: $id)
}"#,
};

pub const DEPLOYMENT_RESTART: Operation = Operation {
    name: "deploymentRestart",
    document: r#"mutation deploymentRestart($id: String!) {
  deploymentRestart(id: $id)
}"#,
};

pub const TEMPLATE_DEPLOY: Operation = Operation {
    name: "templateDeploy",
    document: r#"mutation templateDeploy($input: TemplateDeployInput!) {
  templateDeploy(input: $input) {
    projectId
    workflowId
  }
}"#,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_names_match_operation_names() {
        let all = [
            ME,
            GET_PROJECT,
            GET_SERVICE,
            LIST_GITHUB_REPOS,
            GITHUB_WRITABLE_SCOPES,
            LIST_TEMPLATES,
            LIST_DEPLOYMENT_LOGS,
            PROJECT_CREATE,
            SERVICE_CREATE,
            SERVICE_DELETE,
            DEPLOYMENT_REMOVE,
            DEPLOYMENT_CANCEL,
            DEPLOYMENT_RESTART,
            TEMPLATE_DEPLOY,
        ];
        for op in all {
            let header = op.document.lines().next().unwrap();
            let declared = header
                .split_whitespace()
                .nth(1)
                .unwrap()
                .split(['(', '{'])
                .next()
                .unwrap();
            assert_eq!(declared, op.name, "document header: {}", header);
        }
    }
}

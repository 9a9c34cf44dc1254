//! Azure DevOps REST client.
//!
//! Every request carries HTTP Basic auth with an empty user name and the
//! personal access token as password, plus the fixed `api-version` query
//! parameter.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use kickoff_models::DevOpsConnection;
use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, trace, warn};
use url::Url;

use crate::api::DevOpsApi;
use crate::config::ClientConfig;
use crate::error::{DevOpsError, Result};
use crate::types::{
    build_push_request, build_work_item_patch, ClassificationNodeRequest, CreateProjectRequest,
    CreateRepositoryRequest, CreateTeamRequest, FileMap, GitRef, GitRepository, IdRef,
    IdResponse, ListResponse, Operation, OperationStatus, ProcessTemplate, RepositoryHandle,
    TeamFieldValuesPatch, TeamSettingsPatch, WorkItemField, WorkItemKind, WorkItemResponse,
};

const JSON_PATCH: &str = "application/json-patch+json";

/// HTTP client for one organization and credential.
#[derive(Clone)]
pub struct DevOpsClient {
    client: reqwest::Client,
    config: ClientConfig,
    organization: String,
    credential: String,
}

impl fmt::Debug for DevOpsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DevOpsClient")
            .field("base_url", &self.config.base_url)
            .field("organization", &self.organization)
            .finish_non_exhaustive()
    }
}

impl DevOpsClient {
    /// Creates a client with default configuration.
    pub fn new(organization: impl Into<String>, credential: impl Into<String>) -> Self {
        Self::with_config(organization, credential, ClientConfig::default())
    }

    /// Creates a client with the given configuration.
    pub fn with_config(
        organization: impl Into<String>,
        credential: impl Into<String>,
        config: ClientConfig,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            organization: organization.into(),
            credential: credential.into(),
        }
    }

    /// Creates a client for a wizard connection.
    pub fn from_connection(connection: &DevOpsConnection, config: ClientConfig) -> Self {
        Self::with_config(&connection.organization, &connection.credential, config)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ==================== Plumbing ====================

    /// `{base}/{org}/{segments...}?api-version=...`
    fn org_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url)?;
        url.path_segments_mut()
            .map_err(|_| {
                DevOpsError::Configuration(format!(
                    "base URL cannot carry a path: {}",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .push(&self.organization)
            .extend(segments);
        url.query_pairs_mut()
            .append_pair("api-version", &self.config.api_version);
        Ok(url)
    }

    /// `{base}/{org}/{project}/{segments...}?api-version=...`
    fn project_url(&self, project: &str, segments: &[&str]) -> Result<Url> {
        let mut all = Vec::with_capacity(segments.len() + 1);
        all.push(project);
        all.extend_from_slice(segments);
        self.org_url(&all)
    }

    /// Canonical URL of a work item, used in relation links.
    fn work_item_url(&self, project: &str, id: u64) -> Result<Url> {
        let id = id.to_string();
        let mut url = self.project_url(project, &["_apis", "wit", "workItems", &id])?;
        url.set_query(None);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        trace!(%method, %url, "sending request");
        self.client
            .request(method, url)
            .basic_auth("", Some(&self.credential))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.request(Method::GET, url).send().await?;
        parse_json(ensure_success(response).await?).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<reqwest::Response> {
        let response = self.request(method, url).json(body).send().await?;
        ensure_success(response).await
    }

    /// Connection probe: maps failures to `Unauthorized` / `Unreachable`.
    async fn probe(&self, url: Url) -> Result<()> {
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(|e| DevOpsError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(DevOpsError::Unauthorized {
                status: status.as_u16(),
                body,
            }),
            _ => Err(DevOpsError::Unreachable(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            ))),
        }
    }

    async fn list_repositories(&self, project: &str) -> Result<Vec<GitRepository>> {
        let url = self.project_url(project, &["_apis", "git", "repositories"])?;
        let list: ListResponse<GitRepository> = self.get_json(url).await?;
        Ok(list.value)
    }

    /// Refs of a repository. A failed lookup counts as no refs.
    async fn list_refs(&self, project: &str, repo_id: &str) -> Result<Vec<GitRef>> {
        let url = self.project_url(project, &["_apis", "git", "repositories", repo_id, "refs"])?;
        let response = self.request(Method::GET, url).send().await?;
        if !response.status().is_success() {
            warn!(
                repo_id = %repo_id,
                status = response.status().as_u16(),
                "could not read refs, treating repository as empty"
            );
            return Ok(Vec::new());
        }
        let list: ListResponse<GitRef> = parse_json(response).await?;
        Ok(list.value)
    }

    async fn create_repository(&self, project: &str, name: &str) -> Result<String> {
        let project_id = self.get_project_id(project).await?;
        let url = self.project_url(project, &["_apis", "git", "repositories"])?;
        let body = CreateRepositoryRequest {
            name: name.to_string(),
            project: IdRef { id: project_id },
        };
        let response = self.send_json(Method::POST, url, &body).await?;
        let created: IdResponse = parse_json(response).await?;
        info!(project = %project, repo = %name, repo_id = %created.id, "repository created");
        Ok(created.id)
    }

    /// Polls a long-running operation until it reaches a terminal state.
    async fn wait_for_operation(&self, operation_id: &str) -> Result<()> {
        let url = self.org_url(&["_apis", "operations", operation_id])?;
        let interval = self.config.poll_interval.max(Duration::from_millis(1));
        let mut waited = Duration::ZERO;

        while waited < self.config.poll_timeout {
            tokio::time::sleep(interval).await;
            waited += interval;

            let operation: Operation = self.get_json(url.clone()).await?;
            trace!(operation_id = %operation_id, status = operation.status.as_str(), "operation polled");

            match operation.status {
                OperationStatus::Succeeded => return Ok(()),
                OperationStatus::Failed | OperationStatus::Cancelled => {
                    return Err(DevOpsError::OperationFailed {
                        status: operation.status.as_str().to_string(),
                        detail: operation.detailed_message.unwrap_or_default(),
                    });
                }
                _ => {}
            }
        }

        Err(DevOpsError::OperationTimeout { waited })
    }

    async fn patch_team_settings<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> bool {
        match self.send_json(Method::PATCH, url, body).await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "team settings update skipped");
                false
            }
        }
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(DevOpsError::Http {
        status: status.as_u16(),
        body,
    })
}

async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

/// Case-insensitive name comparison.
fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Template matching `name`, else the first in the catalogue.
fn select_process_template<'a>(
    templates: &'a [ProcessTemplate],
    name: &str,
) -> Option<&'a ProcessTemplate> {
    templates
        .iter()
        .find(|t| same_name(&t.name, name))
        .or_else(|| templates.first())
}

#[async_trait]
impl DevOpsApi for DevOpsClient {
    async fn test_connection(&self, project: &str) -> Result<()> {
        let url = self.project_url(project, &["_apis", "wit", "workitemtypes"])?;
        self.probe(url).await
    }

    async fn test_org_connection(&self) -> Result<()> {
        let url = self.org_url(&["_apis", "projects"])?;
        self.probe(url).await
    }

    async fn resolve_process_template_id(&self, template_name: &str) -> Result<String> {
        let not_found = |reason: String| DevOpsError::ProcessTemplateNotFound {
            name: template_name.to_string(),
            reason,
        };

        let url = self.org_url(&["_apis", "process", "processes"])?;
        let list: ListResponse<ProcessTemplate> = self
            .get_json(url)
            .await
            .map_err(|e| not_found(e.to_string()))?;

        let template = select_process_template(&list.value, template_name)
            .ok_or_else(|| not_found("process catalogue is empty".to_string()))?;

        if !same_name(&template.name, template_name) {
            warn!(
                requested = %template_name,
                using = %template.name,
                "process template not found, falling back to first available"
            );
        }
        Ok(template.id.clone())
    }

    async fn create_project(
        &self,
        name: &str,
        description: &str,
        template_name: &str,
    ) -> Result<String> {
        let process_id = self.resolve_process_template_id(template_name).await?;

        info!(project = %name, template = %template_name, "creating project");
        let url = self.org_url(&["_apis", "projects"])?;
        let body = CreateProjectRequest::git(name, description, &process_id);
        let response = self.send_json(Method::POST, url, &body).await?;
        let operation: IdResponse = parse_json(response).await?;

        self.wait_for_operation(&operation.id).await?;
        self.get_project_id(name).await
    }

    async fn get_project_id(&self, name: &str) -> Result<String> {
        let url = self.org_url(&["_apis", "projects", name])?;
        let project: IdResponse = self.get_json(url).await?;
        Ok(project.id)
    }

    async fn get_or_create_repository(
        &self,
        project: &str,
        name: &str,
    ) -> Result<RepositoryHandle> {
        let repos = self.list_repositories(project).await?;
        if let Some(existing) = repos.into_iter().find(|r| same_name(&r.name, name)) {
            debug!(repo = %name, repo_id = %existing.id, "repository already exists");
            return Ok(RepositoryHandle::existing(existing.id));
        }
        let id = self.create_repository(project, name).await?;
        Ok(RepositoryHandle::created(id))
    }

    async fn get_default_repository_id(&self, project: &str) -> Result<String> {
        self.list_repositories(project)
            .await?
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| {
                DevOpsError::InvalidResponse(format!("project '{}' has no repositories", project))
            })
    }

    async fn resolve_repository_id_by_name(&self, project: &str, name: &str) -> Result<String> {
        self.list_repositories(project)
            .await?
            .into_iter()
            .find(|r| same_name(&r.name, name))
            .map(|r| r.id)
            .ok_or_else(|| DevOpsError::RepositoryNotFound {
                name: name.to_string(),
                project: project.to_string(),
            })
    }

    async fn push_files(&self, project: &str, repo_id: &str, files: &FileMap) -> Result<()> {
        let refs = self.list_refs(project, repo_id).await?;
        let push = build_push_request(&refs, files, &self.config.commit_comment);

        debug!(
            repo_id = %repo_id,
            branch = push.ref_updates.first().map(|r| r.name.as_str()).unwrap_or_default(),
            files = files.len(),
            "pushing files"
        );
        let url = self.project_url(project, &["_apis", "git", "repositories", repo_id, "pushes"])?;
        self.send_json(Method::POST, url, &push).await?;
        Ok(())
    }

    async fn create_area_path(&self, project: &str, name: &str) -> Result<()> {
        let url = self.project_url(project, &["_apis", "wit", "classificationnodes", "areas"])?;
        self.send_json(Method::POST, url, &ClassificationNodeRequest::named(name))
            .await?;
        Ok(())
    }

    async fn create_child_area_path(
        &self,
        project: &str,
        parent: &str,
        child: &str,
    ) -> Result<()> {
        let mut segments = vec!["_apis", "wit", "classificationnodes", "areas"];
        segments.extend(parent.split('\\').filter(|s| !s.is_empty()));
        let url = self.project_url(project, &segments)?;
        self.send_json(Method::POST, url, &ClassificationNodeRequest::named(child))
            .await?;
        Ok(())
    }

    async fn create_iteration(
        &self,
        project: &str,
        name: &str,
        start: Option<NaiveDate>,
        finish: Option<NaiveDate>,
    ) -> Result<()> {
        let url = self.project_url(
            project,
            &["_apis", "wit", "classificationnodes", "iterations"],
        )?;
        let body = ClassificationNodeRequest::iteration(name, start, finish);
        self.send_json(Method::POST, url, &body).await?;
        Ok(())
    }

    async fn create_team(&self, project: &str, name: &str, description: &str) -> Result<String> {
        let url = self.org_url(&["_apis", "projects", project, "teams"])?;
        let body = CreateTeamRequest {
            name: name.to_string(),
            description: description.to_string(),
        };
        let response = self.send_json(Method::POST, url, &body).await?;
        let team: IdResponse = parse_json(response).await?;
        Ok(team.id)
    }

    async fn set_team_area_path(&self, project: &str, team_id: &str, area_path: &str) -> bool {
        let Ok(url) = self.project_url(
            project,
            &[team_id, "_apis", "work", "teamsettings", "teamfieldvalues"],
        ) else {
            return false;
        };
        self.patch_team_settings(url, &TeamFieldValuesPatch::for_area(area_path))
            .await
    }

    async fn set_team_iterations(&self, project: &str, team_id: &str, iteration_id: &str) -> bool {
        let Ok(url) = self.project_url(project, &[team_id, "_apis", "work", "teamsettings"]) else {
            return false;
        };
        let body = TeamSettingsPatch {
            backlog_iteration: IdRef {
                id: iteration_id.to_string(),
            },
        };
        self.patch_team_settings(url, &body).await
    }

    async fn create_work_item(
        &self,
        project: &str,
        kind: WorkItemKind,
        fields: &[WorkItemField],
        parent_id: Option<u64>,
    ) -> Result<u64> {
        let type_segment = format!("${}", kind.as_str());
        let url = self.project_url(project, &["_apis", "wit", "workitems", &type_segment])?;
        let parent_url = parent_id
            .map(|id| self.work_item_url(project, id))
            .transpose()?;
        let patch = build_work_item_patch(
            fields,
            parent_url.as_ref().map(Url::as_str),
            &self.config.link_comment,
        );

        let response = self
            .request(Method::POST, url)
            .header(header::CONTENT_TYPE, JSON_PATCH)
            .body(serde_json::to_vec(&patch)?)
            .send()
            .await?;
        let created: WorkItemResponse = parse_json(ensure_success(response).await?).await?;
        trace!(kind = %kind, id = created.id, parent = ?parent_id, "work item created");
        Ok(created.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DEFAULT_BRANCH_REF, EMPTY_OBJECT_ID};
    use mockito::{Matcher, Mock, Server, ServerGuard};

    // base64(":pat")
    const AUTH: &str = "Basic OnBhdA==";

    fn client(server: &ServerGuard) -> DevOpsClient {
        let config = ClientConfig::new()
            .with_base_url(server.url())
            .with_poll_interval(Duration::from_millis(1))
            .with_poll_timeout(Duration::from_millis(20));
        DevOpsClient::with_config("org", "pat", config)
    }

    fn api_mock(server: &mut ServerGuard, method: &str, path: &str) -> Mock {
        server
            .mock(method, path)
            .match_query(Matcher::UrlEncoded("api-version".into(), "7.1".into()))
            .match_header("authorization", AUTH)
    }

    #[test]
    fn test_select_process_template() {
        let templates = vec![
            ProcessTemplate {
                id: "1".into(),
                name: "Agile".into(),
            },
            ProcessTemplate {
                id: "2".into(),
                name: "CMMI".into(),
            },
        ];
        assert_eq!(select_process_template(&templates, "cmmi").unwrap().id, "2");
        assert_eq!(select_process_template(&templates, "Scrum").unwrap().id, "1");
        assert!(select_process_template(&[], "CMMI").is_none());
    }

    #[test]
    fn test_urls() {
        let client = DevOpsClient::new("my org", "pat");
        let url = client
            .project_url("Acme Project", &["_apis", "wit", "workitems", "$Epic"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://dev.azure.com/my%20org/Acme%20Project/_apis/wit/workitems/$Epic?api-version=7.1"
        );

        let url = client.work_item_url("Acme", 42).unwrap();
        assert_eq!(
            url.as_str(),
            "https://dev.azure.com/my%20org/Acme/_apis/wit/workItems/42"
        );
    }

    #[test]
    fn test_debug_hides_credential() {
        let client = DevOpsClient::new("org", "very-secret");
        assert!(!format!("{:?}", client).contains("very-secret"));
    }

    #[tokio::test]
    async fn test_connection_ok() {
        let mut server = Server::new_async().await;
        let mock = api_mock(&mut server, "GET", "/org/Acme/_apis/wit/workitemtypes")
            .with_status(200)
            .with_body(r#"{"count": 0, "value": []}"#)
            .create_async()
            .await;

        client(&server).test_connection("Acme").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_unauthorized() {
        let mut server = Server::new_async().await;
        let _mock = api_mock(&mut server, "GET", "/org/_apis/projects")
            .with_status(401)
            .with_body("denied")
            .create_async()
            .await;

        let err = client(&server).test_org_connection().await.unwrap_err();
        assert!(matches!(err, DevOpsError::Unauthorized { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_connection_server_error_is_unreachable() {
        let mut server = Server::new_async().await;
        let _mock = api_mock(&mut server, "GET", "/org/_apis/projects")
            .with_status(503)
            .create_async()
            .await;

        let err = client(&server).test_org_connection().await.unwrap_err();
        assert!(matches!(err, DevOpsError::Unreachable(_)));
    }

    #[tokio::test]
    async fn test_process_template_empty_catalogue() {
        let mut server = Server::new_async().await;
        let _mock = api_mock(&mut server, "GET", "/org/_apis/process/processes")
            .with_status(200)
            .with_body(r#"{"value": []}"#)
            .create_async()
            .await;

        let err = client(&server)
            .resolve_process_template_id("CMMI")
            .await
            .unwrap_err();
        assert!(matches!(err, DevOpsError::ProcessTemplateNotFound { .. }));
    }

    #[tokio::test]
    async fn test_process_template_fallback() {
        let mut server = Server::new_async().await;
        let _mock = api_mock(&mut server, "GET", "/org/_apis/process/processes")
            .with_status(200)
            .with_body(r#"{"value": [{"id": "p-agile", "name": "Agile"}]}"#)
            .create_async()
            .await;

        let id = client(&server)
            .resolve_process_template_id("CMMI")
            .await
            .unwrap();
        assert_eq!(id, "p-agile");
    }

    async fn mock_project_creation(server: &mut ServerGuard, final_status: &str) -> Vec<Mock> {
        vec![
            api_mock(server, "GET", "/org/_apis/process/processes")
                .with_status(200)
                .with_body(r#"{"value": [{"id": "p-cmmi", "name": "CMMI"}]}"#)
                .create_async()
                .await,
            api_mock(server, "POST", "/org/_apis/projects")
                .match_body(Matcher::Regex(r#""templateTypeId":"p-cmmi""#.into()))
                .with_status(202)
                .with_body(r#"{"id": "op-1", "status": "notSet"}"#)
                .create_async()
                .await,
            api_mock(server, "GET", "/org/_apis/operations/op-1")
                .with_status(200)
                .with_body(format!(r#"{{"id": "op-1", "status": "{}"}}"#, final_status))
                .expect_at_least(1)
                .create_async()
                .await,
        ]
    }

    #[tokio::test]
    async fn test_create_project_waits_for_operation() {
        let mut server = Server::new_async().await;
        let _mocks = mock_project_creation(&mut server, "succeeded").await;
        let lookup = api_mock(&mut server, "GET", "/org/_apis/projects/Acme")
            .with_status(200)
            .with_body(r#"{"id": "proj-guid", "name": "Acme"}"#)
            .create_async()
            .await;

        let id = client(&server)
            .create_project("Acme", "Integration", "CMMI")
            .await
            .unwrap();
        assert_eq!(id, "proj-guid");
        lookup.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_project_operation_failed() {
        let mut server = Server::new_async().await;
        let _mocks = mock_project_creation(&mut server, "failed").await;

        let err = client(&server)
            .create_project("Acme", "Integration", "CMMI")
            .await
            .unwrap_err();
        assert!(matches!(err, DevOpsError::OperationFailed { ref status, .. } if status == "failed"));
    }

    #[tokio::test]
    async fn test_create_project_timeout() {
        let mut server = Server::new_async().await;
        let _mocks = mock_project_creation(&mut server, "inProgress").await;

        let err = client(&server)
            .create_project("Acme", "Integration", "CMMI")
            .await
            .unwrap_err();
        assert!(matches!(err, DevOpsError::OperationTimeout { .. }));
    }

    fn one_file() -> FileMap {
        let mut files = FileMap::new();
        files.insert("plan.txt".into(), b"hello".to_vec());
        files
    }

    #[tokio::test]
    async fn test_push_files_uses_existing_ref() {
        let mut server = Server::new_async().await;
        let _refs = api_mock(&mut server, "GET", "/org/Acme/_apis/git/repositories/r1/refs")
            .with_status(200)
            .with_body(r#"{"value": [{"name": "refs/heads/develop", "objectId": "abc123"}]}"#)
            .create_async()
            .await;
        let push = api_mock(&mut server, "POST", "/org/Acme/_apis/git/repositories/r1/pushes")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#""name":"refs/heads/develop""#.into()),
                Matcher::Regex(r#""oldObjectId":"abc123""#.into()),
                Matcher::Regex(r#""path":"/plan.txt""#.into()),
            ]))
            .with_status(201)
            .with_body("{}")
            .create_async()
            .await;

        client(&server)
            .push_files("Acme", "r1", &one_file())
            .await
            .unwrap();
        push.assert_async().await;
    }

    #[tokio::test]
    async fn test_push_files_to_empty_repository() {
        let mut server = Server::new_async().await;
        let _refs = api_mock(&mut server, "GET", "/org/Acme/_apis/git/repositories/r1/refs")
            .with_status(200)
            .with_body(r#"{"value": []}"#)
            .create_async()
            .await;
        let push = api_mock(&mut server, "POST", "/org/Acme/_apis/git/repositories/r1/pushes")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(format!(r#""name":"{}""#, DEFAULT_BRANCH_REF)),
                Matcher::Regex(format!(r#""oldObjectId":"{}""#, EMPTY_OBJECT_ID)),
            ]))
            .with_status(201)
            .with_body("{}")
            .create_async()
            .await;

        client(&server)
            .push_files("Acme", "r1", &one_file())
            .await
            .unwrap();
        push.assert_async().await;
    }

    #[tokio::test]
    async fn test_push_rejected() {
        let mut server = Server::new_async().await;
        let _refs = api_mock(&mut server, "GET", "/org/Acme/_apis/git/repositories/r1/refs")
            .with_status(200)
            .with_body(r#"{"value": []}"#)
            .create_async()
            .await;
        let _push = api_mock(&mut server, "POST", "/org/Acme/_apis/git/repositories/r1/pushes")
            .with_status(409)
            .with_body("stale ref")
            .create_async()
            .await;

        let err = client(&server)
            .push_files("Acme", "r1", &one_file())
            .await
            .unwrap_err();
        assert!(matches!(err, DevOpsError::Http { status: 409, .. }));
    }

    #[tokio::test]
    async fn test_resolve_repository_by_name() {
        let mut server = Server::new_async().await;
        let _repos = api_mock(&mut server, "GET", "/org/Acme/_apis/git/repositories")
            .with_status(200)
            .with_body(r#"{"value": [{"id": "r1", "name": "Acme"}, {"id": "r2", "name": "Docs"}]}"#)
            .expect(2)
            .create_async()
            .await;

        let client = client(&server);
        assert_eq!(
            client.resolve_repository_id_by_name("Acme", "docs").await.unwrap(),
            "r2"
        );
        let err = client
            .resolve_repository_id_by_name("Acme", "missing")
            .await
            .unwrap_err();
        assert!(matches!(err, DevOpsError::RepositoryNotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_or_create_repository_existing() {
        let mut server = Server::new_async().await;
        let _repos = api_mock(&mut server, "GET", "/org/Acme/_apis/git/repositories")
            .with_status(200)
            .with_body(r#"{"value": [{"id": "r2", "name": "Docs"}]}"#)
            .create_async()
            .await;
        let create = api_mock(&mut server, "POST", "/org/Acme/_apis/git/repositories")
            .expect(0)
            .create_async()
            .await;

        let repo = client(&server)
            .get_or_create_repository("Acme", "DOCS")
            .await
            .unwrap();
        assert_eq!(repo, RepositoryHandle::existing("r2"));
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_or_create_repository_creates() {
        let mut server = Server::new_async().await;
        let _repos = api_mock(&mut server, "GET", "/org/Acme/_apis/git/repositories")
            .with_status(200)
            .with_body(r#"{"value": [{"id": "r1", "name": "Acme"}]}"#)
            .create_async()
            .await;
        let _project = api_mock(&mut server, "GET", "/org/_apis/projects/Acme")
            .with_status(200)
            .with_body(r#"{"id": "proj-guid"}"#)
            .create_async()
            .await;
        let create = api_mock(&mut server, "POST", "/org/Acme/_apis/git/repositories")
            .match_body(Matcher::Regex(r#""project":\{"id":"proj-guid"\}"#.into()))
            .with_status(201)
            .with_body(r#"{"id": "r-new", "name": "Docs"}"#)
            .create_async()
            .await;

        let repo = client(&server)
            .get_or_create_repository("Acme", "Docs")
            .await
            .unwrap();
        assert_eq!(repo, RepositoryHandle::created("r-new"));
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_child_area_path() {
        let mut server = Server::new_async().await;
        let mock = api_mock(
            &mut server,
            "POST",
            "/org/Acme/_apis/wit/classificationnodes/areas/Customer",
        )
        .match_body(Matcher::Regex(r#""name":"Team""#.into()))
        .with_status(201)
        .with_body(r#"{"id": 5, "name": "Team"}"#)
        .create_async()
        .await;

        client(&server)
            .create_child_area_path("Acme", "Customer", "Team")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_iteration_with_dates() {
        let mut server = Server::new_async().await;
        let mock = api_mock(
            &mut server,
            "POST",
            "/org/Acme/_apis/wit/classificationnodes/iterations",
        )
        .match_body(Matcher::Regex(
            r#""startDate":"2024-01-01T00:00:00Z","finishDate":"2024-01-14T00:00:00Z""#.into(),
        ))
        .with_status(201)
        .with_body(r#"{"id": 7, "name": "Sprint 1"}"#)
        .create_async()
        .await;

        client(&server)
            .create_iteration(
                "Acme",
                "Sprint 1",
                NaiveDate::from_ymd_opt(2024, 1, 1),
                NaiveDate::from_ymd_opt(2024, 1, 14),
            )
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_team_settings_are_best_effort() {
        let mut server = Server::new_async().await;
        let _mock = api_mock(
            &mut server,
            "PATCH",
            "/org/Acme/t1/_apis/work/teamsettings/teamfieldvalues",
        )
        .with_status(400)
        .with_body("area path does not exist")
        .create_async()
        .await;

        let applied = client(&server)
            .set_team_area_path("Acme", "t1", "Acme\\Customer\\Team")
            .await;
        assert!(!applied);
    }

    #[tokio::test]
    async fn test_create_work_item_with_parent() {
        let mut server = Server::new_async().await;
        let mock = api_mock(&mut server, "POST", "/org/Acme/_apis/wit/workitems/$Task")
            .match_header("content-type", JSON_PATCH)
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#""path":"/fields/System.Title""#.into()),
                Matcher::Regex(r#""path":"/relations/-""#.into()),
                Matcher::Regex(r#"/org/Acme/_apis/wit/workItems/7""#.into()),
            ]))
            .with_status(200)
            .with_body(r#"{"id": 8, "rev": 1}"#)
            .create_async()
            .await;

        let fields = vec![WorkItemField::new("System.Title", "Write docs")];
        let id = client(&server)
            .create_work_item("Acme", WorkItemKind::Task, &fields, Some(7))
            .await
            .unwrap();
        assert_eq!(id, 8);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_work_item_http_error() {
        let mut server = Server::new_async().await;
        let _mock = api_mock(&mut server, "POST", "/org/Acme/_apis/wit/workitems/$Epic")
            .with_status(400)
            .with_body("TF401320: field missing")
            .create_async()
            .await;

        let err = client(&server)
            .create_work_item("Acme", WorkItemKind::Epic, &[], None)
            .await
            .unwrap_err();
        match err {
            DevOpsError::Http { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("TF401320"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

// ABOUTME: Project-scoped and global lookup endpoints of the Backlog API
// ABOUTME: Lists projects, users, statuses, issue types, milestones, categories and priorities

use crate::models::{Category, IssueType, Milestone, Priority, Project, Status, User};
use crate::transport::{path_segment, Params};
use crate::{BacklogClient, Result};

impl BacklogClient {
    pub async fn get_projects(&self) -> Result<Vec<Project>> {
        self.get("/projects", &Params::new()).await
    }

    /// Fetch a project by key (`PROJ`) or numeric ID
    pub async fn get_project(&self, project: &str) -> Result<Project> {
        let path = format!("/projects/{}", path_segment(project)?);
        self.get(&path, &Params::new()).await
    }

    pub async fn get_project_users(&self, project: &str) -> Result<Vec<User>> {
        let path = format!("/projects/{}/users", path_segment(project)?);
        self.get(&path, &Params::new()).await
    }

    pub async fn get_statuses(&self, project: &str) -> Result<Vec<Status>> {
        let path = format!("/projects/{}/statuses", path_segment(project)?);
        self.get(&path, &Params::new()).await
    }

    pub async fn get_issue_types(&self, project: &str) -> Result<Vec<IssueType>> {
        let path = format!("/projects/{}/issueTypes", path_segment(project)?);
        self.get(&path, &Params::new()).await
    }

    /// Milestones are called versions in the API paths
    pub async fn get_milestones(&self, project: &str) -> Result<Vec<Milestone>> {
        let path = format!("/projects/{}/versions", path_segment(project)?);
        self.get(&path, &Params::new()).await
    }

    pub async fn get_categories(&self, project: &str) -> Result<Vec<Category>> {
        let path = format!("/projects/{}/categories", path_segment(project)?);
        self.get(&path, &Params::new()).await
    }

    pub async fn get_priorities(&self) -> Result<Vec<Priority>> {
        self.get("/priorities", &Params::new()).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helpers::{
        mock_issue_types_response, mock_priorities_response, mock_project_response,
        mock_statuses_response, test_client,
    };
    use crate::BacklogError;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_get_project() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v2/projects/PROJ")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(mock_project_response().to_string())
            .create_async()
            .await;

        let client = test_client(&server);
        let project = client.get_project("PROJ").await.unwrap();

        assert_eq!(project.id, 1);
        assert_eq!(project.project_key, "PROJ");
    }

    #[tokio::test]
    async fn test_get_project_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v2/projects/NOPE")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(
                serde_json::json!({
                    "errors": [{"message": "No project.", "code": 6, "moreInfo": ""}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = test_client(&server);
        let result = client.get_project("NOPE").await;

        match result {
            Err(BacklogError::Api { message, code, .. }) => {
                assert_eq!(message, "No project.");
                assert_eq!(code, 6);
            }
            other => panic!("Expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_project_scoped_lists() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v2/projects/PROJ/statuses")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(mock_statuses_response().to_string())
            .create_async()
            .await;
        server
            .mock("GET", "/api/v2/projects/PROJ/issueTypes")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(mock_issue_types_response().to_string())
            .create_async()
            .await;
        let versions = server
            .mock("GET", "/api/v2/projects/PROJ/versions")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = test_client(&server);

        let statuses = client.get_statuses("PROJ").await.unwrap();
        assert_eq!(statuses.len(), 4);
        assert_eq!(statuses[0].name, "Open");

        let types = client.get_issue_types("PROJ").await.unwrap();
        assert_eq!(types[0].id, 10);

        assert!(client.get_milestones("PROJ").await.unwrap().is_empty());
        versions.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_priorities() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v2/priorities")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(mock_priorities_response().to_string())
            .create_async()
            .await;

        let client = test_client(&server);
        let priorities = client.get_priorities().await.unwrap();

        let names: Vec<&str> = priorities.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Normal", "Low"]);
    }

    #[tokio::test]
    async fn test_project_key_is_percent_encoded() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v2/projects/PROJ%3Fx%3D1/statuses")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(mock_statuses_response().to_string())
            .create_async()
            .await;

        let client = test_client(&server);
        assert_eq!(client.get_statuses("PROJ?x=1").await.unwrap().len(), 4);
        assert!(matches!(
            client.get_project(".").await,
            Err(BacklogError::InvalidInput { .. })
        ));

        mock.assert_async().await;
    }
}

// ABOUTME: Test helper utilities for mocking Backlog API responses and server
// ABOUTME: Provides mockito-based fixtures shared by the SDK unit tests

use mockito::ServerGuard;
use serde_json::json;

use crate::BacklogClient;

pub const TEST_API_KEY: &str = "test-api-key";

pub fn test_client(server: &ServerGuard) -> BacklogClient {
    BacklogClient::new(&server.url(), TEST_API_KEY).unwrap()
}

pub fn mock_error_response() -> serde_json::Value {
    json!({
        "errors": [
            {
                "message": "Authentication failure.",
                "code": 11,
                "moreInfo": "The API key is invalid."
            }
        ]
    })
}

pub fn mock_myself_response() -> serde_json::Value {
    json!({
        "id": 100,
        "userId": "tester",
        "name": "Test User",
        "mailAddress": "test@example.com"
    })
}

pub fn mock_project_response() -> serde_json::Value {
    json!({
        "id": 1,
        "projectKey": "PROJ",
        "name": "Main Project",
        "archived": false
    })
}

pub fn mock_projects_response() -> serde_json::Value {
    json!([
        mock_project_response(),
        {
            "id": 2,
            "projectKey": "WEB",
            "name": "Website",
            "archived": false
        }
    ])
}

pub fn mock_project_users_response() -> serde_json::Value {
    json!([
        {"id": 101, "userId": "alice", "name": "Alice"},
        {"id": 102, "userId": "bob", "name": "Bob"}
    ])
}

pub fn mock_statuses_response() -> serde_json::Value {
    json!([
        {"id": 1, "projectId": 1, "name": "Open", "color": "#ed8077"},
        {"id": 2, "projectId": 1, "name": "In Progress", "color": "#4488c5"},
        {"id": 3, "projectId": 1, "name": "Resolved", "color": "#5eb5a6"},
        {"id": 4, "projectId": 1, "name": "Closed", "color": "#b0be3c"}
    ])
}

pub fn mock_issue_types_response() -> serde_json::Value {
    json!([
        {"id": 10, "projectId": 1, "name": "Bug", "color": "#990000"},
        {"id": 11, "projectId": 1, "name": "Task", "color": "#7ea800"}
    ])
}

pub fn mock_priorities_response() -> serde_json::Value {
    json!([
        {"id": 3, "name": "High"},
        {"id": 2, "name": "Normal"},
        {"id": 4, "name": "Low"}
    ])
}

pub fn mock_issue_response() -> serde_json::Value {
    json!({
        "id": 1012,
        "projectId": 1,
        "issueKey": "PROJ-12",
        "summary": "Login button does nothing",
        "description": "Clicking the button has no effect.",
        "status": {"id": 2, "projectId": 1, "name": "In Progress"},
        "assignee": {"id": 101, "userId": "alice", "name": "Alice"},
        "priority": {"id": 2, "name": "Normal"},
        "issueType": {"id": 10, "projectId": 1, "name": "Bug"},
        "dueDate": "2025-12-31T00:00:00Z",
        "startDate": null,
        "milestone": [
            {"id": 7, "projectId": 1, "name": "v1.0", "releaseDueDate": null}
        ],
        "category": [],
        "createdUser": {"id": 100, "userId": "tester", "name": "Test User"},
        "created": "2025-01-10T09:00:00Z",
        "updated": "2025-01-11T10:30:00Z"
    })
}

pub fn mock_issues_response() -> serde_json::Value {
    json!([
        mock_issue_response(),
        {
            "id": 1013,
            "projectId": 1,
            "issueKey": "PROJ-13",
            "summary": "Add dark mode",
            "status": {"id": 1, "projectId": 1, "name": "Open"},
            "assignee": null,
            "priority": {"id": 4, "name": "Low"},
            "issueType": {"id": 11, "projectId": 1, "name": "Task"},
            "milestone": null,
            "category": null
        }
    ])
}

pub fn mock_comments_response() -> serde_json::Value {
    json!([
        {
            "id": 501,
            "content": "Looks good",
            "createdUser": {"id": 101, "userId": "alice", "name": "Alice"},
            "created": "2025-01-12T08:00:00Z",
            "changeLog": []
        },
        {
            "id": 502,
            "content": null,
            "createdUser": {"id": 100, "userId": "tester", "name": "Test User"},
            "created": "2025-01-13T08:00:00Z",
            "changeLog": [
                {"field": "status", "originalValue": "Open", "newValue": "Closed"}
            ]
        }
    ])
}

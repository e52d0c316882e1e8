// ABOUTME: User endpoints of the Backlog API
// ABOUTME: Fetches the authenticated user for login verification and "@me" filters

use crate::models::User;
use crate::transport::Params;
use crate::{BacklogClient, Result};

impl BacklogClient {
    /// The user that owns the API key
    pub async fn get_myself(&self) -> Result<User> {
        self.get("/users/myself", &Params::new()).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helpers::{mock_myself_response, test_client, TEST_API_KEY};
    use crate::BacklogError;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_get_myself() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v2/users/myself")
            .match_query(Matcher::UrlEncoded("apiKey".into(), TEST_API_KEY.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(mock_myself_response().to_string())
            .create_async()
            .await;

        let client = test_client(&server);
        let user = client.get_myself().await.unwrap();

        assert_eq!(user.id, 100);
        assert_eq!(user.name, "Test User");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_myself_unauthorized() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v2/users/myself")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let client = test_client(&server);
        let result = client.get_myself().await;

        assert!(matches!(result, Err(BacklogError::Status(401))));
    }
}

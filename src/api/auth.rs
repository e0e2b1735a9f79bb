use reqwest::Method;

use super::ApiClient;
use crate::error::ClientResult;
use crate::types::{AccessToken, Credentials, NewUser, User};

impl ApiClient {
    /// POST /register
    pub async fn register(&self, user: &NewUser) -> ClientResult<User> {
        let request = self.request(Method::POST, "/register")?.json(user);
        self.send(request).await
    }

    /// POST /login, form-encoded as the API's OAuth2 password flow expects
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<AccessToken> {
        let request = self.request(Method::POST, "/login")?.form(credentials);
        self.send(request).await
    }

    /// GET /users/me
    pub async fn current_user(&self) -> ClientResult<User> {
        let request = self.request(Method::GET, "/users/me")?;
        self.send(request).await
    }

    /// GET /users/me with a token that is not in the session yet
    pub async fn current_user_with(&self, token: &str) -> ClientResult<User> {
        let request = self.request_with_token(Method::GET, "/users/me", Some(token))?;
        self.send(request).await
    }
}

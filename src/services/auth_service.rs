use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::session::SharedSession;
use crate::types::{Credentials, NewUser, User};

pub const LOGIN_FAILED: &str = "Invalid username or password";
pub const REGISTER_FAILED: &str = "Registration failed. Please check your information.";

/// Login, logout and registration on top of the API client and session
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn session(&self) -> &SharedSession {
        self.api.session()
    }

    /// Exchange credentials for a token, then look up the user to learn the
    /// admin flag. The session is written once, after both calls succeed;
    /// on failure whatever session was there before is left alone.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<User> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };

        let token = self.api.login(&credentials).await?;
        let user = self.api.current_user_with(&token.access_token).await?;

        self.session().set_session(token.access_token, user.is_admin)?;
        tracing::info!(username = %user.username, is_admin = user.is_admin, "logged in");
        Ok(user)
    }

    pub fn logout(&self) -> ClientResult<()> {
        self.session().clear_session()?;
        tracing::info!("logged out");
        Ok(())
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, user: &NewUser) -> ClientResult<User> {
        let created = self.api.register(user).await?;
        tracing::info!(username = %created.username, "registered");
        Ok(created)
    }

    /// Current user for the stored token. A rejected token clears the session.
    pub async fn whoami(&self) -> ClientResult<User> {
        match self.api.current_user().await {
            Ok(user) => Ok(user),
            Err(e) if e.is_unauthorized() => {
                self.session().clear_session()?;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}

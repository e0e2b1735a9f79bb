use clap::Subcommand;
use serde_json::json;

use crate::auth::inspect_token;
use crate::cli::render;
use crate::cli::utils::{output_data, output_success, resolve_password};
use crate::cli::{Context, OutputFormat};
use crate::services::auth_service::{AuthService, LOGIN_FAILED, REGISTER_FAILED};
use crate::types::NewUser;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to the catalog API")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout and forget the stored token")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Show current user information")]
    Whoami,

    #[command(about = "Register new user")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },
}

pub async fn handle(cmd: AuthCommands, ctx: Context) -> anyhow::Result<()> {
    let output_format = ctx.output.clone();
    let service = AuthService::new(ctx.api);

    match cmd {
        AuthCommands::Login { username, password } => {
            let password = resolve_password(password, "Password: ")?;
            let user = service
                .login(&username, &password)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message(LOGIN_FAILED)))?;

            let role = if user.is_admin { " (admin)" } else { "" };
            output_success(
                &output_format,
                &format!("Logged in as {}{}", user.username, role),
                Some(json!({ "username": user.username, "is_admin": user.is_admin })),
            )
        }
        AuthCommands::Logout => {
            service.logout()?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => status(&service, &output_format),
        AuthCommands::Whoami => {
            let user = service.whoami().await.map_err(|e| {
                if e.is_unauthorized() {
                    anyhow::anyhow!("Not logged in or session expired. Run `watches auth login <username>`")
                } else {
                    anyhow::anyhow!(e)
                }
            })?;
            output_data(&output_format, &render::user_summary(&user), serde_json::to_value(&user)?)
        }
        AuthCommands::Register { username, email, password } => {
            let password = resolve_password(password, "Password: ")?;
            let new_user = NewUser { username, email, password };
            let user = service
                .register(&new_user)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message(REGISTER_FAILED)))?;

            output_success(
                &output_format,
                &format!("Registration successful! Please login as {}.", user.username),
                Some(serde_json::to_value(&user)?),
            )
        }
    }
}

fn status(service: &AuthService, output_format: &OutputFormat) -> anyhow::Result<()> {
    let session = service.session().snapshot();
    let Some(token) = session.token.filter(|t| !t.is_empty()) else {
        return output_data(
            output_format,
            "Not logged in",
            json!({ "authenticated": false }),
        );
    };

    // Expiry is informational; the API decides whether the token is still good
    let (username, expires_at, expired) = match inspect_token(&token) {
        Ok(claims) => (
            Some(claims.sub.clone()),
            claims.expires_at(),
            Some(claims.is_expired()),
        ),
        Err(e) => {
            tracing::debug!("could not read token claims: {}", e);
            (None, None, None)
        }
    };

    let mut lines = vec![format!(
        "Logged in as {}{}",
        username.as_deref().unwrap_or("unknown user"),
        if session.is_admin { " (admin)" } else { "" }
    )];
    if let Some(at) = expires_at {
        let state = if expired == Some(true) { "expired" } else { "expires" };
        lines.push(format!("Token {} at {}", state, at.to_rfc3339()));
    }

    output_data(
        output_format,
        &lines.join("\n"),
        json!({
            "authenticated": true,
            "is_admin": session.is_admin,
            "username": username,
            "expires_at": expires_at,
            "expired": expired,
        }),
    )
}

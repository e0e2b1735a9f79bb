use clap::Subcommand;
use serde_json::json;

use crate::cli::config::session_file;
use crate::cli::utils::{output_data, output_success};
use crate::cli::Context;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check that the catalog API answers")]
    Ping,

    #[command(about = "Show the API URL and where the session is stored")]
    Show,
}

pub async fn handle(cmd: ServerCommands, ctx: Context) -> anyhow::Result<()> {
    let output_format = ctx.output.clone();

    match cmd {
        ServerCommands::Ping => {
            let info = ctx.api.ping().await?;
            let status = info
                .get("status")
                .and_then(|s| s.as_str())
                .unwrap_or("up")
                .to_string();
            output_success(
                &output_format,
                &format!("{} is {}", ctx.api.base_url(), status),
                Some(info),
            )
        }
        ServerCommands::Show => {
            let session_path = session_file(&ctx.config)?;
            let text = format!(
                "API URL: {}\nSession: {}",
                ctx.api.base_url(),
                session_path.display()
            );
            output_data(
                &output_format,
                &text,
                json!({
                    "api_url": ctx.api.base_url().as_str(),
                    "session_file": session_path.display().to_string(),
                    "environment": ctx.config.environment,
                }),
            )
        }
    }
}

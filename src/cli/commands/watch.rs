use std::io::IsTerminal;

use clap::{Args, Subcommand};
use serde_json::json;

use crate::api::watches::Page;
use crate::api::{ApiClient, CatalogApi};
use crate::catalog::{CatalogViewModel, DraftField, EditTarget, Feedback};
use crate::cli::render;
use crate::cli::utils::{confirm, output_data, output_empty_collection, output_success};
use crate::cli::{Context, OutputFormat};
use crate::guard::{self, Decision, Route};
use crate::types::WatchId;

#[derive(Subcommand)]
pub enum WatchCommands {
    #[command(about = "List watches in the catalog")]
    List {
        #[arg(long, help = "Number of watches to skip")]
        skip: Option<u32>,
        #[arg(long, help = "Maximum number of watches to return")]
        limit: Option<u32>,
    },

    #[command(about = "Show a single watch")]
    Show {
        #[arg(help = "Watch ID")]
        id: WatchId,
    },

    #[command(about = "Add a watch to the catalog (admin)")]
    Create {
        #[command(flatten)]
        fields: WatchFields,
    },

    #[command(about = "Edit a watch; omitted fields keep their current value (admin)")]
    Update {
        #[arg(help = "Watch ID")]
        id: WatchId,
        #[command(flatten)]
        fields: WatchFields,
    },

    #[command(about = "Remove a watch from the catalog (admin)")]
    Delete {
        #[arg(help = "Watch ID")]
        id: WatchId,
        #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

/// Form fields as typed; parsing happens in the draft
#[derive(Args, Debug, Default)]
pub struct WatchFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, help = "Price in dollars, e.g. 4200.00")]
    pub price: Option<String>,
    #[arg(long)]
    pub image_url: Option<String>,
    #[arg(long)]
    pub stock: Option<String>,
}

impl WatchFields {
    fn entries(self) -> Vec<(DraftField, String)> {
        [
            (DraftField::Name, self.name),
            (DraftField::Brand, self.brand),
            (DraftField::Description, self.description),
            (DraftField::Price, self.price),
            (DraftField::ImageUrl, self.image_url),
            (DraftField::Stock, self.stock),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

pub async fn handle(cmd: WatchCommands, ctx: Context) -> anyhow::Result<()> {
    let output_format = ctx.output.clone();

    match cmd {
        WatchCommands::List { skip, limit } => {
            let watches = ctx
                .api
                .list_watches_page(Page { skip, limit })
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message(crate::catalog::LOAD_FAILED)))?;

            if watches.is_empty() {
                return output_empty_collection(
                    &output_format,
                    "watches",
                    "No watches available at the moment.",
                );
            }
            output_data(
                &output_format,
                &render::watch_table(&watches),
                serde_json::to_value(&watches)?,
            )
        }
        WatchCommands::Show { id } => {
            let watch = ctx.api.get_watch(id).await.map_err(fetch_error)?;
            output_data(
                &output_format,
                &render::watch_detail(&watch),
                serde_json::to_value(&watch)?,
            )
        }
        WatchCommands::Create { fields } => {
            require_admin(&ctx.api)?;
            let mut vm = CatalogViewModel::new(ctx.api.clone(), ctx.api.session().clone());

            vm.begin_create();
            for (field, value) in fields.entries() {
                vm.set_field(field, value);
            }
            let feedback = vm.submit().await;
            report_save(feedback, EditTarget::Create, &output_format)
        }
        WatchCommands::Update { id, fields } => {
            require_admin(&ctx.api)?;
            let mut vm = CatalogViewModel::new(ctx.api.clone(), ctx.api.session().clone());

            let current = vm.api().get_watch(id).await.map_err(fetch_error)?;
            vm.begin_edit(&current);
            for (field, value) in fields.entries() {
                vm.set_field(field, value);
            }
            let feedback = vm.submit().await;
            report_save(feedback, EditTarget::Update(id), &output_format)
        }
        WatchCommands::Delete { id, yes } => {
            require_admin(&ctx.api)?;
            let mut vm = CatalogViewModel::new(ctx.api.clone(), ctx.api.session().clone());

            let confirmed = confirm_delete(yes, std::io::stdin().is_terminal(), || {
                confirm("Are you sure you want to delete this watch?")
            })?;
            let feedback = vm.delete(id, confirmed).await;
            report_delete(feedback, &output_format)
        }
    }
}

/// Run the guard for the admin view before any mutation
fn require_admin(api: &ApiClient) -> anyhow::Result<()> {
    match guard::authorize(&api.session().snapshot(), Route::Admin) {
        Decision::Allow => Ok(()),
        Decision::Redirect(route) => Err(redirect_error(route)),
    }
}

fn fetch_error(e: crate::error::ClientError) -> anyhow::Error {
    if e.is_not_found() {
        anyhow::anyhow!("Watch not found")
    } else {
        anyhow::anyhow!(e)
    }
}

fn redirect_error(route: Route) -> anyhow::Error {
    match route {
        Route::Login => anyhow::anyhow!(
            "Not logged in or session expired. Run `watches auth login <username>`"
        ),
        _ => anyhow::anyhow!("Admin privileges required"),
    }
}

/// `--yes` skips the prompt; without it a terminal is needed to ask
fn confirm_delete(
    yes: bool,
    interactive: bool,
    ask: impl FnOnce() -> anyhow::Result<bool>,
) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }
    if !interactive {
        anyhow::bail!("Refusing to delete without --yes on a non-interactive terminal");
    }
    ask()
}

fn report_save(
    feedback: Feedback,
    target: EditTarget,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    match feedback {
        Feedback::Saved(watch) => {
            let message = match target {
                EditTarget::Create => format!("Watch created successfully! (id {})", watch.id),
                EditTarget::Update(_) => format!("Watch {} updated successfully!", watch.id),
            };
            output_success(output_format, &message, Some(serde_json::to_value(&watch)?))
        }
        other => report_failure(other),
    }
}

fn report_delete(feedback: Feedback, output_format: &OutputFormat) -> anyhow::Result<()> {
    match feedback {
        Feedback::Deleted(id) => output_success(
            output_format,
            "Watch deleted successfully!",
            Some(json!({ "id": id })),
        ),
        Feedback::Cancelled => output_success(output_format, "Delete cancelled", None),
        other => report_failure(other),
    }
}

fn report_failure(feedback: Feedback) -> anyhow::Result<()> {
    match feedback {
        Feedback::Invalid(message) | Feedback::Failed(message) => Err(anyhow::anyhow!(message)),
        Feedback::Redirect(route) => Err(redirect_error(route)),
        other => Err(anyhow::anyhow!("Unexpected result: {:?}", other)),
    }
}

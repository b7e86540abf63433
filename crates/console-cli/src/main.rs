use std::sync::Arc;

use anyhow::Context;
use backend_client::HttpBackend;
use clap::{Parser, Subcommand};
use console_core::{ConsoleConfig, TaxonomyKind};
use console_state::ConsoleSession;

mod commands;
mod confirm;
mod logging;
mod render;
mod resolve;

use commands::ProductFields;
use confirm::StdinConfirm;

#[derive(Parser)]
#[command(name = "x9x-console")]
#[command(about = "Operator console for the sales automation backend")]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides configuration)
    #[arg(long)]
    api_base: Option<String>,

    /// User id chat messages are sent as
    #[arg(long)]
    user_id: Option<String>,

    /// Answer yes to every confirmation
    #[arg(long, short)]
    yes: bool,

    /// Enable debug logging
    #[arg(long, short, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the backend is reachable
    Status,
    /// Send a single chat message
    Send {
        /// Message text
        message: String,
    },
    /// Start interactive chat
    Chat,
    /// List products
    Products,
    /// List categories or brands
    Taxonomy {
        /// category or brand
        kind: TaxonomyKind,
        /// Only show names containing this text
        #[arg(default_value = "")]
        filter: String,
    },
    /// View processed-message history
    History {
        /// Number of records to fetch
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Clear the backend conversation memory of the configured user
    ClearConversation,
    /// Create a product
    AddProduct {
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Edit a product
    EditProduct {
        /// Product id
        id: String,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    DeleteProduct {
        /// Product id
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.debug);

    let mut config = ConsoleConfig::load();
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }
    if let Some(user_id) = cli.user_id {
        config.user_id = user_id;
    }
    if let Commands::History { limit: Some(limit) } = &cli.command {
        config.history_limit = *limit;
    }
    tracing::debug!(?config, "Configuration loaded");

    let backend = HttpBackend::new(&config).context("failed to build backend client")?;
    let mut session = ConsoleSession::new(config, Arc::new(backend));
    let confirm = StdinConfirm::new(cli.yes);

    match cli.command {
        Commands::Status => commands::status(&mut session).await,
        Commands::Send { message } => commands::send(&mut session, &message).await,
        Commands::Chat => commands::chat(&mut session).await,
        Commands::Products => commands::products(&mut session).await,
        Commands::Taxonomy { kind, filter } => {
            commands::taxonomy(&mut session, kind, &filter).await
        }
        Commands::History { .. } => commands::history(&mut session).await,
        Commands::ClearConversation => commands::clear_conversation(&mut session, &confirm).await,
        Commands::AddProduct { fields } => {
            commands::add_product(&mut session, &fields, &confirm).await
        }
        Commands::EditProduct { id, fields } => {
            commands::edit_product(&mut session, &id, &fields, &confirm).await
        }
        Commands::DeleteProduct { id } => {
            commands::delete_product(&mut session, &id, &confirm).await
        }
    }
}

//! Command handlers. Each one drives the session the way the interactive
//! console would and prints the result.

use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use console_core::{Condition, EntryId, TaxonomyKind};
use console_state::{Confirm, ConsoleSession, SaveOutcome, Tab};
use tracing::debug;

use crate::render;
use crate::resolve::resolve_reference;

/// Product form inputs. Omitted flags leave the field as loaded.
#[derive(Args, Debug, Default)]
pub struct ProductFields {
    /// Product name
    #[arg(long)]
    pub name: Option<String>,
    /// Category name; created on confirmation when unknown, blank to clear
    #[arg(long)]
    pub category: Option<String>,
    /// Brand name; created on confirmation when unknown, blank to clear
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub price: Option<f64>,
    #[arg(long)]
    pub stock: Option<i64>,
    /// new, semi-new or used
    #[arg(long)]
    pub condition: Option<Condition>,
    #[arg(long)]
    pub description: Option<String>,
    /// Free-text specifications
    #[arg(long = "specs")]
    pub specifications: Option<String>,
}

pub async fn status(session: &mut ConsoleSession) -> Result<()> {
    let status = session.probe().await;
    render::print_status(&session.config().api_base, status);
    Ok(())
}

pub async fn send(session: &mut ConsoleSession, message: &str) -> Result<()> {
    match session.send_message(message).await? {
        Some(reply) => render::print_message(&reply),
        None => bail!("message is empty"),
    }
    Ok(())
}

pub async fn chat(session: &mut ConsoleSession) -> Result<()> {
    println!("{}", "Operator chat".cyan().bold());
    println!(
        "{}",
        format!(
            "Sending as {} via {}. /clear empties the screen log, /quit leaves",
            session.config().user_id,
            session.config().origin
        )
        .dimmed()
    );
    let status = session.probe().await;
    render::print_status(&session.config().api_base, status);
    println!();

    loop {
        print!("{} ", "You:".cyan().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        match input {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear_chat();
                println!("{}", "Log cleared".dimmed());
                continue;
            }
            "/status" => {
                let status = session.probe().await;
                render::print_status(&session.config().api_base, status);
                continue;
            }
            _ => {}
        }

        match session.send_message(input).await {
            Ok(Some(reply)) => render::print_message(&reply),
            Ok(None) => {}
            Err(e) => {
                println!("{}", format!("❌ {e}").red());
                println!("{}", "Use /status to check the backend again".dimmed());
            }
        }
    }

    println!("{}", "👋 Goodbye!".cyan());
    Ok(())
}

/// Load the products view, reporting reload failures without stopping.
async fn open_products(session: &mut ConsoleSession) {
    for failure in session.select_tab(Tab::Products).await {
        eprintln!("{}", format!("⚠ {failure}").yellow());
    }
}

pub async fn products(session: &mut ConsoleSession) -> Result<()> {
    open_products(session).await;
    if !session.catalog().is_loaded() {
        bail!("product list unavailable");
    }
    render::print_products(session.catalog().products(), session.cache());
    Ok(())
}

pub async fn taxonomy(session: &mut ConsoleSession, kind: TaxonomyKind, filter: &str) -> Result<()> {
    session.refresh_taxonomy(kind).await?;
    render::print_entries(kind, &session.cache().filter(kind, filter));
    Ok(())
}

pub async fn history(session: &mut ConsoleSession) -> Result<()> {
    session.select_tab(Tab::History).await;
    if !session.history().is_loaded() {
        bail!("history unavailable");
    }
    render::print_history(session.history().records());
    Ok(())
}

pub async fn clear_conversation(session: &mut ConsoleSession, confirm: &dyn Confirm) -> Result<()> {
    let user_id = session.config().user_id.clone();
    if !confirm
        .confirm(&format!("Clear the backend conversation memory of {user_id}?"))
        .await
    {
        return Ok(());
    }
    session.clear_conversation().await?;
    println!("{}", format!("Conversation of {user_id} cleared").green());
    Ok(())
}

async fn apply_fields(
    session: &mut ConsoleSession,
    fields: &ProductFields,
    confirm: &dyn Confirm,
) -> Result<()> {
    let lifecycle = session.draft_mut();
    if let Some(name) = &fields.name {
        lifecycle.set_name(name.as_str());
    }
    if let Some(price) = fields.price {
        lifecycle.set_price(price);
    }
    if let Some(stock) = fields.stock {
        lifecycle.set_stock(stock);
    }
    if let Some(condition) = fields.condition {
        lifecycle.set_condition(condition);
    }
    if let Some(description) = &fields.description {
        lifecycle.set_description(description.as_str());
    }
    if let Some(specifications) = &fields.specifications {
        lifecycle.set_specifications(specifications.as_str());
    }

    if let Some(text) = &fields.category {
        resolve_reference(session, TaxonomyKind::Category, text, confirm).await?;
    }
    if let Some(text) = &fields.brand {
        resolve_reference(session, TaxonomyKind::Brand, text, confirm).await?;
    }
    Ok(())
}

async fn save(session: &mut ConsoleSession) -> Result<()> {
    debug!(payload = ?session.draft().draft().to_payload(), "Submitting product");
    match session.save_draft().await? {
        SaveOutcome::Created(Some(id)) => println!("{} {}", "✅ Product created".green(), id),
        SaveOutcome::Created(None) => println!("{}", "✅ Product created".green()),
        SaveOutcome::Updated(id) => println!("{} {}", "✅ Product updated".green(), id),
        SaveOutcome::Discarded => bail!("the form changed while saving"),
    }
    Ok(())
}

pub async fn add_product(
    session: &mut ConsoleSession,
    fields: &ProductFields,
    confirm: &dyn Confirm,
) -> Result<()> {
    open_products(session).await;
    session.start_create();
    apply_fields(session, fields, confirm).await?;
    save(session).await
}

pub async fn edit_product(
    session: &mut ConsoleSession,
    id: &str,
    fields: &ProductFields,
    confirm: &dyn Confirm,
) -> Result<()> {
    open_products(session).await;
    session.start_edit(&EntryId::new(id)).await?;
    apply_fields(session, fields, confirm).await?;
    save(session).await
}

pub async fn delete_product(
    session: &mut ConsoleSession,
    id: &str,
    confirm: &dyn Confirm,
) -> Result<()> {
    open_products(session).await;
    if session.delete_product(&EntryId::new(id), confirm).await? {
        println!("{} {}", "🗑 Product deleted".green(), id);
    }
    Ok(())
}

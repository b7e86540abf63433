//! Terminal rendering of console state.

use colored::Colorize;
use console_core::{ChatMessage, HistoryRecord, MessageKind, Product, TaxonomyEntry, TaxonomyKind};
use console_state::{ConnectionStatus, ReferenceCache};

pub fn print_status(base_url: &str, status: ConnectionStatus) {
    match status {
        ConnectionStatus::Online => println!("{} {}", "● online".green().bold(), base_url.dimmed()),
        ConnectionStatus::Offline => println!("{} {}", "● offline".red().bold(), base_url.dimmed()),
    }
}

pub fn print_message(message: &ChatMessage) {
    let time = message.timestamp.format("%H:%M:%S").to_string();
    match message.kind {
        MessageKind::User => println!("{} {} {}", time.dimmed(), "You:".cyan().bold(), message.text),
        MessageKind::Bot => {
            println!("{} {} {}", time.dimmed(), "Bot:".green().bold(), message.text);
            if message.transfer_to_human {
                println!("{}", "  ↳ flagged for a human operator".yellow());
            }
        }
        MessageKind::Error => println!("{} {}", time.dimmed(), message.text.red()),
    }
}

fn reference_name(
    cache: &ReferenceCache,
    kind: TaxonomyKind,
    product: &Product,
) -> String {
    let (id, embedded) = match kind {
        TaxonomyKind::Category => (product.category_id.as_ref(), product.category_name.as_deref()),
        TaxonomyKind::Brand => (product.brand_id.as_ref(), product.brand_name.as_deref()),
    };
    id.and_then(|id| cache.lookup(kind, id))
        .or(embedded)
        .unwrap_or("-")
        .to_string()
}

pub fn print_products(products: &[Product], cache: &ReferenceCache) {
    if products.is_empty() {
        println!("{}", "No products".dimmed());
        return;
    }
    for product in products {
        let stock = if product.stock > 0 {
            format!("stock {}", product.stock).normal()
        } else {
            "out of stock".red()
        };
        println!(
            "{}  {}  {} / {}  R$ {:.2}  {}  {}",
            product.id.to_string().dimmed(),
            product.name.bold(),
            reference_name(cache, TaxonomyKind::Category, product),
            reference_name(cache, TaxonomyKind::Brand, product),
            product.price,
            stock,
            product.condition.label().dimmed()
        );
    }
}

pub fn print_entries(kind: TaxonomyKind, entries: &[&TaxonomyEntry]) {
    if entries.is_empty() {
        println!("{}", format!("No {kind} entries").dimmed());
        return;
    }
    for entry in entries {
        println!("{}  {}", entry.id.to_string().dimmed(), entry.name);
    }
}

pub fn print_history(records: &[HistoryRecord]) {
    if records.is_empty() {
        println!("{}", "No history".dimmed());
        return;
    }
    for record in records {
        let when = record.processed_at.as_deref().unwrap_or("-");
        let who = record.user_id.as_deref().unwrap_or("?");
        let origin = record.origin.as_deref().unwrap_or("?");
        println!("{} {}", when.dimmed(), format!("{who} via {origin}").cyan());
        println!("  {} {}", ">".cyan(), record.text);
        if let Some(response) = &record.response {
            println!("  {} {}", "<".green(), response);
        }
    }
}

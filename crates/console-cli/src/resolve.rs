//! Free-text taxonomy resolution for one-shot commands.

use anyhow::{bail, Result};
use colored::Colorize;
use console_core::{TaxonomyEntry, TaxonomyKind};
use console_state::{Confirm, ConsoleSession, CreateOutcome};

/// How typed text maps onto the cached entries of one kind.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Blank text: the reference is cleared.
    Clear,
    Select(TaxonomyEntry),
    Create,
    Ambiguous(Vec<TaxonomyEntry>),
}

/// Picks an entry among `candidates` for `text`. A case-insensitive exact
/// name wins; otherwise a single candidate is taken as is.
pub fn classify(text: &str, candidates: &[&TaxonomyEntry]) -> Resolution {
    let wanted = text.trim().to_lowercase();
    if wanted.is_empty() {
        return Resolution::Clear;
    }
    if let Some(exact) = candidates.iter().find(|e| e.name.trim().to_lowercase() == wanted) {
        return Resolution::Select((*exact).clone());
    }
    match candidates {
        [] => Resolution::Create,
        [only] => Resolution::Select((*only).clone()),
        many => Resolution::Ambiguous(many.iter().map(|e| (*e).clone()).collect()),
    }
}

/// Type `text` into the `kind` field of the session's draft and resolve it.
pub async fn resolve_reference(
    session: &mut ConsoleSession,
    kind: TaxonomyKind,
    text: &str,
    confirm: &dyn Confirm,
) -> Result<()> {
    let text = text.trim();
    session.query_changed(kind, text);
    let resolution = {
        let candidates = session
            .draft()
            .field(kind)
            .candidates(session.cache().entries(kind));
        classify(text, &candidates)
    };

    match resolution {
        Resolution::Clear => Ok(()),
        Resolution::Select(entry) => {
            session.select_entry(kind, &entry);
            println!("{} {kind} {}", "Using".dimmed(), entry.name.bold());
            Ok(())
        }
        Resolution::Create => match session.request_create(kind, confirm).await? {
            CreateOutcome::Created(entry) => {
                println!("{} {kind} {} ({})", "Created".green(), entry.name.bold(), entry.id);
                Ok(())
            }
            CreateOutcome::Declined => bail!("{kind} \"{}\" does not exist", text.trim()),
            CreateOutcome::Discarded(entry) => {
                bail!("{kind} \"{}\" was created but the form changed meanwhile", entry.name)
            }
        },
        Resolution::Ambiguous(entries) => {
            println!("{}", format!("Several {kind} entries match \"{text}\":").yellow());
            for entry in &entries {
                println!("  {}  {}", entry.id.to_string().dimmed(), entry.name);
            }
            bail!("{kind} \"{}\" is ambiguous", text.trim())
        }
    }
}

use super::console::Console;
use crate::core::export::export_records;
use crate::core::finder::DomainFinder;
use crate::core::single::SingleSession;
use crate::domain::model::ResolutionRecord;
use crate::domain::ports::{SearchProvider, Storage};
use crate::utils::error::{FinderError, Result};
use std::io::{BufRead, Write};

/// What the user typed at a selection prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SelectInput {
    Confirm,
    Index(usize),
    Quit,
    Unknown(String),
}

fn parse_select_input(line: &str) -> SelectInput {
    match line.trim().to_lowercase().as_str() {
        "" => SelectInput::Confirm,
        "q" | "quit" => SelectInput::Quit,
        other => other
            .parse::<usize>()
            .map(SelectInput::Index)
            .unwrap_or_else(|_| SelectInput::Unknown(other.to_string())),
    }
}

/// Single company lookup: search, show candidates, let the user pick (or use
/// `preselect`), then export one row to `filename`.
///
/// Returns `None` when nothing was exported: blank name, no results, or the
/// user quit before confirming.
pub async fn run_single<P, S, R, W>(
    finder: &DomainFinder<P>,
    storage: &S,
    console: &mut Console<R, W>,
    company_name: &str,
    preselect: Option<usize>,
    filename: &str,
) -> Result<Option<ResolutionRecord>>
where
    P: SearchProvider,
    S: Storage,
    R: BufRead,
    W: Write,
{
    let mut session = SingleSession::new();

    let company_name = company_name.trim();
    if company_name.is_empty() {
        console.say("Please enter a company name.")?;
        return Ok(None);
    }

    console.say(format!("🔍 Searching: {}", company_name))?;
    if !session.on_search(finder, company_name).await? {
        return Ok(None);
    }

    let Some(candidates) = session.candidates() else {
        return Ok(None);
    };
    console.show_candidates(candidates)?;
    let Some(last_index) = candidates.last_index() else {
        console.say("⚠️  No candidate domains to choose from.")?;
        return Ok(None);
    };

    let record = match preselect {
        Some(index) => session.on_select(index)?,
        None => {
            let mut current: Option<ResolutionRecord> = None;
            loop {
                let message = match &current {
                    None => format!("Select the correct domain [0-{}] (Enter = 0, q = quit): ", last_index),
                    Some(record) => format!(
                        "Selected {}. Enter = save, [0-{}] = change, q = quit: ",
                        record.selected_domain(),
                        last_index
                    ),
                };

                let Some(line) = console.prompt(&message)? else {
                    return Ok(None);
                };

                let index = match parse_select_input(&line) {
                    SelectInput::Quit => return Ok(None),
                    SelectInput::Confirm => match current.take() {
                        Some(record) => break record,
                        None => 0,
                    },
                    SelectInput::Index(index) => index,
                    SelectInput::Unknown(text) => {
                        console.say(format!("⚠️  Unrecognised input: '{}'", text))?;
                        continue;
                    }
                };

                match session.on_select(index) {
                    Ok(record) => current = Some(record),
                    Err(e @ FinderError::SelectionOutOfRange { .. }) => {
                        console.say(format!("⚠️  {}", e.user_friendly_message()))?;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    };

    console.say(format!("Selected Domain: {}", record.selected_domain()))?;
    let path = export_records(storage, filename, std::slice::from_ref(&record)).await?;
    console.say(format!("📁 Result saved to: {}", path))?;

    Ok(Some(record))
}

use super::console::Console;
use crate::core::bulk::BulkSession;
use crate::core::export::export_records;
use crate::core::finder::DomainFinder;
use crate::domain::model::{Candidates, ResolutionRecord};
use crate::domain::ports::{SearchProvider, Storage};
use crate::utils::error::{FinderError, Result};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
enum BulkInput {
    Select(usize),
    Advance,
    Skip,
    Retry,
    Quit,
    Unknown(String),
}

fn parse_bulk_input(line: &str) -> BulkInput {
    match line.trim().to_lowercase().as_str() {
        "" | "n" | "next" => BulkInput::Advance,
        "s" | "skip" => BulkInput::Skip,
        "r" | "retry" => BulkInput::Retry,
        "q" | "quit" => BulkInput::Quit,
        other => other
            .parse::<usize>()
            .map(BulkInput::Select)
            .unwrap_or_else(|_| BulkInput::Unknown(other.to_string())),
    }
}

/// Result of a bulk run. `completed` is false when the user quit early; the
/// records collected up to that point are still exported.
#[derive(Debug, Clone)]
pub struct BulkOutcome {
    pub records: Vec<ResolutionRecord>,
    pub skipped: Vec<String>,
    pub completed: bool,
    pub export_path: String,
}

enum Step {
    Next,
    Stay,
    Quit,
}

/// Walks every company name in order. Each name starts with candidate 0
/// pre-selected; Enter records it and moves on.
pub async fn run_bulk<P, S, R, W>(
    finder: &DomainFinder<P>,
    storage: &S,
    console: &mut Console<R, W>,
    names: Vec<String>,
    filename: &str,
) -> Result<BulkOutcome>
where
    P: SearchProvider,
    S: Storage,
    R: BufRead,
    W: Write,
{
    let total = names.len();
    let mut session = BulkSession::new(names);
    tracing::info!("🚀 Starting bulk resolution for {} companies", total);

    'names: while !session.is_completed() {
        let name = session.current_name().unwrap_or_default().to_string();
        console.say(format!(
            "\n🔍 Searching: {} ({}/{})",
            name,
            session.position() + 1,
            total
        ))?;

        let entered = session.on_enter(finder).await.map(|c| c.cloned());
        let candidates = match entered {
            Ok(Some(candidates)) => candidates,
            Ok(None) => break,
            Err(e @ FinderError::SearchUnavailable { .. }) => {
                tracing::error!("❌ Search failed for '{}': {}", name, e);
                console.say(format!("❌ {}", e.user_friendly_message()))?;
                match after_failed_search(&mut session, console)? {
                    Step::Quit => break 'names,
                    Step::Next | Step::Stay => continue 'names,
                }
            }
            Err(e) => return Err(e),
        };

        console.show_candidates(&candidates)?;
        if !candidates.is_no_results() {
            session.on_select(0)?;
        }

        loop {
            match select_step(&mut session, console, &candidates)? {
                Step::Next => break,
                Step::Stay => continue,
                Step::Quit => break 'names,
            }
        }
    }

    let completed = session.is_completed();
    if completed {
        console.say("\n🎉 All companies processed!")?;
        console.show_records(session.records())?;
    } else {
        tracing::warn!(
            "⚠️  Stopped at {}/{}; exporting partial results",
            session.position(),
            total
        );
    }

    let skipped = session.skipped().to_vec();
    let records = session.into_records();
    let export_path = export_records(storage, filename, &records).await?;
    console.say(format!(
        "📁 {} result(s) saved to: {}",
        records.len(),
        export_path
    ))?;

    Ok(BulkOutcome {
        records,
        skipped,
        completed,
        export_path,
    })
}

fn after_failed_search<R: BufRead, W: Write>(
    session: &mut BulkSession,
    console: &mut Console<R, W>,
) -> Result<Step> {
    loop {
        let Some(line) = console.prompt("r = retry, s = skip, q = quit: ")? else {
            return Ok(Step::Quit);
        };
        match parse_bulk_input(&line) {
            BulkInput::Retry => return Ok(Step::Stay),
            BulkInput::Skip => {
                session.on_skip()?;
                return Ok(Step::Next);
            }
            BulkInput::Quit => return Ok(Step::Quit),
            _ => console.say("⚠️  Please answer r, s or q.")?,
        }
    }
}

fn select_step<R: BufRead, W: Write>(
    session: &mut BulkSession,
    console: &mut Console<R, W>,
    candidates: &Candidates,
) -> Result<Step> {
    let message = match candidates.last_index() {
        None => "Nothing to select. s = skip, q = quit: ".to_string(),
        Some(last_index) => format!(
            "Select [0-{}] (current: {}), Enter = next, s = skip, q = quit: ",
            last_index,
            session
                .selected()
                .and_then(|index| candidates.get(index))
                .unwrap_or("-")
        ),
    };

    let Some(line) = console.prompt(&message)? else {
        return Ok(Step::Quit);
    };

    match parse_bulk_input(&line) {
        BulkInput::Quit => Ok(Step::Quit),
        BulkInput::Skip => {
            session.on_skip()?;
            Ok(Step::Next)
        }
        BulkInput::Select(index) => {
            match session.on_select(index) {
                Ok(domain) => {
                    let domain = domain.to_string();
                    console.say(format!("Selected: {}", domain))?;
                }
                Err(e) => console.say(format!("⚠️  {}", e.user_friendly_message()))?,
            }
            Ok(Step::Stay)
        }
        BulkInput::Advance => match session.on_advance() {
            Ok(_) => Ok(Step::Next),
            Err(e @ FinderError::NoValidSelection { .. }) => {
                console.say(format!("⚠️  {}", e.user_friendly_message()))?;
                Ok(Step::Stay)
            }
            Err(e) => Err(e),
        },
        BulkInput::Retry => {
            console.say("Candidates are already loaded for this company.")?;
            Ok(Step::Stay)
        }
        BulkInput::Unknown(text) => {
            console.say(format!("⚠️  Unrecognised input: '{}'", text))?;
            Ok(Step::Stay)
        }
    }
}

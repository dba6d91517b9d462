use crate::domain::model::{Candidates, ResolutionRecord, COMPANY_NAME_COLUMN, SELECTED_DOMAIN_COLUMN};
use crate::utils::error::Result;
use std::fmt::Display;
use std::io::{BufRead, Stdout, StdinLock, Write};

/// Line-oriented terminal I/O. Generic over reader/writer so flows can be
/// driven from a script in tests.
pub struct Console<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl Console<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Prints the prompt and reads one line. `None` means end of input.
    pub fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn show_candidates(&mut self, candidates: &Candidates) -> Result<()> {
        writeln!(self.output, "{:<6} Domain", "Index")?;
        if candidates.is_no_results() {
            for value in candidates.display_values() {
                writeln!(self.output, "{:<6} {}", "-", value)?;
            }
            return Ok(());
        }

        for (index, domain) in candidates.domains().iter().enumerate() {
            writeln!(self.output, "{:<6} {}", index, domain)?;
        }
        Ok(())
    }

    pub fn show_records(&mut self, records: &[ResolutionRecord]) -> Result<()> {
        let width = records
            .iter()
            .map(|record| record.company_name().chars().count())
            .max()
            .unwrap_or(0)
            .max(COMPANY_NAME_COLUMN.len());

        writeln!(
            self.output,
            "{:<width$}  {}",
            COMPANY_NAME_COLUMN,
            SELECTED_DOMAIN_COLUMN,
            width = width
        )?;
        for record in records {
            writeln!(
                self.output,
                "{:<width$}  {}",
                record.company_name(),
                record.selected_domain(),
                width = width
            )?;
        }
        Ok(())
    }
}

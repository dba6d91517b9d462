use crate::domain::model::COMPANY_NAME_COLUMN;
use crate::utils::error::{FinderError, Result};
use crate::utils::validation::validate_extension;
use calamine::{open_workbook_auto, Reader};
use std::io::Read;
use std::path::Path;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv", "tsv"];

/// Reads the `Company Name` column, in row order. Excel workbooks use their
/// first sheet; CSV/TSV files are read as text.
pub fn load_company_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let source = path.display().to_string();
    validate_extension("bulk.input", &source, SUPPORTED_EXTENSIONS)?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let names = match extension.as_str() {
        "xlsx" | "xls" => read_workbook_names(path, &source)?,
        "tsv" => read_company_names(std::fs::File::open(path)?, b'\t', &source)?,
        _ => read_company_names(std::fs::File::open(path)?, b',', &source)?,
    };

    tracing::info!("📂 Loaded {} company name(s) from {}", names.len(), source);
    Ok(names)
}

pub fn read_company_names<R: Read>(reader: R, delimiter: u8, source: &str) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let column = company_column(&headers, source)?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        rows.push(record?.get(column).map(str::to_string));
    }

    Ok(collect_names(rows, source))
}

fn read_workbook_names(path: &Path, source: &str) -> Result<Vec<String>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| FinderError::MissingColumn {
            column: COMPANY_NAME_COLUMN.to_string(),
            path: source.to_string(),
        })??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .unwrap_or_default();
    let column = company_column(&headers, source)?;

    let cells = rows.map(|row| row.get(column).map(|cell| cell.to_string()));
    Ok(collect_names(cells, source))
}

fn company_column(headers: &[String], source: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header.trim() == COMPANY_NAME_COLUMN)
        .ok_or_else(|| FinderError::MissingColumn {
            column: COMPANY_NAME_COLUMN.to_string(),
            path: source.to_string(),
        })
}

fn collect_names<I>(cells: I, source: &str) -> Vec<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    let mut names = Vec::new();
    for (row, cell) in cells.into_iter().enumerate() {
        match cell.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => names.push(name.to_string()),
            _ => {
                // 標題列是第 1 列
                tracing::warn!("Skipping row {} of {}: empty company name", row + 2, source)
            }
        }
    }
    names
}

// Adapters layer: concrete implementations for external systems (search providers, spreadsheet input).

pub mod search;
pub mod spreadsheet;

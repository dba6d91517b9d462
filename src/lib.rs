pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, FinderSettings};

pub use core::{
    bulk::BulkSession, extract::extract_domain, finder::DomainFinder, single::SingleSession,
};
pub use utils::error::{FinderError, Result};

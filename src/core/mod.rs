pub mod bulk;
pub mod export;
pub mod extract;
pub mod finder;
pub mod single;

pub use crate::domain::model::{Candidates, ResolutionRecord};
pub use crate::domain::ports::{ConfigProvider, SearchProvider, Storage};
pub use crate::utils::error::Result;

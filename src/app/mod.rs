pub mod bulk;
pub mod console;
pub mod single;

pub use bulk::{run_bulk, BulkOutcome};
pub use console::Console;
pub use single::run_single;

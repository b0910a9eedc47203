pub mod error;
pub mod report;
pub mod reporter;
pub mod screenshot;
pub mod testrail;
pub mod utils;

// Re-export common items
pub use report::load_report;
pub use reporter::{Reporter, RunSummary};
pub use utils::config::Config;

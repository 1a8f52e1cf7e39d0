//! Output module for persisting scrape results
//!
//! This module handles:
//! - Writing one CSV export per category
//! - Saving cover images next to the exports
//! - Recording run statistics for progress reporting

mod assets;
mod naming;
pub mod stats;
mod table;

pub use assets::AssetWriter;
pub use naming::file_stem;
pub use stats::{print_report, FailedCategory, RunReport};
pub use table::{read_table, TableWriter, HEADERS};

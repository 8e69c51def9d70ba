//! Filter catalog and the text patcher that applies filters

pub mod catalog;
pub mod patcher;

pub use catalog::FilterCatalog;
pub use patcher::{add_filter, clear_all_filters, remove_filter, toggle_filter};

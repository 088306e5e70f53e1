//! Taskly Common - Shared constants and utilities for the Taskly workspace
//!
//! # Examples
//!
//! ```
//! use taskly_common::{DEFAULT_ITEMS_PER_PAGE, get_default_database_path, truncate_string};
//!
//! assert_eq!(DEFAULT_ITEMS_PER_PAGE, 50);
//!
//! let path = get_default_database_path();
//! assert!(!path.to_string_lossy().is_empty());
//!
//! let truncated = truncate_string("hello world", 5);
//! assert_eq!(truncated, "he...");
//! ```

pub mod constants;
pub mod utils;

pub use constants::*;
pub use utils::*;

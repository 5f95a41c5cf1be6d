//! onepager CLI - Command-line interface library
//!
//! - Check: evaluate a single one-pager file
//! - Validate: evaluate and report an employee's newest one-pager from the
//!   local data directory
//! - Show: print the stored result of an employee
//!
//! # Binary Usage
//!
//! ```bash
//! # Check a single file
//! onepager check "Mustermann, Max_DE_240131.pptx"
//!
//! # Validate all employees below the configured data directory
//! onepager validate --all --format json
//!
//! # Show the stored findings of an employee
//! onepager show 4711
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{check_command, show_command, validate_command};
pub use app::{run_cli, EmployeeSummary, OutputFormat};

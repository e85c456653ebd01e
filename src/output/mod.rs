//! Output formatting module
//!
//! Provides two output formats:
//! - Rich terminal output with colors
//! - JSON export

pub mod json;
pub mod terminal;

pub use json::{print_json, print_pins_json, JsonOutput};
pub use terminal::{
    print_error, print_evaluation, print_header, print_info, print_pins, print_result,
    print_success, print_warning,
};

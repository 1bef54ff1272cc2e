//! User-facing output.
//!
//! Standard output carries each command's product (a version string, a
//! description, a metadata document). Everything addressed to the person
//! running the command goes to standard error.

use console::style;

use crate::warning::Warning;

/// Print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("error:").red().bold(), message);
}

/// Print a status message with a yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Print a non-fatal warning.
pub fn display_warning(warning: &Warning) {
    eprintln!("{} {}", style("warning:").yellow().bold(), warning);
}

/// Print every warning in order.
pub fn display_warnings(warnings: &[Warning]) {
    for warning in warnings {
        display_warning(warning);
    }
}

//! Formatting utilities for CLI output.
//!
//! Provides consistent formatting for stored values and styled help text.

use serde_json::Value;

/// ANSI color codes for terminal output
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold text
    pub const BOLD: &'static str = "\x1b[1m";
    /// Dim text
    pub const DIM: &'static str = "\x1b[2m";

    /// Red color
    pub const RED: &'static str = "\x1b[31m";
    /// Green color
    pub const GREEN: &'static str = "\x1b[32m";
    /// Blue color
    pub const BLUE: &'static str = "\x1b[34m";
    /// Cyan color
    pub const CYAN: &'static str = "\x1b[36m";
}

/// Formats section headers with styling
pub fn format_header(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::CYAN, text, Colors::RESET)
}

/// Formats command names with styling
pub fn format_command(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::GREEN, text, Colors::RESET)
}

/// Formats category names with styling
pub fn format_category(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::BLUE, text, Colors::RESET)
}

/// Formats usage examples with muted styling
pub fn format_usage(text: &str) -> String {
    format!("{}{}{}", Colors::DIM, text, Colors::RESET)
}

/// Formats error messages with red styling
pub fn format_error(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::RED, text, Colors::RESET)
}

/// Formats a stored value for CLI output.
///
/// Values are printed as compact JSON; keys that are not stored print as
/// `<unset>`.
///
/// # Examples
///
/// ```
/// use jsonfile_store::cli::formatting::format_json_value;
/// use serde_json::json;
///
/// assert_eq!(format_json_value(Some(&json!("hello"))), "\"hello\"");
/// assert_eq!(format_json_value(Some(&json!([1, 2]))), "[1,2]");
/// assert_eq!(format_json_value(None), "<unset>");
/// ```
pub fn format_json_value(value: Option<&Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "<unset>".to_string(),
    }
}

/// Formats the list of categories and commands for the help output
pub fn format_command_list(categories: &[(String, Vec<String>)]) -> String {
    let mut out = format_header("Usage: jsonstore <category> <command> [args]");
    out.push('\n');

    for (category, commands) in categories {
        out.push_str(&format!("\n  {}\n", format_category(category)));
        for command in commands {
            out.push_str(&format!(
                "    {} {}\n",
                format_command(command),
                format_usage(&format!("jsonstore {category} {command}"))
            ));
        }
    }

    out
}

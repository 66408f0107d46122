//! Display utilities for the cardlab CLI

use std::fmt::Display;
use std::time::Duration;

use cardlab_apdu_core::utils::to_spaced_hex;
use cardlab_apdu_core::{Response, StatusWord};
use colored::Colorize;

/// A formatted section title
pub struct SectionTitle<'a>(pub &'a str);

impl Display for SectionTitle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\n{}", self.0.bold().underline())
    }
}

/// Format a section header
pub const fn section_title(title: &str) -> SectionTitle<'_> {
    SectionTitle(title)
}

/// Format a success message
pub fn success(message: &str) -> String {
    format!("✅ {}", message.green().bold())
}

/// Format a warning message
pub fn warning(message: &str) -> String {
    format!("⚠️  {}", message.yellow().bold())
}

/// Status word, green on success and red otherwise
pub fn status(status: StatusWord) -> String {
    let text = format!("{:04X}", status.to_u16());
    if status.is_success() {
        text.green().to_string()
    } else {
        format!("{} ({})", text.red(), status.description())
    }
}

/// One response line: label, payload and status
pub fn response_line(label: &str, response: &Response) -> String {
    let payload = response.payload();
    let payload = if payload.is_empty() {
        "-".dimmed().to_string()
    } else {
        to_spaced_hex(payload)
    };
    format!("  {:<28} {} [{}]", label.bold(), payload, status(response.status()))
}

/// Format a key-value section for important outputs
pub fn key_value_box(title: &str, items: Vec<(&str, String)>) -> String {
    let mut result = format!("{}", title.bold().underline());

    for (key, value) in items {
        result.push_str(&format!("\n  {}: {}", key.bold(), value));
    }

    result
}

/// Human-readable duration with microsecond precision
pub fn duration(duration: Duration) -> String {
    format!("{:.3} ms", duration.as_secs_f64() * 1_000.0)
}

//! Output formatting for the CLI.

use std::cell::RefCell;
use std::rc::Rc;

use console::style;

/// Output handler for CLI messages.
#[derive(Clone, Default)]
pub struct Output {
    json: bool,
    captured: Option<Rc<RefCell<Vec<String>>>>,
}

impl Output {
    /// Create a new output handler.
    pub fn new(json: bool) -> Self {
        Self {
            json,
            captured: None,
        }
    }

    /// An output handler that records lines instead of printing them.
    #[cfg(test)]
    pub fn captured(json: bool) -> (Self, Rc<RefCell<Vec<String>>>) {
        let lines = Rc::new(RefCell::new(Vec::new()));
        let output = Self {
            json,
            captured: Some(Rc::clone(&lines)),
        };
        (output, lines)
    }

    fn out(&self, line: String) {
        match &self.captured {
            Some(lines) => lines.borrow_mut().push(line),
            None => println!("{}", line),
        }
    }

    fn err(&self, line: String) {
        match &self.captured {
            Some(lines) => lines.borrow_mut().push(line),
            None => eprintln!("{}", line),
        }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        self.out(format!("{} {}", style("ℹ").blue(), msg));
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        self.out(format!("{} {}", style("✓").green(), msg));
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        self.err(format!("{} {}", style("⚠").yellow(), msg));
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            self.err(serde_json::json!({ "error": msg }).to_string());
            return;
        }
        self.err(format!("{} {}", style("✗").red(), style(msg).red()));
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        self.out(format!("\n{}", style(msg).bold().underlined()));
    }

    /// Print an empty line.
    pub fn blank(&self) {
        if self.json {
            return;
        }
        self.out(String::new());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            self.out(json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        self.out(format!("  {}: {}", style(key).dim(), value));
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        self.out(format!("  {}", format_row(cols, widths)));
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

fn format_row(cols: &[&str], widths: &[usize]) -> String {
    cols.iter()
        .zip(widths.iter())
        .map(|(col, width)| format!("{:width$}", col, width = width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Colour a checkout status for display.
pub fn status_badge(status: &str) -> String {
    match status {
        "paid" => style(status).green().to_string(),
        "cancelled" => style(status).yellow().to_string(),
        "failed" => style(status).red().to_string(),
        _ => status.to_string(),
    }
}

/// Format a won amount with thousands separators, e.g. `₩12,000`.
pub fn format_won(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("₩{}", grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_won() {
        assert_eq!(format_won(0), "₩0");
        assert_eq!(format_won(999), "₩999");
        assert_eq!(format_won(12_000), "₩12,000");
        assert_eq!(format_won(1_234_567), "₩1,234,567");
    }

    #[test]
    fn test_json_mode_suppresses_messages() {
        let (output, lines) = Output::captured(true);
        output.header("Cart");
        output.success("Added");
        output.warn("careful");
        output.kv("total", "₩0");
        output.json(&serde_json::json!({ "items": [] }));

        assert_eq!(lines.borrow().as_slice(), ["{\n  \"items\": []\n}"]);
    }

    #[test]
    fn test_format_row_pads_columns() {
        assert_eq!(format_row(&["mug", "2"], &[6, 3]), "mug     2");
    }
}

//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use larder_core::Item;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single item with its thresholds
    pub fn print_item(&self, item: &Item) {
        match self.format {
            OutputFormat::Human => {
                println!("Name:     {}", item.name);
                println!("Unit:     {}", item.unit);
                println!(
                    "Critical: {} {}",
                    item.critical_value,
                    item.unit.suffix()
                );
                println!(
                    "Default:  {} {}",
                    item.default_value,
                    item.unit.suffix()
                );
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(item).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", item.name);
            }
        }
    }

    /// Print all items of the registry
    pub fn print_items(&self, items: &[Item]) {
        match self.format {
            OutputFormat::Human => {
                if items.is_empty() {
                    println!("No items found.");
                    return;
                }
                for item in items {
                    println!(
                        "{} ({}) | critical {} {} | default {} {}",
                        truncate(&item.name, 35),
                        item.unit,
                        item.critical_value,
                        item.unit.suffix(),
                        item.default_value,
                        item.unit.suffix()
                    );
                }
                println!("\n{} item(s)", items.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(items).unwrap());
            }
            OutputFormat::Quiet => {
                for item in items {
                    println!("{}", item.name);
                }
            }
        }
    }

    /// Print the entries of a list view
    ///
    /// Shopping entries with amount 0 are presence markers and render
    /// without an amount.
    pub fn print_entries(&self, label: &str, entries: &[(Item, i64)]) {
        match self.format {
            OutputFormat::Human => {
                if entries.is_empty() {
                    println!("The {} list is empty.", label);
                    return;
                }
                for (item, amount) in entries {
                    if *amount == 0 {
                        println!("{} ({})", truncate(&item.name, 35), item.unit);
                    } else {
                        println!(
                            "{} | {} {}",
                            truncate(&item.name, 35),
                            amount,
                            item.unit.suffix()
                        );
                    }
                }
                println!("\n{} item(s) on the {} list", entries.len(), label);
            }
            OutputFormat::Json => {
                let json_entries: Vec<_> = entries
                    .iter()
                    .map(|(item, amount)| {
                        serde_json::json!({
                            "name": item.name,
                            "unit": item.unit,
                            "amount": amount,
                            "critical_value": item.critical_value,
                            "default_value": item.default_value,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&json_entries).unwrap());
            }
            OutputFormat::Quiet => {
                for (item, _) in entries {
                    println!("{}", item.name);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }
}

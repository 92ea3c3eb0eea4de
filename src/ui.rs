use colored::Colorize;
use roster::{DiffSummary, RosterEntry};

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

// ============================================================================
// Roster Formatting
// ============================================================================

/// Colored one-line diff summary
pub fn format_summary(summary: &DiffSummary) -> String {
    format!(
        "{} added, {} removed, {} unchanged",
        summary.added.to_string().green(),
        summary.removed.to_string().red(),
        summary.unchanged
    )
}

/// One roster entry as `Name (IDENT)`
pub fn format_member(entry: &RosterEntry) -> String {
    if entry.resource.full_name.is_empty() {
        entry.nav_ident.clone()
    } else {
        format!("{} ({})", entry.resource.full_name, entry.nav_ident)
    }
}

/// Pluralize a count: `1 champion`, `2 champions`
pub fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use roster::{Group, Person};

    #[test]
    fn test_format_member() {
        let mut entry = RosterEntry::new(
            Group::new("g", "Team", ""),
            "A123456",
            Person {
                full_name: "Ada Lovelace".to_string(),
                email: String::new(),
            },
        );
        assert_eq!(format_member(&entry), "Ada Lovelace (A123456)");

        entry.resource.full_name.clear();
        assert_eq!(format_member(&entry), "A123456");
    }

    #[test]
    fn test_count() {
        assert_eq!(count(1, "champion"), "1 champion");
        assert_eq!(count(0, "champion"), "0 champions");
        assert_eq!(count(12, "team"), "12 teams");
    }

    #[test]
    fn test_format_summary_contains_counts() {
        colored::control::set_override(false);
        let summary = DiffSummary {
            added: 1,
            removed: 2,
            unchanged: 3,
        };
        assert_eq!(format_summary(&summary), "1 added, 2 removed, 3 unchanged");
    }
}

//! Output formatting for human and JSON modes

use zonesync_core::domain::entry::RemoteEntry;
use zonesync_core::domain::paths::RemotePaths;
use zonesync_sync::SyncReport;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Trait for formatting CLI output
pub trait OutputFormatter {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn info(&self, message: &str);
    fn print_json(&self, value: &serde_json::Value);
    /// Summary of a bulk transfer; `action` is e.g. "Uploaded".
    fn report(&self, action: &str, report: &SyncReport);
    /// One remote directory listing.
    fn entries(&self, entries: &[RemoteEntry], paths: &RemotePaths);
}

/// Human-readable output formatter with checkmarks and indentation
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("\u{2713} {}", message);
    }
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {}", message);
    }
    fn info(&self, message: &str) {
        println!("  {}", message);
    }
    fn print_json(&self, _value: &serde_json::Value) {}

    fn report(&self, action: &str, report: &SyncReport) {
        let noun = if report.transferred.len() == 1 { "file" } else { "files" };
        self.success(&format!(
            "{} {} {} in {} ms ({} skipped)",
            action,
            report.transferred.len(),
            noun,
            report.duration_ms,
            report.skipped
        ));
        for path in &report.transferred {
            self.info(&path.display().to_string());
        }
    }

    fn entries(&self, entries: &[RemoteEntry], paths: &RemotePaths) {
        for entry in entries {
            let path = paths.relative_file_path(&entry.full_path, &entry.name);
            if entry.is_directory {
                println!("{:>12}  {}/", "-", path);
            } else {
                let size = entry
                    .length
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| "?".into());
                println!("{:>12}  {}", size, path);
            }
        }
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        println!(
            "{}",
            serde_json::json!({"success": true, "message": message})
        );
    }
    fn error(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"success": false, "error": message})
        );
    }
    fn info(&self, _message: &str) {}
    fn print_json(&self, value: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }

    fn report(&self, action: &str, report: &SyncReport) {
        self.print_json(&serde_json::json!({
            "success": true,
            "action": action.to_lowercase(),
            "report": report,
        }));
    }

    fn entries(&self, entries: &[RemoteEntry], _paths: &RemotePaths) {
        self.print_json(&serde_json::json!(entries));
    }
}

pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter)
    }
}

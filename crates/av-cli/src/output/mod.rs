//! Output formatting utilities for the CLI
//!
//! Tables for registered apps, settings display and colored status messages.

use tabled::{
    settings::{Style, Width},
    Table, Tabled,
};

use av_core::types::{AppRecord, Settings};

/// Format registered apps as an ASCII table
///
/// The detailed view adds the argument string and whether an icon was found.
pub fn format_apps(apps: &[AppRecord], detailed: bool) -> String {
    if apps.is_empty() {
        return "No apps registered".to_string();
    }

    #[derive(Tabled)]
    struct AppRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "PATH")]
        path: String,
    }

    #[derive(Tabled)]
    struct AppRowDetailed {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "PATH")]
        path: String,
        #[tabled(rename = "ARGS")]
        args: String,
        #[tabled(rename = "ICON")]
        icon: &'static str,
    }

    if detailed {
        let rows: Vec<AppRowDetailed> = apps
            .iter()
            .map(|app| AppRowDetailed {
                id: app.id.to_string(),
                name: app.name.clone(),
                path: app.path.clone(),
                args: if app.args.is_empty() {
                    "-".to_string()
                } else {
                    app.args.clone()
                },
                icon: if app.icon.is_empty() { "no" } else { "yes" },
            })
            .collect();

        Table::new(rows)
            .with(Style::rounded())
            .with(Width::wrap(120))
            .to_string()
    } else {
        let rows: Vec<AppRow> = apps
            .iter()
            .map(|app| AppRow {
                id: truncate(app.id.as_str(), 12),
                name: app.name.clone(),
                path: app.path.clone(),
            })
            .collect();

        Table::new(rows).with(Style::rounded()).to_string()
    }
}

/// Format settings as `key: value` lines
pub fn format_settings(settings: &Settings) -> String {
    format!("Auto-start: {}\n", if settings.auto_start { "on" } else { "off" })
}

/// Truncate a string with ellipsis if too long
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print a success message in green with a checkmark prefix
pub fn print_success(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        SetForegroundColor(Color::Green),
        Print("✓ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print an error message in red with an X prefix
///
/// Outputs to stderr.
pub fn print_error(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Red),
        Print("✗ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print a warning message in yellow
///
/// Outputs to stderr.
pub fn print_warning(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Yellow),
        Print("⚠ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print an informational message in cyan
pub fn print_info(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        SetForegroundColor(Color::Cyan),
        Print("ℹ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

//! Spinner for scenario steps of unknown duration.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

use super::colors_enabled;

/// Spinner shown while a scenario step runs.
///
/// Hidden automatically when stderr is not a terminal.
///
/// ```no_run
/// use shelfcheck_cli::ui::Spinner;
///
/// let spinner = Spinner::new("Opening catalog...");
/// spinner.finish("Catalog opened");
/// ```
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    /// Create and start a new spinner.
    #[must_use]
    pub fn new(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        let template = if colors_enabled() {
            "{spinner:.cyan} {msg}"
        } else {
            "{spinner} {msg}"
        };
        if let Ok(style) = ProgressStyle::default_spinner().template(template) {
            pb.set_style(style.tick_strings(&["◐", "◓", "◑", "◒"]));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Update spinner message while it's running.
    pub fn set_message(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    /// Finish with a checkmark.
    pub fn finish(&self, message: &str) {
        let mark = if colors_enabled() {
            "✓".green().to_string()
        } else {
            "✓".to_string()
        };
        self.pb.finish_with_message(format!("{mark} {message}"));
    }

    /// Finish with a cross.
    pub fn fail(&self, message: &str) {
        let mark = if colors_enabled() {
            "✗".red().to_string()
        } else {
            "✗".to_string()
        };
        self.pb.finish_with_message(format!("{mark} {message}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_lifecycle() {
        let spinner = Spinner::new("Loading...");
        spinner.set_message("Updated");
        spinner.finish("Done");

        Spinner::new("Processing").fail("Failed");
    }
}

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Kinds of AI calls the reviewer waits on
#[derive(Debug, Clone, Copy)]
pub enum ProgressType {
    Translation,
    Audit,
    WordBreakdown,
}

/// Spinner look for one kind of call
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    pub spinner_chars: &'static str,
    pub tick_interval: Duration,
    pub color: &'static str,
    pub success_message: &'static str,
}

impl ProgressType {
    pub fn config(self) -> ProgressConfig {
        match self {
            ProgressType::Translation => ProgressConfig {
                spinner_chars: "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏",
                tick_interval: Duration::from_millis(80),
                color: "cyan",
                success_message: "✓ Translation finished",
            },
            ProgressType::Audit => ProgressConfig {
                spinner_chars: "⠋⠙⠚⠞⠖⠦⠴⠲⠳⠓",
                tick_interval: Duration::from_millis(120),
                color: "blue",
                success_message: "✓ Audit finished",
            },
            ProgressType::WordBreakdown => ProgressConfig {
                spinner_chars: "⠋⠙⠚⠒⠂⠂⠒⠲⠴⠦⠖⠒⠐⠐⠒⠓⠋",
                tick_interval: Duration::from_millis(150),
                color: "magenta",
                success_message: "✓ Word breakdown finished",
            },
        }
    }

    pub fn create_spinner(self, message: &str) -> CallSpinner {
        let config = self.config();
        let spinner = ProgressBar::new_spinner();

        let template = format!("{{spinner:.{}}} {{msg}} {{elapsed:.dim}}", config.color);
        let style = ProgressStyle::default_spinner()
            .template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(config.spinner_chars);

        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(config.tick_interval);

        CallSpinner { spinner, config }
    }
}

/// Spinner shown while queued AI calls drain
pub struct CallSpinner {
    spinner: ProgressBar,
    config: ProgressConfig,
}

impl CallSpinner {
    pub fn set_message(&self, message: &str) {
        self.spinner.set_message(message.to_string());
    }

    /// Hide the spinner while `f` writes to the terminal
    pub fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
        self.spinner.suspend(f)
    }

    pub fn finish_success(&self) {
        let msg = self.config.success_message;
        let colored_msg = match self.config.color {
            "cyan" => msg.cyan().to_string(),
            "blue" => msg.blue().to_string(),
            "magenta" => msg.magenta().to_string(),
            _ => msg.green().to_string(),
        };
        self.spinner.finish_with_message(colored_msg);
    }

    pub fn finish_error(&self, message: &str) {
        self.spinner
            .finish_with_message(format!("✗ {message}").red().to_string());
    }
}

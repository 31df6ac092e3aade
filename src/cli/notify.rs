use std::io::{self, Write};

use crate::prelude::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
    Question,
}

/// Toasts are short one-liners, modals interrupt the flow and are framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presentation {
    #[default]
    Toast,
    Modal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub presentation: Presentation,
    pub message: String,
}

impl Notice {
    pub fn toast(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            presentation: Presentation::Toast,
            message: message.into(),
        }
    }

    pub fn modal(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            presentation: Presentation::Modal,
            message: message.into(),
        }
    }

    pub fn saved() -> Self {
        Self::toast(Severity::Success, "Saved successfully")
    }

    /// Result of a confirmed delete. Shown as a modal since it follows a prompt.
    pub fn deleted() -> Self {
        Self::modal(Severity::Success, "Contact deleted successfully")
    }

    pub fn delete_failed() -> Self {
        Self::modal(Severity::Error, "Error deleting the contact")
    }

    pub fn created() -> Self {
        Self::toast(Severity::Success, "Created successfully")
    }

    pub fn updated() -> Self {
        Self::toast(Severity::Success, "Updated successfully")
    }

    pub fn network_error() -> Self {
        Self::toast(Severity::Error, "Connection error")
    }

    pub fn server_error() -> Self {
        Self::toast(Severity::Error, "Server error")
    }

    pub fn validation_error(detail: &str) -> Self {
        Self::toast(Severity::Error, format!("Validation error: {}", detail))
    }

    /// The local copy changed but the server never confirmed it, either
    /// because it could not be reached or because its answer was unreadable.
    pub fn saved_locally() -> Self {
        Self::toast(
            Severity::Warning,
            "Saved locally, the server did not confirm the change",
        )
    }

    /// Picks the matching preset for a failed request, or echoes the error.
    pub fn from_error(err: &AppError) -> Self {
        match err {
            AppError::Network(_) => Self::network_error(),
            AppError::Api { status, .. } if *status >= 500 => Self::server_error(),
            other => Self::toast(Severity::Error, other.to_string()),
        }
    }
}

pub trait Notifier {
    fn notify(&self, notice: Notice);

    fn confirm(&self, prompt: &str) -> bool;

    fn success(&self, message: &str) {
        self.notify(Notice::toast(Severity::Success, message));
    }

    fn error(&self, message: &str) {
        self.notify(Notice::toast(Severity::Error, message));
    }

    fn warning(&self, message: &str) {
        self.notify(Notice::toast(Severity::Warning, message));
    }

    fn info(&self, message: &str) {
        self.notify(Notice::toast(Severity::Info, message));
    }
}

pub struct TerminalNotifier {
    assume_yes: bool,
}

impl TerminalNotifier {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        let line = render(&notice);

        match notice.severity {
            Severity::Error | Severity::Warning => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        let question = Notice::modal(
            Severity::Question,
            format!("Are you sure you want to {}? (y/n)", prompt),
        );
        println!("{}", render(&question));
        print!("> ");
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(_) => input.trim().to_lowercase() == "y",
            Err(_) => false,
        }
    }
}

pub fn render(notice: &Notice) -> String {
    let label = match notice.severity {
        Severity::Success => "ok",
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "info",
        Severity::Question => "?",
    };

    match notice.presentation {
        Presentation::Toast => format!("[{}] {}", label, notice.message),
        Presentation::Modal => {
            let width = notice.message.chars().count().max(label.len()) + 4;
            let rule = "-".repeat(width);
            format!(
                "{rule}\n  {}\n  {}\n{rule}",
                label.to_uppercase(),
                notice.message
            )
        }
    }
}

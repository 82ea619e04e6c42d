//! Colored terminal output on stderr, keeping stdout for command results.

use console::{Style, Term};
use scribe_provider::{HealthCheck, HealthStatus};

/// Terminal output formatter.
pub(crate) struct Output {
    stdout: Term,
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    dim: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            stdout: Term::stdout(),
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            dim: Style::new().dim(),
        }
    }

    /// Write a command result to stdout.
    pub(crate) fn emit(&self, text: &str) -> std::io::Result<()> {
        self.stdout.write_line(text)
    }

    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(&self.dim.apply_to(msg).to_string());
    }

    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print one provider's health line, colored by status.
    pub(crate) fn health(&self, provider: &str, check: &HealthCheck) {
        let (style, label) = match check.status {
            HealthStatus::Healthy => (&self.green, "healthy"),
            HealthStatus::Degraded => (&self.yellow, "degraded"),
            HealthStatus::Unhealthy => (&self.red, "unhealthy"),
        };
        let mut line = format!("{provider:<10} {}", style.apply_to(label));
        if let Some(latency) = check.latency_ms {
            line.push_str(&format!(" ({latency} ms)"));
        }
        if let Some(error) = &check.error {
            line.push_str(&format!(": {error}"));
        }
        let _ = self.term.write_line(&line);
    }
}

//! Colored output helpers for CLI
//!
//! Status lines go to stderr so the report on stdout can be piped to a file.
//! Every line is rendered by a `render_*` function first, which keeps the
//! plain-text layout testable.

use owo_colors::OwoColorize;

/// Marker in front of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Ok,
    Info,
    Warn,
    Error,
    Trace,
}

impl Mark {
    fn tag(self) -> &'static str {
        match self {
            Mark::Ok => "[OK]",
            Mark::Info => "[INFO]",
            Mark::Warn => "[WARN]",
            Mark::Error => "[ERROR]",
            Mark::Trace => "[TRACE]",
        }
    }

    fn glyph(self) -> String {
        match self {
            Mark::Ok => "✓".green().bold().to_string(),
            Mark::Info => "•".blue().to_string(),
            Mark::Warn => "!".yellow().bold().to_string(),
            Mark::Error => "✗".red().bold().to_string(),
            Mark::Trace => "trace".dimmed().to_string(),
        }
    }
}

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self { colored: true }
    }

    pub fn no_color() -> Self {
        Self { colored: false }
    }

    fn render_status(&self, mark: Mark, message: &str) -> String {
        if !self.colored {
            return format!("  {} {}", mark.tag(), message);
        }
        let message = match mark {
            Mark::Ok => message.green().to_string(),
            Mark::Warn => message.yellow().to_string(),
            Mark::Error => message.red().to_string(),
            Mark::Trace => message.bright_cyan().to_string(),
            Mark::Info => message.to_string(),
        };
        format!("  {} {}", mark.glyph(), message)
    }

    fn render_step(&self, step: u32, total: u32, message: &str) -> String {
        let counter = format!("[{}/{}]", step, total);
        if self.colored {
            format!("  {} {}", counter.dimmed(), message.bright_white())
        } else {
            format!("  {} {}", counter, message)
        }
    }

    fn render_title(&self, title: &str, major: bool) -> String {
        match (self.colored, major) {
            (true, true) => format!("\n  {}", title.bright_white().bold().underline()),
            (true, false) => format!("\n  {}", title.cyan().bold()),
            (false, true) => format!("\n  === {} ===", title),
            (false, false) => format!("\n  --- {} ---", title),
        }
    }

    fn render_kv(&self, key: &str, value: &str) -> String {
        if self.colored {
            format!("    {}: {}", key.dimmed(), value.bright_white())
        } else {
            format!("    {}: {}", key, value)
        }
    }

    fn render_item(&self, item: &str) -> String {
        if self.colored {
            format!("    {} {}", "•".blue(), item)
        } else {
            format!("    - {}", item)
        }
    }

    fn render_usage(&self, command: &str) -> String {
        if self.colored {
            format!("\n  {} {}", "usage:".dimmed(), command.bright_white())
        } else {
            format!("\n  usage: {}", command)
        }
    }

    /// Name and version, printed once before a run
    pub fn banner(&self) {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        if self.colored {
            eprintln!("\n   {} {}\n", "Deep Research".bright_cyan().bold(), version.dimmed());
        } else {
            eprintln!("\n   Deep Research {}\n", version);
        }
    }

    pub fn success(&self, message: &str) {
        eprintln!("{}", self.render_status(Mark::Ok, message));
    }

    pub fn info(&self, message: &str) {
        eprintln!("{}", self.render_status(Mark::Info, message));
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{}", self.render_status(Mark::Warn, message));
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", self.render_status(Mark::Error, message));
    }

    pub fn trace(&self, trace_id: &str) {
        eprintln!("{}", self.render_status(Mark::Trace, trace_id));
    }

    /// Pipeline status line, numbered by stage
    pub fn step(&self, step: u32, total: u32, message: &str) {
        eprintln!("{}", self.render_step(step, total, message));
    }

    pub fn header(&self, title: &str) {
        println!("{}", self.render_title(title, true));
    }

    pub fn subheader(&self, title: &str) {
        println!("{}", self.render_title(title, false));
    }

    pub fn kv(&self, key: &str, value: &str) {
        println!("{}", self.render_kv(key, value));
    }

    pub fn list_item(&self, item: &str) {
        println!("{}", self.render_item(item));
    }

    /// Example invocation shown after a listing
    pub fn usage(&self, command: &str) {
        eprintln!("{}", self.render_usage(command));
    }

    /// Print the markdown report unstyled so it stays valid markdown
    pub fn report(&self, markdown: &str) {
        println!("\n{}", markdown.trim_end());
    }

    pub fn follow_ups(&self, questions: &[String]) {
        if questions.is_empty() {
            return;
        }
        self.subheader("Follow-up questions");
        for question in questions {
            self.list_item(question);
        }
    }
}

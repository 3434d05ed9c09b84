//! Span-anchored diagnostics: rendering, color detection, and the
//! error/warning bookkeeping (`max_errors`) a [`Handler`] performs on behalf
//! of a lexer run.
//!
//! The rendering format follows the conventional compiler-diagnostic shape:
//! a `file:line:column` header, the source line(s) the span covers with a
//! width-padded gutter, and an underline row of `^----` beneath the span,
//! with the message appended on the first line.

use std::fmt;
use std::fs;

use crate::error::DiagnosticError;
use crate::span::Span;

/// Severity of a reported diagnostic. Purely advisory for rendering —
/// whether a given lexical event becomes a warning or an error is a
/// decision the lexer makes from `Context` flags, not something `Level`
/// itself encodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
    Note,
    Info,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Note => "note",
            Level::Info => "info",
        }
    }

    fn ansi_color(self) -> &'static str {
        match self {
            Level::Error => "\x1b[1;31m",
            Level::Warning => "\x1b[1;33m",
            Level::Note => "\x1b[1;34m",
            Level::Info => "\x1b[1;32m",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single rendered diagnostic: level, source span, and message.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn new(level: Level, span: Span, message: impl Into<String>) -> Self {
        Self {
            level,
            span,
            message: message.into(),
        }
    }
}

/// Whether ANSI color is used when rendering diagnostics to stderr.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

fn color_enabled(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            if std::env::var_os("CLICOLOR_FORCE").is_some() {
                true
            } else if std::env::var_os("NO_COLOR").is_some() {
                false
            } else {
                is_stderr_tty()
            }
        }
    }
}

fn is_stderr_tty() -> bool {
    use std::io::IsTerminal;
    std::io::stderr().is_terminal()
}

/// Collects and renders diagnostics, enforcing `max_errors`.
///
/// Once the number of emitted `Level::Error` diagnostics reaches
/// `max_errors`, further errors are counted but not rendered to stderr;
/// warnings are never capped.
pub struct Handler {
    color_mode: ColorMode,
    max_errors: usize,
    error_count: usize,
    warning_count: usize,
    emitted: Vec<Diagnostic>,
}

impl Handler {
    pub fn new(color_mode: ColorMode, max_errors: usize) -> Self {
        Self {
            color_mode,
            max_errors,
            error_count: 0,
            warning_count: 0,
            emitted: Vec::new(),
        }
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// All diagnostics produced so far, in emission order (including ones
    /// suppressed from stderr rendering by `max_errors`).
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.emitted
    }

    pub fn report(&mut self, diag: Diagnostic) {
        let suppressed = match diag.level {
            Level::Error => {
                self.error_count += 1;
                self.max_errors != 0 && self.error_count > self.max_errors
            }
            Level::Warning => {
                self.warning_count += 1;
                false
            }
            _ => false,
        };
        if !suppressed {
            self.render(&diag);
        }
        self.emitted.push(diag);
    }

    fn render(&self, diag: &Diagnostic) {
        let color = color_enabled(self.color_mode);
        let reset = if color { "\x1b[0m" } else { "" };
        let bold = if color { "\x1b[1m" } else { "" };

        if color {
            eprint!("{bold}cflex:{reset} ");
        } else {
            eprint!("cflex: ");
        }
        eprintln!(
            "{}:{}:{}",
            diag.span.start.filename, diag.span.start.line, diag.span.start.column
        );

        let start_line = diag.span.start.line;
        let end_line = diag.span.end.line.max(start_line);
        let gutter_width = end_line.to_string().len();

        let source_lines = read_lines(&diag.span.start.filename);

        for line_no in start_line..=end_line {
            let text = source_lines
                .as_ref()
                .ok()
                .and_then(|lines| lines.get((line_no - 1) as usize))
                .map(String::as_str)
                .unwrap_or("");

            eprintln!(" {line_no:>gutter_width$} | {text}");

            let col_start = if line_no == diag.span.start.line {
                diag.span.start.column
            } else {
                1
            };
            let col_end = if line_no == diag.span.end.line {
                diag.span.end.column
            } else {
                text.len() as u32 + 1
            };
            let col_end = col_end.max(col_start + 1);

            eprint!(" {:>gutter_width$} | ", "");
            for _ in 1..col_start {
                eprint!(" ");
            }
            eprint!("^");
            for _ in (col_start + 1)..col_end {
                eprint!("-");
            }
            eprint!(">");

            if line_no == diag.span.start.line {
                let level_color = if color { diag.level.ansi_color() } else { "" };
                eprint!(" {level_color}{}{reset}: {}", diag.level, diag.message);
            }
            eprintln!();
        }
    }
}

fn read_lines(filename: &str) -> Result<Vec<String>, DiagnosticError> {
    let contents = fs::read_to_string(filename).map_err(|source| DiagnosticError::SourceUnavailable {
        path: filename.to_owned(),
        source,
    })?;
    Ok(contents.lines().map(str::to_owned).collect())
}

//! `cflex` — a thin command-line front end over the `cflex-lex` crate.
//!
//! Reads one C source file, lexes it under the chosen standard/dialect, and
//! either prints the resulting token stream or exits nonzero once lexical
//! errors have been reported.

mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cflex_lex::context::{Context, FloatMode, LangStd, WarningMask, WcharWidth};
use cflex_lex::Lexer;
use cflex_util::ColorMode;

use error::{DriverError, Result};

/// Lex a C source file and report diagnostics or the token stream.
#[derive(Parser, Debug)]
#[command(name = "cflex")]
#[command(author = "cflex contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tokenize a C source file", long_about = None)]
struct Cli {
    /// C source file to lex.
    input: PathBuf,

    /// Target language standard.
    #[arg(long, value_enum, default_value_t = StdArg::C23)]
    std: StdArg,

    /// Enable GNU extensions (`__asm__`, `$` in identifiers, binary
    /// literals pre-C23, ...).
    #[arg(long)]
    gnu: bool,

    /// Enable `-pedantic`-style warnings for non-standard constructs
    /// accepted under `--gnu` or a looser standard.
    #[arg(long)]
    pedantic: bool,

    /// Recognize `??=`-style trigraphs and `<: :> <% %> %: %:%:` digraphs.
    #[arg(long)]
    trigraphs: bool,

    /// Treat every enabled warning as an error.
    #[arg(long)]
    werror: bool,

    /// Width in bits of the target `wchar_t`.
    #[arg(long, value_enum, default_value_t = WcharBitsArg::Bits32)]
    wchar_bits: WcharBitsArg,

    /// Stop rendering further errors after this many (0 disables the cap).
    #[arg(long, default_value_t = 20)]
    max_errors: usize,

    /// Disable ANSI color in diagnostic output.
    #[arg(long)]
    no_color: bool,

    /// What to print once lexing completes.
    #[arg(long, value_enum, default_value_t = EmitArg::Tokens)]
    emit: EmitArg,

    /// Enable debug-level tracing to stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StdArg {
    C89,
    C99,
    C11,
    C17,
    C23,
}

impl From<StdArg> for LangStd {
    fn from(value: StdArg) -> Self {
        match value {
            StdArg::C89 => LangStd::C89,
            StdArg::C99 => LangStd::C99,
            StdArg::C11 => LangStd::C11,
            StdArg::C17 => LangStd::C17,
            StdArg::C23 => LangStd::C23,
        }
    }
}

impl std::fmt::Display for StdArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_possible_value().unwrap().get_name().fmt(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum WcharBitsArg {
    Bits8,
    Bits16,
    Bits32,
}

impl From<WcharBitsArg> for WcharWidth {
    fn from(value: WcharBitsArg) -> Self {
        match value {
            WcharBitsArg::Bits8 => WcharWidth::Bits8,
            WcharBitsArg::Bits16 => WcharWidth::Bits16,
            WcharBitsArg::Bits32 => WcharWidth::Bits32,
        }
    }
}

impl std::fmt::Display for WcharBitsArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_possible_value().unwrap().get_name().fmt(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum EmitArg {
    /// Print one line per token.
    Tokens,
    /// Print only the final error/warning counts.
    Diagnostics,
}

impl std::fmt::Display for EmitArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_possible_value().unwrap().get_name().fmt(f)
    }
}

impl Cli {
    fn to_context(&self) -> Context {
        Context {
            lang_std: self.std.into(),
            gnu_extensions: self.gnu,
            implementation_extensions: true,
            pedantic: self.pedantic,
            enable_trigraphs: self.trigraphs,
            warning_enabled_mask: WarningMask::all(),
            warning_error_mask: WarningMask::empty(),
            warnings_as_errors: self.werror,
            float_mode: FloatMode::Full,
            wchar_bits: self.wchar_bits.into(),
            color_mode: if self.no_color { ColorMode::Never } else { ColorMode::Auto },
            max_errors: self.max_errors,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::new(if verbose { "debug" } else { "warn" });
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init();
}

fn run(cli: &Cli) -> Result<()> {
    let context = cli.to_context();
    let interner = cflex_util::Interner::new();
    let input = cli.input.to_string_lossy().into_owned();

    tracing::debug!(path = %input, std = ?cli.std, "opening source file");
    let mut lexer = Lexer::new(&input, &context, &interner)?;

    let mut token_count = 0usize;
    loop {
        let token = lexer.next_token();
        let eof = token.is_eof();
        if cli.emit == EmitArg::Tokens {
            print_token(token_count, &token);
        }
        token_count += 1;
        if eof {
            break;
        }
    }

    tracing::debug!(tokens = token_count, "lexing complete");

    let errors = lexer.handler().error_count();
    if errors > 0 {
        return Err(DriverError::LexicalErrors(errors));
    }
    Ok(())
}

fn print_token(index: usize, token: &cflex_lex::Token<'_>) {
    println!(
        "#{index:<4} {}:{}:{}  {:?}  flags={:?}",
        token.span.start.filename, token.span.start.line, token.span.start.column,
        token.kind, token.flags,
    );
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cflex: {err}");
            ExitCode::from(1)
        }
    }
}

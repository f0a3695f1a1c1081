use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use plang::diagnostic::{Diagnostic, DiagnosticStyle, FatalError};
use plang::interpreter::context::StdioContext;
use plang::session::{read_line, Session};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::{fs::read_to_string, process::ExitCode};

const EXIT_DATA_ERROR: u8 = 65;
const EXIT_SOFTWARE_ERROR: u8 = 70;
const EXIT_IO_ERROR: u8 = 74;

#[derive(Debug, Parser)]
#[clap(name = "plang", version)]
pub struct CLArgs {
    #[clap(subcommand)]
    pub routine: PlangCommand,
}

#[derive(Debug, Subcommand)]
pub enum PlangCommand {
    /// Print the token stream of a source file.
    Tokenize {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: TokenFormat,
    },
    /// Print the statements parsed from a source file.
    Parse {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "sexpr")]
        format: ExpressionFormat,
    },
    /// Execute a source file.
    Run {
        path: PathBuf,
        #[clap(long = "diagnostics", value_enum, default_value = "basic")]
        diagnostics: DiagnosticFormat,
    },
    /// Read, evaluate and print one line at a time.
    Repl {
        #[clap(long = "diagnostics", value_enum, default_value = "basic")]
        diagnostics: DiagnosticFormat,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TokenFormat {
    Debug,
    Basic,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ExpressionFormat {
    Debug,
    #[clap(name = "sexpr")]
    SExpr,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum DiagnosticFormat {
    Basic,
    Pretty,
}

impl From<DiagnosticFormat> for DiagnosticStyle {
    fn from(value: DiagnosticFormat) -> Self {
        match value {
            DiagnosticFormat::Basic => DiagnosticStyle::Basic,
            DiagnosticFormat::Pretty => DiagnosticStyle::Pretty,
        }
    }
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    plang::init_tracing();

    let args = CLArgs::parse();
    match args.routine {
        PlangCommand::Tokenize { path, format } => {
            let Some(src) = read_source(&path) else {
                return Ok(ExitCode::from(EXIT_IO_ERROR));
            };
            Ok(tokenize(&src, &format))
        }
        PlangCommand::Parse { path, format } => {
            let Some(src) = read_source(&path) else {
                return Ok(ExitCode::from(EXIT_IO_ERROR));
            };
            Ok(parse(&src, &format))
        }
        PlangCommand::Run { path, diagnostics } => {
            let Some(src) = read_source(&path) else {
                return Ok(ExitCode::from(EXIT_IO_ERROR));
            };
            Ok(run(&src, &path, diagnostics.into()))
        }
        PlangCommand::Repl { diagnostics } => {
            repl(diagnostics.into())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Reads a whole source file. Failure is reported as a fatal error.
fn read_source(path: &Path) -> Option<String> {
    match read_to_string(path) {
        Ok(src) => Some(src),
        Err(error) => {
            let error = FatalError::unreadable_source(path, error);
            tracing::error!(code = error.code(), "{error}");
            eprintln!("{error}");
            None
        }
    }
}

fn tokenize(src: &str, format: &TokenFormat) -> ExitCode {
    use plang::lexer::formatter::{BasicFormatter, DebugFormatter, ToFormatter, TokenFormatter};
    use plang::lexer::{Lexer, TokenKind};

    let mut scanner = Lexer::new(src);
    let formatter: Box<dyn TokenFormatter> = match format {
        TokenFormat::Debug => Box::new(ToFormatter::<DebugFormatter>::create_formatter(&scanner)),
        TokenFormat::Basic => Box::new(ToFormatter::<BasicFormatter>::create_formatter(&scanner)),
    };
    let mut succeeded = true;
    loop {
        match scanner.next_token() {
            Ok(token) => {
                println!("{}", formatter.format(&token));
                if matches!(token.kind, TokenKind::Eof) {
                    break;
                }
            }
            Err(error) => {
                eprintln!("{}", formatter.format_lexical_error(&error));
                succeeded = false;
            }
        };
    }
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_DATA_ERROR)
    }
}

fn parse(src: &str, format: &ExpressionFormat) -> ExitCode {
    use plang::lexer::Lexer;
    use plang::parser::formatter::{
        DebugExpressionFormatter, ExpressionFormatter, SExpressionFormatter,
    };
    use plang::parser::Parser;

    let formatter: Box<dyn ExpressionFormatter> = match format {
        ExpressionFormat::Debug => Box::new(DebugExpressionFormatter),
        ExpressionFormat::SExpr => Box::new(SExpressionFormatter),
    };

    let scanned = Lexer::new(src).scan_all();
    for error in scanned.errors.iter() {
        eprintln!("{error}");
    }
    let output = Parser::new(src, &scanned.tokens).parse();
    for statement in output.statements.iter() {
        println!("{}", formatter.format_statement(statement));
    }
    for error in output.errors.iter() {
        eprintln!("{}", formatter.format_error(error));
    }

    if scanned.errors.is_empty() && output.errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_DATA_ERROR)
    }
}

fn run(src: &str, path: &Path, style: DiagnosticStyle) -> ExitCode {
    let mut context = StdioContext::new(style, &path.to_string_lossy());
    let mut session = Session::new();
    let report = session.run(src, &mut context);

    if report.had_static_error() {
        ExitCode::from(EXIT_DATA_ERROR)
    } else if report.had_runtime_error() {
        ExitCode::from(EXIT_SOFTWARE_ERROR)
    } else {
        ExitCode::SUCCESS
    }
}

fn repl(style: DiagnosticStyle) -> Result<()> {
    let mut context = StdioContext::new(style, "<repl>");
    let mut session = Session::new();
    let mut stdin = std::io::stdin().lock();

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = read_line(&mut stdin)? else {
            println!();
            break;
        };
        let report = session.run(&line, &mut context);
        if report.had_error() {
            tracing::debug!(?report, "line finished with errors");
        }
    }
    Ok(())
}


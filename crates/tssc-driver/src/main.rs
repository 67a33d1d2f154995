use std::env;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser};
use tssc_driver::{
    compile_file, default_output, load_configuration, CompilationRequest, ReportStyle, Reporter,
};
use tssc_engine::{Engine, ScriptEngine};

#[derive(Parser, Debug)]
#[command(
    name = "tssc",
    about = "Single-file TypeScript compiler driver",
    long_about = "Compiles one TypeScript file, printing diagnostics one per line\nand optionally writing a Makefile-style dependency file."
)]
struct Cli {
    /// Input TypeScript file
    input: PathBuf,

    /// Output file (default: the input with a .js extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only type-check, do not emit
    #[arg(short = 'C', long = "no-emit")]
    no_emit: bool,

    /// Do not type-check, only emit
    #[arg(short = 'E', long = "no-check")]
    no_check: bool,

    /// Write a Makefile-style dependency file next to the output
    #[arg(short = 'd', long)]
    create_deps: bool,

    /// JSON file holding engine options
    #[arg(short = 'c', long, value_name = "PATH")]
    configuration: Option<PathBuf>,

    /// Render diagnostics with source snippets
    #[arg(long)]
    pretty: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    let base_path = match env::current_dir() {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("error: cannot determine the working directory: {}", err);
            return ExitCode::from(2);
        }
    };
    let engine = ScriptEngine::new(&base_path);
    let cli = parse_args(&engine);

    match run(&engine, cli, base_path).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn parse_args(engine: &ScriptEngine) -> Cli {
    let command = Cli::command()
        .version(format!("{} (using {})", env!("CARGO_PKG_VERSION"), engine.version()))
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('V')
                .short_alias('v')
                .long("version")
                .action(ArgAction::Version)
                .help("Print version"),
        )
        .after_help(format!("Using {}", engine.version()));
    let matches = command.get_matches();
    Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
}

async fn run(engine: &ScriptEngine, cli: Cli, base_path: PathBuf) -> Result<bool> {
    let configuration = load_configuration(&base_path, cli.configuration.as_deref()).await;
    let output = cli.output.unwrap_or_else(|| default_output(&cli.input));

    let request = CompilationRequest::new(cli.input.clone(), output)
        .with_check(!cli.no_check)
        .with_emit(!cli.no_emit)
        .with_create_deps(cli.create_deps)
        .with_configuration(configuration)
        .with_base_path(base_path);

    let stderr = io::stderr();
    let style = if cli.pretty {
        ReportStyle::Pretty {
            color: stderr.is_terminal(),
        }
    } else {
        ReportStyle::Plain
    };
    let mut reporter = Reporter::with_style(stderr.lock(), style);

    compile_file(engine, &request, &mut reporter)
        .await
        .with_context(|| format!("failed to compile {}", cli.input.display()))
}

/// Logs go to stderr, and only when RUST_LOG is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::path::PathBuf;

use clap::ArgAction::{Set, SetTrue};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{event, span, Level};
use tracing_subscriber::prelude::*;

use base::prelude::ParseError;
use grammars::array::{array, Element};
use grammars::complete;
use grammars::ipv4::ipv4_header;
use grammars::sexpr::{evaluate, expression, EvalError, Expr};
use grammars::tagged::tagged_tokens;

/// Run the example grammars over some input
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Cli {
    /// Print results as JSON rather than in Rust debug notation.
    #[clap(action = SetTrue, long, global = true)]
    json: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse space-separated tagged tokens such as `number:42 diceroll:2d6`.
    Tagged {
        #[clap(action = Set)]
        text: String,
    },
    /// Parse a nested array such as `[1,[2,[3],4],5]`.  Arrays may be
    /// nested at most 64 deep.
    Array {
        #[clap(action = Set)]
        text: String,
    },
    /// Parse an arithmetic s-expression such as `(+ (* 10 2) 3)` and
    /// evaluate it.  Expressions may be nested at most 64 deep.
    Sexpr {
        #[clap(action = Set)]
        text: String,
    },
    /// Decode the IPv4 header at the start of a file.
    Ipv4 {
        #[clap(action = Set)]
        file: PathBuf,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Tagged { .. } => "tagged",
            Command::Array { .. } => "array",
            Command::Sexpr { .. } => "sexpr",
            Command::Ipv4 { .. } => "ipv4",
        }
    }
}

#[derive(Debug)]
enum Fail {
    /// We were not able to correctly initialise the program.
    InitialisationFailure(String),
    Io(PathBuf, std::io::Error),
    Parse(ParseError),
    Eval(EvalError),
    Output(serde_json::Error),
}

impl Display for Fail {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Fail::InitialisationFailure(msg) => f.write_str(msg.as_str()),
            Fail::Io(path, e) => write!(f, "{}: {e}", path.display()),
            Fail::Parse(e) => write!(f, "parse failed: {e}"),
            Fail::Eval(e) => write!(f, "evaluation failed: {e}"),
            Fail::Output(e) => write!(f, "failed to generate JSON: {e}"),
        }
    }
}

impl Error for Fail {}

#[derive(Debug, Serialize)]
struct Evaluated {
    expression: Expr,
    value: i64,
}

fn show<V: Serialize + Debug>(value: &V, json: bool) -> Result<(), Fail> {
    if json {
        let text = serde_json::to_string_pretty(value).map_err(Fail::Output)?;
        println!("{text}");
    } else {
        println!("{value:#?}");
    }
    Ok(())
}

fn run_command(command: &Command, json: bool) -> Result<(), Fail> {
    match command {
        Command::Tagged { text } => {
            let tokens = complete(tagged_tokens())
                .run(text.as_str())
                .into_result()
                .map_err(Fail::Parse)?;
            show(&tokens, json)
        }
        Command::Array { text } => {
            let value: Element = complete(array())
                .run(text.as_str())
                .into_result()
                .map_err(Fail::Parse)?;
            event!(Level::DEBUG, leaves=?value.leaves(), depth=value.depth(), "parsed array");
            show(&value, json)
        }
        Command::Sexpr { text } => {
            let expression = complete(expression())
                .run(text.as_str())
                .into_result()
                .map_err(Fail::Parse)?;
            let value = evaluate(&expression).map_err(Fail::Eval)?;
            show(&Evaluated { expression, value }, json)
        }
        Command::Ipv4 { file } => {
            let bytes = std::fs::read(file).map_err(|e| Fail::Io(file.clone(), e))?;
            event!(Level::DEBUG, "read {} bytes from {}", bytes.len(), file.display());
            let header = ipv4_header()
                .run(bytes.as_slice())
                .into_result()
                .map_err(Fail::Parse)?;
            show(&header, json)
        }
    }
}

fn run_pcrun() -> Result<(), Fail> {
    let cli = Cli::parse();

    // See
    // https://docs.rs/tracing-subscriber/0.3/tracing_subscriber/fmt/index.html#filtering-events-with-environment-variables
    // for instructions on how to select which trace messages get
    // printed.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);
    let filter_layer = match tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
    {
        Err(e) => {
            return Err(Fail::InitialisationFailure(format!(
                "failed to initialise tracing filter (perhaps there is a problem with environment variables): {e}"
            )));
        }
        Ok(layer) => layer,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let span = span!(Level::ERROR, "pcrun", grammar = cli.command.name(), json = cli.json);
    let _enter = span.enter();
    let result = run_command(&cli.command, cli.json);
    if let Err(e) = &result {
        event!(Level::ERROR, "{} failed: {:?}", cli.command.name(), e);
    } else {
        event!(Level::INFO, "{} succeeded", cli.command.name());
    }
    result
}

fn main() {
    unsafe { backtrace_on_stack_overflow::enable() };

    match run_pcrun() {
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
        Ok(()) => {
            std::process::exit(0);
        }
    }
}

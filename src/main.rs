use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use coachmark::{Config, Error, Origin, PayloadKind};

#[derive(Parser)]
#[command(name = "coachmark")]
#[command(about = "Format coaching messages and workout plans")]
struct Cli {
    /// Input file (reads stdin when omitted or `-`)
    input: Option<PathBuf>,

    /// How the input is wrapped
    #[arg(long, value_enum, default_value_t = Payload::Text)]
    payload: Payload,

    /// What to produce
    #[arg(long, value_enum, default_value_t = Emit::Blocks)]
    emit: Emit,

    /// Treat the text as written by the user rather than the coach
    #[arg(long)]
    user: bool,

    /// Output file (defaults to stdout; PDF defaults to the input name with .pdf extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Styling config (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Payload {
    /// Plain message text
    Text,
    /// Workout generation response (`generatedContent`)
    Workout,
    /// Coaching analysis response (`recommendation`)
    Coaching,
}

impl From<Payload> for PayloadKind {
    fn from(payload: Payload) -> Self {
        match payload {
            Payload::Text => PayloadKind::Text,
            Payload::Workout => PayloadKind::Workout,
            Payload::Coaching => PayloadKind::Coaching,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// One line per block
    Blocks,
    /// Block list as JSON
    Json,
    /// Typst markup
    Typst,
    /// Rendered PDF
    Pdf,
}

fn main() {
    let cli = Cli::parse();
    coachmark::logging::init(cli.verbose);

    if cli.emit == Emit::Pdf && cli.output.is_none() && input_path(&cli).is_none() {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "--output is required for PDF when reading stdin",
            )
            .exit();
    }

    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> coachmark::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::compiled_default(),
    };

    let input = input_path(cli);
    let raw = read_input(input)?;
    let text = coachmark::extract_text(cli.payload.into(), &raw)?;
    let origin = Origin::from_is_user(cli.user);

    let bytes = match cli.emit {
        Emit::Blocks => {
            let mut out = String::new();
            for formatted in coachmark::format(&text, origin) {
                let line = format!("{:<9} {}", formatted.block.kind(), formatted.block);
                out.push_str(line.trim_end());
                out.push('\n');
            }
            out.into_bytes()
        }
        Emit::Json => {
            let mut json = coachmark::to_json(&coachmark::format(&text, origin))?;
            json.push('\n');
            json.into_bytes()
        }
        Emit::Typst => coachmark::markdown_to_typst(&text, origin, &config).into_bytes(),
        Emit::Pdf => coachmark::to_pdf(&text, origin, &config)?,
    };

    let output = cli.output.clone().or_else(|| match (cli.emit, input) {
        (Emit::Pdf, Some(path)) => Some(path.with_extension("pdf")),
        _ => None,
    });

    match output {
        Some(path) => {
            fs::write(&path, bytes).map_err(|source| Error::Io {
                path: path.clone(),
                source,
            })?;
            tracing::info!(path = %path.display(), "wrote output");
            if cli.emit == Emit::Pdf {
                println!("Created {}", path.display());
            }
        }
        None => {
            io::stdout().write_all(&bytes).map_err(|source| Error::Io {
                path: PathBuf::from("<stdout>"),
                source,
            })?;
        }
    }

    Ok(())
}

fn input_path(cli: &Cli) -> Option<&Path> {
    cli.input.as_deref().filter(|p| *p != Path::new("-"))
}

fn read_input(path: Option<&Path>) -> coachmark::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| Error::Io {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            Ok(buf)
        }
    }
}

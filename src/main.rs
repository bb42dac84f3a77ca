mod debug_report;

use clap::{ArgAction, Parser};
use spokenform::{InputCase, Normalizer, NormalizerConfig};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Turns written text into spoken words.
///
/// Exit codes: 0 on success, 1 when normalization fails, 2 on invalid
/// arguments or configuration.
#[derive(Debug, Parser)]
#[command(name = "spokenform", version)]
struct Cli {
    /// Text to normalize. Read from stdin when omitted.
    input: Vec<String>,

    /// TOML configuration file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    language: Option<String>,

    #[arg(long, value_parser = parse_input_case)]
    input_case: Option<InputCase>,

    /// Compile every spoken form of each lexicon key, not only the preferred one.
    #[arg(long)]
    non_deterministic: bool,

    /// Directory for compiled grammar archives.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    #[arg(long)]
    overwrite_cache: bool,

    /// TSV file replacing the built-in whitelist.
    #[arg(long)]
    whitelist: Option<PathBuf>,

    /// Directory of TSV tables overriding the built-in ones.
    #[arg(long)]
    lexicon_dir: Option<PathBuf>,

    #[arg(long)]
    fallback_weight: Option<f32>,

    /// Print the token stream instead of the spoken text.
    #[arg(long, conflicts_with = "details")]
    tokens: bool,

    /// Print tokens, timings and build statistics.
    #[arg(long)]
    details: bool,

    /// Log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[arg(long, overrides_with = "no_color")]
    color: bool,

    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };
    let input = match read_input(&cli) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    let normalizer = match Normalizer::new(config) {
        Ok(normalizer) => normalizer,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    let color = if cli.no_color { false } else { cli.color || io::stdout().is_terminal() };
    let outcome = if cli.details {
        normalizer.normalize_verbose(&input).map(|details| debug_report::print_run(&details, color))
    } else if cli.tokens {
        normalizer.tokenize(&input).map(|tokens| println!("{}", spokenform::token::to_wire(&tokens)))
    } else {
        normalizer.normalize(&input).map(|spoken| println!("{spoken}"))
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "spokenform=info",
        2 => "spokenform=debug",
        _ => "spokenform=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn build_config(cli: &Cli) -> spokenform::Result<NormalizerConfig> {
    let mut config = match &cli.config {
        Some(path) => NormalizerConfig::from_toml_file(path)?,
        None => NormalizerConfig::default(),
    };
    if let Some(language) = &cli.language {
        config.language = language.clone();
    }
    if let Some(input_case) = cli.input_case {
        config.input_case = input_case;
    }
    if cli.non_deterministic {
        config.deterministic = false;
    }
    if cli.cache_dir.is_some() {
        config.cache_dir = cli.cache_dir.clone();
    }
    if cli.overwrite_cache {
        config.overwrite_cache = true;
    }
    if cli.whitelist.is_some() {
        config.whitelist = cli.whitelist.clone();
    }
    if cli.lexicon_dir.is_some() {
        config.lexicon_dir = cli.lexicon_dir.clone();
    }
    if let Some(weight) = cli.fallback_weight {
        config.fallback_weight = weight;
    }
    config.validate()?;
    Ok(config)
}

fn read_input(cli: &Cli) -> Result<String, String> {
    let input = if cli.input.is_empty() {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).map_err(|err| format!("failed to read stdin: {err}"))?;
        buffer.trim_end_matches(['\n', '\r']).to_string()
    } else {
        cli.input.join(" ")
    };
    if input.trim().is_empty() {
        return Err("no input provided".to_string());
    }
    Ok(input)
}

fn parse_input_case(value: &str) -> Result<InputCase, String> {
    match value {
        "cased" => Ok(InputCase::Cased),
        "lower_cased" => Ok(InputCase::LowerCased),
        other => Err(format!("expected `cased` or `lower_cased`, got `{other}`")),
    }
}

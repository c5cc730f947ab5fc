use std::io::Read;
use std::process::ExitCode;

use call_insight::{
    AnalyzerConfig, FsTranscriptSource, InsightEngine, Lexicon, SalesInsight, TranscriptInput,
    TranscriptSource, DEFAULT_LEXICON,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "call-insight",
    about = "Extract sales insights from call transcripts",
    version
)]
struct Cli {
    /// Transcript files to analyze (reads stdin if none provided)
    files: Vec<String>,

    /// Analyze all inputs as one combined transcript
    #[arg(long)]
    combined: bool,

    /// Transcript id for stdin input (files use their path as id)
    #[arg(long, default_value = "stdin", conflicts_with = "files")]
    id: String,

    /// TOML file overriding analyzer settings
    #[arg(long)]
    config: Option<String>,

    /// TOML file replacing the built-in lexicon
    #[arg(long)]
    lexicon: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "call_insight=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };
    let custom_lexicon = cli.lexicon.as_deref().map(Lexicon::load).transpose()?;
    let lexicon = custom_lexicon.as_ref().unwrap_or(&*DEFAULT_LEXICON);
    info!(lexicon = lexicon.version(), "lexicon ready");

    let engine = InsightEngine::new(lexicon, config)?;

    let inputs = if cli.files.is_empty() {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        vec![TranscriptInput::new(cli.id.clone(), text)]
    } else {
        FsTranscriptSource::new(".").fetch_all(&cli.files)?
    };

    if cli.combined {
        print_insight(&engine.analyze_many(&inputs))?;
    } else {
        for insight in engine.analyze_batch(&inputs) {
            print_insight(&insight)?;
        }
    }
    Ok(())
}

fn print_insight(insight: &SalesInsight) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(insight)?);
    Ok(())
}

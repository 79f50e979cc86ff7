use crate::config::Provider;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Reproduce a research paper's experiments with an LLM
#[derive(Parser, Debug)]
#[command(
    name = "reprokit",
    about = "Reproduce a research paper's experiments with an LLM",
    version,
    author,
    long_about = "reprokit reads a paper (TeX source or JSON), asks an LLM for a reproduction \
                  plan, a per-file logic analysis and finally the source code, writing every \
                  intermediate artifact to an output directory. It supports multiple AI backends \
                  (Ollama, OpenAI, Anthropic, Gemini, xAI, Groq)."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run planning, analysis and coding",
        long_about = "Runs the whole pipeline. Every artifact in the output directory is \
                      regenerated.\n\n\
                      Examples:\n  \
                      reprokit run paper.json\n  \
                      reprokit run paper.tex -o runs/attention\n  \
                      reprokit run paper.json --backend anthropic --model claude-sonnet-4-5"
    )]
    Run(RunArgs),

    #[command(about = "Run only the planning stage")]
    Plan(RunArgs),

    #[command(about = "Run only the analysis stage (needs planning artifacts)")]
    Analyze(RunArgs),

    #[command(about = "Run only the coding stage (needs planning and analysis artifacts)")]
    Code(RunArgs),

    #[command(
        about = "Print the sections of a TeX paper as JSON",
        long_about = "Extracts every labelled \\section, \\subsection, ... of a TeX file and \
                      prints them as a JSON list of {type, title, label, content}.\n\n\
                      Examples:\n  \
                      reprokit sections paper.tex\n  \
                      reprokit sections paper.tex -o paper.json"
    )]
    Sections(SectionsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(value_name = "INPUT", help = "Paper to reproduce (.tex or .json)")]
    pub input: PathBuf,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Output directory for artifacts [default: ./output]"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        short = 'b',
        long,
        value_parser = parse_provider,
        help = "AI backend provider (ollama, openai, anthropic, gemini, xai, groq)"
    )]
    pub backend: Option<Provider>,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        help = "Model name to use (provider-specific, e.g., 'qwen2.5-coder:7b' for Ollama)"
    )]
    pub model: Option<String>,

    #[arg(long, value_name = "SECONDS", help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, value_name = "FILE", help = "YAML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Record model exchanges to DIR (replayed when already present)"
    )]
    pub record: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SectionsArgs {
    #[arg(value_name = "INPUT", help = "TeX source file")]
    pub input: PathBuf,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write JSON to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

fn parse_provider(s: &str) -> Result<Provider, String> {
    s.parse::<Provider>().map_err(|e| e.to_string())
}

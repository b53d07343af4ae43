use clap::{
    Parser,
    Subcommand,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build m/z traces from centroided frame files.
    Build(BuildArgs),
    /// Write a template configuration file.
    WriteTemplate(WriteTemplateArgs),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum SerializationFormat {
    Json,
    #[default]
    PrettyJson,
    Ndjson,
}

impl SerializationFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SerializationFormat::Json | SerializationFormat::PrettyJson => "json",
            SerializationFormat::Ndjson => "ndjson",
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// The path to the json file with the trace building configuration.
    #[arg(short, long)]
    pub config: PathBuf,

    /// Json files, each holding the frames of one run. Can be repeated,
    /// every file is processed independently.
    #[arg(short, long, required = true)]
    pub input: Vec<PathBuf>,

    /// The directory the traces are written to.
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// The format to use for the output
    #[arg(short, long, default_value_t, value_enum)]
    pub format: SerializationFormat,

    /// Cancel the remaining builds as soon as one of them fails.
    #[arg(long, default_value_t = false)]
    pub fail_fast: bool,
}

#[derive(Parser, Debug)]
pub struct WriteTemplateArgs {
    /// The path to the output files.
    #[arg(short, long)]
    pub output_path: PathBuf,
}

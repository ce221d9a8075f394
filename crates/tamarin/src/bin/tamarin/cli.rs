//! tamarin cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Note that all
    /// paths on the way to the final path must exist.
    ///
    /// This is equivalent to running { cd <directory>; tamarin ... }
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge every file with the given name and fill in placeholders
    ///
    /// The shallowest file is the base, deeper files override it in order of depth.
    Render(RenderCommand),

    /// Print debug information for development
    Dev(DevCommand),
}

#[derive(Parser, Debug)]
pub struct RenderCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub vars: VarArgs,

    #[clap(flatten)]
    pub output: OutputArgs,

    /// File name to render, e.g. deployment.yml
    pub file_name: String,
}

#[derive(Parser, Debug)]
pub struct InputArgs {
    /// Base directory to search for files (defaults to the work directory)
    #[clap(short = 'd', long = "input-dir")]
    pub directory: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct VarArgs {
    /// Bind a placeholder variable
    ///
    /// The value is read as YAML, so `count=5` binds a number.
    #[clap(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,

    /// Bind every entry of a YAML mapping as a variable
    ///
    /// Variables given with --var take precedence.
    #[clap(long = "vars-file")]
    pub vars_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}

#[derive(Parser, Debug)]
pub struct DevCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[command(subcommand)]
    pub command: DevSubCommand,
}

#[derive(Subcommand, Debug)]
pub enum DevSubCommand {
    /// List every file name and its cascade
    Files,
    /// Dump the merged tree of a file name
    Tree { file_name: String },
}

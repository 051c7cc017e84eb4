use crate::config_wizard::CONFIG_FILE;
use crate::sinks::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Configuration file to write
    #[clap(short, long, default_value = CONFIG_FILE)]
    pub config: PathBuf,
}

/// Settings shared by every command that produces documents.
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Documents to produce [default: from the configuration file, else both]
    #[clap(short, long, value_enum)]
    pub format: Option<OutputFormat>,
    /// PDF resolution used to size pages from their pixel dimensions
    #[clap(long)]
    pub dpi: Option<u32>,
    /// Series title, e.g. "Sonic The Hedgehog"
    #[clap(short, long)]
    pub title: Option<String>,
    /// Configuration file to read
    #[clap(short, long, default_value = CONFIG_FILE)]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Address of the issue page, ending in the issue number
    pub url: String,
    /// Directory the series folder is created in
    pub output_dir: PathBuf,
    /// Also save the downloaded pages next to the documents
    #[clap(long)]
    pub keep_images: bool,
    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Directory holding the page images of one issue
    pub images_dir: PathBuf,
    /// Where to write the documents [default: the images directory's parent]
    #[clap(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Issue number used in the title and file names
    #[clap(long)]
    pub issue: Option<u32>,
    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generates a comic-compiler.toml config file
    Config(ConfigArgs),
    /// Downloads an issue and compiles it into a PDF and/or EPUB
    Fetch(FetchArgs),
    /// Compiles a directory of page images into a PDF and/or EPUB
    Build(BuildArgs),
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

//! Configuration for comic-compiler, and the interactive wizard that creates
//! `comic-compiler.toml`.
//!
//! Every section of the file has defaults, so the file is optional and may
//! only set the values that differ. Command line flags win over the file.

use crate::cli::{ConfigArgs, OutputArgs};
use crate::sinks::{Assembler, OutputFormat, DPI_RANGE, EPUB, PDF};
use crate::source::FetchConfig;
use anyhow::{Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, FuzzySelect, Input};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked for in the working directory.
pub const CONFIG_FILE: &str = "comic-compiler.toml";

/// Complete configuration for a comic-compiler run.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Configuration {
    /// Which documents to produce
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub pdf: PDF,
    #[serde(default)]
    pub epub: EPUB,
}

impl Configuration {
    /// Load the configuration at `path`, falling back to the defaults when
    /// there is no file.
    pub fn load(path: &Path) -> Result<Configuration> {
        if !path.exists() {
            log::debug!("{} not found, using default configuration", path.display());
            return Ok(Configuration::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        let config: Configuration = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML in {}", path.display()))?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply command line overrides, then check the result is usable.
    pub fn apply(&mut self, args: &OutputArgs) -> Result<()> {
        if let Some(format) = args.format {
            self.format = format;
        }
        if let Some(dpi) = args.dpi {
            self.pdf.dpi = dpi;
        }
        self.pdf.validate()
    }
}

/// Run the interactive configuration wizard.
///
/// Prompts for the output formats, PDF and EPUB settings and download pacing,
/// then writes the configuration file.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let theme = ColorfulTheme {
        ..ColorfulTheme::default()
    };
    let existing = Configuration::load(&args.config)?;

    let formats = OutputFormat::all();
    let format_idx = formats
        .iter()
        .position(|f| *f == existing.format)
        .unwrap_or(0);
    let format_idx = FuzzySelect::with_theme(&theme)
        .with_prompt("Documents to produce")
        .items(formats)
        .default(format_idx)
        .interact()?;
    let format = formats[format_idx];

    let mut pdf = existing.pdf;
    let mut epub = existing.epub;

    let author: String = Input::with_theme(&theme)
        .with_prompt("Author written into the documents")
        .default(pdf.author.clone())
        .allow_empty(false)
        .interact()?;
    pdf.author = author.clone();
    epub.author = author;

    if format.assemblers().contains(&Assembler::Pdf) {
        pdf.dpi = Input::with_theme(&theme)
            .with_prompt(format!(
                "PDF resolution in DPI ({}-{}, lower makes bigger pages)",
                DPI_RANGE.start(),
                DPI_RANGE.end()
            ))
            .default(pdf.dpi)
            .validate_with(|input: &u32| {
                if DPI_RANGE.contains(input) {
                    Ok(())
                } else {
                    Err("DPI is out of range")
                }
            })
            .interact()?;
    }

    if format.assemblers().contains(&Assembler::Epub) {
        epub.language = Input::with_theme(&theme)
            .with_prompt("EPUB language code (e.g., en, en-GB, fr)")
            .default(epub.language.clone())
            .allow_empty(false)
            .interact()?;
    }

    let mut fetch = existing.fetch;
    fetch.delay_ms = Input::with_theme(&theme)
        .with_prompt("Pause between page downloads in milliseconds")
        .default(fetch.delay_ms)
        .interact()?;

    let config = Configuration {
        format,
        fetch,
        pdf,
        epub,
    };
    let config =
        toml::to_string_pretty(&config).with_context(|| "Failed to convert configuration to TOML")?;

    let config_path = &args.config;
    if config_path.exists()
        && !Confirm::with_theme(&theme)
            .with_prompt(format!(
                "{} already exists, do you want to override it?",
                config_path.display()
            ))
            .interact()?
    {
        println!("Configuration:");
        println!("{}", config);
    } else {
        std::fs::write(config_path, config)
            .with_context(|| "Failed to write configuration file")?;
        println!("{} written!", config_path.display());
    }

    Ok(())
}

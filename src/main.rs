use anyhow::{anyhow, bail, Context, Result};
use cli::{BuildArgs, Cli, FetchArgs};
use config_wizard::Configuration;
use indicatif::{ProgressBar, ProgressStyle};
use naming::OutputNamer;
use reqwest::Url;
use sinks::Assembler;
use source::{DirectoryImages, FetchContext, ImageProvider, ImageSet, WebIssue};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod cli;
mod config_wizard;
mod error;
mod file_ordering;
mod naming;
mod sinks;
mod source;
#[cfg(test)]
mod test_support;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Config(args) => config_wizard::run(args),
        cli::Commands::Fetch(args) => fetch(args),
        cli::Commands::Build(args) => build(args),
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let progress = ProgressBar::new(len);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("can parse progress style")
            .progress_chars("#>-"),
    );
    progress
}

fn fetch(args: &FetchArgs) -> Result<()> {
    let mut config = Configuration::load(&args.output.config)?;
    config.apply(&args.output)?;

    if !(args.url.starts_with("http://") || args.url.starts_with("https://")) {
        bail!("URL must start with http:// or https://: {}", args.url);
    }
    let issue = naming::issue_number(&args.url)
        .ok_or_else(|| anyhow!("Could not find an issue number at the end of {}", args.url))?;
    let url = Url::parse(&args.url).with_context(|| format!("Invalid URL: {}", args.url))?;
    let series = args
        .output
        .title
        .clone()
        .or_else(|| naming::series_title_from_url(&args.url))
        .ok_or_else(|| anyhow!("Could not work out a title from {}, pass one with --title", args.url))?;

    let namer = OutputNamer::new(series, Some(issue));
    let out_dir = namer.issue_dir(&args.output_dir);
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let context = FetchContext::new(&config.fetch)?;
    let mut provider = WebIssue::new(&context, url);
    if args.keep_images {
        provider = provider.keep_images_in(out_dir.join("images"));
    }

    println!("Fetching {}...", namer.issue_title());
    let progress = progress_bar(0);
    let images = provider.load(&progress)?;
    progress.finish_and_clear();

    compile(&config, &images, &namer, &out_dir)
}

fn build(args: &BuildArgs) -> Result<()> {
    let mut config = Configuration::load(&args.output.config)?;
    config.apply(&args.output)?;

    let images_dir = args
        .images_dir
        .canonicalize()
        .with_context(|| format!("Failed to find {}", args.images_dir.display()))?;
    let series = match &args.output.title {
        Some(title) => title.clone(),
        None => series_from_dir(&images_dir)?,
    };
    let out_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => images_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let namer = OutputNamer::new(series, args.issue);
    println!("Loading pages from {}...", images_dir.display());
    let progress = progress_bar(0);
    let images = DirectoryImages::new(&images_dir).load(&progress)?;
    progress.finish_and_clear();

    compile(&config, &images, &namer, &out_dir)
}

/// Title for a local build when none was given: the name of the images
/// directory, or of its parent when the pages sit in a plain `images` folder.
fn series_from_dir(images_dir: &Path) -> Result<String> {
    let name = |p: &Path| p.file_name().map(|n| n.to_string_lossy().to_string());
    let dir_name = name(images_dir);
    let series = match dir_name.as_deref() {
        Some("images") => images_dir.parent().and_then(name),
        _ => dir_name,
    };
    series.ok_or_else(|| {
        anyhow!(
            "Could not work out a title from {}, pass one with --title",
            images_dir.display()
        )
    })
}

/// Run every requested assembler over `images`. One format failing doesn't
/// stop the others; the run only succeeds if every document was written.
fn compile(
    config: &Configuration,
    images: &ImageSet,
    namer: &OutputNamer,
    out_dir: &Path,
) -> Result<()> {
    let title = namer.issue_title();
    let total_bytes = byte_unit::Byte::from_u64(images.total_bytes())
        .get_appropriate_unit(byte_unit::UnitType::Binary);
    println!("  {} pages ({total_bytes:.2})", images.len());

    let assemblers = config.format.assemblers();
    let mut failures = 0;
    for &assembler in assemblers {
        let outfile = namer.path_for(out_dir, assembler);
        let progress = progress_bar(images.len() as u64);
        let result = match assembler {
            Assembler::Pdf => config
                .pdf
                .render(images, &title, &outfile, &progress)
                .map(|stats| format!("{} pages", stats.page_count)),
            Assembler::Epub => config
                .epub
                .render(images, &title, &outfile, &progress)
                .map(|stats| format!("{} documents", stats.document_count)),
        };
        progress.finish_and_clear();

        match result {
            Ok(summary) => {
                log::info!("wrote {}", outfile.display());
                println!("  {assembler}: {} ({summary})", outfile.display());
            }
            Err(e) => {
                failures += 1;
                eprintln!("{}: {e}", console::style(format!("{assembler} failed")).red());
            }
        }
    }

    if failures > 0 {
        bail!(
            "{failures} of {} documents could not be produced",
            assemblers.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sinks::OutputFormat;
    use crate::test_support::png_set;

    #[test]
    fn series_comes_from_the_images_directory() {
        assert_eq!(
            series_from_dir(Path::new("/comics/Saga/issue-01")).expect("has a name"),
            "issue-01"
        );
        assert_eq!(
            series_from_dir(Path::new("/comics/Saga/images")).expect("has a name"),
            "Saga"
        );
        assert!(series_from_dir(Path::new("/")).is_err());
    }

    #[test]
    fn compiles_every_requested_format() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = Configuration::default();
        let namer = OutputNamer::new("Saga", Some(3));
        compile(&config, &png_set(&[(20, 30), (20, 30)]), &namer, dir.path())
            .expect("can compile");
        assert!(dir.path().join("Saga-03.pdf").is_file());
        assert!(dir.path().join("Saga-03.epub").is_file());
    }

    #[test]
    fn only_the_requested_format_is_written() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = Configuration {
            format: OutputFormat::Epub,
            ..Configuration::default()
        };
        let namer = OutputNamer::new("Saga", None);
        compile(&config, &png_set(&[(20, 30)]), &namer, dir.path()).expect("can compile");
        assert!(dir.path().join("Saga.epub").is_file());
        assert!(!dir.path().join("Saga.pdf").exists());
    }

    #[test]
    fn one_failing_format_keeps_the_other() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let mut config = Configuration::default();
        config.pdf.dpi = 0;
        let namer = OutputNamer::new("Saga", Some(1));
        let result = compile(&config, &png_set(&[(20, 30)]), &namer, dir.path());
        assert!(result.is_err());
        assert!(!dir.path().join("Saga-01.pdf").exists());
        assert!(dir.path().join("Saga-01.epub").is_file());
    }
}

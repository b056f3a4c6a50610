//! images-to-pdf CLI - convert a folder of images to PDF slides

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use images2pdf::{
    ConversionObserver, ConversionSummary, ConvertOptions, ImageRecord, Images2Pdf, Placement,
};

const RULE_WIDTH: usize = 80;

#[derive(Parser)]
#[command(name = "images-to-pdf")]
#[command(version, disable_version_flag = true)]
#[command(about = "Convert images in a folder to PDF slides with automatic analysis")]
#[command(after_help = "Examples:
  images-to-pdf                        # Use default 'images' folder
  images-to-pdf photos/                # Convert images from 'photos' folder
  images-to-pdf pics/ -o slides.pdf    # Custom output filename")]
struct Cli {
    /// Folder containing images
    #[arg(value_name = "IMAGES_FOLDER", default_value = "images")]
    images_folder: PathBuf,

    /// Output PDF filename
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "output_slides.pdf",
        env = "IMAGES2PDF_OUTPUT"
    )]
    output: PathBuf,

    /// Document title stored in the PDF metadata
    #[arg(long)]
    title: Option<String>,

    /// Only analyze the images, do not write a PDF
    #[arg(long)]
    inspect: bool,

    /// Print analysis results as JSON (with --inspect)
    #[arg(long, requires = "inspect")]
    json: bool,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    log::debug!(
        "{} {}",
        if cli.inspect { "Inspecting" } else { "Converting" },
        cli.images_folder.display()
    );

    let result = if cli.inspect {
        cmd_inspect(&cli.images_folder, cli.json)
    } else {
        cmd_convert(&cli.images_folder, &cli.output, cli.title)
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    folder: &Path,
    output: &Path,
    title: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = ConvertOptions::new();
    if let Some(title) = title {
        options = options.with_title(title);
    }

    let mut reporter = ConsoleReporter::new(Some(output.to_path_buf()));
    let summary = Images2Pdf::new()
        .with_options(options)
        .convert_observed(folder, output, &mut reporter)?;

    if summary.is_empty() {
        println!("{} {}", "No images found in".yellow(), folder.display());
    }

    Ok(())
}

fn cmd_inspect(folder: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let records = Images2Pdf::new().inspect(folder)?;
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let mut reporter = ConsoleReporter::new(None);
    let records = Images2Pdf::new().inspect_observed(folder, &mut reporter)?;
    if records.is_empty() {
        println!("{} {}", "No images found in".yellow(), folder.display());
    } else {
        println!("{}", "=".repeat(RULE_WIDTH).dimmed());
    }

    Ok(())
}

/// Prints scan results, per-image metadata and page progress.
struct ConsoleReporter {
    output: Option<PathBuf>,
    progress: Option<ProgressBar>,
}

impl ConsoleReporter {
    fn new(output: Option<PathBuf>) -> Self {
        Self {
            output,
            progress: None,
        }
    }

    fn start_progress(&mut self, total: usize) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        self.progress = Some(pb);
    }
}

impl ConversionObserver for ConsoleReporter {
    fn on_scan_complete(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        println!("\n{} {} images\n", "Found".green().bold(), count);
        println!("{}", "=".repeat(RULE_WIDTH).dimmed());
    }

    fn on_image_analyzed(&mut self, index: usize, total: usize, record: &ImageRecord) {
        println!("{}: {}", "Image".bold(), record.file_name());
        println!(
            "  Resolution: {} x {} pixels",
            record.width, record.height
        );
        println!("  Format: {}", record.format);
        println!("  Color Mode: {}", record.mode);
        println!("  DPI: {}", record.dpi);
        println!("  Aspect Ratio: {:.2}", record.aspect_ratio);
        println!();

        if index == total {
            if let Some(ref output) = self.output {
                println!("{}", "=".repeat(RULE_WIDTH).dimmed());
                println!("\n{} {}\n", "Creating PDF:".cyan().bold(), output.display());
                self.start_progress(total);
            }
        }
    }

    fn on_page_added(
        &mut self,
        index: usize,
        total: usize,
        record: &ImageRecord,
        _placement: &Placement,
    ) {
        if let Some(ref pb) = self.progress {
            pb.set_message(format!("Adding slide {}/{}: {}", index, total, record.file_name()));
            pb.inc(1);
        }
    }

    fn on_finished(&mut self, summary: &ConversionSummary) {
        if let Some(pb) = self.progress.take() {
            pb.finish_with_message("Done!");
        }
        if let Some(ref output) = summary.output {
            println!(
                "\n{} {}",
                "✓ PDF created successfully:".green().bold(),
                output.display()
            );
            println!("  Total pages: {}", summary.pages);
        }
    }
}

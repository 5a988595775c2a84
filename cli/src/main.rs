//! pageflow CLI - content plan pagination tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pageflow::render::{to_json, to_text};
use pageflow::{
    ColorScheme, Content, EmitOptions, EmptyInputPolicy, Exporter, Geometry, JsonFormat,
    TextRole,
};

#[derive(Parser)]
#[command(name = "pageflow")]
#[command(version)]
#[command(about = "Paginate channel content plans into PDF", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export content to a PDF file
    Render {
        /// Content JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Geometry JSON file
        #[arg(long, value_name = "FILE", env = "PAGEFLOW_GEOMETRY")]
        geometry: Option<PathBuf>,

        /// Use the dark color scheme
        #[arg(long)]
        dark: bool,

        /// Print "Page n of N" footers
        #[arg(long)]
        page_numbers: bool,

        /// Write a one-page document when there are no records
        #[arg(long)]
        blank_if_empty: bool,
    },

    /// Print the laid-out pages
    Layout {
        /// Content JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Geometry JSON file
        #[arg(long, value_name = "FILE", env = "PAGEFLOW_GEOMETRY")]
        geometry: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Output plain text instead of JSON
        #[arg(long, conflicts_with = "compact")]
        text: bool,
    },

    /// Show pagination statistics
    Info {
        /// Content JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Geometry JSON file
        #[arg(long, value_name = "FILE", env = "PAGEFLOW_GEOMETRY")]
        geometry: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            input,
            output,
            geometry,
            dark,
            page_numbers,
            blank_if_empty,
        } => cmd_render(
            &input,
            &output,
            geometry.as_deref(),
            dark,
            page_numbers,
            blank_if_empty,
        ),
        Commands::Layout {
            input,
            geometry,
            compact,
            text,
        } => cmd_layout(&input, geometry.as_deref(), compact, text),
        Commands::Info { input, geometry } => cmd_info(&input, geometry.as_deref()),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_geometry(path: Option<&Path>) -> pageflow::Result<Geometry> {
    match path {
        Some(p) => Geometry::from_json_file(p),
        None => Ok(Geometry::default()),
    }
}

fn cmd_render(
    input: &Path,
    output: &Path,
    geometry: Option<&Path>,
    dark: bool,
    page_numbers: bool,
    blank_if_empty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(80));

    pb.set_message("Reading content...");
    let content = Content::from_json_file(input)?;
    let geometry = load_geometry(geometry)?;
    log::debug!("Using geometry {:?}", geometry);

    let scheme = if dark {
        ColorScheme::Dark
    } else {
        ColorScheme::Light
    };
    let policy = if blank_if_empty {
        EmptyInputPolicy::BlankPage
    } else {
        EmptyInputPolicy::Skip
    };

    pb.set_message(format!("Paginating {} records...", content.record_count()));
    let exporter = Exporter::new()
        .with_geometry(geometry)
        .with_emit_options(
            EmitOptions::new()
                .with_color_scheme(scheme)
                .with_page_numbers(page_numbers),
        )
        .with_empty_input(policy);

    match exporter.export_to_dir(&content, output)? {
        Some(path) => {
            pb.finish_with_message("Done!");
            println!("{} {}", "Saved to".green(), path.display());
        }
        None => {
            pb.finish_and_clear();
            println!("{}", "No records to export, nothing written".yellow());
        }
    }

    Ok(())
}

fn cmd_layout(
    input: &Path,
    geometry: Option<&Path>,
    compact: bool,
    text: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = Content::from_json_file(input)?;
    let doc = pageflow::paginate(&content, &load_geometry(geometry)?)?;

    if text {
        println!("{}", to_text(&doc));
    } else {
        let format = if compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        println!("{}", to_json(&doc, format)?);
    }

    Ok(())
}

fn cmd_info(input: &Path, geometry: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = Content::from_json_file(input)?;
    let geometry = load_geometry(geometry)?;
    let doc = pageflow::paginate(&content, &geometry)?;

    println!("{}", "Content Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Records".bold(), content.record_count());
    let sections: usize = content.records.iter().map(|r| r.sections.len()).sum();
    println!("{}: {}", "Sections".bold(), sections);
    for record in &content.records {
        println!("  {} {}", "•".dimmed(), record.display_name());
    }

    println!();
    println!("{}", "Pagination".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!(
        "{}: {} x {} pt, margin {}",
        "Page".bold(),
        geometry.page_width,
        geometry.page_height,
        geometry.margin
    );
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {}", "Body lines".bold(), doc.count_role(TextRole::Body));
    println!("{}: {}", "Separators".bold(), doc.separator_count());

    let usable = geometry.usable_height();
    for page in &doc.pages {
        let fill = if usable > 0.0 {
            page.used_height / usable * 100.0
        } else {
            0.0
        };
        println!(
            "  {} page {}: {} instructions, {:.0}% filled",
            "•".dimmed(),
            page.number,
            page.instructions.len(),
            fill
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pageflow".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Content plan pagination tool");
    println!();
    println!("Output file: {}", pageflow::DEFAULT_FILE_NAME.dimmed());
    println!("License: MIT");
}

//! decknotes CLI - slide-deck PDF to structured Word notes

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use decknotes::{ConvertOptions, Decknotes};

#[derive(Parser)]
#[command(name = "decknotes")]
#[command(version)]
#[command(about = "Convert slide-deck PDFs to structured Word notes", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output .docx file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a deck PDF to a .docx outline
    Convert {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output .docx file (next to the input if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Treat every plain line as its own bullet
        #[arg(long)]
        all_bullets: bool,

        /// Remap the output against a Word template as a final stage
        #[arg(long, value_name = "DOCX")]
        template: Option<PathBuf>,
    },

    /// Rebind a document's lists to a template's numbering
    Remap {
        /// Source .docx file
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Template .docx file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Output .docx file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Print a deck's semantic outline as JSON
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            all_bullets,
            template,
        }) => cmd_convert(&input, output.as_deref(), all_bullets, template),
        Some(Commands::Remap {
            source,
            template,
            output,
        }) => cmd_remap(&source, &template, &output),
        Some(Commands::Outline { input, compact }) => cmd_outline(&input, compact),
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), false, None)
            } else {
                println!("{}", "Usage: decknotes <FILE> [OUTPUT]".yellow());
                println!("       decknotes --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("docx")
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    all_bullets: bool,
    template: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input));

    let mut builder = Decknotes::new();
    if all_bullets {
        builder = builder.all_bullets();
    }
    if let Some(template) = template {
        builder = builder.with_template(template);
    }

    let stats = builder.convert(input, &output)?;

    println!("{} {}", "Saved to".green(), output.display());
    println!(
        "  {} pages ({} skipped), {} titles, {} headings, {} bullets",
        stats.pages_emitted, stats.pages_skipped, stats.titles, stats.headings, stats.bullets
    );
    if stats.dropped_continuations > 0 {
        println!(
            "  {} {} continuation line(s) had no bullet to attach to",
            "Warning:".yellow(),
            stats.dropped_continuations
        );
    }
    Ok(())
}

fn cmd_remap(
    source: &Path,
    template: &Path,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    decknotes::remap_file(source, template, output)?;
    println!("{} {}", "Saved to".green(), output.display());
    Ok(())
}

fn cmd_outline(input: &Path, compact: bool) -> Result<(), Box<dyn std::error::Error>> {
    let options = ConvertOptions::new();
    let source = decknotes::PdfSource::open(input)?;
    let result = decknotes::outline_from_source(&source, &options)?;
    let json = decknotes::outline_to_json(&result.outline, !compact)?;
    println!("{json}");
    Ok(())
}

//! docmint CLI - fill Word templates from a configuration and a data file

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::LevelFilter;

use docmint::ooxml::docx::Package;
use docmint::template::{Generator, Template, TemplateConfig, parse_payload};

#[derive(Parser)]
#[command(name = "docmint")]
#[command(version)]
#[command(about = "Fill .docx templates with data while keeping their formatting", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a document from a template
    Generate {
        /// Template .docx file
        #[arg(short, long, value_name = "FILE")]
        template: PathBuf,

        /// Template configuration (YAML or JSON)
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Request data (YAML or JSON); "-" reads stdin
        #[arg(short, long, value_name = "FILE")]
        data: PathBuf,

        /// Output file or directory (named from the data if a directory)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Print every paragraph of a document with its location
    Inspect {
        /// Input .docx file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let result = match cli.command {
        Commands::Generate {
            template,
            config,
            data,
            output,
        } => cmd_generate(&template, &config, &data, output.as_deref()),
        Commands::Inspect { input } => cmd_inspect(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_generate(
    template: &Path,
    config: &Path,
    data: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let template = Template::open(template)?;
    let config = TemplateConfig::load(config)?;

    let payload = if data == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        text
    } else {
        fs::read_to_string(data)?
    };
    let record = config.normalize(parse_payload(&payload)?);

    let generated = Generator::from_config(&config, &record)?.generate(&template)?;

    let output = match output {
        Some(path) if !path.is_dir() => path.to_path_buf(),
        dir => {
            let name = config.output_name(&record, chrono::Local::now().naive_local());
            dir.unwrap_or(Path::new(".")).join(name)
        },
    };
    fs::write(&output, &generated.bytes)?;

    let report = generated.report;
    println!(
        "{}: {} substitution(s), {} row(s) removed, {} row(s) inserted, {} paragraph(s) cleaned",
        output.display(),
        report.substitutions,
        report.rows.removed,
        report.rows.inserted,
        report.paragraphs_cleaned
    );
    if report.rows.anchors_missing > 0 {
        println!("{} inserted row(s) appended at the end: anchor not found", report.rows.anchors_missing);
    }
    Ok(())
}

fn cmd_inspect(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let document = Package::open(input)?.into_document()?;
    document.visit_paragraphs(|location, paragraph| {
        let text = paragraph.text();
        if !text.is_empty() {
            println!("{location}\t{text}");
        }
    });
    Ok(())
}

//! mddocx CLI - configuration-driven Markdown conversion tool

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use mddocx::layout::{PatternCache, WidthResolver, DEFAULT_TOTAL_WIDTH, PATTERNS_FILE};
use mddocx::{ConvertOptions, ConvertResult, Converter, DocConfig, TemplateRegistry};

#[derive(Parser)]
#[command(name = "mddocx")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert Markdown to formatted documents from JSON configurations", long_about = None)]
struct Cli {
    /// Document configuration files
    #[arg(value_name = "CONFIG")]
    configs: Vec<PathBuf>,

    /// Project root that config paths resolve against
    #[arg(long, value_name = "DIR", env = "MDDOCX_ROOT")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one or more documents
    Convert {
        /// Document configuration files
        #[arg(value_name = "CONFIG", required = true)]
        configs: Vec<PathBuf>,

        /// Project root that config paths resolve against
        #[arg(long, value_name = "DIR", env = "MDDOCX_ROOT")]
        root: Option<PathBuf>,

        /// Override the configured template
        #[arg(short, long)]
        template: Option<String>,

        /// Shared width pattern file
        #[arg(long, value_name = "FILE")]
        patterns: Option<PathBuf>,

        /// Total table width in DXA
        #[arg(long, default_value_t = DEFAULT_TOTAL_WIDTH)]
        table_width: u32,
    },

    /// Print the body elements of a document as JSON
    Elements {
        /// Document configuration file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Project root that config paths resolve against
        #[arg(long, value_name = "DIR", env = "MDDOCX_ROOT")]
        root: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Resolve column widths for a table header row
    Widths {
        /// Header cells
        #[arg(value_name = "HEADER", required = true)]
        headers: Vec<String>,

        /// Configuration supplying document patterns and the document type
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Project root holding the shared pattern file
        #[arg(long, value_name = "DIR", env = "MDDOCX_ROOT")]
        root: Option<PathBuf>,

        /// Total table width in DXA
        #[arg(long, default_value_t = DEFAULT_TOTAL_WIDTH)]
        total: u32,
    },

    /// List available templates
    Templates,

    /// Show version information
    Version,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            configs,
            root,
            template,
            patterns,
            table_width,
        }) => cmd_convert(
            &configs,
            root.as_deref(),
            template.as_deref(),
            patterns,
            table_width,
        ),
        Some(Commands::Elements {
            config,
            root,
            compact,
        }) => cmd_elements(&config, root.as_deref(), compact),
        Some(Commands::Widths {
            headers,
            config,
            root,
            total,
        }) => cmd_widths(&headers, config.as_deref(), root.as_deref(), total),
        Some(Commands::Templates) => {
            cmd_templates();
            Ok(())
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if configs are provided
            if cli.configs.is_empty() {
                println!("{}", "Usage: mddocx <CONFIG>...".yellow());
                println!("       mddocx --help for more information");
                Ok(())
            } else {
                cmd_convert(
                    &cli.configs,
                    cli.root.as_deref(),
                    None,
                    None,
                    DEFAULT_TOTAL_WIDTH,
                )
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn project_root(root: Option<&Path>) -> PathBuf {
    root.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn load_config(path: &Path, template: Option<&str>) -> mddocx::Result<DocConfig> {
    let config = DocConfig::from_path(path)?;
    Ok(match template {
        Some(name) => config.with_template(name),
        None => config,
    })
}

fn cmd_convert(
    configs: &[PathBuf],
    root: Option<&Path>,
    template: Option<&str>,
    patterns: Option<PathBuf>,
    table_width: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = ConvertOptions::new(project_root(root)).with_table_width(table_width);
    if let Some(path) = patterns {
        options = options.with_patterns_path(path);
    }
    let converter = Converter::new(options);

    // Configuration errors are fatal before anything is written.
    let loaded = configs
        .iter()
        .map(|path| load_config(path, template).map(|config| (path, config)))
        .collect::<mddocx::Result<Vec<_>>>()?;
    log::debug!(
        "Loaded {} configuration(s), project root {}",
        loaded.len(),
        converter.options().project_root().display()
    );

    let pb = ProgressBar::new(loaded.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    let mut results = Vec::with_capacity(loaded.len());
    for (path, config) in &loaded {
        pb.set_message(format!("Converting {}...", path.display()));
        results.push(converter.convert(config)?);
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    let last = results.len().saturating_sub(1);
    for (i, result) in results.iter().enumerate() {
        let branch = if i == last { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), summarize(result));
    }

    Ok(())
}

fn summarize(result: &ConvertResult) -> String {
    let stats = &result.stats;
    let mut line = format!(
        "{} ({} headings, {} tables, {} images, {} page breaks)",
        result.output_path.display(),
        stats.heading_count,
        stats.table_count,
        stats.image_count,
        stats.page_break_count
    );
    if !result.warnings.is_empty() {
        let warnings = format!("{} warning(s)", result.warnings.len());
        line.push_str(&format!(" {}", warnings.yellow()));
    }
    line
}

fn cmd_elements(
    config_path: &Path,
    root: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path, None)?;
    let converter = Converter::new(ConvertOptions::new(project_root(root)));
    let assembly = converter.assemble(&config)?;

    let json = if compact {
        serde_json::to_string(&assembly.document.elements)?
    } else {
        serde_json::to_string_pretty(&assembly.document.elements)?
    };
    println!("{}", json);

    for warning in assembly.warnings.iter() {
        eprintln!("{}: {}", "Warning".yellow().bold(), warning);
    }

    Ok(())
}

fn cmd_widths(
    headers: &[String],
    config_path: Option<&Path>,
    root: Option<&Path>,
    total: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_path.map(|p| load_config(p, None)).transpose()?;
    let cache = PatternCache::new(project_root(root).join(PATTERNS_FILE));

    let mut resolver = WidthResolver::new()
        .with_shared(cache.get())
        .with_total(total);
    if let Some(ref config) = config {
        resolver = resolver
            .with_document_patterns(&config.table_widths)
            .with_doc_type(config.doc_type.as_deref());
    }

    let (widths, source) = resolver.resolve_with_source(headers);

    println!("{}", "Column Widths".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (header, width) in headers.iter().zip(&widths) {
        println!("{}: {}", header.bold(), width);
    }
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {:?}", "Source".bold(), source);
    println!("{}: {}", "Total".bold(), widths.iter().sum::<u32>());

    Ok(())
}

fn cmd_templates() {
    println!("{}", "Templates".cyan().bold());
    for name in TemplateRegistry::with_defaults().names() {
        println!("  {} {}", "-".dimmed(), name);
    }
}

fn cmd_version() {
    println!("{} {}", "mddocx".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Configuration-driven Markdown conversion tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/mddocx".dimmed());
    println!("License: MIT");
}

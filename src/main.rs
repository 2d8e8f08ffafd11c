use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use gst::output::{self, TreeReport};
use gst::tree::{BuildConfig, BuiltSuffixTree, SuffixTreeBuilder};
use gst::utils::{build_spinner, get_config_path, load_config, save_config};
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gst")]
#[command(about = "Build generalized suffix trees with Ukkonen's algorithm")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the tree and show construction statistics
    Stats {
        #[command(flatten)]
        input: InputArgs,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the tree, one edge label per line
    Dump {
        #[command(flatten)]
        input: InputArgs,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// List every suffix stored in the tree
    Suffixes {
        #[command(flatten)]
        input: InputArgs,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Write a configuration file with default settings
    InitConfig {
        /// Destination (defaults to the app data directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Files to index (or strings with --literal)
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Treat inputs as document contents instead of file paths
    #[arg(short, long)]
    literal: bool,

    /// Build one tree per input, in parallel
    #[arg(short, long)]
    separate: bool,

    /// Configuration file (defaults to the app data directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { input, json } => {
            let reports: Vec<TreeReport> = build_all(&input)?
                .iter()
                .map(|(name, built)| TreeReport::new(name.clone(), built))
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    output::print_report(report)?;
                }
            }
        }
        Commands::Dump { input, no_color } => {
            for (name, built) in build_all(&input)? {
                if input.separate {
                    println!("# {}", name);
                }
                output::print_tree(&built.tree, !no_color)?;
            }
        }
        Commands::Suffixes { input, no_color } => {
            for (name, built) in build_all(&input)? {
                if input.separate {
                    println!("# {}", name);
                }
                output::print_suffixes(&built.tree, !no_color)?;
            }
        }
        Commands::InitConfig { path, force } => {
            let target = path.clone().or_else(get_config_path);
            if let Some(target) = target.filter(|t| t.exists()) {
                if !force {
                    bail!("{} already exists (use --force to overwrite)", target.display());
                }
            }
            let written = save_config(&BuildConfig::default(), path.as_deref())?;
            println!("Wrote {}", written.display());
        }
    }

    Ok(())
}

/// Read the inputs and build one combined tree, or one tree per input
fn build_all(input: &InputArgs) -> Result<Vec<(String, BuiltSuffixTree)>> {
    let config = load_config(input.config.as_deref())?;
    if input.verbose {
        eprintln!(
            "gst: suffix links {}, max document length {}",
            if config.suffix_links { "on" } else { "off" },
            config.max_text_len
        );
    }

    let documents = input
        .inputs
        .iter()
        .map(|raw| read_document(raw, input.literal).map(|content| (raw.clone(), content)))
        .collect::<Result<Vec<_>>>()?;

    let spinner = build_spinner("Building suffix tree...", !input.verbose);
    let result = if input.separate {
        // Independent builds share nothing, so they can run side by side
        documents
            .par_iter()
            .map(|(name, content)| {
                let built = build_one(std::slice::from_ref(content), &config, input.verbose)
                    .with_context(|| format!("Failed to build tree for {}", name))?;
                Ok((name.clone(), built))
            })
            .collect::<Result<Vec<_>>>()
    } else {
        let contents: Vec<String> = documents.iter().map(|(_, c)| c.clone()).collect();
        build_one(&contents, &config, input.verbose).map(|built| vec![("combined".to_string(), built)])
    };
    spinner.finish_and_clear();
    result
}

fn build_one(contents: &[String], config: &BuildConfig, verbose: bool) -> Result<BuiltSuffixTree> {
    let mut builder = SuffixTreeBuilder::new(config.clone());
    for content in contents {
        if builder.add_document(content)?.is_none() && verbose {
            eprintln!(
                "gst: skipping document of {} characters (limit {})",
                content.chars().count(),
                config.max_text_len
            );
        }
    }

    let start = std::time::Instant::now();
    let built = builder.build()?;
    if verbose {
        eprintln!(
            "gst: built {} nodes over {} characters in {:?}",
            built.root().node_count(),
            built.tree.text().len(),
            start.elapsed()
        );
    }
    Ok(built)
}

fn read_document(raw: &str, literal: bool) -> Result<String> {
    if literal {
        return Ok(raw.to_string());
    }
    fs::read_to_string(raw).with_context(|| format!("Failed to read {}", raw))
}

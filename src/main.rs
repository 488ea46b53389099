//! `docskel` command-line interface.
//!
//! ```text
//! docskel extract reports/ -o template_output
//! docskel extract a.docx b.docx c.docx --boilerplate-threshold 0.8
//! docskel extract --input-list corpus.json --config mining.yaml
//! docskel analyze template_output/doc_profiles
//! ```
//!
//! The template is printed to stdout; logs go to stderr.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use docskel::{
    AnchorVocabulary, ClassificationMode, InputFormat, MiningConfig, MiningRun, discover_documents,
    mine_directory, mine_template, read_input_list, write_artifacts,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "docskel")]
#[command(about = "Mine the boilerplate skeleton of a report family from example documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mine a template from DOCX files or a directory of them.
    Extract {
        /// Input files, or a single directory.
        inputs: Vec<PathBuf>,

        /// JSON file holding an array of input paths.
        #[arg(long)]
        input_list: Option<PathBuf>,

        /// Output directory for the template and diagnostics.
        #[arg(short, long, default_value = "template_output")]
        output: PathBuf,

        #[command(flatten)]
        mining: MiningArgs,
    },

    /// Re-mine a template from saved document profiles.
    Analyze {
        /// Directory of `*.json` profiles written by a previous extract.
        profiles_dir: PathBuf,

        /// Also write artifacts to this directory.
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        mining: MiningArgs,
    },
}

#[derive(Args, Debug)]
struct MiningArgs {
    /// YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fraction of documents a paragraph must appear in to be boilerplate.
    #[arg(long)]
    boilerplate_threshold: Option<f64>,

    /// Minimum similarity for a heading to match an anchor.
    #[arg(long)]
    anchor_threshold: Option<f64>,

    #[arg(long)]
    ngram_min: Option<usize>,

    #[arg(long)]
    ngram_max: Option<usize>,

    /// Require presence in every document.
    #[arg(long)]
    strict: bool,

    /// Ingest documents in parallel.
    #[arg(long)]
    parallel: bool,

    #[arg(long)]
    family_id: Option<String>,

    #[arg(long)]
    family_name: Option<String>,

    /// Anchor vocabulary file, one entry per line.
    #[arg(long)]
    vocabulary: Option<PathBuf>,
}

impl MiningArgs {
    fn load(&self) -> Result<MiningConfig> {
        let mut cfg = match &self.config {
            Some(path) => MiningConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => MiningConfig::default(),
        };

        if let Some(threshold) = self.boilerplate_threshold {
            cfg.miner.boilerplate_threshold = threshold;
        }
        if let Some(threshold) = self.anchor_threshold {
            cfg.miner.anchor_similarity_threshold = threshold;
        }
        if let Some(n) = self.ngram_min {
            cfg.miner.ngram_min = n;
        }
        if let Some(n) = self.ngram_max {
            cfg.miner.ngram_max = n;
        }
        if self.strict {
            cfg.miner.classification_mode = ClassificationMode::StrictIntersection;
        }
        if self.parallel {
            cfg.parallel = true;
        }
        if let Some(id) = &self.family_id {
            cfg.family_id = id.clone();
        }
        if let Some(name) = &self.family_name {
            cfg.family_name = name.clone();
        }
        if let Some(path) = &self.vocabulary {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading vocabulary {}", path.display()))?;
            cfg.miner.vocabulary = AnchorVocabulary::from_lines(&text)
                .with_context(|| format!("parsing vocabulary {}", path.display()))?;
        }

        cfg.validate().context("invalid configuration")?;
        Ok(cfg)
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn collect_inputs(inputs: &[PathBuf], input_list: Option<&Path>) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    if let Some(list) = input_list {
        paths.extend(read_input_list(list)?);
    }
    for input in inputs {
        if input.is_dir() {
            let found = discover_documents(input, InputFormat::Docx)
                .with_context(|| format!("scanning {}", input.display()))?;
            if found.is_empty() {
                bail!("no .docx files in {}", input.display());
            }
            paths.extend(found);
        } else {
            paths.push(input.clone());
        }
    }
    if paths.is_empty() {
        bail!("no input documents given");
    }
    Ok(paths)
}

fn finish(run: &MiningRun, output: Option<&Path>) -> Result<()> {
    for skipped in &run.skipped {
        info!(source = %skipped.source, reason = %skipped.reason, "document_skipped");
    }
    if let Some(dir) = output {
        let paths = write_artifacts(run, dir)?;
        info!(template = %paths.template_spec.display(), "template_written");
    }
    println!("{}", serde_json::to_string_pretty(&run.template)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    match cli.command {
        Command::Extract {
            inputs,
            input_list,
            output,
            mining,
        } => {
            let cfg = mining.load()?;
            let paths = collect_inputs(&inputs, input_list.as_deref())?;
            info!(documents = paths.len(), "extract_start");
            let run = mine_template(&paths, &cfg)?;
            finish(&run, Some(&output))
        }
        Command::Analyze {
            profiles_dir,
            output,
            mining,
        } => {
            let cfg = mining.load()?;
            let run = mine_directory(&profiles_dir, InputFormat::SavedProfile, &cfg)?;
            finish(&run, output.as_deref())
        }
    }
}

use std::cell::RefCell;
use std::env;

use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use strata_core::config::{expand_path, Config};
use strata_core::ingest::ParagraphIngestor;
use strata_core::partition::FixedSizePartitioner;
use strata_core::summarize::{CommandSummarizer, ExtractiveSummarizer};
use strata_core::{create_summarizer, BuildObserver, Document, IndexBuilder, Layer, LayerBuilder, QueryParams, Summarizer};
use strata_text::TantivyIndexBuilder;

const USAGE: &str = "Usage: strata <resource> [--query TEXT] [--level N] [--top-k K] [--max-layers N] [--block-size N] [--command PROG [ARGS...] --] [--json]";

#[derive(Debug, Default)]
struct Args {
    resource: String,
    query: Option<String>,
    level: i64,
    top_k: Option<usize>,
    max_layers: Option<usize>,
    block_size: Option<usize>,
    command: Option<Vec<String>>,
    json: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut parsed = Args::default();
    let mut resource = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--query" | "-q" => { parsed.query = Some(value(&args, i)?.to_string()); i += 2; }
            "--level" | "-l" => { parsed.level = value(&args, i)?.parse()?; i += 2; }
            "--top-k" => { parsed.top_k = Some(value(&args, i)?.parse()?); i += 2; }
            "--max-layers" => { parsed.max_layers = Some(value(&args, i)?.parse()?); i += 2; }
            "--block-size" => { parsed.block_size = Some(value(&args, i)?.parse()?); i += 2; }
            "--command" => {
                // program and its arguments run until `--` or the end
                let argv: Vec<String> = args[i + 1..].iter().take_while(|a| a.as_str() != "--").cloned().collect();
                if argv.is_empty() { anyhow::bail!("--command requires a program\n{USAGE}"); }
                i += argv.len() + 2;
                parsed.command = Some(argv);
            }
            "--json" => { parsed.json = true; i += 1; }
            "--help" | "-h" => { println!("{USAGE}"); std::process::exit(0); }
            s if s.starts_with('-') => anyhow::bail!("Unknown flag: {s}\n{USAGE}"),
            s => { if resource.is_none() { resource = Some(s.to_string()); } i += 1; }
        }
    }
    parsed.resource = resource.ok_or_else(|| anyhow::anyhow!("Missing <resource> argument\n{USAGE}"))?;
    Ok(parsed)
}

fn value(args: &[String], i: usize) -> anyhow::Result<&str> {
    args.get(i + 1).map(String::as_str).ok_or_else(|| anyhow::anyhow!("{} requires a value", args[i]))
}

/// One progress bar per summarized layer.
#[derive(Default)]
struct ProgressObserver {
    bar: RefCell<Option<ProgressBar>>,
}

impl BuildObserver for ProgressObserver {
    fn layer_started(&self, level: usize, block_count: usize) {
        let pb = ProgressBar::new(block_count as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} blocks {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb.set_message(format!("layer {level}"));
        *self.bar.borrow_mut() = Some(pb);
    }

    fn block_summarized(&self, level: usize, block_index: usize, block_count: usize, _summary: &Document) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_position((block_index + 1) as u64);
            pb.set_message(format!("layer {level}: block {}/{block_count}", block_index + 1));
        }
    }

    fn layer_built(&self, level: usize, layer: &Layer) {
        if let Some(pb) = self.bar.borrow_mut().take() { pb.finish_and_clear(); }
        println!("📚 Layer {level}: {} documents", layer.len());
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {e}"); e })?;
    let mut settings = config.settings()?;
    let args = parse_args()?;
    if let Some(block_size) = args.block_size { settings.block_size = block_size; }
    if args.max_layers.is_some() { settings.max_layers = args.max_layers; }
    if args.command.is_some() { settings.command = args.command.clone(); }
    settings.validate()?;

    let ingestor = ParagraphIngestor::new().with_max_tokens(settings.max_tokens);
    let partitioner = FixedSizePartitioner::new(settings.block_size)?;
    let summarizer: Box<dyn Summarizer> = match &settings.command {
        Some(argv) => Box::new(CommandSummarizer::from_argv(argv)?),
        None => Box::new(ExtractiveSummarizer::new().with_max_chars(settings.max_summary_chars)),
    };
    let indexer: Box<dyn IndexBuilder> = match &settings.index_dir {
        Some(dir) => Box::new(TantivyIndexBuilder::persistent(expand_path(dir))),
        None => Box::new(TantivyIndexBuilder::in_ram()),
    };
    let observer = ProgressObserver::default();
    let builder = LayerBuilder::new(&partitioner, summarizer.as_ref(), indexer.as_ref())
        .with_max_layers(settings.max_layers)
        .with_observer(&observer);

    println!("Strata summarizer\n=================");
    println!("Resource: {}", args.resource);
    let resource = create_summarizer(&args.resource, &ingestor, &builder)?;
    println!("✅ Built {} levels of detail", resource.levels_of_detail());

    if let Some(query) = &args.query {
        let mut params = QueryParams::default();
        if let Some(k) = args.top_k { params = params.with_top_k(k); }
        tracing::info!(level = args.level, top_k = params.similarity_top_k, "answering query");
        let response = resource.query(query, args.level, &params)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else {
            println!("\nQuery: {query} (level {})\n", args.level);
            println!("{}", response.answer);
            for (i, s) in response.sources.iter().enumerate() {
                println!("{:>2}. score={:.3} id={}", i + 1, s.score, s.document_id);
            }
        }
    }
    Ok(())
}

// Copyright 2026 Paramprobe Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::path::PathBuf;
use std::sync::Arc;

use paramprobe::extract::TagExtractor;
use paramprobe::fetch::HttpClient;
use paramprobe::pipeline::{self, ScanConfig};
use paramprobe::sink::OutputSink;
use paramprobe::transform::QuerySynthesizer;

#[derive(Parser)]
#[command(
    name = "paramprobe",
    about = "Concurrent form-field prober — scan URLs for <input>/<textarea> fields",
    version,
    after_help = "URLs are read one per line from stdin:\n  cat urls.txt | paramprobe -c 20 --hidden-only"
)]
struct Cli {
    /// Number of concurrent fetch workers
    #[arg(short = 'c', long, default_value_t = 50)]
    concurrency: usize,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 10, value_name = "SECONDS")]
    timeout: u64,

    /// Write a copy of the output to this file (overwrite)
    #[arg(short = 'o', long, value_name = "FILE", conflicts_with = "append_output")]
    output: Option<PathBuf>,

    /// Append a copy of the output to this file instead of overwriting
    #[arg(long, value_name = "FILE")]
    append_output: Option<PathBuf>,

    /// Skip TLS certificate verification
    #[arg(long)]
    insecure: bool,

    /// Do not synthesize probe URLs from extracted field names
    #[arg(long)]
    no_transform: bool,

    /// Restrict extracted tags to hidden-type inputs
    #[arg(long)]
    hidden_only: bool,

    /// Report per-URL errors and emit a header for every URL
    #[arg(long, short)]
    verbose: bool,

    /// Suppress the startup banner (data output is unaffected)
    #[arg(long)]
    silent: bool,

    /// Emit one JSON object per URL instead of text blocks
    #[arg(long)]
    json: bool,

    /// Generate shell completion scripts and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

const BANNER: &str = r"
                                             __
   ___  ___ ________ ___ _  ___  _______  ___/ /  ___
  / _ \/ _ `/ __/ _ `/  ' \/ _ \/ __/ _ \/ _  \/ -_)
 / .__/\_,_/_/  \_,_/_/_/_/ .__/_/  \___/\_,__/\__/
/_/                      /_/";

/// Banner and status go to stderr; stdout carries scan results only.
fn print_banner() {
    eprintln!("{BANNER}");
    eprintln!("{:>54}\n", format!("paramprobe v{}", env!("CARGO_PKG_VERSION")));
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "paramprobe", &mut std::io::stdout());
        return;
    }

    let default_level = if cli.verbose {
        "paramprobe=debug"
    } else {
        "paramprobe=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    if !cli.silent {
        print_banner();
    }

    // 0=success after full drain, 1=fatal setup or input error
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let sink = match (&cli.output, &cli.append_output) {
        (Some(path), _) => OutputSink::with_file(path, false)?,
        (None, Some(path)) => OutputSink::with_file(path, true)?,
        (None, None) => OutputSink::stdout_only(),
    };

    let client = HttpClient::new(cli.timeout, cli.insecure)?;
    let extractor = TagExtractor::new(cli.hidden_only);
    let synthesizer = QuerySynthesizer::new();
    let config = ScanConfig {
        workers: cli.concurrency,
        verbose: cli.verbose,
        transform: !cli.no_transform,
        json: cli.json,
    };

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    pipeline::run(stdin, client, extractor, synthesizer, config, Arc::new(sink)).await
}

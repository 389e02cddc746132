//! Scan pipeline: a dispatcher feeding a fixed pool of fetch workers.
//!
//! URLs are read lazily from the input stream and pushed onto a bounded
//! channel. Exactly `workers` tasks share the receiving end and pull until
//! the channel is closed and drained; joining every task is the completion
//! barrier. Per-URL failures are logged and skipped — only an input read
//! error aborts the run. Completion order across URLs is unspecified, but
//! each URL's output block reaches the sink in one call.

use crate::extract::TagExtractor;
use crate::fetch::HttpClient;
use crate::sink::OutputSink;
use crate::transform::QuerySynthesizer;
use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Behavioral knobs for one scan run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Number of concurrent fetch workers.
    pub workers: usize,
    /// Report per-URL errors and emit a header for every URL.
    pub verbose: bool,
    /// Emit a synthesized probe URL per matched response.
    pub transform: bool,
    /// One JSON object per URL instead of text blocks.
    pub json: bool,
}

/// One reported URL in `--json` mode.
#[derive(Serialize)]
struct ScanRecord<'a> {
    url: &'a str,
    tags: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    transform_url: Option<&'a str>,
}

/// Run the scan to completion: dispatch every input line to the worker
/// pool, then block until the pool drains.
pub async fn run<R>(
    input: R,
    client: HttpClient,
    extractor: TagExtractor,
    synthesizer: QuerySynthesizer,
    config: ScanConfig,
    sink: Arc<OutputSink>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let workers = config.workers.max(1);
    let (tx, rx) = mpsc::channel::<String>(workers * 2);
    let rx = Arc::new(Mutex::new(rx));
    let extractor = Arc::new(extractor);
    let synthesizer = Arc::new(synthesizer);
    let config = Arc::new(config);

    let mut pool = JoinSet::new();
    for _ in 0..workers {
        let rx = rx.clone();
        let client = client.clone();
        let extractor = extractor.clone();
        let synthesizer = synthesizer.clone();
        let config = config.clone();
        let sink = sink.clone();
        pool.spawn(async move {
            loop {
                // Lock held only for the recv; released before the fetch.
                let url = { rx.lock().await.recv().await };
                let Some(url) = url else { break };
                process_url(&url, &client, &extractor, &synthesizer, &config, &sink).await;
            }
        });
    }

    let mut lines = input.lines();
    let mut dispatched = 0usize;
    while let Some(line) = lines.next_line().await.context("read input stream")? {
        if line.is_empty() {
            continue;
        }
        // Send only fails when every worker is gone, which means a panic
        // already tore the pool down; join_next below surfaces it.
        if tx.send(line).await.is_err() {
            break;
        }
        dispatched += 1;
    }
    drop(tx); // closes the channel; workers drain what's queued and exit

    while let Some(joined) = pool.join_next().await {
        joined.context("scan worker panicked")?;
    }

    info!("scan complete: {dispatched} URLs dispatched");
    Ok(())
}

/// Fetch → extract → report for one URL. Never fails the worker.
async fn process_url(
    url: &str,
    client: &HttpClient,
    extractor: &TagExtractor,
    synthesizer: &QuerySynthesizer,
    config: &ScanConfig,
    sink: &OutputSink,
) {
    debug!("fetching {url}");
    let body = match client.get(url).await {
        Ok(body) => body,
        Err(e) => {
            debug!("fetch failed for {url}: {e}");
            if config.verbose {
                if config.json {
                    let record = serde_json::json!({ "url": url, "error": e.to_string() });
                    sink.write_block(&format!("{record}\n"));
                } else {
                    sink.write_block(&format!("{url}: {e}\n"));
                }
            }
            return;
        }
    };

    let tags = extractor.extract(&body);
    let transform_url = if config.transform {
        let rewritten = synthesizer.rewrite(url, &tags);
        if rewritten != url {
            Some(rewritten)
        } else {
            None
        }
    } else {
        None
    };

    if config.json {
        if tags.is_empty() && transform_url.is_none() && !config.verbose {
            return;
        }
        let record = ScanRecord {
            url,
            tags: &tags,
            transform_url: transform_url.as_deref(),
        };
        match serde_json::to_string(&record) {
            Ok(line) => sink.write_block(&format!("{line}\n")),
            Err(e) => debug!("serialize record for {url}: {e}"),
        }
        return;
    }

    let block = render_block(url, &tags, transform_url.as_deref(), config.verbose);
    if !block.is_empty() {
        sink.write_block(&block);
    }
}

/// Text-mode output for one URL: header line, one line per tag, blank
/// separator, then the optional probe line. Empty when there is nothing to
/// say (no tags, not verbose).
fn render_block(url: &str, tags: &[&str], transform_url: Option<&str>, verbose: bool) -> String {
    let mut block = String::new();
    if verbose || !tags.is_empty() {
        block.push_str("URL: ");
        block.push_str(url);
        block.push('\n');
        for tag in tags {
            block.push_str(tag);
            block.push('\n');
        }
        block.push('\n');
    }
    if let Some(probe) = transform_url {
        block.push_str("TRANSFORM_URL: ");
        block.push_str(probe);
        block.push('\n');
    }
    block
}

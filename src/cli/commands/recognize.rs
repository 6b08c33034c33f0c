//! Batch recognition command.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::cover::HttpCoverFetcher;
use crate::metadata::LoftyTagWriter;
use crate::recognition::{self, Backend, RetryPolicy};
use crate::scanner;
use crate::tagger::{Tagger, TaggerOptions};

use super::{OutputArgs, progress_bar, resolve_api_key, transfer_verb};

/// Borrowed `recognize` arguments
pub struct RecognizeOptions<'a> {
    pub dir: &'a Path,
    pub dry_run: bool,
    pub delay: Option<u64>,
    pub retries: Option<u32>,
    pub extensions: Option<&'a str>,
    pub output: &'a OutputArgs,
    pub backend: Option<Backend>,
    pub api_key: Option<&'a str>,
    pub plan: Option<&'a Path>,
}

/// Recognize, rename and tag every matching file under a directory
pub fn cmd_recognize(rt: &Runtime, config: &Config, args: &RecognizeOptions<'_>) -> anyhow::Result<()> {
    let extensions = args
        .extensions
        .map(scanner::normalize_extensions)
        .unwrap_or_else(|| config.scan.extensions.clone());

    let files =
        scanner::discover_audio_files(args.dir, &extensions, &config.scan.exclude_dir_keywords)?;
    if files.is_empty() {
        println!(
            "No files with extensions {:?} found in {}.",
            extensions,
            args.dir.display()
        );
        return Ok(());
    }

    let backend = args.backend.unwrap_or(config.recognition.backend);
    let recognizer = recognition::build(
        backend,
        &config.recognition,
        resolve_api_key(args.api_key, config),
    )?;

    let retry = RetryPolicy::new(
        args.retries.unwrap_or(config.recognition.retries),
        Duration::from_secs(args.delay.unwrap_or(config.recognition.delay_secs)),
    );
    let placement = args.output.placement(&config.output);

    let tagger = Tagger::new(
        recognizer,
        Arc::new(HttpCoverFetcher::new()),
        Arc::new(LoftyTagWriter),
        TaggerOptions {
            retry,
            placement: placement.clone(),
            modify: !args.dry_run,
        },
    );

    println!(
        "Recognizing {} file(s) with {} ({} attempt(s), {}s apart)",
        files.len(),
        backend,
        retry.attempts.max(1),
        retry.delay.as_secs()
    );
    if args.dry_run {
        println!("\n[DRY RUN MODE - No files will be moved or tagged]\n");
    }

    let cancel = Arc::new(AtomicBool::new(false));
    let pb = progress_bar(files.len() as u64);

    let report = rt.block_on(async {
        let flag = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                flag.store(true, Ordering::SeqCst);
            }
        });
        tagger.run_batch(&files, &pb, &cancel).await
    });
    pb.finish_and_clear();

    let verb = transfer_verb(&placement, args.dry_run);
    for entry in &report.entries {
        if let Some(dest) = &entry.destination {
            println!("{}: {:?} -> {:?}", verb, entry.source, dest);
        }
    }
    for failure in &report.failures {
        eprintln!(
            "FAILED: {:?}: {}",
            failure.source,
            failure.error.as_deref().unwrap_or("unknown error")
        );
    }
    if report.cancelled {
        println!("\nInterrupted.");
    }

    println!("Succeeded {}/{}.", report.succeeded(), report.total);

    if let Some(plan_path) = args.plan {
        report.into_plan(&placement).save(plan_path)?;
        println!("Plan written to {:?}", plan_path);
    }

    Ok(())
}

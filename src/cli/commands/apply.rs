//! Plan execution command.

use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::cover::HttpCoverFetcher;
use crate::metadata::LoftyTagWriter;
use crate::recognition::shazam::SongRecRecognizer;
use crate::tagger::{Plan, Tagger, TaggerOptions};

use super::{OutputArgs, progress_bar, transfer_verb};

/// Apply a reviewed plan: move/copy and tag every selected entry
pub fn cmd_apply(rt: &Runtime, config: &Config, plan_path: &Path, output: &OutputArgs) -> anyhow::Result<()> {
    let plan = Plan::load(plan_path)?;

    let mut placement = output.placement(&config.output);
    if !output.plex {
        placement.layout = plan.layout;
    }
    let verb = transfer_verb(&placement, false);

    // Applying never recognizes, so any recognizer will do.
    let tagger = Tagger::new(
        Arc::new(SongRecRecognizer::new(config.recognition.songrec_path.clone())),
        Arc::new(HttpCoverFetcher::new()),
        Arc::new(LoftyTagWriter),
        TaggerOptions {
            placement,
            modify: true,
            ..Default::default()
        },
    );

    println!(
        "Applying plan from {} ({} entries)",
        plan.created_at,
        plan.entries.len()
    );

    let pb = progress_bar(plan.entries.len() as u64);
    let report = rt.block_on(tagger.apply_plan(&plan, &pb));
    pb.finish_and_clear();

    for (source, dest) in &report.applied {
        println!("{}: {:?} -> {:?}", verb, source, dest);
    }
    for (source, error) in &report.failures {
        eprintln!("FAILED: {:?}: {}", source, error);
    }

    println!(
        "\nCompleted: {} applied, {} skipped, {} errors",
        report.applied.len(),
        report.skipped,
        report.failures.len()
    );
    Ok(())
}

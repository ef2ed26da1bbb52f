//! Processor runs driven by a launcher-written run-args file.

use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use paperlens_core::args::RunArgs;
use paperlens_core::config::{resolve_with_base, Config, ProcessingSettings};
use paperlens_core::progress::ProgressTracker;
use paperlens_core::traits::{ReportEmitter, ReportFiles};
use paperlens_core::ProcessingContext;
use paperlens_report::{build_timeline, timeline_payload, HtmlReport};
use paperlens_text::TokenizerCache;

pub const TIMELINE: &str = "timeline";

const PROGRESS_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] \
     {pos}/{len} documents ({percent}%) {msg}";

/// Layered config with the run's named arguments on top.
pub fn load_settings(config: Config, args: &RunArgs) -> anyhow::Result<ProcessingSettings> {
    Ok(config.with_overrides(&args.named_args).processing()?)
}

pub fn template_for(args: &RunArgs, settings: &ProcessingSettings, processor: &str) -> PathBuf {
    match settings.template.as_deref() {
        Some(t) if !t.trim().is_empty() => resolve_with_base(&args.cwd, t),
        _ => args.template_path(processor),
    }
}

/// Partition, summarize and write the timeline report.
pub fn run_timeline(
    args: &RunArgs,
    settings: ProcessingSettings,
    show_bar: bool,
) -> anyhow::Result<ReportFiles> {
    let template = template_for(args, &settings, TIMELINE);
    fs::create_dir_all(&args.out_dir)?;
    let mut ctx = ProcessingContext::from_run_args(args, settings)?;
    let partition = ctx.split_into_intervals()?;
    info!(
        intervals = partition.intervals.len(),
        documents = ctx.metadata.len(),
        removed = partition.failures.len(),
        "corpus partitioned"
    );

    let total = ctx.metadata.len();
    let mut tracker = ProgressTracker::new(args.progress_path(TIMELINE), total);
    let pb = if show_bar {
        ProgressBar::new(total as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)?
            .progress_chars("#>-"),
    );

    let mut cache = TokenizerCache::new();
    let buckets = build_timeline(&ctx, &partition, &mut cache, |filename| {
        tracker.update()?;
        pb.inc(1);
        pb.set_message(filename.to_string());
        Ok(())
    })?;
    pb.finish_with_message("done");

    let report = HtmlReport::new(
        args.output_path(TIMELINE, "html"),
        template,
        args.collection_name.clone(),
    );
    let files = report.emit(&ctx, timeline_payload(&buckets)?)?;
    info!(
        buckets = buckets.len(),
        tokenizers = cache.len(),
        html = %files.html.display(),
        "timeline complete"
    );
    Ok(files)
}

/// Interval label to number of documents assigned to it.
pub fn interval_counts(
    args: &RunArgs,
    settings: ProcessingSettings,
) -> anyhow::Result<BTreeMap<String, usize>> {
    let mut ctx = ProcessingContext::from_run_args(args, settings)?;
    let partition = ctx.split_into_intervals()?;
    Ok(partition
        .labels
        .iter()
        .map(|(label, files)| (label.clone(), files.len()))
        .collect())
}

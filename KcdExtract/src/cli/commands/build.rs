//! CLI command for dataset builds

use std::time::Instant;

use console::style;

use crate::cli::progress::{DISK, GEAR, LINK, LOOKING_GLASS, PACKAGE, print_done, print_step};
use crate::config::ExtractConfig;
use crate::mapping::MappingRegistry;
use crate::pipeline::{BuildPhase, BuildSummary, build_dataset};
use crate::version::VersionStatus;

use super::extract;

pub fn execute(config: &ExtractConfig, extract_first: bool, progress: bool) -> anyhow::Result<()> {
    let started = Instant::now();

    if extract_first {
        extract::execute(config, progress)?;
    }

    let registry = MappingRegistry::bundled()?;
    let summary = build_dataset(&config.data_dir(), config, &registry, &|phase| {
        if progress {
            let emoji = match phase {
                BuildPhase::ResolvingVersion => LOOKING_GLASS,
                BuildPhase::LoadingTables => LINK,
                BuildPhase::MergingItems => PACKAGE,
                BuildPhase::Normalizing => GEAR,
                BuildPhase::Writing => DISK,
            };
            print_step(phase.step(), BuildPhase::COUNT, emoji, phase.as_str());
        }
    })?;

    print_summary(&summary);
    if progress {
        print_done(started.elapsed());
    }
    Ok(())
}

fn print_summary(summary: &BuildSummary) {
    let status = match summary.status {
        VersionStatus::New => style("new").green(),
        VersionStatus::Unchanged => style("unchanged").dim(),
    };
    println!("Version {} ({status})", style(&summary.version).bold());
    println!(
        "Tables: {} indexed, {} icons, {} item tables merged",
        summary.indexed_files, summary.indexed_icons, summary.tables_loaded
    );
    if !summary.tables_missing.is_empty() {
        println!(
            "  {} {}",
            style("missing:").yellow(),
            summary.tables_missing.join(", ")
        );
    }
    println!(
        "Aliases: {} resolved, {} dropped",
        summary.aliases.resolved, summary.aliases.dropped
    );

    let report = &summary.normalize;
    println!(
        "Items: {} written ({} aliases), {} filtered, {} duplicates, {} without id",
        style(report.items + report.aliases).green(),
        report.aliases,
        report.filtered,
        report.duplicates,
        report.missing_id
    );
    for (subcategory, count) in &summary.counts {
        println!("  {:<12} {count}", subcategory.as_str());
    }
    println!("Saved {}", summary.dataset_path.display());
}

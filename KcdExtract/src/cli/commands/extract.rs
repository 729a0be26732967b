//! CLI command for archive collection

use console::style;

use crate::archive::{ArchiveSource, ExtractReport, XML_DIR, collect_tables};
use crate::cli::progress::{PACKAGE, simple_bar};
use crate::config::ExtractConfig;
use crate::index::FileIndex;
use crate::paths::resolve_game_path;
use crate::version::sync_version_file;

pub fn execute(config: &ExtractConfig, progress: bool) -> anyhow::Result<ExtractReport> {
    let game_path = resolve_game_path(config.game_path().as_deref())?;
    let data_dir = config.data_dir();

    if sync_version_file(&game_path, &data_dir)? {
        println!("Updated version descriptor from {}", game_path.display());
    }

    let mut index = FileIndex::scan_xml(&data_dir.join(XML_DIR));
    println!("{PACKAGE}Collecting tables from {}", game_path.display());

    let report = if progress {
        let pb = simple_bar(0, "Extracting");
        let report = collect_tables(&game_path, &data_dir, &ArchiveSource::defaults(), &mut index, &|p| {
            pb.set_length(p.total as u64);
            pb.set_position(p.current as u64);
            if let Some(name) = &p.current_file {
                let short_name = name.rsplit('/').next().unwrap_or(name);
                pb.set_message(short_name.to_string());
            }
        })?;
        pb.finish_with_message("done");
        report
    } else {
        collect_tables(&game_path, &data_dir, &ArchiveSource::defaults(), &mut index, &|_| {})?
    };

    print_report(&report);
    Ok(report)
}

fn print_report(report: &ExtractReport) {
    println!(
        "Extracted {} tables, {} already present, {}",
        style(report.extracted).green(),
        report.skipped,
        if report.failed > 0 {
            style(format!("{} failed", report.failed)).red()
        } else {
            style("0 failed".to_string()).dim()
        }
    );
}

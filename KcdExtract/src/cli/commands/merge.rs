//! CLI command for merged item dumps

use std::path::Path;

use crate::cli::progress::simple_spinner;
use crate::config::ExtractConfig;
use crate::pipeline::export_merged;

pub fn execute(config: &ExtractConfig, output: Option<&Path>, purge: bool) -> anyhow::Result<()> {
    let data_dir = config.data_dir();
    let out_dir = output.map_or_else(|| data_dir.clone(), Path::to_path_buf);

    let pb = simple_spinner("Merging item tables...");
    let export = export_merged(&data_dir, config, &out_dir, purge)?;
    pb.finish_and_clear();

    println!("Merged items written to {}", export.merged_path.display());
    if let Some((path, report)) = &export.purged {
        println!(
            "Purged items written to {} ({} elements, {} attributes removed)",
            path.display(),
            report.removed_elements,
            report.removed_attributes
        );
    }
    Ok(())
}

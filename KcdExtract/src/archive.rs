//! Table collection from the game's `.pak` containers
//!
//! KCD2 `.pak` files are plain zip archives. Item tables live under
//! `Libs/Tables/item/` in `Data/Tables.pak`; localized item names come from
//! `text_ui_items.xml` in `Localization/English_xml.pak`. Entries are written
//! flat into the data directory's `xml/` folder with `__` collapsed to `_`.

use crate::error::{Error, Result};
use crate::index::{FileIndex, xml_file_id};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Directory under the data root receiving extracted tables.
pub const XML_DIR: &str = "xml";

/// Progress callback for archive collection
pub type ExtractProgressCallback<'a> = &'a (dyn Fn(&ExtractProgress) + Sync + Send);

/// Progress information during archive collection
#[derive(Debug, Clone)]
pub struct ExtractProgress {
    /// Current entry number (1-indexed)
    pub current: usize,
    /// Number of matching entries in the current archive
    pub total: usize,
    pub current_file: Option<String>,
}

/// One archive and the entries to take from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSource {
    /// Archive path relative to the game directory
    pub archive: PathBuf,
    /// Entry path prefix, compared case-insensitively
    pub prefix: String,
    /// Only collect the entry with this file name
    pub file_name: Option<String>,
}

impl ArchiveSource {
    /// Item tables in `Data/Tables.pak`.
    pub fn item_tables() -> Self {
        Self {
            archive: PathBuf::from("Data").join("Tables.pak"),
            prefix: "Libs/Tables/item/".to_string(),
            file_name: None,
        }
    }

    /// English item names in `Localization/English_xml.pak`.
    pub fn item_names() -> Self {
        Self {
            archive: PathBuf::from("Localization").join("English_xml.pak"),
            prefix: String::new(),
            file_name: Some("text_ui_items.xml".to_string()),
        }
    }

    /// Sources collected by a default run.
    pub fn defaults() -> Vec<Self> {
        vec![Self::item_tables(), Self::item_names()]
    }

    fn selects(&self, entry: &str) -> bool {
        if entry.ends_with('/') {
            return false;
        }
        let lower = entry.to_lowercase();
        if !lower.starts_with(&self.prefix.to_lowercase()) || !lower.ends_with(".xml") {
            return false;
        }
        // Preset tables describe loadouts, not items.
        if lower.contains("preset") {
            return false;
        }
        match &self.file_name {
            Some(name) => entry_file_name(entry).eq_ignore_ascii_case(name),
            None => true,
        }
    }
}

/// Counts from [`collect_tables`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub extracted: usize,
    /// Entries whose file id was already indexed
    pub skipped: usize,
    pub failed: usize,
}

impl ExtractReport {
    fn absorb(&mut self, other: &ExtractReport) {
        self.extracted += other.extracted;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

fn entry_file_name(entry: &str) -> &str {
    entry.rsplit('/').next().unwrap_or(entry)
}

/// Local file name of an archive entry.
fn output_name(entry: &str) -> String {
    entry_file_name(entry).replace("__", "_")
}

/// Collect every source under `<data_dir>/xml/`, recording new files in `index`.
///
/// Entries whose file id is already indexed are skipped, so a rerun only
/// fetches what is missing. A failing entry is logged and counted; the run
/// continues with the next one.
///
/// # Errors
/// Returns an error if an archive is missing or is not a valid zip container.
pub fn collect_tables(
    game_path: &Path,
    data_dir: &Path,
    sources: &[ArchiveSource],
    index: &mut FileIndex,
    progress: ExtractProgressCallback,
) -> Result<ExtractReport> {
    let xml_dir = data_dir.join(XML_DIR);
    fs::create_dir_all(&xml_dir)?;

    let mut report = ExtractReport::default();
    for source in sources {
        let archive_path = game_path.join(&source.archive);
        let archive_report = collect_from_archive(&archive_path, source, &xml_dir, index, progress)?;
        tracing::info!(
            "{}: {} extracted, {} skipped, {} failed",
            source.archive.display(),
            archive_report.extracted,
            archive_report.skipped,
            archive_report.failed
        );
        report.absorb(&archive_report);
    }
    Ok(report)
}

fn collect_from_archive(
    archive_path: &Path,
    source: &ArchiveSource,
    xml_dir: &Path,
    index: &mut FileIndex,
    progress: ExtractProgressCallback,
) -> Result<ExtractReport> {
    if !archive_path.is_file() {
        return Err(Error::SourceFileNotFound {
            path: archive_path.to_path_buf(),
        });
    }
    let mut archive = ZipArchive::new(BufReader::new(File::open(archive_path)?))?;

    let entries: Vec<(usize, String)> = (0..archive.len())
        .filter_map(|i| {
            let name = archive.name_for_index(i)?;
            source.selects(name).then(|| (i, name.to_string()))
        })
        .collect();

    let mut report = ExtractReport::default();
    let total = entries.len();
    for (position, (i, entry)) in entries.into_iter().enumerate() {
        progress(&ExtractProgress {
            current: position + 1,
            total,
            current_file: Some(entry.clone()),
        });

        let output = xml_dir.join(output_name(&entry));
        let Some(id) = xml_file_id(&output) else {
            report.failed += 1;
            continue;
        };
        if index.contains(&id) {
            tracing::debug!("Skipping {}: {} already indexed", entry, id);
            report.skipped += 1;
            continue;
        }

        match extract_entry(&mut archive, i, &output) {
            Ok(()) => {
                tracing::debug!("Extracted {} to {}", entry, output.display());
                index.insert(id, output);
                report.extracted += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to extract {}: {}", entry, e);
                report.failed += 1;
            }
        }
    }
    Ok(report)
}

fn extract_entry(archive: &mut ZipArchive<BufReader<File>>, index: usize, output: &Path) -> Result<()> {
    let mut entry = archive.by_index(index)?;
    let mut file = File::create(output)?;
    io::copy(&mut entry, &mut file)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_pak(path: &Path, entries: &[(&str, &str)]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    fn game_fixture() -> TempDir {
        let game = TempDir::new().unwrap();
        write_pak(
            &game.path().join("Data/Tables.pak"),
            &[
                ("Libs/Tables/item/item.xml", "<database/>"),
                ("Libs/Tables/item/item__dlc.xml", "<database/>"),
                ("Libs/Tables/item/item_preset.xml", "<database/>"),
                ("Libs/Tables/item/readme.txt", "ignored"),
                ("Libs/Tables/rpg/skill.xml", "<database/>"),
            ],
        );
        write_pak(
            &game.path().join("Localization/English_xml.pak"),
            &[
                ("text_ui_items.xml", "<Table/>"),
                ("text_ui_menus.xml", "<Table/>"),
            ],
        );
        game
    }

    #[test]
    fn test_selects_entries() {
        let tables = ArchiveSource::item_tables();
        assert!(tables.selects("Libs/Tables/item/weapon_class.xml"));
        assert!(tables.selects("libs/tables/item/Item.XML"));
        assert!(!tables.selects("Libs/Tables/item/item_Preset.xml"));
        assert!(!tables.selects("Libs/Tables/item/"));
        assert!(!tables.selects("Libs/Tables/rpg/skill.xml"));

        let names = ArchiveSource::item_names();
        assert!(names.selects("text_ui_items.xml"));
        assert!(!names.selects("text_ui_menus.xml"));
    }

    #[test]
    fn test_collect_then_skip_indexed() {
        let game = game_fixture();
        let data = TempDir::new().unwrap();
        let mut index = FileIndex::new();

        let report = collect_tables(
            game.path(),
            data.path(),
            &ArchiveSource::defaults(),
            &mut index,
            &|_| {},
        )
        .unwrap();
        assert_eq!(report, ExtractReport { extracted: 3, skipped: 0, failed: 0 });
        assert!(data.path().join("xml/item_dlc.xml").is_file());
        assert!(index.contains("item_dlc"));
        assert!(index.contains("text_ui_items"));
        assert!(!index.contains("item_preset"));

        let rerun = collect_tables(
            game.path(),
            data.path(),
            &ArchiveSource::defaults(),
            &mut index,
            &|_| {},
        )
        .unwrap();
        assert_eq!(rerun, ExtractReport { extracted: 0, skipped: 3, failed: 0 });
    }

    #[test]
    fn test_missing_archive() {
        let game = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();
        let result = collect_tables(
            game.path(),
            data.path(),
            &[ArchiveSource::item_tables()],
            &mut FileIndex::new(),
            &|_| {},
        );
        assert!(matches!(result, Err(Error::SourceFileNotFound { .. })));
    }
}

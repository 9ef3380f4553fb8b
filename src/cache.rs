use crate::table;
use crate::table::error::TableError;
use crate::types::master::MasterTable;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Holds the loaded master dataset and reloads it when the file on disk changes.
///
/// The cache is owned by its caller; there is no process-wide instance.
#[derive(Debug)]
pub struct MasterDatasetCache {
    path: PathBuf,
    cached: Option<(SystemTime, Arc<MasterTable>)>,
}

impl MasterDatasetCache {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            cached: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.cached.is_some()
    }

    fn modified(&self) -> Result<SystemTime, TableError> {
        let metadata = fs::metadata(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TableError::SourceNotFound(self.path.clone()),
            _ => TableError::Io(self.path.clone(), e),
        })?;
        metadata
            .modified()
            .map_err(|e| TableError::Io(self.path.clone(), e))
    }

    /// Returns the master table, reading the file only on first use or after it changed.
    pub fn get(&mut self) -> Result<Arc<MasterTable>, TableError> {
        let modified = self.modified()?;
        if let Some((loaded_at, table)) = &self.cached {
            if *loaded_at == modified {
                debug!("Master dataset cache hit for {}", self.path.display());
                return Ok(Arc::clone(table));
            }
            info!(
                "Master dataset {} changed on disk, reloading",
                self.path.display()
            );
        } else {
            debug!("Master dataset cache miss for {}", self.path.display());
        }
        self.load(modified)
    }

    /// Reads the file regardless of the cached state.
    pub fn reload(&mut self) -> Result<Arc<MasterTable>, TableError> {
        let modified = self.modified()?;
        self.load(modified)
    }

    pub fn invalidate(&mut self) {
        if self.cached.take().is_some() {
            debug!("Master dataset cache for {} invalidated", self.path.display());
        }
    }

    fn load(&mut self, modified: SystemTime) -> Result<Arc<MasterTable>, TableError> {
        let table = Arc::new(table::read_master(&self.path)?);
        info!(
            "Loaded master dataset: {} rows, {} regions",
            table.len(),
            table.regions().len()
        );
        self.cached = Some((modified, Arc::clone(&table)));
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::master::MasterRecord;
    use crate::types::month::Month;
    use crate::types::region::Region;
    use crate::types::sources::TrackedSources;
    use std::time::Duration;
    use tempfile::tempdir;

    fn table(regions: &[&str]) -> MasterTable {
        MasterTable {
            sources: TrackedSources::REQUIRED,
            records: regions
                .iter()
                .map(|name| MasterRecord {
                    region: Region::new(name).unwrap(),
                    month: Month::new(1, 2024),
                    max_temp_mean: 25.0,
                    min_temp_mean: 12.0,
                    humidity_mean: 55.0,
                    precipitation_total: 3.0,
                    total_generation: 1000.0,
                    coal: 800.0,
                    solar: 50.0,
                    wind: 20.0,
                    hydro: None,
                    solar_share: Some(5.0),
                })
                .collect(),
        }
    }

    #[test]
    fn second_get_is_served_from_memory() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("master.csv");
        table::write_master(&path, &table(&["Goa"]))?;

        let mut cache = MasterDatasetCache::new(&path);
        assert!(!cache.is_loaded());
        let first = cache.get()?;
        let second = cache.get()?;
        assert!(Arc::ptr_eq(&first, &second));
        Ok(())
    }

    #[test]
    fn changed_file_is_reloaded() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("master.csv");
        table::write_master(&path, &table(&["Goa"]))?;

        let mut cache = MasterDatasetCache::new(&path);
        assert_eq!(cache.get()?.len(), 1);

        table::write_master(&path, &table(&["Goa", "Kerala"]))?;
        // Force a distinct mtime on filesystems with coarse timestamps.
        let later = fs::metadata(&path)?.modified()? + Duration::from_secs(5);
        fs::File::options().write(true).open(&path)?.set_modified(later)?;

        assert_eq!(cache.get()?.len(), 2);
        Ok(())
    }

    #[test]
    fn invalidate_drops_the_entry() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("master.csv");
        table::write_master(&path, &table(&["Goa"]))?;

        let mut cache = MasterDatasetCache::new(&path);
        let first = cache.get()?;
        cache.invalidate();
        assert!(!cache.is_loaded());
        let reloaded = cache.reload()?;
        assert!(!Arc::ptr_eq(&first, &reloaded));
        assert_eq!(*first, *reloaded);
        Ok(())
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let mut cache = MasterDatasetCache::new(Path::new("missing/master.csv"));
        assert!(cache.get().unwrap_err().is_source_not_found());
    }
}

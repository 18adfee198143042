//! Catalog building: fetch, parse, clean, cap.

use crate::error::Result;
use crate::parser;
use crate::source::DataSource;
use crate::types::{Catalog, MAX_CATALOG_SIZE};
use std::io::Read;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Knobs for [`Catalog::load`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    /// Keep at most this many complete rows (clamped to `MAX_CATALOG_SIZE`)
    pub max_rows: usize,
    /// Upper bound on fetching the source
    pub fetch_timeout: Duration,
}

impl LoadOptions {
    /// The effective row cap.
    pub fn row_limit(&self) -> usize {
        self.max_rows.min(MAX_CATALOG_SIZE)
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_rows: MAX_CATALOG_SIZE,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

impl Catalog {
    /// Load a catalog from a path or URL.
    ///
    /// Steps:
    /// 1. Fetch the raw bytes (bounded by `options.fetch_timeout`)
    /// 2. Parse and clean the CSV rows
    /// 3. Assign dense indices and build `combined_text`
    pub async fn load(source: &DataSource, options: &LoadOptions) -> Result<Self> {
        let bytes = source.fetch(options.fetch_timeout).await?;
        Self::from_csv_reader(bytes.as_slice(), options)
    }

    /// Build a catalog from any CSV reader. This is the synchronous core of
    /// [`Catalog::load`].
    pub fn from_csv_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Self> {
        let start = Instant::now();
        let table = parser::parse_movies_csv(reader, options.row_limit())?;
        debug!(
            "Parsed {} records: {} dropped for missing fields, {} numeric values coerced to 0",
            table.stats.records_read, table.stats.dropped_missing, table.stats.coerced_to_zero
        );

        let catalog = Catalog::from_rows(table.rows);
        catalog.validate()?;

        info!(
            "Catalog built with {} movies in {:.2?}",
            catalog.len(),
            start.elapsed()
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_row_limit_is_clamped() {
        let options = LoadOptions {
            max_rows: 1_000_000,
            ..LoadOptions::default()
        };
        assert_eq!(options.row_limit(), MAX_CATALOG_SIZE);
    }

    #[test]
    fn test_indices_are_dense_after_dropping() {
        let csv = "title,genres,overview,popularity,vote_average\n\
                   A,Drama,,1,1\n\
                   B,Drama,Plot b,1,1\n\
                   C,Drama,Plot c,1,1\n";
        let catalog = Catalog::from_csv_reader(csv.as_bytes(), &LoadOptions::default()).unwrap();
        let indices: Vec<_> = catalog.movies().iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(catalog.get(0).unwrap().title, "B");
    }

    #[tokio::test]
    async fn test_load_from_file() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "title,genres,overview,popularity,vote_average")?;
        writeln!(file, "Inception,Sci-Fi,A thief enters dreams,29.1,8.1")?;
        writeln!(file, "Heat,Crime,A heist in Los Angeles,17.9,7.7")?;

        let source = DataSource::Path(file.path().to_path_buf());
        let catalog = Catalog::load(&source, &LoadOptions::default()).await?;

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get(1).unwrap().combined_text,
            "heat crime a heist in los angeles"
        );
        Ok(())
    }
}

//! Dataset loading and read-only row views.
//!
//! The dataset is loaded exactly once per session and is immutable from then
//! on. Every consumer receives `&Dataset` (or a [`DatasetView`] derived from
//! it) explicitly; there is no ambient global lookup. The first column of the
//! input file is a row index and is dropped from the schema.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use log::debug;

use crate::{
    data::{Value, parse_typed_value},
    error::ReportError,
    schema::Schema,
};

#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Schema,
    rows: Vec<Vec<Option<Value>>>,
}

impl Dataset {
    /// Reads a cleaned booking CSV from `path` ("-" reads stdin). The whole
    /// file is materialized and types are inferred over every row, so typed
    /// parsing afterwards cannot disagree with the inferred schema.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let reader: Box<dyn Read> = if path == Path::new("-") {
            Box::new(std::io::stdin().lock())
        } else {
            Box::new(BufReader::new(
                File::open(path).map_err(|e| ReportError::load(path, e))?,
            ))
        };
        Self::from_reader(reader, path)
    }

    /// Loads from any reader; `origin` only labels load errors.
    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self, ReportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(b',')
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| ReportError::load(origin, e))?
            .clone();
        if headers.len() < 2 {
            return Err(ReportError::load(
                origin,
                "expected a row-index column followed by data columns",
            ));
        }
        // First column is the row index, not data.
        let names: Vec<String> = headers.iter().skip(1).map(|h| h.to_string()).collect();

        let mut raw_rows: Vec<Vec<String>> = Vec::new();
        for (row_idx, record) in csv_reader.records().enumerate() {
            let record = record
                .map_err(|e| ReportError::load(origin, format!("row {}: {e}", row_idx + 2)))?;
            raw_rows.push(record.iter().skip(1).map(|f| f.to_string()).collect());
        }

        let schema = Schema::infer(&names, &raw_rows);
        debug!(
            "Inferred {} column(s) over {} row(s) from {:?}",
            schema.columns.len(),
            raw_rows.len(),
            origin
        );

        let mut rows = Vec::with_capacity(raw_rows.len());
        for (row_idx, raw) in raw_rows.iter().enumerate() {
            let typed = schema
                .columns
                .iter()
                .enumerate()
                .map(|(idx, column)| {
                    let cell = raw.get(idx).map(|s| s.as_str()).unwrap_or("");
                    parse_typed_value(cell, &column.data_type)
                })
                .collect::<anyhow::Result<Vec<Option<Value>>>>()
                .map_err(|e| ReportError::load(origin, format!("row {}: {e:#}", row_idx + 2)))?;
            rows.push(typed);
        }

        Ok(Dataset { schema, rows })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Option<Value>>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.schema.column_index(name)
    }

    /// Startup configuration check: every column the report configuration
    /// names must exist in the loaded schema. Fails fast with the first
    /// missing name.
    pub fn require_columns<'a, I>(&self, names: I) -> Result<(), ReportError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in names {
            if self.schema.column_index(name).is_none() {
                return Err(ReportError::MissingColumn(name.to_string()));
            }
        }
        Ok(())
    }

    /// A view spanning every row.
    pub fn view(&self) -> DatasetView<'_> {
        DatasetView {
            dataset: self,
            rows: (0..self.rows.len()).collect(),
        }
    }

    /// A view over the rows selected by `predicate`. The dataset itself is
    /// never mutated; views only borrow it.
    pub fn select<F>(&self, predicate: F) -> DatasetView<'_>
    where
        F: Fn(&[Option<Value>]) -> bool,
    {
        DatasetView {
            dataset: self,
            rows: self
                .rows
                .iter()
                .enumerate()
                .filter(|(_, row)| predicate(row))
                .map(|(idx, _)| idx)
                .collect(),
        }
    }
}

/// A read-only subset of a [`Dataset`]'s rows.
#[derive(Debug, Clone)]
pub struct DatasetView<'a> {
    dataset: &'a Dataset,
    rows: Vec<usize>,
}

impl<'a> DatasetView<'a> {
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.dataset.schema.column_index(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a [Option<Value>]> + '_ {
        self.rows
            .iter()
            .map(move |&idx| self.dataset.rows[idx].as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    const SAMPLE: &str = "\
,country,is_canceled,adr\n\
0,PRT,0,100.0\n\
1,PRT,1,120.0\n\
2,GBR,1,80.5\n";

    fn sample() -> Dataset {
        Dataset::from_reader(Cursor::new(SAMPLE), Path::new("memory")).expect("load sample")
    }

    #[test]
    fn load_drops_row_index_column() {
        let dataset = sample();
        assert_eq!(dataset.schema().column_names(), ["country", "is_canceled", "adr"]);
        assert_eq!(dataset.row_count(), 3);
        assert!(dataset.column_index("").is_none());
    }

    #[test]
    fn load_missing_file_is_a_load_error() {
        let err = Dataset::load(&PathBuf::from("does-not-exist.csv")).unwrap_err();
        assert!(matches!(err, ReportError::Load { .. }));
        // The io::Error stays on the chain instead of being flattened away.
        let source = std::error::Error::source(&err).expect("load error keeps its source");
        assert!(source.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn load_rejects_index_only_header() {
        let err = Dataset::from_reader(Cursor::new("idx\n0\n"), Path::new("memory")).unwrap_err();
        assert!(matches!(err, ReportError::Load { .. }));
    }

    #[test]
    fn require_columns_names_the_first_missing_column() {
        let dataset = sample();
        assert!(dataset.require_columns(["country", "adr"]).is_ok());
        let err = dataset
            .require_columns(["country", "lead_time"])
            .unwrap_err();
        match err {
            ReportError::MissingColumn(name) => assert_eq!(name, "lead_time"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn select_produces_a_row_subset_without_mutation() {
        let dataset = sample();
        let country = dataset.column_index("country").unwrap();
        let view = dataset.select(|row| {
            row[country].as_ref().and_then(|v| v.as_str()) == Some("PRT")
        });
        assert_eq!(view.row_count(), 2);
        assert_eq!(dataset.row_count(), 3);
    }

    #[test]
    fn full_view_spans_every_row() {
        let dataset = sample();
        assert_eq!(dataset.view().row_count(), dataset.row_count());
    }
}

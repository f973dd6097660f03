//! Country filter layer for the general report view.
//!
//! Derives a row subset from a country selection and delegates the top-N
//! country ranking to the aggregation engine. The top-N bound is validated
//! here, before any aggregation runs.

use itertools::Itertools;

use crate::{
    dataset::{Dataset, DatasetView},
    error::ReportError,
    report::{self, COUNTRY_COLUMN, GroupCount},
};

/// Sentinel label shown by the country selector.
pub const ALL_COUNTRIES: &str = "All Countries";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountrySelection {
    AllCountries,
    Country(String),
}

impl CountrySelection {
    pub fn parse(label: &str) -> Self {
        if label == ALL_COUNTRIES {
            CountrySelection::AllCountries
        } else {
            CountrySelection::Country(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CountrySelection::AllCountries => ALL_COUNTRIES,
            CountrySelection::Country(name) => name,
        }
    }
}

/// Sorted distinct country values for the selector. Rows with a missing
/// country never become a selectable option.
pub fn country_options(dataset: &Dataset) -> Result<Vec<String>, ReportError> {
    let country = dataset
        .column_index(COUNTRY_COLUMN)
        .ok_or_else(|| ReportError::MissingColumn(COUNTRY_COLUMN.to_string()))?;
    Ok(dataset
        .rows()
        .iter()
        .filter_map(|row| row[country].as_ref().and_then(|v| v.as_str()))
        .map(|name| name.to_string())
        .sorted()
        .dedup()
        .collect())
}

/// The row subset matching the selection. The sentinel yields the identity
/// subset; the original dataset is never mutated.
pub fn filter_by_country<'a>(
    dataset: &'a Dataset,
    selection: &CountrySelection,
) -> Result<DatasetView<'a>, ReportError> {
    let country = dataset
        .column_index(COUNTRY_COLUMN)
        .ok_or_else(|| ReportError::MissingColumn(COUNTRY_COLUMN.to_string()))?;
    match selection {
        CountrySelection::AllCountries => Ok(dataset.view()),
        CountrySelection::Country(name) => Ok(dataset.select(|row| {
            row[country].as_ref().and_then(|v| v.as_str()) == Some(name.as_str())
        })),
    }
}

/// Top-N country booking counts over an already-filtered view. Rejects
/// `n < 1` before the aggregation engine is reached.
pub fn top_countries(view: &DatasetView, n: usize) -> Result<Vec<GroupCount>, ReportError> {
    if n < 1 {
        return Err(ReportError::InvalidBound(n));
    }
    report::country_counts(view, n)
}

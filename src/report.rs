//! Aggregation engine: pure functions from a [`DatasetView`] to the result
//! tables shown on the dashboard.
//!
//! Every operation is deterministic, side-effect free, and recomputed fresh
//! on each render; nothing here caches or mutates the dataset. Rows whose
//! grouping key is missing are excluded from that grouping.

use std::collections::HashMap;

use chrono::Month;
use serde::Serialize;

use crate::{dataset::DatasetView, error::ReportError};

pub const CANCELED_COLUMN: &str = "is_canceled";
pub const CHANNEL_COLUMN: &str = "distribution_channel";
pub const CUSTOMER_TYPE_COLUMN: &str = "customer_type";
pub const RATE_COLUMN: &str = "adr";
pub const MONTH_COLUMN: &str = "arrival_date_month";
pub const SEGMENT_COLUMN: &str = "market_segment";
pub const COUNTRY_COLUMN: &str = "country";

/// The fixed column list behind the correlation heatmap. Hand-maintained by
/// design; [`required_columns`] lets the loader validate it against the
/// schema at startup so a rename in the data fails fast.
pub const NUMERIC_COLUMNS: [&str; 17] = [
    "is_canceled",
    "lead_time",
    "arrival_date_week_number",
    "stays_in_weekend_nights",
    "stays_in_week_nights",
    "adults",
    "children",
    "babies",
    "is_repeated_guest",
    "previous_cancellations",
    "previous_bookings_not_canceled",
    "booking_changes",
    "agent",
    "days_in_waiting_list",
    "adr",
    "required_car_parking_spaces",
    "total_of_special_requests",
];

/// Every column name the aggregation engine touches, for the startup
/// configuration check.
pub fn required_columns() -> Vec<&'static str> {
    let mut columns = vec![
        CANCELED_COLUMN,
        CHANNEL_COLUMN,
        CUSTOMER_TYPE_COLUMN,
        RATE_COLUMN,
        MONTH_COLUMN,
        SEGMENT_COLUMN,
        COUNTRY_COLUMN,
    ];
    for name in NUMERIC_COLUMNS {
        if !columns.contains(&name) {
            columns.push(name);
        }
    }
    columns
}

/// One `(group key, row count)` pair.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
}

/// One `(group key, metric value)` pair.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupMean {
    pub key: String,
    pub value: f64,
}

/// Ordering policy for [`monthly_volume`]. The original dashboard orders
/// months by descending frequency; `Calendar` is the documented alternative
/// rather than a silent fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthOrder {
    Frequency,
    Calendar,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }
}

/// Mean of the cancellation flag as a percentage, rounded to 2 decimals.
/// Signals `EmptyInput` over zero rows instead of returning NaN.
pub fn cancellation_rate(view: &DatasetView) -> Result<f64, ReportError> {
    let canceled = column_index(view, CANCELED_COLUMN)?;
    let mut sum = 0.0;
    let mut count = 0usize;
    for row in view.iter() {
        if let Some(value) = row[canceled].as_ref().and_then(|v| v.as_f64()) {
            sum += value;
            count += 1;
        }
    }
    if count == 0 {
        return Err(ReportError::EmptyInput);
    }
    Ok(round2(sum / count as f64 * 100.0))
}

/// Row counts grouped by distribution channel, in first-encountered order
/// (the treemap consumer does not care about ordering).
pub fn channel_distribution(view: &DatasetView) -> Result<Vec<GroupCount>, ReportError> {
    Ok(group_counts(view, column_index(view, CHANNEL_COLUMN)?))
}

/// Mean average-daily-rate per customer type, rounded to 2 decimals. Groups
/// with no observed rate are omitted, never emitted as NaN rows.
pub fn average_rate_by_customer_type(view: &DatasetView) -> Result<Vec<GroupMean>, ReportError> {
    let customer_type = column_index(view, CUSTOMER_TYPE_COLUMN)?;
    let rate = column_index(view, RATE_COLUMN)?;
    let means = group_means(view, customer_type, rate);
    Ok(means
        .into_iter()
        .map(|(key, value)| GroupMean {
            key,
            value: round2(value),
        })
        .collect())
}

/// Booking counts per arrival-month label under an explicit ordering policy.
pub fn monthly_volume(
    view: &DatasetView,
    order: MonthOrder,
) -> Result<Vec<GroupCount>, ReportError> {
    let mut counts = group_counts(view, column_index(view, MONTH_COLUMN)?);
    match order {
        MonthOrder::Frequency => {
            counts.sort_by(|a, b| b.count.cmp(&a.count));
        }
        MonthOrder::Calendar => {
            counts.sort_by_key(|group| month_number(&group.key));
        }
    }
    Ok(counts)
}

// Unrecognized month labels sort after December.
fn month_number(label: &str) -> u32 {
    label
        .parse::<Month>()
        .map(|m| m.number_from_month())
        .unwrap_or(13)
}

/// Per-segment cancellation rate, rounded to 2 decimals, sorted descending.
/// The sort is stable, so ties keep first-encountered segment order.
pub fn cancellation_by_segment(view: &DatasetView) -> Result<Vec<GroupMean>, ReportError> {
    let segment = column_index(view, SEGMENT_COLUMN)?;
    let canceled = column_index(view, CANCELED_COLUMN)?;
    let mut rates: Vec<GroupMean> = group_means(view, segment, canceled)
        .into_iter()
        .map(|(key, value)| GroupMean { key, value })
        .collect();
    rates.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    for rate in &mut rates {
        rate.value = round2(rate.value);
    }
    Ok(rates)
}

/// Pairwise Pearson correlation over [`NUMERIC_COLUMNS`], rounded to 2
/// decimals. Each pair uses the rows where both values are present. Zero
/// variance yields NaN by definition; that is accepted, not an error.
pub fn correlation_matrix(view: &DatasetView) -> Result<CorrelationMatrix, ReportError> {
    let indices = NUMERIC_COLUMNS
        .iter()
        .map(|name| column_index(view, name))
        .collect::<Result<Vec<usize>, ReportError>>()?;

    let series: Vec<Vec<Option<f64>>> = indices
        .iter()
        .map(|&idx| {
            view.iter()
                .map(|row| row[idx].as_ref().and_then(|v| v.as_f64()))
                .collect()
        })
        .collect();

    let n = series.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = round2(pearson(&series[i], &series[j]));
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: NUMERIC_COLUMNS.iter().map(|s| s.to_string()).collect(),
        values,
    })
}

fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| x.zip(*y))
        .collect();
    if pairs.is_empty() {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 { f64::NAN } else { cov / denom }
}

/// Row counts per country, sorted by descending count (stable tie-break on
/// first-encountered order) and truncated to the top `n`. Bound validation
/// happens at the filter layer; this operation only truncates.
pub fn country_counts(view: &DatasetView, n: usize) -> Result<Vec<GroupCount>, ReportError> {
    let mut counts = group_counts(view, column_index(view, COUNTRY_COLUMN)?);
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    Ok(counts)
}

fn column_index(view: &DatasetView, name: &str) -> Result<usize, ReportError> {
    view.column_index(name)
        .ok_or_else(|| ReportError::MissingColumn(name.to_string()))
}

// Half-even, the rounding the reference report applies to 2 decimals.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

// Grouping keeps first-encountered key order; rows with a missing key are
// excluded from the grouping.
fn group_counts(view: &DatasetView, key_column: usize) -> Vec<GroupCount> {
    let mut order: Vec<GroupCount> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for row in view.iter() {
        let Some(key) = row[key_column].as_ref() else {
            continue;
        };
        let key = key.as_display();
        match positions.get(&key) {
            Some(&pos) => order[pos].count += 1,
            None => {
                positions.insert(key.clone(), order.len());
                order.push(GroupCount { key, count: 1 });
            }
        }
    }
    order
}

fn group_means(view: &DatasetView, key_column: usize, value_column: usize) -> Vec<(String, f64)> {
    struct Acc {
        key: String,
        sum: f64,
        count: usize,
    }
    let mut order: Vec<Acc> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for row in view.iter() {
        let Some(key) = row[key_column].as_ref() else {
            continue;
        };
        let Some(value) = row[value_column].as_ref().and_then(|v| v.as_f64()) else {
            continue;
        };
        let key = key.as_display();
        match positions.get(&key) {
            Some(&pos) => {
                order[pos].sum += value;
                order[pos].count += 1;
            }
            None => {
                positions.insert(key.clone(), order.len());
                order.push(Acc { key, sum: value, count: 1 });
            }
        }
    }
    order
        .into_iter()
        .map(|acc| (acc.key, acc.sum / acc.count as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use std::io::Cursor;
    use std::path::Path;

    fn dataset(csv: &str) -> Dataset {
        Dataset::from_reader(Cursor::new(csv), Path::new("memory")).expect("load dataset")
    }

    fn scenario() -> Dataset {
        // The three-row scenario from the design discussion: two PT rows,
        // one canceled each from PT and GB.
        dataset(
            "\
,country,is_canceled\n\
0,PT,0\n\
1,PT,1\n\
2,GB,1\n",
        )
    }

    #[test]
    fn cancellation_rate_matches_the_scenario() {
        let dataset = scenario();
        let rate = cancellation_rate(&dataset.view()).expect("rate");
        assert_eq!(rate, 66.67);
    }

    #[test]
    fn cancellation_rate_over_zero_rows_is_empty_input() {
        let dataset = dataset(",country,is_canceled\n");
        let err = cancellation_rate(&dataset.view()).unwrap_err();
        assert!(matches!(err, ReportError::EmptyInput));
    }

    #[test]
    fn country_counts_keep_descending_order_with_stable_ties() {
        let dataset = scenario();
        let counts = country_counts(&dataset.view(), 5).expect("counts");
        assert_eq!(
            counts,
            vec![
                GroupCount { key: "PT".into(), count: 2 },
                GroupCount { key: "GB".into(), count: 1 },
            ]
        );
        let top1 = country_counts(&dataset.view(), 1).expect("top-1");
        assert_eq!(top1, counts[..1]);
    }

    #[test]
    fn grouping_excludes_rows_with_missing_key() {
        let dataset = dataset(
            "\
,country,is_canceled\n\
0,PT,0\n\
1,,1\n\
2,GB,1\n",
        );
        let counts = country_counts(&dataset.view(), 10).expect("counts");
        let total: usize = counts.iter().map(|c| c.count).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn average_rate_skips_groups_without_observations() {
        let dataset = dataset(
            "\
,customer_type,adr\n\
0,Transient,100.0\n\
1,Transient,120.0\n\
2,Contract,\n",
        );
        let means = average_rate_by_customer_type(&dataset.view()).expect("means");
        assert_eq!(means.len(), 1);
        assert_eq!(means[0].key, "Transient");
        assert_eq!(means[0].value, 110.0);
    }

    #[test]
    fn monthly_volume_frequency_order_sorts_by_descending_count() {
        let dataset = dataset(
            "\
,arrival_date_month\n\
0,May\n\
1,July\n\
2,July\n\
3,August\n\
4,July\n\
5,August\n",
        );
        let months = monthly_volume(&dataset.view(), MonthOrder::Frequency).expect("months");
        let keys: Vec<&str> = months.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, ["July", "August", "May"]);
    }

    #[test]
    fn monthly_volume_calendar_order_follows_the_calendar() {
        let dataset = dataset(
            "\
,arrival_date_month\n\
0,July\n\
1,May\n\
2,August\n\
3,July\n",
        );
        let months = monthly_volume(&dataset.view(), MonthOrder::Calendar).expect("months");
        let keys: Vec<&str> = months.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, ["May", "July", "August"]);
    }

    #[test]
    fn segment_rates_sort_descending_with_stable_ties() {
        let dataset = dataset(
            "\
,market_segment,is_canceled\n\
0,Direct,0\n\
1,Online TA,1\n\
2,Corporate,0\n\
3,Online TA,1\n\
4,Groups,1\n\
5,Groups,0\n",
        );
        let rates = cancellation_by_segment(&dataset.view()).expect("rates");
        let keys: Vec<&str> = rates.iter().map(|r| r.key.as_str()).collect();
        // Direct and Corporate tie at 0.0; Direct was encountered first.
        assert_eq!(keys, ["Online TA", "Groups", "Direct", "Corporate"]);
        assert_eq!(rates[0].value, 1.0);
        assert_eq!(rates[1].value, 0.5);
    }

    #[test]
    fn missing_report_column_is_a_configuration_error() {
        let dataset = dataset(",country\n0,PT\n");
        let err = cancellation_rate(&dataset.view()).unwrap_err();
        assert!(matches!(err, ReportError::MissingColumn(_)));
    }

    #[test]
    fn metric_rounding_resolves_half_cases_to_even() {
        // 100.0 and 96.25 average to exactly 98.125, which rounds to 98.12
        // under half-even; 98.135 rounds up to 98.14.
        let dataset = dataset(
            "\
,customer_type,adr\n\
0,Transient,100.0\n\
1,Transient,96.25\n\
2,Contract,98.13\n\
3,Contract,98.14\n",
        );
        let means = average_rate_by_customer_type(&dataset.view()).expect("means");
        let lookup = |key: &str| means.iter().find(|m| m.key == key).map(|m| m.value);
        assert_eq!(lookup("Transient"), Some(98.12));
        assert_eq!(lookup("Contract"), Some(98.14));
    }

    #[test]
    fn pearson_handles_perfect_and_zero_variance() {
        let xs: Vec<Option<f64>> = vec![Some(1.0), Some(2.0), Some(3.0)];
        let ys: Vec<Option<f64>> = vec![Some(2.0), Some(4.0), Some(6.0)];
        assert!((pearson(&xs, &ys) - 1.0).abs() < 1e-12);

        let flat: Vec<Option<f64>> = vec![Some(5.0), Some(5.0), Some(5.0)];
        assert!(pearson(&xs, &flat).is_nan());
    }

    #[test]
    fn pearson_uses_pairwise_complete_observations() {
        let xs: Vec<Option<f64>> = vec![Some(1.0), None, Some(3.0), Some(4.0)];
        let ys: Vec<Option<f64>> = vec![Some(2.0), Some(9.0), None, Some(8.0)];
        // Only rows 0 and 3 are complete; two points correlate perfectly.
        assert!((pearson(&xs, &ys) - 1.0).abs() < 1e-12);
    }
}

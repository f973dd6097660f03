//! Presentation adapter: maps each result table to a chart specification.
//!
//! The charting library itself is an external collaborator; this module only
//! tags each result with the chart kind it is meant for and the
//! human-readable title and axis text the dashboard shows.

use serde::Serialize;

use crate::{
    dataset::DatasetView,
    error::ReportError,
    report::{self, GroupCount, GroupMean, MonthOrder},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Indicator,
    Treemap,
    Bar,
    HorizontalBar,
    Heatmap,
}

/// The typed payload handed to the chart collaborator. Non-finite matrix
/// entries (zero-variance correlations) serialize as JSON null.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ChartData {
    Scalar { value: f64, suffix: String },
    Counts { rows: Vec<GroupCount> },
    Values { rows: Vec<GroupMean> },
    Matrix { columns: Vec<String>, values: Vec<Vec<f64>> },
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    pub data: ChartData,
}

pub fn cancellation_indicator(view: &DatasetView) -> Result<ChartSpec, ReportError> {
    let rate = report::cancellation_rate(view)?;
    Ok(ChartSpec {
        kind: ChartKind::Indicator,
        title: "Overall Cancellation Rate".to_string(),
        x_label: None,
        y_label: None,
        data: ChartData::Scalar {
            value: rate,
            suffix: "%".to_string(),
        },
    })
}

pub fn channel_treemap(view: &DatasetView) -> Result<ChartSpec, ReportError> {
    Ok(ChartSpec {
        kind: ChartKind::Treemap,
        title: "Booking Distribution by Channel".to_string(),
        x_label: None,
        y_label: None,
        data: ChartData::Counts {
            rows: report::channel_distribution(view)?,
        },
    })
}

pub fn customer_type_bar(view: &DatasetView) -> Result<ChartSpec, ReportError> {
    Ok(ChartSpec {
        kind: ChartKind::Bar,
        title: "Average Revenue by Customer Type".to_string(),
        x_label: Some("customer_type".to_string()),
        y_label: Some("Average ADR".to_string()),
        data: ChartData::Values {
            rows: report::average_rate_by_customer_type(view)?,
        },
    })
}

pub fn monthly_volume_bar(view: &DatasetView, order: MonthOrder) -> Result<ChartSpec, ReportError> {
    Ok(ChartSpec {
        kind: ChartKind::Bar,
        title: "Monthly Booking Volume".to_string(),
        x_label: Some("month".to_string()),
        y_label: Some("bookings".to_string()),
        data: ChartData::Counts {
            rows: report::monthly_volume(view, order)?,
        },
    })
}

pub fn segment_cancellation_bar(view: &DatasetView) -> Result<ChartSpec, ReportError> {
    Ok(ChartSpec {
        kind: ChartKind::HorizontalBar,
        title: "Cancelation rate by market segment".to_string(),
        x_label: Some("is_canceled".to_string()),
        y_label: Some("market_segment".to_string()),
        data: ChartData::Values {
            rows: report::cancellation_by_segment(view)?,
        },
    })
}

pub fn correlation_heatmap(view: &DatasetView) -> Result<ChartSpec, ReportError> {
    let matrix = report::correlation_matrix(view)?;
    Ok(ChartSpec {
        kind: ChartKind::Heatmap,
        title: "Correlations between numerical columns".to_string(),
        x_label: None,
        y_label: None,
        data: ChartData::Matrix {
            columns: matrix.columns,
            values: matrix.values,
        },
    })
}

pub fn top_countries_bar(top: Vec<GroupCount>, n: usize) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::HorizontalBar,
        title: format!("Top {n} Countries by Bookings"),
        x_label: Some("bookings".to_string()),
        y_label: Some("country".to_string()),
        data: ChartData::Counts { rows: top },
    }
}

/// The six analysis-page charts, in page order.
pub fn analysis_view(view: &DatasetView, order: MonthOrder) -> Result<Vec<ChartSpec>, ReportError> {
    Ok(vec![
        cancellation_indicator(view)?,
        channel_treemap(view)?,
        customer_type_bar(view)?,
        monthly_volume_bar(view, order)?,
        segment_cancellation_bar(view)?,
        correlation_heatmap(view)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use std::io::Cursor;
    use std::path::Path;

    fn dataset() -> Dataset {
        let header = ",hotel,is_canceled,lead_time,arrival_date_month,arrival_date_week_number,\
stays_in_weekend_nights,stays_in_week_nights,adults,children,babies,country,market_segment,\
distribution_channel,is_repeated_guest,previous_cancellations,previous_bookings_not_canceled,\
booking_changes,agent,days_in_waiting_list,customer_type,adr,required_car_parking_spaces,\
total_of_special_requests\n";
        let rows = "\
0,City Hotel,0,10,July,27,1,2,2,0,0,PRT,Online TA,TA/TO,0,0,0,0,240,0,Transient,100.0,0,1\n\
1,City Hotel,1,50,July,27,0,3,2,1,0,GBR,Direct,Direct,0,1,0,1,,0,Contract,80.0,1,0\n\
2,Resort Hotel,1,80,August,33,2,5,3,0,1,PRT,Online TA,TA/TO,1,0,2,0,12,3,Transient,120.0,0,2\n";
        let csv = format!("{header}{rows}");
        Dataset::from_reader(Cursor::new(csv), Path::new("memory")).expect("load dataset")
    }

    #[test]
    fn analysis_view_produces_six_charts_in_page_order() {
        let dataset = dataset();
        let charts = analysis_view(&dataset.view(), MonthOrder::Frequency).expect("charts");
        let kinds: Vec<ChartKind> = charts.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            [
                ChartKind::Indicator,
                ChartKind::Treemap,
                ChartKind::Bar,
                ChartKind::Bar,
                ChartKind::HorizontalBar,
                ChartKind::Heatmap,
            ]
        );
    }

    #[test]
    fn indicator_carries_a_percent_suffix() {
        let dataset = dataset();
        let spec = cancellation_indicator(&dataset.view()).expect("spec");
        match spec.data {
            ChartData::Scalar { value, ref suffix } => {
                assert_eq!(value, 66.67);
                assert_eq!(suffix, "%");
            }
            ref other => panic!("expected scalar payload, got {other:?}"),
        }
    }

    #[test]
    fn top_countries_bar_names_the_bound_in_the_title() {
        let spec = top_countries_bar(
            vec![GroupCount { key: "PRT".into(), count: 2 }],
            10,
        );
        assert_eq!(spec.title, "Top 10 Countries by Bookings");
        assert_eq!(spec.kind, ChartKind::HorizontalBar);
    }

    #[test]
    fn chart_specs_serialize_with_nan_as_null() {
        let spec = ChartSpec {
            kind: ChartKind::Heatmap,
            title: "corr".to_string(),
            x_label: None,
            y_label: None,
            data: ChartData::Matrix {
                columns: vec!["a".to_string()],
                values: vec![vec![f64::NAN]],
            },
        };
        let json = serde_json::to_string(&spec).expect("serialize");
        assert!(json.contains("null"));
        assert!(json.contains("\"kind\":\"heatmap\""));
    }
}

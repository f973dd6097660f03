use std::io::Cursor;
use std::path::Path;

use proptest::prelude::*;

use booking_report::{
    dataset::Dataset,
    filter::top_countries,
    report::{cancellation_rate, country_counts},
};

fn booking_csv(rows: &[(String, u8)]) -> String {
    let mut csv = String::from(",country,is_canceled\n");
    for (idx, (country, canceled)) in rows.iter().enumerate() {
        csv.push_str(&format!("{idx},{country},{canceled}\n"));
    }
    csv
}

fn load(rows: &[(String, u8)]) -> Dataset {
    Dataset::from_reader(Cursor::new(booking_csv(rows)), Path::new("memory"))
        .expect("load generated dataset")
}

fn booking_rows() -> impl Strategy<Value = Vec<(String, u8)>> {
    prop::collection::vec(
        (
            prop::sample::select(vec![
                "PRT".to_string(),
                "GBR".to_string(),
                "FRA".to_string(),
                "ESP".to_string(),
                "DEU".to_string(),
            ]),
            0u8..=1,
        ),
        1..60,
    )
}

proptest! {
    #[test]
    fn cancellation_rate_is_bounded_and_exact(rows in booking_rows()) {
        let dataset = load(&rows);
        let rate = cancellation_rate(&dataset.view()).expect("rate");
        prop_assert!((0.0..=100.0).contains(&rate));

        let canceled = rows.iter().filter(|(_, c)| *c == 1).count() as f64;
        let percentage = canceled / rows.len() as f64 * 100.0;
        let expected = (percentage * 100.0).round_ties_even() / 100.0;
        prop_assert_eq!(rate, expected);
    }

    #[test]
    fn group_counts_partition_the_rows(rows in booking_rows()) {
        let dataset = load(&rows);
        let counts = country_counts(&dataset.view(), usize::MAX).expect("counts");
        let total: usize = counts.iter().map(|c| c.count).sum();
        prop_assert_eq!(total, rows.len());
    }

    #[test]
    fn top_n_results_are_prefixes_of_each_other(
        rows in booking_rows(),
        n1 in 1usize..5,
        extra in 0usize..5,
    ) {
        let dataset = load(&rows);
        let view = dataset.view();
        let n2 = n1 + extra;
        let smaller = top_countries(&view, n1).expect("top n1");
        let larger = top_countries(&view, n2).expect("top n2");
        let prefix_len = smaller.len().min(larger.len());
        prop_assert_eq!(&smaller[..prefix_len], &larger[..prefix_len]);
        prop_assert!(smaller.len() <= larger.len());
    }
}

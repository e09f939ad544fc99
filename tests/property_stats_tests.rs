use proptest::prelude::*;
use quickplot::charts::{validate, ChartBody, PlotRequest, ValidationError, MAX_BINS, MIN_BINS};
use quickplot::data::{DataColumn, Dataset};
use quickplot::stats::StatsCalculator;

fn optional_values() -> impl Strategy<Value = Vec<Option<f64>>> {
    proptest::collection::vec(proptest::option::weighted(0.8, -1_000.0f64..1_000.0), 1..80)
}

proptest! {
    #[test]
    fn histogram_frequencies_sum_to_present_values(
        values in optional_values(),
        bins in MIN_BINS..=MAX_BINS,
    ) {
        let present = values.iter().filter(|v| v.is_some()).count();
        prop_assume!(present > 0);

        let dataset = Dataset::new(vec![DataColumn::numeric("v", values)]).unwrap();
        let spec = validate(&dataset, &PlotRequest::histogram("v", bins)).unwrap();
        let ChartBody::Histogram(chart) = spec.body() else {
            panic!("expected a histogram");
        };
        prop_assert_eq!(chart.bins.len(), bins);
        prop_assert_eq!(chart.total(), present);
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal(
        a in optional_values(),
        b in optional_values(),
        c in optional_values(),
    ) {
        let len = a.len().min(b.len()).min(c.len());
        let (a, b, c) = (&a[..len], &b[..len], &c[..len]);
        let matrix = StatsCalculator::correlation_matrix(&[("a", a), ("b", b), ("c", c)]);

        for i in 0..3 {
            prop_assert_eq!(matrix.get(i, i), 1.0);
            for j in 0..3 {
                let (x, y) = (matrix.get(i, j), matrix.get(j, i));
                prop_assert!(x == y || (x.is_nan() && y.is_nan()));
                prop_assert!(x.is_nan() || (-1.0..=1.0).contains(&x));
            }
        }
    }

    #[test]
    fn box_plot_has_one_box_per_group_in_first_seen_order(
        rows in proptest::collection::vec((0usize..6, -50.0f64..50.0), 1..60),
    ) {
        let groups: Vec<Option<String>> = rows.iter().map(|(g, _)| Some(format!("g{}", g))).collect();
        let values: Vec<Option<f64>> = rows.iter().map(|(_, v)| Some(*v)).collect();

        let mut expected: Vec<String> = Vec::new();
        for (g, _) in &rows {
            let label = format!("g{}", g);
            if !expected.contains(&label) {
                expected.push(label);
            }
        }

        let dataset = Dataset::new(vec![
            DataColumn::categorical("group", groups),
            DataColumn::numeric("value", values),
        ])
        .unwrap();
        let spec = validate(&dataset, &PlotRequest::box_plot("group", "value")).unwrap();
        let ChartBody::Box(chart) = spec.body() else {
            panic!("expected a box plot");
        };
        let labels: Vec<String> = chart.groups.iter().map(|g| g.label.clone()).collect();
        prop_assert_eq!(labels, expected);
        for group in &chart.groups {
            let stats = group.stats.as_ref().unwrap();
            prop_assert!(stats.whisker_low >= stats.min && stats.whisker_high <= stats.max);
            prop_assert!(stats.q1 <= stats.median && stats.median <= stats.q3);
        }
    }

    #[test]
    fn non_numeric_y_never_validates(
        labels in proptest::collection::vec("[a-z]{1,6}", 1..20),
    ) {
        let x: Vec<Option<f64>> = (0..labels.len()).map(|i| Some(i as f64)).collect();
        let y: Vec<Option<String>> = labels.into_iter().map(Some).collect();
        let dataset = Dataset::new(vec![
            DataColumn::numeric("x", x),
            DataColumn::categorical("y", y),
        ])
        .unwrap();

        for request in [PlotRequest::line("x", "y"), PlotRequest::bar("x", "y")] {
            let is_non_numeric = matches!(
                validate(&dataset, &request),
                Err(ValidationError::NonNumericY { .. })
            );
            prop_assert!(is_non_numeric);
        }
        let is_scatter_error = matches!(
            validate(&dataset, &PlotRequest::scatter("x", "y")),
            Err(ValidationError::NonNumericScatter { .. })
        );
        prop_assert!(is_scatter_error);
    }
}

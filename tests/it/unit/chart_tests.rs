//! Unit tests for chart and map data.

use crate::helpers::{RowBuilder, sample_table};
use countryboard::data::{RowSet, Table, map_points, process_chart_data};
use countryboard::types::{AggregationType, ChartConfig, Field, NumericField, SortOrder};

#[test]
fn snapshot_region_population_chart() {
    let chart = process_chart_data(sample_table().rows(), &ChartConfig::default()).unwrap();
    insta::assert_json_snapshot!(chart, @r#"
    {
      "points": [
        {
          "label": "Europe",
          "value": 500.0
        },
        {
          "label": "Asia",
          "value": 200.0
        },
        {
          "label": "Africa",
          "value": 50.0
        }
      ],
      "x_label": "region",
      "y_label": "population",
      "max_value": 500.0,
      "min_value": 50.0
    }
    "#);
}

#[test]
fn test_chart_keeps_first_appearance_order_without_sorting() {
    let config = ChartConfig::new(Field::Region, NumericField::Area)
        .with_aggregation(AggregationType::Average)
        .with_sort_order(SortOrder::None);
    let chart = process_chart_data(sample_table().rows(), &config).unwrap();

    let labels: Vec<_> = chart.points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["Europe", "Asia", "Africa"]);
    assert_eq!(chart.points[1].value, 35.0);
}

#[test]
fn test_chart_truncates_after_sorting() {
    let config = ChartConfig::new(Field::Name, NumericField::Population)
        .with_sort_order(SortOrder::ValueAsc)
        .with_max_points(2);
    let chart = process_chart_data(sample_table().rows(), &config).unwrap();

    let labels: Vec<_> = chart.points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["Eland", "Bland"]);
    assert_eq!(chart.max_value, 100.0);
}

#[test]
fn test_chart_drops_groups_without_values() {
    let rows = vec![
        RowBuilder::new("Placed").region("Oceania").coordinates(-20.0, 150.0).build(),
        RowBuilder::new("Unplaced").region("Antarctic").build(),
    ];
    let config = ChartConfig::new(Field::Region, NumericField::Latitude)
        .with_aggregation(AggregationType::Max);
    let chart = process_chart_data(&rows, &config).unwrap();

    assert_eq!(chart.points.len(), 1);
    assert_eq!(chart.points[0].label, "Oceania");
}

#[test]
fn test_chart_empty_rows() {
    assert!(process_chart_data(&[], &ChartConfig::default()).is_none());
}

#[test]
fn test_map_points_skip_rows_without_coordinates() {
    let rows = vec![
        RowBuilder::new("Placed").population(7).coordinates(1.5, -2.5).build(),
        RowBuilder::new("Unplaced").build(),
    ];
    let points = map_points(&rows);

    assert_eq!(points.len(), 1);
    assert_eq!(points[0].name, "Placed");
    assert_eq!((points[0].latitude, points[0].longitude), (1.5, -2.5));
    assert_eq!(points[0].population, 7);
}

#[test]
fn test_chart_sort_order_from_command_line_key() {
    let order: SortOrder = "label-asc".parse().unwrap();
    let config = ChartConfig::new(Field::Region, NumericField::Population).with_sort_order(order);
    let chart = process_chart_data(sample_table().rows(), &config).unwrap();

    let labels: Vec<_> = chart.points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["Africa", "Asia", "Europe"]);

    let order: SortOrder = "original".parse().unwrap();
    let config = config.with_sort_order(order);
    let chart = process_chart_data(sample_table().rows(), &config).unwrap();
    assert_eq!(chart.points[0].label, "Europe");
}

#[test]
fn test_chart_values_agree_with_table_grouping() {
    let table = Table::new(vec![
        RowBuilder::new("Placed").region("Oceania").coordinates(-20.0, 150.0).build(),
        RowBuilder::new("Also placed").region("Oceania").coordinates(-40.0, 170.0).build(),
        RowBuilder::new("Unplaced").region("Antarctic").build(),
        RowBuilder::new("Elsewhere").region("Europe").coordinates(50.0, 10.0).build(),
    ]);

    for aggregation in AggregationType::all() {
        let config = ChartConfig::new(Field::Region, NumericField::Latitude)
            .with_aggregation(*aggregation)
            .with_sort_order(SortOrder::LabelAsc);
        let chart = process_chart_data(table.rows(), &config).unwrap();
        let grouped =
            table.aggregate_by_group(Field::Region, NumericField::Latitude, *aggregation);

        let expected: Vec<(String, f64)> = grouped
            .into_iter()
            .filter(|(_, value)| value.is_finite())
            .collect();
        let actual: Vec<(String, f64)> =
            chart.points.into_iter().map(|p| (p.label, p.value)).collect();
        assert_eq!(actual, expected, "{}", aggregation.label());
    }
}

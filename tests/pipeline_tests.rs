//! End-to-end pipeline tests: detection, schema round-trip, extraction
//! and statistics over one synthetic survey export.

use survey_analytics::{
    CorrelationMethod, Dataset, DetectionConfig, QuestionType, TestKind, TestSelection,
    chi_square_test, correlation_matrix, cross_tab_frequencies, cross_tab_means,
    descriptive_stats, detect_questions, export_schema, extract_group_data, find_weight_column,
    frequency_table, load_schema, multiple_choice_table, test_group_differences,
};

const ROWS: usize = 20;

fn survey() -> Dataset {
    let col = |f: &dyn Fn(usize) -> String| -> Vec<Option<String>> {
        (0..ROWS)
            .map(|i| {
                let v = f(i);
                if v.is_empty() { None } else { Some(v) }
            })
            .collect()
    };

    let headers = vec![
        "Numer wywiadu".to_string(),
        "Waga".to_string(),
        "A1. Jak oceniasz jakość usług? Uprzejmość personelu".to_string(),
        "Czas oczekiwania".to_string(),
        "B1. Ile razy w miesiącu korzystasz z usług".to_string(),
        "M1. Płeć".to_string(),
        "C1. Z których usług korzystasz? Konto osobiste".to_string(),
        "Inne (jakie?)".to_string(),
        "Karta kredytowa".to_string(),
        "Uwagi".to_string(),
    ];
    let columns = vec![
        col(&|i| format!("{}", i + 1)),
        col(&|i| if i % 2 == 0 { "0.8".into() } else { "1.2".into() }),
        col(&|i| {
            if i % 10 == 9 {
                "6: Nie wiem".into()
            } else {
                format!("{0}: Ocena {0}", i % 5 + 1)
            }
        }),
        col(&|i| {
            if i % 10 == 4 {
                "6: Nie wiem".into()
            } else {
                format!("{0}: Ocena {0}", (i + 2) % 5 + 1)
            }
        }),
        col(&|i| format!("{}", i % 7 + 1)),
        col(&|i| {
            if i % 2 == 0 {
                "Kobieta".into()
            } else {
                "Mężczyzna".into()
            }
        }),
        col(&|i| {
            if i % 3 == 0 {
                "MENTIONED".into()
            } else {
                "NOT MENTIONED".into()
            }
        }),
        col(&|i| if i % 5 == 0 { format!("inny powód {i}") } else { String::new() }),
        col(&|i| {
            if i % 4 == 0 {
                "MENTIONED".into()
            } else {
                "NOT MENTIONED".into()
            }
        }),
        col(&|i| format!("uwaga numer {i}")),
    ];

    Dataset::from_columns(headers, columns).unwrap()
}

#[test]
fn test_detects_expected_question_groups() {
    let groups = detect_questions(&survey());

    let ids: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, vec!["A1", "B1", "M1", "C1", "text_9"]);

    let likert = &groups[0];
    assert_eq!(likert.question_type, QuestionType::Likert);
    assert_eq!(likert.columns, vec![2, 3]);
    assert_eq!(likert.label, "A1. Jak oceniasz jakość usług?");
    assert_eq!(
        likert.column_labels,
        vec!["Uprzejmość personelu", "Czas oczekiwania"]
    );
    assert_eq!((likert.scale_min, likert.scale_max), (Some(1), Some(5)));
    assert!(likert.sentinel_codes.contains(&6));

    assert_eq!(groups[1].question_type, QuestionType::NumericScale);
    assert_eq!((groups[1].scale_min, groups[1].scale_max), (Some(1), Some(7)));

    assert!(groups[2].is_demographic);
    assert_eq!(groups[2].question_type, QuestionType::SingleChoice);

    // The excluded "Inne (jakie?)" column is skipped inside the run; the
    // second option still joins the C1 group.
    assert_eq!(groups[3].columns, vec![6, 8]);
    assert_eq!(groups[3].question_type, QuestionType::MultipleChoice);

    assert_eq!(groups[4].question_type, QuestionType::OpenText);
}

#[test]
fn test_schema_round_trip_reproduces_groups() {
    let groups = detect_questions(&survey());
    let yaml = export_schema(&groups).unwrap();
    let (reloaded, breakdowns) = load_schema(&yaml).unwrap();

    assert_eq!(reloaded, groups);
    assert_eq!(breakdowns, None);
}

#[test]
fn test_group_serializes_with_stable_tags() {
    let groups = detect_questions(&survey());
    let json = serde_json::to_value(&groups[0]).unwrap();

    assert_eq!(json["question_type"], "likert");
    assert_eq!(json["chart_hint"], "horizontal_bar_means");
    assert_eq!(json["columns"], serde_json::json!([2, 3]));
}

#[test]
fn test_extract_and_describe_likert_group() {
    let ds = survey();
    let groups = detect_questions(&ds);
    let config = DetectionConfig::default();

    assert_eq!(find_weight_column(&ds), Some(1));
    let weight_header = ds.header(1).unwrap().to_string();
    let data = extract_group_data(&ds, &groups[0], Some(&weight_header), &config);

    assert!(data.weights.is_some());
    assert_eq!(data.row_count(), ROWS);

    let stats = descriptive_stats(&data);
    assert_eq!(stats.len(), 2);
    // Two rows carry the sentinel code 6 and are suppressed.
    assert_eq!(stats[0].count, 18);
    assert_eq!(stats[0].item, "Uprzejmość personelu");
    let mean = stats[0].mean.unwrap();
    assert!(mean >= 1.0 && mean <= 5.0);
    assert_eq!(stats[0].max, Some(5.0));
}

#[test]
fn test_multiple_choice_percentages() {
    let ds = survey();
    let groups = detect_questions(&ds);
    let config = DetectionConfig::default();
    let multi = groups.iter().find(|g| g.id == "C1").unwrap();

    let data = extract_group_data(&ds, multi, None, &config);
    let rows = multiple_choice_table(&data);

    assert_eq!(rows.len(), 2);
    // 7 of 20 rows mention the first option, 5 of 20 the second.
    assert_eq!(rows[0].option, "Konto osobiste");
    assert_eq!(rows[0].percent, 35.0);
    assert_eq!(rows[1].percent, 25.0);
    assert!(rows[0].percent >= rows[1].percent);
}

#[test]
fn test_frequency_table_sums_to_100() {
    let ds = survey();
    let weights = ds.weights_from_column(1).unwrap();
    let rows = frequency_table(ds.column(5).unwrap(), Some(&weights), false);

    assert_eq!(rows.len(), 2);
    let sum: f64 = rows.iter().map(|r| r.percent).sum();
    assert!((sum - 100.0).abs() <= 0.1);
}

#[test]
fn test_cross_tab_columns_normalize_to_100() {
    let ds = survey();
    let ct = cross_tab_frequencies(ds.column(2).unwrap(), ds.column(5).unwrap(), None);

    assert_eq!(ct.col_labels, vec!["Kobieta", "Mężczyzna"]);
    for col in 0..ct.col_labels.len() {
        let sum: f64 = (0..ct.row_labels.len())
            .map(|row| ct.get(row, col).unwrap())
            .sum();
        assert!((sum - 100.0).abs() <= 0.2, "column {col} sums to {sum}");
    }
}

#[test]
fn test_cross_tab_means_by_demographic() {
    let ds = survey();
    let groups = detect_questions(&ds);
    let config = DetectionConfig::default();
    let numeric = groups.iter().find(|g| g.id == "B1").unwrap();

    let data = extract_group_data(&ds, numeric, None, &config);
    let rows = cross_tab_means(&data.columns[0], ds.column(5).unwrap(), None);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].category, "Kobieta");
    assert_eq!(rows[0].count, 10);
    assert!(rows[0].mean.is_some());
}

#[test]
fn test_significance_tests_over_survey() {
    let ds = survey();
    let groups = detect_questions(&ds);
    let config = DetectionConfig::default();
    let numeric = groups.iter().find(|g| g.id == "B1").unwrap();
    let data = extract_group_data(&ds, numeric, None, &config);

    let result = test_group_differences(&data.columns[0], ds.column(5).unwrap(), TestSelection::Auto);
    assert_eq!(result.test, TestKind::MannWhitneyU);
    assert!(result.p_value.unwrap() > 0.0 && result.p_value.unwrap() <= 1.0);

    let chi = chi_square_test(ds.column(2).unwrap(), ds.column(5).unwrap(), None);
    assert_eq!(chi.test, TestKind::ChiSquare);

    // One demographic category only -> marker, never an error.
    let single: Vec<Option<String>> = (0..ROWS).map(|_| Some("jedna".to_string())).collect();
    let degenerate = test_group_differences(&data.columns[0], &single, TestSelection::Auto);
    assert_eq!(degenerate.test, TestKind::SingleGroup);
    assert_eq!(degenerate.p_value, None);
}

#[test]
fn test_correlation_over_extracted_columns() {
    let ds = survey();
    let groups = detect_questions(&ds);
    let config = DetectionConfig::default();
    let likert = extract_group_data(&ds, &groups[0], None, &config);

    let names: Vec<String> = likert.labels.clone();
    let matrix = correlation_matrix(&likert.columns, &names, CorrelationMethod::Spearman);

    assert_eq!(matrix.names.len(), 2);
    assert_eq!(matrix.get(0, 0), Some(1.0));
    if let Some(r) = matrix.get(0, 1) {
        assert!((-1.0..=1.0).contains(&r));
    }
}

#[test]
fn test_csv_ingestion_matches_column_construction() {
    let csv = "\
M1. Płeć,B1. Ile razy,Waga
Kobieta,3,0.8
Mężczyzna,5,1.2
Kobieta,2,
";
    let ds = Dataset::from_csv_str(csv).unwrap();
    assert_eq!(ds.row_count(), 3);
    assert_eq!(find_weight_column(&ds), Some(2));
    assert_eq!(ds.weights_from_column(2).unwrap(), vec![0.8, 1.2, 1.0]);

    let groups = detect_questions(&ds);
    let ids: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, vec!["M1", "B1"]);
}

//! Integration tests for correlation-based feature selection.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rankfeat::error::Result;
use rankfeat::evaluation::GoldStandard;
use rankfeat::features::{FeatureEngine, FeatureEngineConfig, FeatureFamily, Passage, Query};
use rankfeat::selection::*;
use rankfeat::stats::InMemoryStatistics;

fn matrix(names: &[&str], rows: &[(f64, Vec<f64>)]) -> Result<FeatureMatrix> {
    let mut matrix = FeatureMatrix::new(names.iter().copied());
    for (i, (label, values)) in rows.iter().enumerate() {
        matrix.push_row(FeatureRow::new("q1", format!("d{i}"), *label, values.clone()))?;
    }
    Ok(matrix)
}

#[test]
fn test_best_single_feature_is_highest_label_correlation() -> Result<()> {
    let table = CorrelationTable::from_parts(
        vec![vec![1.0, 0.3], vec![0.3, 1.0]],
        vec![0.5, -0.2],
    )?;
    let names = vec!["a".to_string(), "b".to_string()];

    let report = FeatureSelector::new(SelectionConfig {
        to: Some(1),
        ..Default::default()
    })
    .select_with_table(&names, &table)?;

    assert_eq!(report.subsets.len(), 1);
    assert_eq!(report.subsets[0].features, vec!["a"]);
    assert_eq!(report.subsets[0].merit, 0.5);
    assert_eq!(merit(&[1], &table), -0.2);

    Ok(())
}

#[test]
fn test_select_from_matrix() -> Result<()> {
    // "signal" follows the label, "copy" duplicates it, "noise" does not
    let rows = vec![
        (2.0, vec![2.1, 4.2, 0.3]),
        (0.0, vec![0.2, 0.4, 0.9]),
        (1.0, vec![1.0, 2.0, 0.1]),
        (2.0, vec![1.9, 3.8, 0.5]),
        (0.0, vec![0.1, 0.2, 0.2]),
        (1.0, vec![1.2, 2.4, 0.7]),
    ];
    let matrix = matrix(&["signal", "copy", "noise"], &rows)?;

    let report = FeatureSelector::new(SelectionConfig::default()).select(&matrix)?;
    assert!(report.completed);
    assert_eq!(report.subsets.len(), 3);

    let sizes: Vec<usize> = report.subsets.iter().map(|s| s.size).collect();
    assert_eq!(sizes, vec![1, 2, 3]);
    assert!(!report.subsets[0].features.contains(&"noise".to_string()));
    for subset in &report.subsets {
        assert_eq!(subset.indices.len(), subset.size);
        assert!(subset.indices.windows(2).all(|w| w[0] < w[1]));
    }

    Ok(())
}

#[test]
fn test_invalid_ranges_fail_before_computation() -> Result<()> {
    let matrix = matrix(&["a", "b"], &[(1.0, vec![1.0, 2.0]), (0.0, vec![0.0, 1.0])])?;

    for config in [
        SelectionConfig {
            from: 0,
            ..Default::default()
        },
        SelectionConfig {
            from: 2,
            to: Some(1),
            ..Default::default()
        },
        SelectionConfig {
            from: 1,
            to: Some(3),
            ..Default::default()
        },
    ] {
        let err = FeatureSelector::new(config).select(&matrix).unwrap_err();
        assert!(err.is_config());
    }

    Ok(())
}

#[test]
fn test_ragged_matrix_is_rejected_when_loaded() -> Result<()> {
    let json = r#"{
        "names": ["a", "b"],
        "rows": [
            {"query_id": "q1", "doc_id": "d1", "label": 1.0, "values": [1.0, 2.0]},
            {"query_id": "q1", "doc_id": "d2", "label": 0.0, "values": [0.5]}
        ]
    }"#;
    assert!(serde_json::from_str::<FeatureMatrix>(json).is_err());

    let json = r#"{
        "names": ["a", "b"],
        "rows": [
            {"query_id": "q1", "doc_id": "d1", "label": 1.0, "values": [1.0, 2.0]},
            {"query_id": "q1", "doc_id": "d2", "label": 0.0, "values": [0.5, 0.1]}
        ]
    }"#;
    let matrix: FeatureMatrix = serde_json::from_str(json)?;
    let report = FeatureSelector::new(SelectionConfig::default()).select(&matrix)?;
    assert!(report.completed);

    Ok(())
}

#[test]
fn test_constant_columns_do_not_produce_nan() -> Result<()> {
    let rows = vec![
        (1.0, vec![1.0, 5.0]),
        (0.0, vec![1.0, 2.0]),
        (1.0, vec![1.0, 4.0]),
    ];
    let matrix = matrix(&["constant", "varying"], &rows)?;
    let report = FeatureSelector::new(SelectionConfig::default()).select(&matrix)?;

    for subset in &report.subsets {
        assert!(subset.merit.is_finite());
    }
    assert_eq!(report.subsets[0].features, vec!["varying"]);

    Ok(())
}

#[test]
fn test_exhaustive_and_forward_agree_on_small_input() -> Result<()> {
    let table = CorrelationTable::from_parts(
        vec![
            vec![1.0, 0.1, 0.2, 0.0],
            vec![0.1, 1.0, 0.1, 0.3],
            vec![0.2, 0.1, 1.0, 0.1],
            vec![0.0, 0.3, 0.1, 1.0],
        ],
        vec![0.7, 0.5, 0.45, 0.1],
    )?;
    let names: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();

    let exhaustive = FeatureSelector::new(SelectionConfig::default()).select_with_table(&names, &table)?;
    let forward = FeatureSelector::new(SelectionConfig {
        strategy: SearchStrategy::Forward,
        ..Default::default()
    })
    .select_with_table(&names, &table)?;

    assert_eq!(exhaustive.subsets.len(), 4);
    assert_eq!(forward.subsets.len(), 4);
    assert_eq!(exhaustive.subsets[0].indices, forward.subsets[0].indices);
    assert_eq!(exhaustive.subsets[3].indices, forward.subsets[3].indices);
    for (e, f) in exhaustive.subsets.iter().zip(&forward.subsets) {
        assert!(e.merit >= f.merit);
    }

    Ok(())
}

#[test]
fn test_cancellation_returns_partial_report() -> Result<()> {
    let table = CorrelationTable::from_parts(
        vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        vec![0.4, 0.2],
    )?;
    let names = vec!["a".to_string(), "b".to_string()];
    let token = CancellationToken::new();
    token.cancel();

    let report = FeatureSelector::new(SelectionConfig::default())
        .with_cancellation(token.clone())
        .select_with_table(&names, &table)?;
    assert!(!report.completed);
    assert!(report.subsets.is_empty());
    assert!(token.is_cancelled());

    let report = FeatureSelector::new(SelectionConfig {
        time_budget: Some(Duration::from_secs(3600)),
        ..Default::default()
    })
    .select_with_table(&names, &table)?;
    assert!(report.completed);

    Ok(())
}

#[test]
fn test_engine_to_selection_pipeline() -> Result<()> {
    let stats = InMemoryStatistics::new()
        .with_document_count("economics", 1000)
        .with_collection_length("economics", "fulltext", 50_000)
        .with_term("economics", "title", "euro", 50, 60)
        .with_term("economics", "fulltext", "euro", 400, 700);
    let config = FeatureEngineConfig::default().with_families(&[
        FeatureFamily::TermFrequency,
        FeatureFamily::LanguageModel,
        FeatureFamily::Simple,
    ]);
    let engine = FeatureEngine::new(config, Arc::new(stats))?;

    let passages = [
        ("d1", "euro euro euro news"),
        ("d2", "weather report"),
        ("d3", "the euro rallies"),
        ("d4", "sports results today and tomorrow"),
    ];
    let pairs: Vec<(Query, Passage)> = passages
        .iter()
        .map(|(id, text)| (Query::new("q1", "euro"), Passage::new(*id, *text)))
        .collect();
    let vectors = engine.compute_batch(&pairs)?;

    let gold: GoldStandard = HashMap::from([(
        "q1".to_string(),
        HashMap::from([("d1".to_string(), 2.0), ("d3".to_string(), 1.0)]),
    )]);
    let matrix = FeatureMatrix::from_vectors(&vectors, &gold)?;
    assert_eq!(matrix.n_features(), engine.feature_names().len());
    assert_eq!(matrix.labels(), vec![2.0, 0.0, 1.0, 0.0]);

    let report = FeatureSelector::new(SelectionConfig {
        from: 1,
        to: Some(2),
        ..Default::default()
    })
    .select(&matrix)?;
    assert!(report.completed);
    assert_eq!(report.subsets.len(), 2);
    assert!(report.best().is_some());

    Ok(())
}

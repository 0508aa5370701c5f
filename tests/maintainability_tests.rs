mod common;

use common::{sample_project, SERVICE_FILE, UTIL_FILE};
use qualitymap::config::ClassificationThresholds;
use qualitymap::maintainability::{classify, MaintainabilityClass};
use qualitymap::{ComplexityScorer, FileFacts, MaintainabilityScorer};

#[test]
fn classification_boundaries() {
    let t = ClassificationThresholds::default();
    assert_eq!(classify(85.0, &t), MaintainabilityClass::Good);
    assert_eq!(classify(84.99, &t), MaintainabilityClass::Fair);
    assert_eq!(classify(70.0, &t), MaintainabilityClass::Fair);
    assert_eq!(classify(69.99, &t), MaintainabilityClass::Poor);
}

#[test]
fn every_function_is_indexed_and_classified() {
    let files = sample_project();
    let metrics = MaintainabilityScorer::default().analyze(&files, None);

    assert_eq!(metrics.functions.len(), 4);
    assert_eq!(metrics.distribution.total(), 4);
    assert!(metrics
        .functions
        .iter()
        .all(|f| (0.0..=100.0).contains(&f.maintainability_index)));
}

#[test]
fn oversized_service_file_ranks_below_utilities() {
    let files = sample_project();
    let complexity = ComplexityScorer::default().analyze(&files).unwrap();
    let metrics = MaintainabilityScorer::default().analyze(&files, Some(&complexity));

    let lowest = metrics.lowest_files(2);
    assert_eq!(lowest[0].path.to_str(), Some(SERVICE_FILE));
    assert_eq!(lowest[1].path.to_str(), Some(UTIL_FILE));
    assert!(lowest[0].maintainability_index < lowest[1].maintainability_index);
}

#[test]
fn complexity_scores_replace_the_size_fallback() {
    let files = sample_project();
    let complexity = ComplexityScorer::default().analyze(&files).unwrap();
    let metrics = MaintainabilityScorer::default().analyze(&files, Some(&complexity));

    let reconcile = metrics
        .functions
        .iter()
        .find(|f| f.id.name == "reconcile")
        .unwrap();
    assert_eq!(reconcile.cyclomatic, 20.0);
}

#[test]
fn empty_input_is_perfect() {
    let metrics = MaintainabilityScorer::default().analyze(&[FileFacts::new("a.ts")], None);
    assert_eq!(metrics.overall_index, 100.0);
    assert!(metrics.suggestions.is_empty());
}

#[test]
fn generated_blob_spanning_billions_of_lines_still_scores() {
    let mut facts = FileFacts::new("src/gen.ts");
    facts
        .functions
        .push(common::function("blob", "src/gen.ts", 1, 1_500_000_000));
    facts
        .functions
        .push(common::function("tail", "src/gen.ts", 0, usize::MAX));
    let files = vec![facts];

    let complexity = ComplexityScorer::default().analyze(&files).unwrap();
    let metrics = MaintainabilityScorer::default().analyze(&files, Some(&complexity));

    assert_eq!(metrics.functions.len(), 2);
    for f in &metrics.functions {
        assert!((0.0..=100.0).contains(&f.maintainability_index));
        assert!(f.halstead.volume.is_finite());
    }
    assert!((0.0..=100.0).contains(&metrics.overall_index));
}

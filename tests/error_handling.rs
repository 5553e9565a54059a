use coursematch::{
    decode, CourseRecord, EmbeddingError, EmbeddingVector, MatchConfig, MatchError, OverlapEngine,
    QueryCourse, RawEmbedding,
};

fn unit_query() -> QueryCourse {
    QueryCourse::new(EmbeddingVector::from_values(vec![1.0, 0.0]).unwrap())
}

#[test]
fn empty_corpus_returns_empty_corpus_error() {
    let result = OverlapEngine::new(MatchConfig::default()).rank(&unit_query(), &[]);
    assert!(matches!(result, Err(MatchError::EmptyCorpus)));
}

#[test]
fn degenerate_query_vector_is_rejected_at_construction() {
    let err = EmbeddingVector::from_values(vec![0.0, 0.0, 0.0]).unwrap_err();
    assert_eq!(err, EmbeddingError::Degenerate);

    // A caller propagating with `?` gets the corpus-level wrapper.
    let as_match_error: MatchError = err.into();
    assert!(matches!(
        as_match_error,
        MatchError::Query(EmbeddingError::Degenerate)
    ));
}

#[test]
fn malformed_query_embedding_text_is_rejected_at_decode() {
    let result = decode(&RawEmbedding::Text("[1.0, \"oops\"]".into()));
    assert!(matches!(result, Err(EmbeddingError::Parse(_))));
}

#[test]
fn one_bad_record_never_aborts_the_batch() {
    let corpus = vec![
        CourseRecord::new("BAD-JSON", "Bad Json", RawEmbedding::Text("[[1.0], [2.0]]".into())),
        CourseRecord::new("BAD-NAN", "Bad NaN", RawEmbedding::Values(vec![f32::NAN, 1.0])),
        CourseRecord::new("BAD-ZERO", "Bad Zero", RawEmbedding::Values(vec![0.0, 0.0])),
        CourseRecord::new("BAD-DIM", "Bad Dim", RawEmbedding::Values(vec![1.0, 0.0, 0.0])),
        CourseRecord::new("GOOD", "Good", RawEmbedding::Values(vec![1.0, 0.0])),
    ];

    let matches = OverlapEngine::new(MatchConfig::default())
        .rank(&unit_query(), &corpus)
        .unwrap();

    assert_eq!(matches.hits.len(), 1);
    assert_eq!(matches.hits[0].code, "GOOD");
    assert_eq!(matches.diagnostics.processed, 1);
    assert_eq!(matches.diagnostics.skipped_parse, 2);
    assert_eq!(matches.diagnostics.skipped_degenerate, 1);
    assert_eq!(matches.diagnostics.skipped_dimension, 1);
}

#[test]
fn dimension_mismatch_is_counted_without_raising() {
    let corpus = vec![CourseRecord::new(
        "WRONG-SIZE",
        "Wrong Size",
        RawEmbedding::Values(vec![0.5; 1536]),
    )];

    let matches = OverlapEngine::new(MatchConfig::default())
        .rank(&unit_query(), &corpus)
        .unwrap();

    assert!(matches.hits.is_empty());
    assert_eq!(matches.diagnostics.skipped_dimension, 1);
    assert_eq!(matches.diagnostics.processed, 0);
}

#[test]
fn invalid_config_propagates_before_scanning() {
    let config = MatchConfig {
        min_score: 250.0,
        ..MatchConfig::default()
    };
    let corpus = vec![CourseRecord::new(
        "A",
        "A",
        RawEmbedding::Values(vec![1.0, 0.0]),
    )];

    let err = OverlapEngine::new(config)
        .rank(&unit_query(), &corpus)
        .unwrap_err();
    match err {
        MatchError::InvalidConfig(message) => assert!(message.contains("min_score")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn config_file_errors_are_distinguished() {
    use coursematch::ConfigLoadError;

    let missing = MatchConfig::from_file("/definitely/not/a/real/path.yaml");
    assert!(matches!(missing, Err(ConfigLoadError::FileRead(_))));

    let invalid = MatchConfig::from_yaml("policy: {type: no_such_policy}");
    assert!(matches!(invalid, Err(ConfigLoadError::YamlParse(_))));

    let out_of_range = MatchConfig::from_yaml("min_score: -5.0");
    assert!(matches!(out_of_range, Err(ConfigLoadError::Validation(_))));
}

#[test]
fn scores_are_never_produced_for_skipped_candidates() {
    // Every record is broken in a different way; a valid outcome with zero
    // hits and full skip accounting is expected, not an error.
    let corpus = vec![
        CourseRecord::new("A", "A", RawEmbedding::Text("".into())),
        CourseRecord::new("B", "B", RawEmbedding::Text("x,y,z".into())),
        CourseRecord::new("C", "C", RawEmbedding::Values(vec![])),
    ];

    let matches = OverlapEngine::new(MatchConfig::default())
        .rank(&unit_query(), &corpus)
        .unwrap();
    assert!(matches.hits.is_empty());
    assert_eq!(matches.diagnostics.skipped(), 3);
    assert!(matches.diagnostics.score_min.is_none());
    assert!(matches.diagnostics.score_mean.is_none());
}

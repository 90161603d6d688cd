//! Keyword Ranker — filters, scores, and selects a bounded ranked keyword list
//! from one or more keyword-research batches.
//!
//! Pure and synchronous: no I/O, no shared state. Ingestion (CSV parsing and
//! numeric coercion) happens in `keywords::ingest`; this module only ever sees
//! fully-typed rows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// One normalized keyword-research row.
///
/// Numeric fields are already coerced: missing/unparseable volume and CPC
/// become 0, missing/unparseable difficulty becomes 100 with
/// `difficulty_missing` set. The flag is kept separate from the sentinel so
/// the filter can distinguish "unknown difficulty" from "genuinely 100".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRow {
    pub keyword: String,
    pub volume: f64,
    pub difficulty: f64,
    pub difficulty_missing: bool,
    pub cpc: f64,
    pub source: String,
}

/// One ingested batch, tagged with the source identifier assigned at upload.
#[derive(Debug, Clone)]
pub struct KeywordBatch {
    pub source: String,
    pub rows: Vec<KeywordRow>,
}

/// A filtered row plus its computed score and global input position.
/// The ordinal is the stable tie-breaker: equal scores rank in input order.
#[derive(Debug, Clone)]
pub struct ScoredRow<'a> {
    pub row: &'a KeywordRow,
    pub score: f64,
    pub ordinal: usize,
}

/// Ranker thresholds. Carried in `AppState` and passed explicitly —
/// no ambient configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankerConfig {
    /// Per-source cap applied before the global top-up.
    pub per_source_quota: usize,
    /// Overall output bound.
    pub overall_cap: usize,
    /// Filter gate: minimum search volume.
    pub min_volume: f64,
    /// Filter gate: minimum cost-per-click.
    pub min_cpc: f64,
    /// Filter gate: difficulty band considered worth competing in.
    pub min_difficulty: f64,
    pub max_difficulty: f64,
    /// Smoothing constant for the score formula. Keeps ln() and the divisor
    /// defined at volume = 0 and cpc = 0.
    pub epsilon: f64,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            per_source_quota: 15,
            overall_cap: 150,
            min_volume: 20.0,
            min_cpc: 0.35,
            min_difficulty: 10.0,
            max_difficulty: 50.0,
            epsilon: 1e-6,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Ranking pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Ranks keywords across all batches and returns at most `overall_cap`
/// keyword strings in descending score order.
///
/// Steps:
/// 1. Filter — keep rows with real traffic, real ad spend, moderate
///    difficulty, or unknown difficulty
/// 2. Score — `ln(volume + ε) / (cpc + ε)`, finite for every surviving row
/// 3. Per-source selection — top `per_source_quota` per source, sources in
///    first-seen order, until the cap is reached
/// 4. Global top-up — highest-scoring unselected rows fill remaining slots
/// 5. Final bound — overall top `overall_cap` of the union
///
/// Empty input yields an empty output, never an error. Duplicate keywords in
/// the input survive into the output.
pub fn rank_keywords(batches: &[KeywordBatch], config: &RankerConfig) -> Vec<String> {
    let scored = filter_and_score(batches, config);

    // Group surviving row indices by source, first-seen order.
    let mut source_order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, s) in scored.iter().enumerate() {
        let source = s.row.source.as_str();
        if !groups.contains_key(source) {
            source_order.push(source);
        }
        groups.entry(source).or_default().push(i);
    }

    // Per-source quota pass. Whole source groups are added until the
    // accumulated count reaches the cap.
    let mut selected: Vec<usize> = Vec::new();
    let mut taken = vec![false; scored.len()];
    for source in &source_order {
        let mut idxs = groups[source].clone();
        sort_by_rank(&mut idxs, &scored);
        for &i in idxs.iter().take(config.per_source_quota) {
            selected.push(i);
            taken[i] = true;
        }
        if selected.len() >= config.overall_cap {
            break;
        }
    }

    // Global top-up from the remaining filtered pool, any source.
    if selected.len() < config.overall_cap {
        let mut rest: Vec<usize> = (0..scored.len()).filter(|&i| !taken[i]).collect();
        sort_by_rank(&mut rest, &scored);
        rest.truncate(config.overall_cap - selected.len());
        selected.extend(rest);
    }

    // Final bound over the union.
    sort_by_rank(&mut selected, &scored);
    selected.truncate(config.overall_cap);
    selected
        .into_iter()
        .map(|i| scored[i].row.keyword.clone())
        .collect()
}

/// Applies the relevance filter and computes scores.
///
/// A row survives if ANY of: volume at or above the gate, CPC at or above the
/// gate, difficulty inside the band, or difficulty unknown in the raw input.
/// Ordinals run over all input rows so tie-breaking reflects input order even
/// across filtered-out gaps.
pub fn filter_and_score<'a>(
    batches: &'a [KeywordBatch],
    config: &RankerConfig,
) -> Vec<ScoredRow<'a>> {
    let mut scored = Vec::new();
    let mut ordinal = 0usize;
    for batch in batches {
        for row in &batch.rows {
            if passes_filter(row, config) {
                scored.push(ScoredRow {
                    row,
                    score: compute_score(row.volume, row.cpc, config.epsilon),
                    ordinal,
                });
            }
            ordinal += 1;
        }
    }
    scored
}

fn passes_filter(row: &KeywordRow, config: &RankerConfig) -> bool {
    row.volume >= config.min_volume
        || row.cpc >= config.min_cpc
        || (row.difficulty >= config.min_difficulty && row.difficulty <= config.max_difficulty)
        || row.difficulty_missing
}

/// Score formula: `ln(volume + ε) / (cpc + ε)`.
///
/// Both terms are smoothed and negative inputs are clamped to zero first, so
/// the score is finite for every row. A zero volume yields a large negative
/// score and sinks to the bottom rather than producing NaN or ±inf, which
/// would poison `sort_by_rank`'s comparator.
pub fn compute_score(volume: f64, cpc: f64, epsilon: f64) -> f64 {
    (volume.max(0.0) + epsilon).ln() / (cpc.max(0.0) + epsilon)
}

/// Sorts row indices by descending score, ties broken by ascending ordinal.
fn sort_by_rank(idxs: &mut [usize], scored: &[ScoredRow<'_>]) {
    idxs.sort_by(|&a, &b| {
        scored[b]
            .score
            .partial_cmp(&scored[a].score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(scored[a].ordinal.cmp(&scored[b].ordinal))
    });
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn row(keyword: &str, volume: f64, difficulty: f64, cpc: f64) -> KeywordRow {
        KeywordRow {
            keyword: keyword.to_string(),
            volume,
            difficulty,
            difficulty_missing: false,
            cpc,
            source: String::new(), // overwritten by batch()
        }
    }

    fn batch(source: &str, mut rows: Vec<KeywordRow>) -> KeywordBatch {
        for r in &mut rows {
            r.source = source.to_string();
        }
        KeywordBatch {
            source: source.to_string(),
            rows,
        }
    }

    /// Rows whose scores strictly decrease with index: volume falls, cpc rises.
    fn descending_rows(prefix: &str, n: usize) -> Vec<KeywordRow> {
        (0..n)
            .map(|i| {
                row(
                    &format!("{prefix}-{i}"),
                    10_000.0 - i as f64,
                    30.0,
                    0.5 + i as f64 * 0.01,
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let config = RankerConfig::default();
        assert!(rank_keywords(&[], &config).is_empty());
    }

    #[test]
    fn test_zero_qualifying_rows_yields_empty_output() {
        let config = RankerConfig::default();
        // volume < 20, cpc < 0.35, difficulty outside [10, 50], not missing
        let batches = vec![batch(
            "a",
            vec![row("kw1", 5.0, 80.0, 0.10), row("kw2", 1.0, 99.0, 0.01)],
        )];
        assert!(rank_keywords(&batches, &config).is_empty());
    }

    #[test]
    fn test_output_length_is_min_of_cap_and_qualifying() {
        let config = RankerConfig::default();

        let small = vec![batch("a", descending_rows("a", 40))];
        assert_eq!(rank_keywords(&small, &config).len(), 40);

        let large = vec![batch("a", descending_rows("a", 200))];
        assert_eq!(rank_keywords(&large, &config).len(), 150);
    }

    #[test]
    fn test_single_source_200_rows_yields_its_top_150() {
        let config = RankerConfig::default();
        let batches = vec![batch("solo", descending_rows("solo", 200))];
        let result = rank_keywords(&batches, &config);

        assert_eq!(result.len(), 150);
        // descending_rows scores strictly decrease with index, so the top 150
        // are exactly rows 0..150 in order
        for (i, kw) in result.iter().enumerate() {
            assert_eq!(kw, &format!("solo-{i}"));
        }
    }

    #[test]
    fn test_output_sorted_by_descending_score() {
        let config = RankerConfig::default();
        // Interleave two sources so per-source selection must re-merge
        let batches = vec![
            batch("a", descending_rows("a", 30)),
            batch("b", descending_rows("b", 30)),
        ];
        let result = rank_keywords(&batches, &config);

        let score_of = |kw: &str| {
            for b in &batches {
                if let Some(r) = b.rows.iter().find(|r| r.keyword == kw) {
                    return compute_score(r.volume, r.cpc, config.epsilon);
                }
            }
            panic!("keyword {kw} not in input");
        };
        for pair in result.windows(2) {
            assert!(
                score_of(&pair[0]) >= score_of(&pair[1]),
                "output not sorted at {} -> {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_filtered_rows_never_appear() {
        let config = RankerConfig::default();
        let batches = vec![batch(
            "a",
            vec![
                row("keep", 500.0, 30.0, 1.0),
                row("drop", 3.0, 90.0, 0.05),
            ],
        )];
        let result = rank_keywords(&batches, &config);
        assert!(result.contains(&"keep".to_string()));
        assert!(!result.contains(&"drop".to_string()));
    }

    #[test]
    fn test_missing_difficulty_passes_filter() {
        let config = RankerConfig::default();
        // Fails every numeric gate, but difficulty was absent in the raw input
        let mut unknown = row("unknown-difficulty", 2.0, 100.0, 0.01);
        unknown.difficulty_missing = true;
        // Identical numbers with a real difficulty of 100 — filtered out
        let hard = row("genuinely-hard", 2.0, 100.0, 0.01);

        let batches = vec![batch("a", vec![unknown, hard])];
        let result = rank_keywords(&batches, &config);
        assert_eq!(result, vec!["unknown-difficulty".to_string()]);
    }

    #[test]
    fn test_zero_volume_zero_cpc_scores_finite() {
        let config = RankerConfig::default();
        // Qualifies via the difficulty band despite volume = cpc = 0
        let batches = vec![batch("a", vec![row("degenerate", 0.0, 30.0, 0.0)])];

        let scored = filter_and_score(&batches, &config);
        assert_eq!(scored.len(), 1);
        assert!(scored[0].score.is_finite());
        // ln(ε)/ε is hugely negative — it ranks, it doesn't poison the sort
        assert!(scored[0].score < 0.0);
        assert_eq!(rank_keywords(&batches, &config).len(), 1);
    }

    #[test]
    fn test_negative_inputs_score_finite_and_keep_output_sorted() {
        let config = RankerConfig::default();
        // A negative volume with cpc 0.5 still passes the CPC gate; unclamped
        // it would hit ln() as a negative argument and the NaN would make the
        // sort comparator inconsistent.
        let batches = vec![batch(
            "a",
            vec![
                row("strong", 5000.0, 30.0, 0.40),
                row("refunded", -5.0, 30.0, 0.50),
                row("middling", 200.0, 30.0, 0.40),
            ],
        )];

        let scored = filter_and_score(&batches, &config);
        assert_eq!(scored.len(), 3);
        for s in &scored {
            assert!(s.score.is_finite(), "{} scored {}", s.row.keyword, s.score);
        }

        let result = rank_keywords(&batches, &config);
        assert_eq!(result, vec!["strong", "middling", "refunded"]);
    }

    #[test]
    fn test_negative_cpc_does_not_produce_infinite_score() {
        assert!(compute_score(100.0, -1.0, 1e-6).is_finite());
        assert!(compute_score(-100.0, -1.0, 1e-6).is_finite());
    }

    #[test]
    fn test_per_source_quota_capped_at_15_when_others_compete() {
        let config = RankerConfig::default();
        // Ten sources with 100 qualifying rows each: quota fills 10 × 15 = 150
        // before any top-up, so no source may exceed 15.
        let batches: Vec<_> = (0..10)
            .map(|s| batch(&format!("s{s}"), descending_rows(&format!("s{s}"), 100)))
            .collect();
        let result = rank_keywords(&batches, &config);
        assert_eq!(result.len(), 150);

        let mut per_source: HashMap<&str, usize> = HashMap::new();
        for kw in &result {
            let source = kw.split('-').next().expect("prefixed keyword");
            *per_source.entry(source).or_default() += 1;
        }
        for (source, count) in per_source {
            assert_eq!(count, 15, "source {source} exceeded quota");
        }
    }

    #[test]
    fn test_top_up_fills_from_dominant_source() {
        let config = RankerConfig::default();
        // Three small sources with exactly 15 qualifying rows each plus one
        // dominant source with 300. Quota yields 45 + 15; top-up adds 90 more
        // from the dominant source for a total of 150.
        let mut batches: Vec<_> = (0..3)
            .map(|s| batch(&format!("small{s}"), descending_rows(&format!("small{s}"), 15)))
            .collect();
        batches.push(batch("big", descending_rows("big", 300)));

        let result = rank_keywords(&batches, &config);
        assert_eq!(result.len(), 150);

        let big_count = result.iter().filter(|kw| kw.starts_with("big-")).count();
        assert_eq!(big_count, 105, "big source = its top 15 + 90 top-up");
        for s in 0..3 {
            let small_count = result
                .iter()
                .filter(|kw| kw.starts_with(&format!("small{s}-")))
                .count();
            assert_eq!(small_count, 15, "small sources contribute all 15 rows");
        }
    }

    #[test]
    fn test_idempotent_on_same_input() {
        let config = RankerConfig::default();
        let batches = vec![
            batch("a", descending_rows("a", 80)),
            batch("b", descending_rows("b", 80)),
        ];
        let first = rank_keywords(&batches, &config);
        let second = rank_keywords(&batches, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_equal_scores_break_ties_by_input_order() {
        let config = RankerConfig::default();
        // Identical volume and cpc — identical scores
        let batches = vec![batch(
            "a",
            vec![
                row("first", 100.0, 30.0, 0.5),
                row("second", 100.0, 30.0, 0.5),
                row("third", 100.0, 30.0, 0.5),
            ],
        )];
        let result = rank_keywords(&batches, &config);
        assert_eq!(result, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_duplicate_keywords_survive() {
        let config = RankerConfig::default();
        let batches = vec![
            batch("a", vec![row("repeat", 100.0, 30.0, 0.5)]),
            batch("b", vec![row("repeat", 100.0, 30.0, 0.5)]),
        ];
        let result = rank_keywords(&batches, &config);
        assert_eq!(result, vec!["repeat", "repeat"]);
    }

    #[test]
    fn test_filter_gate_boundaries_inclusive() {
        let config = RankerConfig::default();
        let batches = vec![batch(
            "a",
            vec![
                row("at-volume-gate", 20.0, 99.0, 0.0),
                row("at-cpc-gate", 0.0, 99.0, 0.35),
                row("at-difficulty-floor", 0.0, 10.0, 0.0),
                row("at-difficulty-ceiling", 0.0, 50.0, 0.0),
            ],
        )];
        assert_eq!(rank_keywords(&batches, &config).len(), 4);
    }

    #[test]
    fn test_quota_loop_stops_adding_sources_at_cap() {
        let config = RankerConfig {
            overall_cap: 30,
            ..RankerConfig::default()
        };
        // Three sources; the third's group is never reached because the first
        // two fill the cap.
        let batches = vec![
            batch("a", descending_rows("a", 15)),
            batch("b", descending_rows("b", 15)),
            batch("c", descending_rows("c", 15)),
        ];
        let result = rank_keywords(&batches, &config);
        assert_eq!(result.len(), 30);
        assert!(
            !result.iter().any(|kw| kw.starts_with("c-")),
            "third source must not contribute once cap is reached"
        );
    }
}

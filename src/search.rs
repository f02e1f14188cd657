//! # Query Engine Module
//!
//! ## Purpose
//! Evaluates a multi-criterion query against every record of a loaded
//! collection, accumulating weighted points per matching criterion, and
//! returns a ranked result list.
//!
//! ## Input/Output Specification
//! - **Input**: A loaded [`Collection`] and a [`Criteria`] set
//! - **Output**: [`ScoredResult`]s sorted by descending score; records with a
//!   zero total score are excluded, so an empty criteria set matches nothing
//! - **Ordering**: The sort is stable — equal scores keep the collection's
//!   insertion order
//!
//! ## Scoring Rules
//! Each criterion contributes independently; weights are fixed:
//!
//! | criterion | rule | points |
//! |---|---|---|
//! | appeal type | similarity > 0.6 | similarity × 20 |
//! | subject matters | per topic pair, similarity > 0.7 | similarity × 15 |
//! | outcome | accent/case-folded exact match | 15 |
//! | appellant | accent/case-folded exact match | 10 |
//! | judging body | similarity > 0.7 | similarity × 10 |
//! | keywords | folded substring match, first hit per query keyword | 5 |
//! | case number | query is substring of record number | 50 |
//!
//! The case-number weight is deliberately dominant: a near-exact identifier
//! match must outrank any combination of heuristic signals.

use crate::errors::{Result, SearchError};
use crate::similarity::similarity;
use crate::text_processing::fold_accents;
use crate::{Collection, DocumentRecord, UNIDENTIFIED};
use serde_json::Value;

// Fuzzy-match acceptance thresholds
const APPEAL_TYPE_THRESHOLD: f64 = 0.6;
const SUBJECT_MATTER_THRESHOLD: f64 = 0.7;
const JUDGING_BODY_THRESHOLD: f64 = 0.7;

// Per-criterion weights
const APPEAL_TYPE_WEIGHT: f64 = 20.0;
const SUBJECT_MATTER_WEIGHT: f64 = 15.0;
const OUTCOME_POINTS: u32 = 15;
const APPELLANT_POINTS: u32 = 10;
const JUDGING_BODY_WEIGHT: f64 = 10.0;
const KEYWORD_POINTS: u32 = 5;
const CASE_NUMBER_POINTS: u32 = 50;

/// A multi-criterion query. Every criterion is optional; records are scored
/// only against the criteria that are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    /// Fuzzy-matched against the record's appeal-type label
    pub appeal_type: Option<String>,
    /// Fuzzy-matched against every record topic
    pub subject_matters: Vec<String>,
    /// Accent/case-insensitive exact match against the outcome label
    pub outcome: Option<String>,
    /// Accent/case-insensitive exact match against the appellant label
    pub appellant: Option<String>,
    /// Fuzzy-matched against the record's chamber name
    pub judging_body: Option<String>,
    /// Substring-matched against the record's keyword list
    pub keywords: Vec<String>,
    /// Substring-matched against the record's case number
    pub case_number: Option<String>,
}

impl Criteria {
    /// Build criteria from a JSON object mapping criterion names to values.
    ///
    /// Recognized keys: `appealType`, `subjectMatters`, `outcome`,
    /// `appellant`, `judgingBody`, `keywords`, `caseNumber`. Unrecognized
    /// keys are ignored. Multi-valued criteria accept either a single string
    /// or a list of strings; any other value shape is a caller contract
    /// violation and fails fast.
    pub fn from_json_value(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| SearchError::InvalidCriterion {
            criterion: "query".to_string(),
            reason: "expected a JSON object of criteria".to_string(),
        })?;

        let mut criteria = Criteria::default();

        for (key, value) in object {
            match key.as_str() {
                "appealType" => criteria.appeal_type = Some(expect_string(key, value)?),
                "subjectMatters" => criteria.subject_matters = expect_string_list(key, value)?,
                "outcome" => criteria.outcome = Some(expect_string(key, value)?),
                "appellant" => criteria.appellant = Some(expect_string(key, value)?),
                "judgingBody" => criteria.judging_body = Some(expect_string(key, value)?),
                "keywords" => criteria.keywords = expect_string_list(key, value)?,
                "caseNumber" => criteria.case_number = Some(expect_string(key, value)?),
                unknown => {
                    tracing::debug!(criterion = unknown, "Ignoring unrecognized criterion");
                }
            }
        }

        Ok(criteria)
    }

    /// Whether no criterion is present (such a query matches nothing)
    pub fn is_empty(&self) -> bool {
        self.appeal_type.is_none()
            && self.subject_matters.is_empty()
            && self.outcome.is_none()
            && self.appellant.is_none()
            && self.judging_body.is_none()
            && self.keywords.is_empty()
            && self.case_number.is_none()
    }
}

fn expect_string(key: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| SearchError::InvalidCriterion {
            criterion: key.to_string(),
            reason: format!("expected a string, got {}", value),
        })
}

fn expect_string_list(key: &str, value: &Value) -> Result<Vec<String>> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| expect_string(key, item))
            .collect(),
        other => Err(SearchError::InvalidCriterion {
            criterion: key.to_string(),
            reason: format!("expected a string or list of strings, got {}", other),
        }),
    }
}

/// One ranked search hit, borrowed from the collection for the duration of
/// the call
#[derive(Debug, Clone)]
pub struct ScoredResult<'a> {
    /// The matching record
    pub record: &'a DocumentRecord,
    /// Accumulated points across all matching criteria (always ≥ 1)
    pub score: u32,
    /// Human-readable summary of which criteria matched
    pub explanations: Vec<String>,
}

/// Score every record against the criteria and return the ranked results.
///
/// Records with a zero total score are excluded. The result order is
/// descending by score, with ties keeping the collection's insertion order.
pub fn search<'a>(collection: &'a Collection, criteria: &Criteria) -> Vec<ScoredResult<'a>> {
    let mut results: Vec<ScoredResult<'a>> = collection
        .documents
        .iter()
        .filter_map(|record| score_record(record, criteria))
        .collect();

    // Stable sort: ties keep insertion order
    results.sort_by(|a, b| b.score.cmp(&a.score));

    tracing::debug!(
        candidates = collection.documents.len(),
        matches = results.len(),
        "Search completed"
    );

    results
}

/// Accumulate per-criterion contributions for one record; `None` when the
/// total score is zero
fn score_record<'a>(record: &'a DocumentRecord, criteria: &Criteria) -> Option<ScoredResult<'a>> {
    let mut score = 0u32;
    let mut explanations = Vec::new();

    if let Some(wanted) = &criteria.appeal_type {
        let sim = similarity(record.appeal_type.label(), wanted);
        if sim > APPEAL_TYPE_THRESHOLD {
            score += (sim * APPEAL_TYPE_WEIGHT) as u32;
            explanations.push(format!("Appeal type: {}", record.appeal_type));
        }
    }

    for wanted in &criteria.subject_matters {
        for topic in &record.subject_matters {
            let sim = similarity(topic, wanted);
            if sim > SUBJECT_MATTER_THRESHOLD {
                score += (sim * SUBJECT_MATTER_WEIGHT) as u32;
                let line = format!("Subject: {}", topic);
                if !explanations.contains(&line) {
                    explanations.push(line);
                }
            }
        }
    }

    if let Some(wanted) = &criteria.outcome {
        if fold_accents(record.outcome.label()) == fold_accents(wanted) {
            score += OUTCOME_POINTS;
            explanations.push(format!("Outcome: {}", record.outcome));
        }
    }

    if let Some(wanted) = &criteria.appellant {
        if fold_accents(record.appellant.label()) == fold_accents(wanted) {
            score += APPELLANT_POINTS;
            explanations.push(format!("Appellant: {}", record.appellant));
        }
    }

    if let Some(wanted) = &criteria.judging_body {
        let sim = similarity(&record.judging_body, wanted);
        if sim > JUDGING_BODY_THRESHOLD {
            score += (sim * JUDGING_BODY_WEIGHT) as u32;
            explanations.push(format!("Judging body: {}", record.judging_body));
        }
    }

    for wanted in &criteria.keywords {
        let folded = fold_accents(wanted);
        // First record-keyword hit only: a query keyword never scores twice
        for keyword in &record.keywords {
            if fold_accents(keyword).contains(&folded) {
                score += KEYWORD_POINTS;
                break;
            }
        }
    }

    if let Some(wanted) = &criteria.case_number {
        if record.case_number.contains(wanted.as_str()) {
            score += CASE_NUMBER_POINTS;
            explanations.push(format!("Case number: {}", record.case_number));
        }
    }

    if score > 0 {
        Some(ScoredResult {
            record,
            score,
            explanations,
        })
    } else {
        None
    }
}

/// Render the ranked results for display: the top `limit` hits with a count
/// of the omitted remainder. Explanation lists are truncated to
/// `explanation_limit` entries per result; truncation never affects scoring.
pub fn format_results(
    results: &[ScoredResult<'_>],
    limit: usize,
    explanation_limit: usize,
) -> String {
    if results.is_empty() {
        return "No documents matched the given criteria.\n".to_string();
    }

    let mut out = format!("Found {} document(s)\n", results.len());

    for (position, result) in results.iter().take(limit).enumerate() {
        let record = result.record;
        out.push_str(&format!("\n{}. {}\n", position + 1, record.display_name));
        out.push_str(&format!("   Path: {}\n", record.path));
        out.push_str(&format!("   Relevance: {} points\n", result.score));
        out.push_str(&format!("   Type: {}\n", record.appeal_type));
        out.push_str(&format!("   Outcome: {}\n", record.outcome));
        out.push_str(&format!("   Appellant: {}\n", record.appellant));
        out.push_str(&format!("   Judging body: {}\n", record.judging_body));
        out.push_str(&format!(
            "   Subjects: {}\n",
            record.subject_matters[..record.subject_matters.len().min(3)].join(", ")
        ));
        if record.case_number != UNIDENTIFIED {
            out.push_str(&format!("   Case number: {}\n", record.case_number));
        }
        if record.ruling_date != UNIDENTIFIED {
            out.push_str(&format!("   Ruling date: {}\n", record.ruling_date));
        }
        let shown = result.explanations.len().min(explanation_limit);
        if shown > 0 {
            out.push_str(&format!(
                "   Matches: {}\n",
                result.explanations[..shown].join(", ")
            ));
        }
    }

    if results.len() > limit {
        out.push_str(&format!("\n... and {} more result(s)\n", results.len() - limit));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AppealType, Appellant, Outcome};
    use chrono::Utc;
    use serde_json::json;

    fn record(path: &str) -> DocumentRecord {
        DocumentRecord {
            path: format!("documents/{}", path),
            display_name: path.to_string(),
            appeal_type: AppealType::Unidentified,
            case_number: UNIDENTIFIED.to_string(),
            judging_body: UNIDENTIFIED.to_string(),
            ruling_date: UNIDENTIFIED.to_string(),
            outcome: Outcome::Unidentified,
            appellant: Appellant::Unidentified,
            subject_matters: vec![UNIDENTIFIED.to_string()],
            keywords: vec![],
            size_bytes: 0,
            indexed_at: Utc::now(),
        }
    }

    fn collection(documents: Vec<DocumentRecord>) -> Collection {
        Collection {
            subject_label: "Test".to_string(),
            issuing_body: "TJ/RJ".to_string(),
            description: "fixture".to_string(),
            last_updated: Utc::now(),
            total_documents: documents.len(),
            documents,
        }
    }

    #[test]
    fn empty_criteria_match_nothing() {
        let mut granted = record("a.pdf");
        granted.outcome = Outcome::Granted;
        let collection = collection(vec![granted]);

        let results = search(&collection, &Criteria::default());
        assert!(results.is_empty());
    }

    #[test]
    fn outcome_exact_match_scores_flat_fifteen() {
        let mut granted = record("a.pdf");
        granted.outcome = Outcome::Granted;
        let mut denied = record("b.pdf");
        denied.outcome = Outcome::Denied;
        let unidentified = record("c.pdf");
        let collection = collection(vec![granted, denied, unidentified]);

        let criteria = Criteria {
            outcome: Some("PROVIDO".to_string()),
            ..Criteria::default()
        };
        let results = search(&collection, &criteria);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 15);
        assert_eq!(results[0].record.display_name, "a.pdf");
    }

    #[test]
    fn outcome_match_is_accent_and_case_insensitive() {
        let mut rec = record("a.pdf");
        rec.outcome = Outcome::NotConsidered;
        let collection = collection(vec![rec]);

        let criteria = Criteria {
            outcome: Some("nao conhecido".to_string()),
            ..Criteria::default()
        };
        let results = search(&collection, &criteria);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 15);
    }

    #[test]
    fn appeal_type_contribution_is_monotonic_in_similarity() {
        let mut rec = record("a.pdf");
        rec.appeal_type = AppealType::ExecutionGrievance; // "AGRAVO EM EXECUÇÃO"
        let collection = collection(vec![rec]);

        let exact = Criteria {
            appeal_type: Some("AGRAVO EM EXECUÇÃO".to_string()),
            ..Criteria::default()
        };
        let close = Criteria {
            appeal_type: Some("AGRAVO EXECUÇÃO".to_string()),
            ..Criteria::default()
        };

        let exact_score = search(&collection, &exact)[0].score;
        let close_score = search(&collection, &close)[0].score;
        assert!(exact_score >= close_score);
        assert_eq!(exact_score, 20);
    }

    #[test]
    fn appeal_type_below_threshold_contributes_nothing() {
        let mut rec = record("a.pdf");
        rec.appeal_type = AppealType::HabeasCorpus;
        let collection = collection(vec![rec]);

        let criteria = Criteria {
            appeal_type: Some("REVISÃO CRIMINAL".to_string()),
            ..Criteria::default()
        };
        assert!(search(&collection, &criteria).is_empty());
    }

    #[test]
    fn subject_matters_score_per_matching_pair() {
        let mut rec = record("a.pdf");
        rec.subject_matters = vec!["ROUBO".to_string(), "FURTO".to_string()];
        let collection = collection(vec![rec]);

        let one_topic = Criteria {
            subject_matters: vec!["ROUBO".to_string()],
            ..Criteria::default()
        };
        let two_topics = Criteria {
            subject_matters: vec!["ROUBO".to_string(), "FURTO".to_string()],
            ..Criteria::default()
        };

        assert_eq!(search(&collection, &one_topic)[0].score, 15);
        assert_eq!(search(&collection, &two_topics)[0].score, 30);
    }

    #[test]
    fn keyword_scores_once_per_query_keyword() {
        let mut rec = record("a.pdf");
        rec.keywords = vec!["dosimetria".to_string(), "dosimetrias".to_string()];
        let collection = collection(vec![rec]);

        // "dosimetria" is a substring of both record keywords; it must still
        // score a single flat hit
        let criteria = Criteria {
            keywords: vec!["dosimetria".to_string()],
            ..Criteria::default()
        };
        assert_eq!(search(&collection, &criteria)[0].score, 5);
    }

    #[test]
    fn keyword_match_is_substring_and_accent_folded() {
        let mut rec = record("a.pdf");
        rec.keywords = vec!["execução".to_string()];
        let collection = collection(vec![rec]);

        let criteria = Criteria {
            keywords: vec!["EXECUCAO".to_string()],
            ..Criteria::default()
        };
        assert_eq!(search(&collection, &criteria)[0].score, 5);
    }

    #[test]
    fn case_number_substring_scores_fifty_and_dominates() {
        let mut by_number = record("a.pdf");
        by_number.case_number = "0012345-67.2021.8.19.0001".to_string();

        // A record matching three heuristic criteria at their flat weights
        let mut by_heuristics = record("b.pdf");
        by_heuristics.outcome = Outcome::Granted;
        by_heuristics.appellant = Appellant::Defense;
        by_heuristics.judging_body = "Quarta Câmara Criminal".to_string();

        let collection = collection(vec![by_heuristics, by_number]);

        let criteria = Criteria {
            case_number: Some("0012345-67".to_string()),
            outcome: Some("PROVIDO".to_string()),
            appellant: Some("DEFESA".to_string()),
            judging_body: Some("Quarta Câmara Criminal".to_string()),
            ..Criteria::default()
        };
        let results = search(&collection, &criteria);

        assert_eq!(results.len(), 2);
        // 15 + 10 + 10 = 35 for the heuristic record; 50 alone wins
        assert_eq!(results[0].record.display_name, "a.pdf");
        assert_eq!(results[0].score, 50);
        assert_eq!(results[1].score, 35);
    }

    #[test]
    fn ties_keep_collection_insertion_order() {
        let mut first = record("first.pdf");
        first.outcome = Outcome::Granted;
        let mut second = record("second.pdf");
        second.outcome = Outcome::Granted;
        let collection = collection(vec![first, second]);

        let criteria = Criteria {
            outcome: Some("PROVIDO".to_string()),
            ..Criteria::default()
        };
        let results = search(&collection, &criteria);

        assert_eq!(results[0].record.display_name, "first.pdf");
        assert_eq!(results[1].record.display_name, "second.pdf");
    }

    #[test]
    fn explanations_name_the_matching_criteria() {
        let mut rec = record("a.pdf");
        rec.outcome = Outcome::Granted;
        rec.appellant = Appellant::Defense;
        let collection = collection(vec![rec]);

        let criteria = Criteria {
            outcome: Some("PROVIDO".to_string()),
            appellant: Some("DEFESA".to_string()),
            ..Criteria::default()
        };
        let results = search(&collection, &criteria);
        assert_eq!(
            results[0].explanations,
            vec!["Outcome: PROVIDO", "Appellant: DEFESA"]
        );
    }

    #[test]
    fn criteria_from_json_ignores_unknown_keys() {
        let criteria = Criteria::from_json_value(&json!({
            "outcome": "PROVIDO",
            "subjectMatters": ["ROUBO"],
            "completelyUnknown": "ignored"
        }))
        .unwrap();

        assert_eq!(criteria.outcome.as_deref(), Some("PROVIDO"));
        assert_eq!(criteria.subject_matters, vec!["ROUBO"]);
    }

    #[test]
    fn criteria_from_json_accepts_single_string_for_lists() {
        let criteria = Criteria::from_json_value(&json!({
            "keywords": "dosimetria"
        }))
        .unwrap();
        assert_eq!(criteria.keywords, vec!["dosimetria"]);
    }

    #[test]
    fn criteria_from_json_rejects_wrong_shapes() {
        let err = Criteria::from_json_value(&json!({ "outcome": 15 })).unwrap_err();
        assert!(matches!(err, SearchError::InvalidCriterion { .. }));

        let err = Criteria::from_json_value(&json!({ "keywords": { "a": 1 } })).unwrap_err();
        assert!(matches!(err, SearchError::InvalidCriterion { .. }));

        let err = Criteria::from_json_value(&json!("not an object")).unwrap_err();
        assert!(matches!(err, SearchError::InvalidCriterion { .. }));
    }

    #[test]
    fn format_results_reports_omitted_matches() {
        let mut documents = Vec::new();
        for i in 0..4 {
            let mut rec = record(&format!("doc{}.pdf", i));
            rec.outcome = Outcome::Granted;
            documents.push(rec);
        }
        let collection = collection(documents);

        let criteria = Criteria {
            outcome: Some("PROVIDO".to_string()),
            ..Criteria::default()
        };
        let results = search(&collection, &criteria);
        let rendered = format_results(&results, 2, 5);

        assert!(rendered.contains("Found 4 document(s)"));
        assert!(rendered.contains("doc0.pdf"));
        assert!(rendered.contains("doc1.pdf"));
        assert!(!rendered.contains("doc3.pdf"));
        assert!(rendered.contains("... and 2 more result(s)"));
    }

    #[test]
    fn format_results_handles_empty_input() {
        let rendered = format_results(&[], 10, 5);
        assert!(rendered.contains("No documents matched"));
    }
}

//! Per-learner accuracy statistics and strength/weakness classification.
//!
//! Records are grouped by the *term text* of their card, so cards from
//! regenerated sets that share a term are merged into one statistic.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, StudyError};
use crate::model::{normalize_learner, Card, PerformanceRecord};
use crate::traits::{CardStore, RecordStore};

/// Classification thresholds. Accuracies are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// A term at or above this accuracy is a strength.
    #[serde(default = "default_strength_threshold")]
    pub strength_threshold: f64,
    /// A term below this accuracy is a weakness.
    #[serde(default = "default_weakness_threshold")]
    pub weakness_threshold: f64,
    /// Terms with fewer attempts are never classified.
    #[serde(default = "default_min_attempts")]
    pub min_attempts: u32,
    /// Length cap for each of the strength and weakness lists.
    #[serde(default = "default_max_listed")]
    pub max_listed: usize,
}

fn default_strength_threshold() -> f64 {
    80.0
}
fn default_weakness_threshold() -> f64 {
    60.0
}
fn default_min_attempts() -> u32 {
    2
}
fn default_max_listed() -> usize {
    5
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            strength_threshold: default_strength_threshold(),
            weakness_threshold: default_weakness_threshold(),
            min_attempts: default_min_attempts(),
            max_listed: default_max_listed(),
        }
    }
}

/// Aggregate outcome counts for one term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermStat {
    pub correct: u32,
    pub incorrect: u32,
    pub total: u32,
    /// Percentage, unrounded.
    pub accuracy: f64,
    /// First card seen for this term.
    pub card_id: Uuid,
}

/// A term listed as a strength or weakness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermClassification {
    pub term: String,
    pub accuracy: f64,
    pub attempts: u32,
}

/// Learner performance report.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Report {
    pub total_attempts: u32,
    pub correct_count: u32,
    pub incorrect_count: u32,
    /// Overall percentage, rounded to two decimals.
    pub accuracy: f64,
    pub strengths: Vec<TermClassification>,
    pub weaknesses: Vec<TermClassification>,
    pub term_analysis: BTreeMap<String, TermStat>,
}

/// `correct / total` as a percentage; 0 when there are no attempts.
pub fn accuracy_percent(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    correct as f64 / total as f64 * 100.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute a report from records and a card lookup.
///
/// Records whose card cannot be resolved still count toward the overall
/// totals but are left out of the per-term analysis.
pub fn compute_report<F>(records: &[PerformanceRecord], mut lookup: F, config: &AnalyticsConfig) -> Report
where
    F: FnMut(Uuid) -> Option<Card>,
{
    if records.is_empty() {
        return Report::default();
    }

    let total_attempts = records.len() as u32;
    let correct_count = records.iter().filter(|r| r.outcome.is_correct()).count() as u32;
    let incorrect_count = total_attempts - correct_count;

    // First-seen order drives tie-breaking in the sorted lists.
    let mut order: Vec<String> = Vec::new();
    let mut stats: HashMap<String, TermStat> = HashMap::new();
    let mut card_terms: HashMap<Uuid, Option<String>> = HashMap::new();

    for record in records {
        let term = card_terms
            .entry(record.card_id)
            .or_insert_with(|| lookup(record.card_id).map(|c| c.term))
            .clone();
        let Some(term) = term else {
            tracing::warn!(card = %record.card_id, "record references a missing card, skipping");
            continue;
        };

        let stat = stats.entry(term.clone()).or_insert_with(|| {
            order.push(term);
            TermStat {
                correct: 0,
                incorrect: 0,
                total: 0,
                accuracy: 0.0,
                card_id: record.card_id,
            }
        });
        if record.outcome.is_correct() {
            stat.correct += 1;
        } else {
            stat.incorrect += 1;
        }
    }

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut term_analysis = BTreeMap::new();

    for term in order {
        let Some(mut stat) = stats.remove(&term) else {
            continue;
        };
        stat.total = stat.correct + stat.incorrect;
        stat.accuracy = accuracy_percent(stat.correct, stat.total);

        if stat.total >= config.min_attempts {
            let entry = TermClassification {
                term: term.clone(),
                accuracy: stat.accuracy,
                attempts: stat.total,
            };
            if stat.accuracy >= config.strength_threshold {
                strengths.push(entry.clone());
            }
            if stat.accuracy < config.weakness_threshold {
                weaknesses.push(entry);
            }
        }

        term_analysis.insert(term, stat);
    }

    strengths.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));
    weaknesses.sort_by(|a, b| a.accuracy.total_cmp(&b.accuracy));
    strengths.truncate(config.max_listed);
    weaknesses.truncate(config.max_listed);

    Report {
        total_attempts,
        correct_count,
        incorrect_count,
        accuracy: round2(accuracy_percent(correct_count, total_attempts)),
        strengths,
        weaknesses,
        term_analysis,
    }
}

/// Builds reports from the stores.
pub struct AnalyticsEngine {
    cards: Arc<dyn CardStore>,
    records: Arc<dyn RecordStore>,
    config: AnalyticsConfig,
}

impl AnalyticsEngine {
    pub fn new(
        cards: Arc<dyn CardStore>,
        records: Arc<dyn RecordStore>,
        config: AnalyticsConfig,
    ) -> Self {
        Self {
            cards,
            records,
            config,
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Analyze a learner's records, optionally restricted to one set.
    ///
    /// A blank learner id reads the anonymous learner's records. An unknown
    /// set is an error.
    pub fn analyze(&self, learner_id: &str, set_id: Option<Uuid>) -> Result<Report> {
        let learner_id = normalize_learner(learner_id);
        let mut records = self.records.records_for_learner(learner_id)?;

        let cards = match set_id {
            Some(set_id) => {
                let set = self
                    .cards
                    .set(set_id)?
                    .ok_or(StudyError::UnknownSet(set_id))?;
                let ids: HashSet<Uuid> = set.cards.iter().map(|c| c.id).collect();
                records.retain(|r| ids.contains(&r.card_id));
                set.cards
            }
            None => {
                let ids: HashSet<Uuid> = records.iter().map(|r| r.card_id).collect();
                let ids: Vec<Uuid> = ids.into_iter().collect();
                self.cards.cards(&ids)?
            }
        };
        let known: HashMap<Uuid, Card> = cards.into_iter().map(|c| (c.id, c)).collect();

        tracing::debug!(
            learner = learner_id,
            records = records.len(),
            cards = known.len(),
            "computing analysis"
        );

        Ok(compute_report(
            &records,
            |id| known.get(&id).cloned(),
            &self.config,
        ))
    }
}

impl Report {
    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} attempts, {} correct, {} incorrect, {:.2}% accuracy\n\n",
            self.total_attempts, self.correct_count, self.incorrect_count, self.accuracy
        ));

        let mut list = |heading: &str, items: &[TermClassification]| {
            if items.is_empty() {
                return;
            }
            md.push_str(&format!("### {heading}\n\n"));
            md.push_str("| Term | Accuracy | Attempts |\n");
            md.push_str("|------|----------|----------|\n");
            for item in items {
                md.push_str(&format!(
                    "| {} | {:.1}% | {} |\n",
                    item.term, item.accuracy, item.attempts
                ));
            }
            md.push('\n');
        };
        list("Strengths", &self.strengths);
        list("Weaknesses", &self.weaknesses);

        if !self.term_analysis.is_empty() {
            md.push_str("### Terms\n\n");
            md.push_str("| Term | Correct | Incorrect | Accuracy |\n");
            md.push_str("|------|---------|-----------|----------|\n");
            for (term, stat) in &self.term_analysis {
                md.push_str(&format!(
                    "| {} | {} | {} | {:.1}% |\n",
                    term, stat.correct, stat.incorrect, stat.accuracy
                ));
            }
        }

        md
    }

    pub fn is_empty(&self) -> bool {
        self.total_attempts == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Outcome, PerformanceRecord};
    use crate::testing::{card, FakeStore};

    fn records(card_id: Uuid, correct: u32, incorrect: u32) -> Vec<PerformanceRecord> {
        let mut out = Vec::new();
        for _ in 0..correct {
            out.push(PerformanceRecord::new(card_id, "ana", Outcome::Correct));
        }
        for _ in 0..incorrect {
            out.push(PerformanceRecord::new(card_id, "ana", Outcome::Incorrect));
        }
        out
    }

    fn lookup_in(cards: &[Card]) -> impl FnMut(Uuid) -> Option<Card> + '_ {
        move |id| cards.iter().find(|c| c.id == id).cloned()
    }

    #[test]
    fn empty_records_give_zero_report() {
        let report = compute_report(&[], |_| None, &AnalyticsConfig::default());
        assert_eq!(report, Report::default());
        assert!(report.is_empty());
        assert_eq!(report.accuracy, 0.0);
    }

    #[test]
    fn mitosis_at_75_percent_is_unclassified() {
        let mitosis = card("Mitosis", Uuid::new_v4());
        let recs = records(mitosis.id, 3, 1);
        let cards = vec![mitosis];
        let report = compute_report(&recs, lookup_in(&cards), &AnalyticsConfig::default());

        let stat = &report.term_analysis["Mitosis"];
        assert_eq!(stat.total, 4);
        assert!((stat.accuracy - 75.0).abs() < f64::EPSILON);
        assert!(report.strengths.is_empty());
        assert!(report.weaknesses.is_empty());
        assert_eq!(report.accuracy, 75.0);
    }

    #[test]
    fn classification_needs_two_attempts() {
        let set = Uuid::new_v4();
        let once_right = card("Osmosis", set);
        let once_wrong = card("Diffusion", set);
        let mut recs = records(once_right.id, 1, 0);
        recs.extend(records(once_wrong.id, 0, 1));
        let cards = vec![once_right, once_wrong];

        let report = compute_report(&recs, lookup_in(&cards), &AnalyticsConfig::default());
        assert!(report.strengths.is_empty());
        assert!(report.weaknesses.is_empty());
        assert_eq!(report.term_analysis.len(), 2);
    }

    #[test]
    fn strengths_and_weaknesses_sorted_and_capped() {
        let set = Uuid::new_v4();
        let mut cards = Vec::new();
        let mut recs = Vec::new();
        // Seven strong terms with differing accuracy, seven weak ones.
        for i in 0..7u32 {
            let strong = card(&format!("Strong{i}"), set);
            recs.extend(records(strong.id, 8 + i, 2));
            cards.push(strong);

            let weak = card(&format!("Weak{i}"), set);
            recs.extend(records(weak.id, i, 10));
            cards.push(weak);
        }

        let report = compute_report(&recs, lookup_in(&cards), &AnalyticsConfig::default());
        assert_eq!(report.strengths.len(), 5);
        assert_eq!(report.weaknesses.len(), 5);
        assert_eq!(report.strengths[0].term, "Strong6");
        assert!(report
            .strengths
            .windows(2)
            .all(|w| w[0].accuracy >= w[1].accuracy));
        assert_eq!(report.weaknesses[0].term, "Weak0");
        assert!(report
            .weaknesses
            .windows(2)
            .all(|w| w[0].accuracy <= w[1].accuracy));
        assert_eq!(report.term_analysis.len(), 14);
    }

    #[test]
    fn terms_merge_across_cards() {
        let first = card("Enzyme", Uuid::new_v4());
        let second = card("Enzyme", Uuid::new_v4());
        let mut recs = records(first.id, 1, 0);
        recs.extend(records(second.id, 0, 1));
        let cards = vec![first.clone(), second];

        let report = compute_report(&recs, lookup_in(&cards), &AnalyticsConfig::default());
        let stat = &report.term_analysis["Enzyme"];
        assert_eq!(stat.total, 2);
        assert_eq!(stat.card_id, first.id);
        assert_eq!(report.weaknesses.len(), 1);
    }

    #[test]
    fn overall_accuracy_rounds_to_two_decimals() {
        let c = card("Ribosome", Uuid::new_v4());
        let recs = records(c.id, 2, 1);
        let cards = vec![c];
        let report = compute_report(&recs, lookup_in(&cards), &AnalyticsConfig::default());
        assert_eq!(report.accuracy, 66.67);
        assert_eq!(report.correct_count, 2);
        assert_eq!(report.incorrect_count, 1);
    }

    #[test]
    fn missing_cards_count_only_overall() {
        let c = card("Nucleus", Uuid::new_v4());
        let mut recs = records(c.id, 1, 0);
        recs.extend(records(Uuid::new_v4(), 0, 1));
        let cards = vec![c];
        let report = compute_report(&recs, lookup_in(&cards), &AnalyticsConfig::default());
        assert_eq!(report.total_attempts, 2);
        assert_eq!(report.term_analysis.len(), 1);
    }

    #[test]
    fn extra_incorrect_never_raises_accuracy() {
        let c = card("Allele", Uuid::new_v4());
        let cards = vec![c.clone()];
        let mut recs = records(c.id, 3, 2);
        let config = AnalyticsConfig::default();
        let mut previous = compute_report(&recs, lookup_in(&cards), &config).term_analysis["Allele"].accuracy;
        for _ in 0..5 {
            recs.push(PerformanceRecord::new(c.id, "ana", Outcome::Incorrect));
            let next = compute_report(&recs, lookup_in(&cards), &config).term_analysis["Allele"].accuracy;
            assert!(next <= previous);
            previous = next;
        }
    }

    #[test]
    fn engine_filters_by_set_and_is_idempotent() {
        let store = Arc::new(FakeStore::default());
        let set_a = store.add_set("Cells", &["Mitosis", "Meiosis"]);
        let set_b = store.add_set("Genes", &["Allele"]);

        for card in set_a.cards.iter().chain(set_b.cards.iter()) {
            for outcome in [Outcome::Correct, Outcome::Incorrect] {
                store.push(PerformanceRecord::new(card.id, "ana", outcome));
            }
        }
        store.push(PerformanceRecord::new(set_b.cards[0].id, "ben", Outcome::Correct));

        let engine = AnalyticsEngine::new(store.clone(), store.clone(), AnalyticsConfig::default());

        let all = engine.analyze("ana", None).unwrap();
        assert_eq!(all.total_attempts, 6);
        assert_eq!(all.term_analysis.len(), 3);

        let only_b = engine.analyze("ana", Some(set_b.id)).unwrap();
        assert_eq!(only_b.total_attempts, 2);
        assert_eq!(
            only_b.term_analysis.keys().collect::<Vec<_>>(),
            vec!["Allele"]
        );

        assert_eq!(engine.analyze("ana", None).unwrap(), all);
        assert!(engine.analyze("nobody", None).unwrap().is_empty());
    }

    #[test]
    fn engine_resolves_cards_in_one_batch() {
        let store = Arc::new(FakeStore::default());
        let set = store.add_set("Cells", &["Mitosis", "Meiosis", "Osmosis"]);
        for card in &set.cards {
            for _ in 0..4 {
                store.push(PerformanceRecord::new(card.id, "ana", Outcome::Correct));
            }
        }
        store.push(PerformanceRecord::new(Uuid::new_v4(), "ana", Outcome::Incorrect));

        let engine = AnalyticsEngine::new(store.clone(), store.clone(), AnalyticsConfig::default());
        let report = engine.analyze("ana", None).unwrap();

        assert_eq!(report.total_attempts, 13);
        assert_eq!(report.term_analysis.len(), 3);
        // One default-method call per distinct card id, never per record.
        assert_eq!(store.card_lookups(), 4);
    }

    #[test]
    fn engine_rejects_unknown_set() {
        let store = Arc::new(FakeStore::default());
        let engine = AnalyticsEngine::new(store.clone(), store, AnalyticsConfig::default());
        let missing = Uuid::new_v4();
        assert!(matches!(
            engine.analyze("ana", Some(missing)),
            Err(StudyError::UnknownSet(id)) if id == missing
        ));
    }

    #[test]
    fn blank_learner_reads_anonymous_records() {
        let store = Arc::new(FakeStore::default());
        let set = store.add_set("Cells", &["Mitosis"]);
        store.push(PerformanceRecord::new(set.cards[0].id, "anonymous", Outcome::Correct));

        let engine = AnalyticsEngine::new(store.clone(), store, AnalyticsConfig::default());
        assert_eq!(engine.analyze("", None).unwrap().total_attempts, 1);
        assert_eq!(engine.analyze("  ", Some(set.id)).unwrap().total_attempts, 1);
    }

    #[test]
    fn markdown_lists_sections() {
        let c = card("Photosynthesis", Uuid::new_v4());
        let recs = records(c.id, 0, 3);
        let cards = vec![c];
        let report = compute_report(&recs, lookup_in(&cards), &AnalyticsConfig::default());
        let md = report.to_markdown();
        assert!(md.contains("3 attempts"));
        assert!(md.contains("Weaknesses"));
        assert!(!md.contains("Strengths"));
        assert!(md.contains("Photosynthesis"));
    }
}

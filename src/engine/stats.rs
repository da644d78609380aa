//! Accuracy and progress aggregation

use indexmap::IndexMap;
use serde::Serialize;

use crate::catalog::{Subject, Topic};
use crate::session::AnsweredRecord;

/// `round(part / total * 100)`, rounding halves up, 0 when `total` is 0
pub fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rounded = (part * 200 + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Share of correct answers as a whole percentage
pub fn compute_accuracy(answered: &[AnsweredRecord]) -> u32 {
    let correct = answered.iter().filter(|a| a.is_correct).count();
    percent(correct, answered.len())
}

/// How far through the filtered quiz the current run is, at most 100
pub fn progress_percent(answered_in_run: usize, filtered_total: usize) -> u32 {
    percent(answered_in_run.min(filtered_total), filtered_total)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicStats {
    pub answered: usize,
    pub correct: usize,
    pub accuracy: u32,
}

/// Per-topic tallies, one entry per known topic in topic order.
///
/// Records whose topic is not in `topics` are ignored.
pub fn compute_topic_stats(
    topics: &IndexMap<String, Topic>,
    answered: &[AnsweredRecord],
) -> IndexMap<String, TopicStats> {
    let mut stats: IndexMap<String, TopicStats> = topics
        .keys()
        .map(|id| (id.clone(), TopicStats::default()))
        .collect();

    for record in answered {
        if let Some(entry) = stats.get_mut(&record.topic) {
            entry.answered += 1;
            if record.is_correct {
                entry.correct += 1;
            }
        }
    }

    for entry in stats.values_mut() {
        entry.accuracy = percent(entry.correct, entry.answered);
    }

    stats
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSummary {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub stats: TopicStats,
}

/// Totals and topic breakdown for one subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectStats {
    pub answered: usize,
    pub correct: usize,
    pub accuracy: u32,
    pub topics: Vec<TopicSummary>,
}

pub fn subject_stats(subject: &Subject, answered: &[AnsweredRecord]) -> SubjectStats {
    let topics = compute_topic_stats(&subject.topics, answered)
        .into_iter()
        .map(|(id, stats)| TopicSummary {
            name: subject.topic_name(&id).to_string(),
            id,
            stats,
        })
        .collect();

    SubjectStats {
        answered: answered.len(),
        correct: answered.iter().filter(|a| a.is_correct).count(),
        accuracy: compute_accuracy(answered),
        topics,
    }
}

//! Derived views over a subject: quiz lists, flashcard decks, content listings

use serde::Serialize;

use crate::catalog::{Flashcard, Question, QuestionType, Subject};

/// Questions matching a type and topic filter, `None` meaning "all".
///
/// With no type filter the buckets are concatenated in their fixed order;
/// within a bucket the catalog insertion order is kept.
pub fn filter_questions<'a>(
    subject: &'a Subject,
    kind: Option<QuestionType>,
    topic: Option<&str>,
) -> Vec<&'a Question> {
    let questions: Vec<&Question> = match kind {
        Some(kind) => subject.quiz_data.bucket(kind).iter().collect(),
        None => subject.quiz_data.iter().collect(),
    };

    match topic {
        Some(topic) => questions.into_iter().filter(|q| q.topic == topic).collect(),
        None => questions,
    }
}

/// Flashcards of a subject, optionally restricted to one topic
pub fn filter_flashcards<'a>(subject: &'a Subject, topic: Option<&str>) -> Vec<&'a Flashcard> {
    subject
        .flashcards
        .iter()
        .filter(|card| topic.map_or(true, |t| card.topic == t))
        .collect()
}

/// Which collection a content listing shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Questions,
    Flashcards,
}

/// One row of the content management listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: u64,
    /// Question type, `None` for flashcards
    pub question_type: Option<QuestionType>,
    pub topic: String,
    /// Question text or flashcard front
    pub text: String,
}

/// List questions or flashcards for authoring, sorted by topic then text.
///
/// `search` is a case-insensitive substring match on the item text.
pub fn list_content(
    subject: &Subject,
    kind: ContentKind,
    topic: Option<&str>,
    search: Option<&str>,
) -> Vec<ContentItem> {
    let mut items: Vec<ContentItem> = match kind {
        ContentKind::Questions => subject
            .quiz_data
            .iter()
            .map(|q| ContentItem {
                id: q.id,
                question_type: Some(q.kind()),
                topic: q.topic.clone(),
                text: q.text.clone(),
            })
            .collect(),
        ContentKind::Flashcards => subject
            .flashcards
            .iter()
            .map(|f| ContentItem {
                id: f.id,
                question_type: None,
                topic: f.topic.clone(),
                text: f.front.clone(),
            })
            .collect(),
    };

    if let Some(topic) = topic {
        items.retain(|item| item.topic == topic);
    }

    let search = search.map(str::trim).unwrap_or_default().to_lowercase();
    if !search.is_empty() {
        items.retain(|item| item.text.to_lowercase().contains(&search));
    }

    items.sort_by(|a, b| {
        a.topic
            .cmp(&b.topic)
            .then_with(|| a.text.to_lowercase().cmp(&b.text.to_lowercase()))
    });

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, NewFlashcard, NewQuestion, QuestionBody};

    fn sample() -> (Catalog, String) {
        let mut catalog = Catalog::default();
        let subject = catalog.create_subject("Networks", "").unwrap();
        catalog.create_topic(&subject, "Routing", "").unwrap();
        catalog.create_topic(&subject, "Addressing", "").unwrap();

        let questions = [
            ("routing", "Is OSPF link-state?", QuestionBody::true_false(true)),
            (
                "addressing",
                "How many bits in IPv4?",
                QuestionBody::MultipleChoice {
                    options: vec!["32".to_string(), "128".to_string()],
                    correct_index: 0,
                },
            ),
            (
                "routing",
                "Name a distance-vector protocol",
                QuestionBody::ShortAnswer {
                    keywords: vec!["rip".to_string()],
                },
            ),
            (
                "addressing",
                "Which mask is /24?",
                QuestionBody::MultipleChoice {
                    options: vec!["255.255.255.0".to_string(), "255.0.0.0".to_string()],
                    correct_index: 0,
                },
            ),
        ];
        for (topic, text, body) in questions {
            catalog
                .add_question(
                    &subject,
                    NewQuestion {
                        topic: topic.to_string(),
                        text: text.to_string(),
                        explanation: "See the course notes.".to_string(),
                        body,
                    },
                )
                .unwrap();
        }

        for (topic, front) in [("routing", "BGP"), ("addressing", "CIDR"), ("routing", "OSPF")] {
            catalog
                .add_flashcard(
                    &subject,
                    NewFlashcard {
                        topic: topic.to_string(),
                        front: front.to_string(),
                        back: "...".to_string(),
                    },
                )
                .unwrap();
        }

        (catalog, subject)
    }

    #[test]
    fn test_all_types_concatenates_buckets() {
        let (catalog, id) = sample();
        let subject = catalog.get(&id).unwrap();

        let texts: Vec<&str> = filter_questions(subject, None, None)
            .iter()
            .map(|q| q.text.as_str())
            .collect();
        assert_eq!(
            texts,
            vec![
                "How many bits in IPv4?",
                "Which mask is /24?",
                "Is OSPF link-state?",
                "Name a distance-vector protocol",
            ]
        );

        let expected: Vec<&Question> = QuestionType::ALL
            .iter()
            .flat_map(|kind| subject.quiz_data.bucket(*kind).iter())
            .collect();
        assert_eq!(filter_questions(subject, None, None), expected);
    }

    #[test]
    fn test_filter_by_type_and_topic() {
        let (catalog, id) = sample();
        let subject = catalog.get(&id).unwrap();

        assert_eq!(filter_questions(subject, Some(QuestionType::MultipleChoice), None).len(), 2);
        assert_eq!(filter_questions(subject, None, Some("routing")).len(), 2);
        assert_eq!(
            filter_questions(subject, Some(QuestionType::MultipleChoice), Some("routing")).len(),
            0
        );
        assert!(filter_questions(subject, Some(QuestionType::Practice), None).is_empty());
        assert!(filter_questions(subject, None, Some("missing-topic")).is_empty());
    }

    #[test]
    fn test_filter_flashcards() {
        let (catalog, id) = sample();
        let subject = catalog.get(&id).unwrap();

        assert_eq!(filter_flashcards(subject, None).len(), 3);
        let fronts: Vec<&str> = filter_flashcards(subject, Some("routing"))
            .iter()
            .map(|c| c.front.as_str())
            .collect();
        assert_eq!(fronts, vec!["BGP", "OSPF"]);
    }

    #[test]
    fn test_list_content_sorted_and_searched() {
        let (catalog, id) = sample();
        let subject = catalog.get(&id).unwrap();

        let items = list_content(subject, ContentKind::Questions, None, None);
        let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "How many bits in IPv4?",
                "Which mask is /24?",
                "Is OSPF link-state?",
                "Name a distance-vector protocol",
            ]
        );

        let found = list_content(subject, ContentKind::Questions, None, Some("OSPF"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].question_type, Some(QuestionType::TrueFalse));

        let cards = list_content(subject, ContentKind::Flashcards, Some("routing"), None);
        let fronts: Vec<&str> = cards.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(fronts, vec!["BGP", "OSPF"]);
        assert!(cards.iter().all(|c| c.question_type.is_none()));
    }
}

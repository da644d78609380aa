//! Controlled mutation of the catalog
//!
//! Every authoring action validates its input first and leaves the catalog
//! untouched when validation fails.

use thiserror::Error;

use super::ids::{next_item_id, slugify};
use super::models::*;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Subject not found: {0}")]
    SubjectNotFound(String),

    #[error("Topic not found: {0}")]
    TopicNotFound(String),

    #[error("Question not found: {0}")]
    QuestionNotFound(u64),

    #[error("Flashcard not found: {0}")]
    FlashcardNotFound(u64),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("Topic {0} is still used by questions or flashcards")]
    TopicInUse(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Input for creating or editing a question
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub topic: String,
    pub text: String,
    pub explanation: String,
    pub body: QuestionBody,
}

/// Input for creating or editing a flashcard
#[derive(Debug, Clone)]
pub struct NewFlashcard {
    pub topic: String,
    pub front: String,
    pub back: String,
}

/// Split a comma-separated keyword list, dropping blanks
pub fn parse_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

fn required(value: &str, what: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CatalogError::Validation(format!("{} is required", what)));
    }
    Ok(value.to_string())
}

fn check_topic(subject: &Subject, topic: &str) -> Result<String> {
    let topic = required(topic, "Topic")?;
    if !subject.topics.contains_key(&topic) {
        return Err(CatalogError::TopicNotFound(topic));
    }
    Ok(topic)
}

fn normalize_body(body: QuestionBody) -> Result<QuestionBody> {
    let body = match body {
        QuestionBody::MultipleChoice { options, correct_index } => QuestionBody::MultipleChoice {
            options: normalize_options(options)?,
            correct_index,
        },
        QuestionBody::TrueFalse { options, correct_index } => QuestionBody::TrueFalse {
            options: normalize_options(options)?,
            correct_index,
        },
        QuestionBody::ShortAnswer { keywords } => QuestionBody::ShortAnswer {
            keywords: keywords
                .iter()
                .map(|k| k.trim())
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect(),
        },
        QuestionBody::Practice { solution } => QuestionBody::Practice {
            solution: match solution {
                Solution::Text(text) => Solution::Text(text.trim().to_string()),
                Solution::Code(code) => Solution::Code(code.trim().to_string()),
            },
        },
    };

    body.check_shape().map_err(CatalogError::Validation)?;
    Ok(body)
}

fn normalize_options(options: Vec<String>) -> Result<Vec<String>> {
    let options: Vec<String> = options.iter().map(|o| o.trim().to_string()).collect();
    if options.iter().any(String::is_empty) {
        return Err(CatalogError::Validation("All options must be filled in".to_string()));
    }
    Ok(options)
}

impl Catalog {
    fn subject_mut(&mut self, subject_id: &str) -> Result<&mut Subject> {
        self.get_mut(subject_id)
            .ok_or_else(|| CatalogError::SubjectNotFound(subject_id.to_string()))
    }

    pub fn subject(&self, subject_id: &str) -> Result<&Subject> {
        self.get(subject_id)
            .ok_or_else(|| CatalogError::SubjectNotFound(subject_id.to_string()))
    }

    // ===== Subjects =====

    /// Create an empty subject and return its slug id
    pub fn create_subject(&mut self, name: &str, description: &str) -> Result<String> {
        let name = required(name, "Subject name")?;
        let id = slugify(&name);
        if id.is_empty() {
            return Err(CatalogError::Validation(format!(
                "Subject name '{}' has no usable characters",
                name
            )));
        }
        if self.contains(&id) {
            return Err(CatalogError::AlreadyExists(format!("A subject named '{}'", name)));
        }

        self.insert(id.clone(), Subject::new(name, description.trim().to_string()));
        log::info!("Created subject {}", id);
        Ok(id)
    }

    pub fn delete_subject(&mut self, subject_id: &str) -> Result<Subject> {
        self.remove(subject_id)
            .ok_or_else(|| CatalogError::SubjectNotFound(subject_id.to_string()))
    }

    // ===== Topics =====

    /// Create a topic in a subject and return its slug id
    pub fn create_topic(&mut self, subject_id: &str, name: &str, description: &str) -> Result<String> {
        let subject = self.subject_mut(subject_id)?;
        let name = required(name, "Topic name")?;
        let id = slugify(&name);
        if id.is_empty() {
            return Err(CatalogError::Validation(format!(
                "Topic name '{}' has no usable characters",
                name
            )));
        }
        if subject.topics.contains_key(&id) {
            return Err(CatalogError::AlreadyExists(format!("A topic named '{}'", name)));
        }

        subject.topics.insert(
            id.clone(),
            Topic {
                name,
                description: description.trim().to_string(),
            },
        );
        Ok(id)
    }

    pub fn delete_topic(&mut self, subject_id: &str, topic_id: &str) -> Result<Topic> {
        let subject = self.subject_mut(subject_id)?;
        if !subject.topics.contains_key(topic_id) {
            return Err(CatalogError::TopicNotFound(topic_id.to_string()));
        }
        if subject.topic_in_use(topic_id) {
            return Err(CatalogError::TopicInUse(topic_id.to_string()));
        }
        subject
            .topics
            .shift_remove(topic_id)
            .ok_or_else(|| CatalogError::TopicNotFound(topic_id.to_string()))
    }

    // ===== Questions =====

    fn build_question(subject: &Subject, id: u64, input: NewQuestion) -> Result<Question> {
        let topic = check_topic(subject, &input.topic)?;
        let text = required(&input.text, "Question text")?;
        let explanation = required(&input.explanation, "Explanation")?;
        let body = normalize_body(input.body)?;

        Ok(Question {
            id,
            topic,
            text,
            explanation,
            body,
        })
    }

    /// Validate and append a question to the end of its type bucket
    pub fn add_question(&mut self, subject_id: &str, input: NewQuestion) -> Result<Question> {
        let subject = self.subject_mut(subject_id)?;
        let id = next_item_id(subject.item_ids());
        let question = Self::build_question(subject, id, input)?;
        subject.quiz_data.push(question.clone());
        Ok(question)
    }

    /// Replace a question's content, keeping its id.
    ///
    /// A question whose type changes moves to the end of its new bucket.
    pub fn update_question(&mut self, subject_id: &str, question_id: u64, input: NewQuestion) -> Result<Question> {
        let subject = self.subject_mut(subject_id)?;
        let current_kind = subject
            .quiz_data
            .find(question_id)
            .map(Question::kind)
            .ok_or(CatalogError::QuestionNotFound(question_id))?;
        let question = Self::build_question(subject, question_id, input)?;

        if question.kind() == current_kind {
            let bucket = subject.quiz_data.bucket_mut(current_kind);
            if let Some(slot) = bucket.iter_mut().find(|q| q.id == question_id) {
                *slot = question.clone();
            }
        } else {
            subject.quiz_data.remove(question_id);
            subject.quiz_data.push(question.clone());
        }

        Ok(question)
    }

    /// Remove exactly one question by id
    pub fn delete_question(&mut self, subject_id: &str, question_id: u64) -> Result<Question> {
        let subject = self.subject_mut(subject_id)?;
        subject
            .quiz_data
            .remove(question_id)
            .ok_or(CatalogError::QuestionNotFound(question_id))
    }

    // ===== Flashcards =====

    fn build_flashcard(subject: &Subject, id: u64, input: NewFlashcard) -> Result<Flashcard> {
        Ok(Flashcard {
            id,
            topic: check_topic(subject, &input.topic)?,
            front: required(&input.front, "Front text")?,
            back: required(&input.back, "Back text")?,
        })
    }

    pub fn add_flashcard(&mut self, subject_id: &str, input: NewFlashcard) -> Result<Flashcard> {
        let subject = self.subject_mut(subject_id)?;
        let id = next_item_id(subject.item_ids());
        let card = Self::build_flashcard(subject, id, input)?;
        subject.flashcards.push(card.clone());
        Ok(card)
    }

    /// Replace a flashcard's content in place, keeping its id and position
    pub fn update_flashcard(&mut self, subject_id: &str, card_id: u64, input: NewFlashcard) -> Result<Flashcard> {
        let subject = self.subject_mut(subject_id)?;
        let pos = subject
            .flashcards
            .iter()
            .position(|f| f.id == card_id)
            .ok_or(CatalogError::FlashcardNotFound(card_id))?;
        let card = Self::build_flashcard(subject, card_id, input)?;
        subject.flashcards[pos] = card.clone();
        Ok(card)
    }

    pub fn delete_flashcard(&mut self, subject_id: &str, card_id: u64) -> Result<Flashcard> {
        let subject = self.subject_mut(subject_id)?;
        let pos = subject
            .flashcards
            .iter()
            .position(|f| f.id == card_id)
            .ok_or(CatalogError::FlashcardNotFound(card_id))?;
        Ok(subject.flashcards.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with_topic() -> (Catalog, String, String) {
        let mut catalog = Catalog::default();
        let subject = catalog.create_subject("Operating Systems", "Processes and memory").unwrap();
        let topic = catalog.create_topic(&subject, "Scheduling", "").unwrap();
        (catalog, subject, topic)
    }

    fn choice(topic: &str, text: &str) -> NewQuestion {
        NewQuestion {
            topic: topic.to_string(),
            text: text.to_string(),
            explanation: "Because.".to_string(),
            body: QuestionBody::MultipleChoice {
                options: vec!["FIFO".to_string(), "Round robin".to_string()],
                correct_index: 1,
            },
        }
    }

    #[test]
    fn test_create_subject() {
        let mut catalog = Catalog::default();
        let id = catalog.create_subject("  Computer I/O ", "").unwrap();
        assert_eq!(id, "computer-i-o");
        assert_eq!(catalog.get(&id).unwrap().name, "Computer I/O");
    }

    #[test]
    fn test_create_subject_rejects_collision_and_blank() {
        let mut catalog = Catalog::default();
        catalog.create_subject("Networks", "").unwrap();

        assert!(matches!(
            catalog.create_subject("networks", ""),
            Err(CatalogError::AlreadyExists(_))
        ));
        assert!(matches!(catalog.create_subject("   ", ""), Err(CatalogError::Validation(_))));
        assert!(matches!(catalog.create_subject("???", ""), Err(CatalogError::Validation(_))));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_create_topic_collision() {
        let (mut catalog, subject, _) = catalog_with_topic();
        assert!(matches!(
            catalog.create_topic(&subject, "SCHEDULING", ""),
            Err(CatalogError::AlreadyExists(_))
        ));
        assert!(matches!(
            catalog.create_topic("missing", "X", ""),
            Err(CatalogError::SubjectNotFound(_))
        ));
    }

    #[test]
    fn test_add_question_validation() {
        let (mut catalog, subject, topic) = catalog_with_topic();

        let mut no_text = choice(&topic, "  ");
        assert!(matches!(
            catalog.add_question(&subject, no_text.clone()),
            Err(CatalogError::Validation(_))
        ));

        no_text.text = "Which is preemptive?".to_string();
        no_text.topic = "unknown".to_string();
        assert!(matches!(
            catalog.add_question(&subject, no_text),
            Err(CatalogError::TopicNotFound(_))
        ));

        let mut bad_index = choice(&topic, "Which is preemptive?");
        bad_index.body = QuestionBody::MultipleChoice {
            options: vec!["A".to_string(), "B".to_string()],
            correct_index: 2,
        };
        assert!(catalog.add_question(&subject, bad_index).is_err());

        let mut blank_option = choice(&topic, "Which is preemptive?");
        blank_option.body = QuestionBody::MultipleChoice {
            options: vec!["A".to_string(), " ".to_string()],
            correct_index: 0,
        };
        assert!(catalog.add_question(&subject, blank_option).is_err());

        let mut no_keywords = choice(&topic, "Name one");
        no_keywords.body = QuestionBody::ShortAnswer {
            keywords: parse_keywords(" , ,"),
        };
        assert!(catalog.add_question(&subject, no_keywords).is_err());

        assert!(catalog.get(&subject).unwrap().quiz_data.is_empty());
    }

    #[test]
    fn test_add_question_goes_to_its_bucket() {
        let (mut catalog, subject, topic) = catalog_with_topic();
        let first = catalog.add_question(&subject, choice(&topic, "Q1")).unwrap();

        let mut tf = choice(&topic, "Q2");
        tf.body = QuestionBody::true_false(false);
        let second = catalog.add_question(&subject, tf).unwrap();

        assert_ne!(first.id, second.id);
        let data = &catalog.get(&subject).unwrap().quiz_data;
        assert_eq!(data.bucket(QuestionType::MultipleChoice).len(), 1);
        assert_eq!(data.bucket(QuestionType::TrueFalse).len(), 1);
    }

    #[test]
    fn test_delete_question_removes_exactly_one() {
        let (mut catalog, subject, topic) = catalog_with_topic();
        let a = catalog.add_question(&subject, choice(&topic, "A")).unwrap();
        let b = catalog.add_question(&subject, choice(&topic, "B")).unwrap();
        let c = catalog.add_question(&subject, choice(&topic, "C")).unwrap();

        let removed = catalog.delete_question(&subject, b.id).unwrap();
        assert_eq!(removed.text, "B");

        let bucket = catalog.get(&subject).unwrap().quiz_data.bucket(QuestionType::MultipleChoice);
        let ids: Vec<u64> = bucket.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);

        assert!(matches!(
            catalog.delete_question(&subject, b.id),
            Err(CatalogError::QuestionNotFound(_))
        ));
    }

    #[test]
    fn test_update_question_keeps_id() {
        let (mut catalog, subject, topic) = catalog_with_topic();
        let original = catalog.add_question(&subject, choice(&topic, "Old")).unwrap();

        let updated = catalog
            .update_question(&subject, original.id, choice(&topic, "New"))
            .unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(catalog.get(&subject).unwrap().quiz_data.find(original.id).unwrap().text, "New");

        let mut practice = choice(&topic, "Now practice");
        practice.body = QuestionBody::Practice {
            solution: Solution::from_text("Use a semaphore"),
        };
        catalog.update_question(&subject, original.id, practice).unwrap();
        let data = &catalog.get(&subject).unwrap().quiz_data;
        assert!(data.bucket(QuestionType::MultipleChoice).is_empty());
        assert_eq!(data.bucket(QuestionType::Practice)[0].id, original.id);
    }

    #[test]
    fn test_flashcard_crud() {
        let (mut catalog, subject, topic) = catalog_with_topic();
        let card = catalog
            .add_flashcard(
                &subject,
                NewFlashcard {
                    topic: topic.clone(),
                    front: "Quantum".to_string(),
                    back: "Time slice length".to_string(),
                },
            )
            .unwrap();

        let edited = catalog
            .update_flashcard(
                &subject,
                card.id,
                NewFlashcard {
                    topic: topic.clone(),
                    front: "Quantum".to_string(),
                    back: "Length of a time slice".to_string(),
                },
            )
            .unwrap();
        assert_eq!(edited.id, card.id);

        let missing_back = NewFlashcard {
            topic,
            front: "X".to_string(),
            back: String::new(),
        };
        assert!(catalog.add_flashcard(&subject, missing_back).is_err());

        catalog.delete_flashcard(&subject, card.id).unwrap();
        assert!(catalog.get(&subject).unwrap().flashcards.is_empty());
    }

    #[test]
    fn test_delete_topic_in_use() {
        let (mut catalog, subject, topic) = catalog_with_topic();
        let q = catalog.add_question(&subject, choice(&topic, "Q")).unwrap();

        assert!(matches!(
            catalog.delete_topic(&subject, &topic),
            Err(CatalogError::TopicInUse(_))
        ));

        catalog.delete_question(&subject, q.id).unwrap();
        catalog.delete_topic(&subject, &topic).unwrap();
        assert!(catalog.get(&subject).unwrap().topics.is_empty());
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_keywords("cache, buffer,, ,queue "), vec!["cache", "buffer", "queue"]);
        assert!(parse_keywords("").is_empty());
    }
}

//! Consistency checks over a loaded data set.

use std::collections::HashSet;

use crate::loader::DataSet;
use crate::model::{CorrectAnswer, QuestionKind};

/// A warning from data set validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Resource the warning concerns (e.g. "quiz-questions.json").
    pub resource: &'static str,
    /// Offending record id, when applicable.
    pub record_id: Option<String>,
    pub message: String,
}

impl ValidationWarning {
    fn new(resource: &'static str, record_id: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            resource,
            record_id: record_id.map(str::to_string),
            message: message.into(),
        }
    }
}

fn duplicates<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    ids.filter(|id| !seen.insert(*id)).collect()
}

/// Validate a data set for common authoring mistakes.
pub fn validate_dataset(data: &DataSet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for id in duplicates(data.events.iter().map(|e| e.id.as_str())) {
        warnings.push(ValidationWarning::new(
            "timeline-events.json",
            Some(id),
            format!("duplicate event ID: {id}"),
        ));
    }
    for id in duplicates(data.treaties.iter().map(|t| t.id.as_str())) {
        warnings.push(ValidationWarning::new(
            "treaties.json",
            Some(id),
            format!("duplicate treaty ID: {id}"),
        ));
    }
    for id in duplicates(data.institutions.iter().map(|i| i.id.as_str())) {
        warnings.push(ValidationWarning::new(
            "institutions.json",
            Some(id),
            format!("duplicate institution ID: {id}"),
        ));
    }
    for id in duplicates(data.quiz_questions.iter().map(|q| q.id.as_str())) {
        warnings.push(ValidationWarning::new(
            "quiz-questions.json",
            Some(id),
            format!("duplicate question ID: {id}"),
        ));
    }

    // Eras must be ordered and disjoint
    for pair in data.eras.windows(2) {
        if pair[1].start < pair[0].end {
            warnings.push(ValidationWarning::new(
                "timeline-events.json",
                Some(&pair[1].id),
                format!("era '{}' overlaps or precedes '{}'", pair[1].id, pair[0].id),
            ));
        }
    }
    for era in &data.eras {
        if era.end <= era.start {
            warnings.push(ValidationWarning::new(
                "timeline-events.json",
                Some(&era.id),
                "era ends before it starts",
            ));
        }
    }

    // Events outside every era never show up in the era view
    for event in &data.events {
        if !data.eras.iter().any(|era| era.contains(event.year)) {
            warnings.push(ValidationWarning::new(
                "timeline-events.json",
                Some(&event.id),
                format!("year {} is not covered by any era", event.year),
            ));
        }
        if let Some(related) = &event.related_id {
            if data.treaty(related).is_none() {
                warnings.push(ValidationWarning::new(
                    "timeline-events.json",
                    Some(&event.id),
                    format!("relatedId '{related}' does not match a treaty"),
                ));
            }
        }
    }

    // Connections to unknown nodes are dropped from the diagram
    let node_ids: HashSet<&str> = data
        .institutions
        .iter()
        .map(|i| i.id.as_str())
        .chain(data.treaties.iter().map(|t| t.id.as_str()))
        .collect();
    for conn in &data.connections {
        for end in [&conn.source, &conn.target] {
            if !node_ids.contains(end.as_str()) {
                warnings.push(ValidationWarning::new(
                    "connections.json",
                    Some(&format!("{}->{}", conn.source, conn.target)),
                    format!("unknown node '{end}'; connection will be ignored"),
                ));
            }
        }
        if !(0.0..=1.0).contains(&conn.strength) {
            warnings.push(ValidationWarning::new(
                "connections.json",
                Some(&format!("{}->{}", conn.source, conn.target)),
                format!("strength {} outside [0, 1]", conn.strength),
            ));
        }
    }

    for q in &data.quiz_questions {
        match (q.kind, q.correct) {
            (QuestionKind::Multiple, CorrectAnswer::Index(i)) => {
                if q.options.len() < 2 {
                    warnings.push(ValidationWarning::new(
                        "quiz-questions.json",
                        Some(&q.id),
                        "multiple choice question has fewer than 2 options",
                    ));
                } else if i >= q.options.len() {
                    warnings.push(ValidationWarning::new(
                        "quiz-questions.json",
                        Some(&q.id),
                        format!("correct index {i} out of range"),
                    ));
                }
            }
            (QuestionKind::Multiple, CorrectAnswer::Bool(_)) => {
                warnings.push(ValidationWarning::new(
                    "quiz-questions.json",
                    Some(&q.id),
                    "multiple choice question has a boolean answer",
                ));
            }
            (QuestionKind::TrueFalse, CorrectAnswer::Index(_)) => {
                warnings.push(ValidationWarning::new(
                    "quiz-questions.json",
                    Some(&q.id),
                    "true/false question correct answer should be boolean",
                ));
            }
            (QuestionKind::TrueFalse, CorrectAnswer::Bool(_)) => {}
        }
        if q.question.trim().is_empty() {
            warnings.push(ValidationWarning::new(
                "quiz-questions.json",
                Some(&q.id),
                "question text is empty",
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Connection, Event, EventType};

    fn event(id: &str, year: i32) -> Event {
        Event {
            id: id.into(),
            year,
            title: id.into(),
            kind: EventType::Event,
            description: None,
            significance: None,
            system: None,
            highlight: false,
            related_id: None,
        }
    }

    #[test]
    fn clean_dataset_has_no_warnings() {
        let mut data = DataSet::default();
        data.events = vec![event("a", 1948), event("b", 2010)];
        assert!(validate_dataset(&data).is_empty());
    }

    #[test]
    fn flags_duplicates_and_gaps() {
        let mut data = DataSet::default();
        // 1944 falls between Origins (ends 1944) and Foundation (starts 1945).
        data.events = vec![event("a", 1948), event("a", 1944)];
        let warnings = validate_dataset(&data);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate event")));
        assert!(warnings.iter().any(|w| w.message.contains("not covered")));
    }

    #[test]
    fn flags_dangling_connections() {
        let mut data = DataSet::default();
        data.connections = vec![Connection {
            source: "nowhere".into(),
            target: "nothing".into(),
            kind: "monitors".into(),
            strength: 2.0,
        }];
        let warnings = validate_dataset(&data);
        assert_eq!(
            warnings
                .iter()
                .filter(|w| w.message.contains("unknown node"))
                .count(),
            2
        );
        assert!(warnings.iter().any(|w| w.message.contains("outside [0, 1]")));
    }
}

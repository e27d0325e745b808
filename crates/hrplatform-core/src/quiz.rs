//! Quiz engine.
//!
//! [`Quiz`] is the section's state machine: setup, an active
//! [`QuizSession`], then results. Finishing a session records exactly one
//! attempt in the [`ProgressStore`].

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::error::QuizError;
use crate::model::{CorrectAnswer, Language, QuestionKind, QuizQuestion};
use crate::notify::{Notifier, NO_QUESTIONS_MESSAGE};
use crate::progress::{percentage, ProgressStore};

/// Wildcard for category and difficulty.
pub const ALL: &str = "all";

/// Filters chosen before a quiz starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSetup {
    pub category: String,
    pub difficulty: String,
    /// `None` keeps every matching question.
    pub count: Option<usize>,
}

impl Default for QuizSetup {
    fn default() -> Self {
        Self {
            category: ALL.to_string(),
            difficulty: ALL.to_string(),
            count: Some(10),
        }
    }
}

impl QuizSetup {
    fn matches(&self, q: &QuizQuestion) -> bool {
        (self.category == ALL || q.category == self.category)
            && (self.difficulty == ALL || q.difficulty == self.difficulty)
    }
}

/// Filter the bank, shuffle uniformly and truncate.
pub fn select_questions<R: Rng + ?Sized>(
    bank: &[QuizQuestion],
    setup: &QuizSetup,
    rng: &mut R,
) -> Vec<QuizQuestion> {
    let mut questions: Vec<QuizQuestion> =
        bank.iter().filter(|q| setup.matches(q)).cloned().collect();
    questions.shuffle(rng);
    if let Some(count) = setup.count {
        questions.truncate(count);
    }
    questions
}

/// Option index of the right answer. True/false questions present
/// "True" at 0 and "False" at 1.
pub fn correct_choice(q: &QuizQuestion) -> usize {
    match q.correct {
        CorrectAnswer::Index(i) => i,
        CorrectAnswer::Bool(true) => 0,
        CorrectAnswer::Bool(false) => 1,
    }
}

fn option_count(q: &QuizQuestion) -> usize {
    match q.kind {
        QuestionKind::TrueFalse => 2,
        QuestionKind::Multiple => q.options.len(),
    }
}

/// Message for a final percentage.
pub fn result_message(percent: f64) -> &'static str {
    if percent >= 90.0 {
        "Excellent! You have a strong understanding of international human rights law!"
    } else if percent >= 70.0 {
        "Good job! You have a solid grasp of the material."
    } else if percent >= 50.0 {
        "Not bad! Consider reviewing the areas where you struggled."
    } else {
        "Keep studying! Review the course materials and try again."
    }
}

/// How a question was dealt with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question: usize,
    /// Selected option, `None` when skipped.
    pub choice: Option<usize>,
    pub correct: bool,
    pub skipped: bool,
}

/// Immediate response to an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    pub choice: usize,
    pub correct_choice: usize,
    /// Option to mark as correct, present only when the choice was wrong.
    pub reveal: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizResults {
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub message: &'static str,
}

/// One entry of the answer review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewItem {
    pub number: usize,
    pub question: String,
    /// `None` when skipped.
    pub your_answer: Option<String>,
    /// Present only when the answer was not correct.
    pub correct_answer: Option<String>,
    pub correct: bool,
    pub explanation: String,
}

/// A running quiz.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    category: String,
    questions: Vec<QuizQuestion>,
    current: usize,
    score: u32,
    answers: Vec<AnswerRecord>,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    /// `questions` must not be empty.
    fn new(category: &str, questions: Vec<QuizQuestion>) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.to_string(),
            questions,
            current: 0,
            score: 0,
            answers: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// Whether the current question has been answered or skipped.
    pub fn is_answered(&self) -> bool {
        self.answers.len() > self.current
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.questions.len()
    }

    /// "Question 2 of 5".
    pub fn progress_label(&self) -> String {
        format!(
            "Question {} of {}",
            (self.current + 1).min(self.total()),
            self.total()
        )
    }

    /// Share of questions already behind the current one, in percent.
    pub fn progress_percent(&self) -> f64 {
        self.current as f64 / self.total().max(1) as f64 * 100.0
    }

    /// Answer the current question. Only the first answer counts.
    pub fn answer(&mut self, choice: usize) -> Result<Feedback, QuizError> {
        let question = self.current_question().ok_or(QuizError::NotStarted)?;
        if self.is_answered() {
            return Err(QuizError::AlreadyAnswered);
        }
        let available = option_count(question);
        if choice >= available {
            return Err(QuizError::InvalidChoice { choice, available });
        }

        let right = correct_choice(question);
        let correct = choice == right;
        if correct {
            self.score += 1;
        }
        self.answers.push(AnswerRecord {
            question: self.current,
            choice: Some(choice),
            correct,
            skipped: false,
        });
        Ok(Feedback {
            correct,
            choice,
            correct_choice: right,
            reveal: (!correct).then_some(right),
        })
    }

    /// Move past an answered question. Returns true once every question
    /// has been dealt with.
    pub fn advance(&mut self) -> Result<bool, QuizError> {
        if self.is_complete() {
            return Ok(true);
        }
        if !self.is_answered() {
            return Err(QuizError::NotAnswered);
        }
        self.current += 1;
        Ok(self.is_complete())
    }

    /// Record the current question as skipped (incorrect) and move on.
    pub fn skip(&mut self) -> Result<bool, QuizError> {
        if self.is_complete() {
            return Ok(true);
        }
        if self.is_answered() {
            return Err(QuizError::AlreadyAnswered);
        }
        self.answers.push(AnswerRecord {
            question: self.current,
            choice: None,
            correct: false,
            skipped: true,
        });
        self.current += 1;
        Ok(self.is_complete())
    }

    /// Final score, available once complete.
    pub fn results(&self) -> Option<QuizResults> {
        if !self.is_complete() {
            return None;
        }
        let total = self.total() as u32;
        let raw = f64::from(self.score) / f64::from(total.max(1)) * 100.0;
        Some(QuizResults {
            score: self.score,
            total,
            percentage: percentage(self.score, total),
            message: result_message(raw),
        })
    }

    /// Per-question review in `lang`.
    pub fn review(&self, lang: Language) -> Vec<ReviewItem> {
        self.answers
            .iter()
            .enumerate()
            .filter_map(|(i, record)| {
                let q = self.questions.get(record.question)?;
                let labels = q.option_labels(lang);
                let label = |idx: usize| labels.get(idx).cloned().unwrap_or_else(|| "N/A".into());
                Some(ReviewItem {
                    number: i + 1,
                    question: q.text(lang).to_string(),
                    your_answer: record.choice.map(label),
                    correct_answer: (!record.correct).then(|| label(correct_choice(q))),
                    correct: record.correct,
                    explanation: q.explanation_text(lang).to_string(),
                })
            })
            .collect()
    }
}

/// Quiz section state.
#[derive(Debug, Clone, Default)]
pub enum QuizState {
    #[default]
    Setup,
    Active(QuizSession),
    Results {
        session: QuizSession,
        results: QuizResults,
    },
}

/// Drives the quiz section through setup, questions and results.
#[derive(Debug, Clone, Default)]
pub struct Quiz {
    state: QuizState,
}

impl Quiz {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn session(&self) -> Option<&QuizSession> {
        match &self.state {
            QuizState::Setup => None,
            QuizState::Active(s) | QuizState::Results { session: s, .. } => Some(s),
        }
    }

    pub fn results(&self) -> Option<&QuizResults> {
        match &self.state {
            QuizState::Results { results, .. } => Some(results),
            _ => None,
        }
    }

    /// Start a session from `bank`. When nothing matches, the user is told
    /// through `notifier` and the quiz stays where it was.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        bank: &[QuizQuestion],
        setup: &QuizSetup,
        rng: &mut R,
        notifier: &dyn Notifier,
    ) -> bool {
        let questions = select_questions(bank, setup, rng);
        if questions.is_empty() {
            notifier.notify(NO_QUESTIONS_MESSAGE);
            return false;
        }
        let session = QuizSession::new(&setup.category, questions);
        tracing::debug!(
            session = %session.id(),
            category = %setup.category,
            difficulty = %setup.difficulty,
            questions = session.total(),
            "quiz started"
        );
        self.state = QuizState::Active(session);
        true
    }

    pub fn answer(&mut self, choice: usize) -> Result<Feedback, QuizError> {
        match &mut self.state {
            QuizState::Active(session) => session.answer(choice),
            _ => Err(QuizError::NotStarted),
        }
    }

    /// Go to the next question, or to results after the last one.
    pub fn next(&mut self, progress: &mut ProgressStore) -> Result<Option<QuizResults>, QuizError> {
        let done = match &mut self.state {
            QuizState::Active(session) => session.advance()?,
            _ => return Err(QuizError::NotStarted),
        };
        Ok(if done { self.finish(progress) } else { None })
    }

    pub fn skip(&mut self, progress: &mut ProgressStore) -> Result<Option<QuizResults>, QuizError> {
        let done = match &mut self.state {
            QuizState::Active(session) => session.skip()?,
            _ => return Err(QuizError::NotStarted),
        };
        Ok(if done { self.finish(progress) } else { None })
    }

    /// Back to setup (retake).
    pub fn reset(&mut self) {
        self.state = QuizState::Setup;
    }

    fn finish(&mut self, progress: &mut ProgressStore) -> Option<QuizResults> {
        match std::mem::take(&mut self.state) {
            QuizState::Active(session) => {
                let Some(results) = session.results() else {
                    self.state = QuizState::Active(session);
                    return None;
                };
                progress.record_quiz_attempt(session.category(), results.score, results.total);
                tracing::info!(
                    session = %session.id(),
                    score = results.score,
                    total = results.total,
                    "quiz finished"
                );
                self.state = QuizState::Results {
                    session,
                    results: results.clone(),
                };
                Some(results)
            }
            other => {
                self.state = other;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::progress::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn question(id: &str, category: &str, difficulty: &str, correct: usize) -> QuizQuestion {
        QuizQuestion {
            id: id.into(),
            kind: QuestionKind::Multiple,
            category: category.into(),
            difficulty: difficulty.into(),
            question: format!("Question {id}?"),
            question_sl: None,
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            options_sl: None,
            correct: CorrectAnswer::Index(correct),
            explanation: format!("Because {id}."),
            explanation_sl: None,
            exam_tip: None,
        }
    }

    fn bank() -> Vec<QuizQuestion> {
        let mut bank: Vec<QuizQuestion> = (0..8)
            .map(|i| question(&format!("f{i}"), "foundations", "basic", i % 4))
            .collect();
        bank.extend((0..4).map(|i| question(&format!("u{i}"), "un-system", "advanced", 0)));
        let mut tf = question("tf", "un-system", "basic", 0);
        tf.kind = QuestionKind::TrueFalse;
        tf.options.clear();
        tf.correct = CorrectAnswer::Bool(false);
        bank.push(tf);
        bank
    }

    fn progress() -> ProgressStore {
        ProgressStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn selection_is_distinct_and_bounded() {
        let bank = bank();
        let mut rng = StdRng::seed_from_u64(7);
        for k in 0..=8 {
            let setup = QuizSetup {
                category: "foundations".into(),
                difficulty: ALL.into(),
                count: Some(k),
            };
            let picked = select_questions(&bank, &setup, &mut rng);
            assert_eq!(picked.len(), k);
            let ids: HashSet<&str> = picked.iter().map(|q| q.id.as_str()).collect();
            assert_eq!(ids.len(), k);
            assert!(picked.iter().all(|q| q.category == "foundations"));
        }
    }

    #[test]
    fn count_all_keeps_every_match() {
        let setup = QuizSetup {
            category: ALL.into(),
            difficulty: "advanced".into(),
            count: None,
        };
        let picked = select_questions(&bank(), &setup, &mut StdRng::seed_from_u64(1));
        assert_eq!(picked.len(), 4);
    }

    #[test]
    fn empty_selection_notifies_and_does_not_start() {
        let notifier = RecordingNotifier::new();
        let mut quiz = Quiz::new();
        let setup = QuizSetup {
            category: "ihl".into(),
            ..QuizSetup::default()
        };
        assert!(!quiz.start(&bank(), &setup, &mut StdRng::seed_from_u64(1), &notifier));
        assert!(matches!(quiz.state(), QuizState::Setup));
        assert_eq!(notifier.messages(), vec![NO_QUESTIONS_MESSAGE.to_string()]);
    }

    #[test]
    fn answers_are_single_shot() {
        let mut session = QuizSession::new(ALL, vec![question("q", "c", "d", 2)]);
        let fb = session.answer(1).unwrap();
        assert!(!fb.correct);
        assert_eq!(fb.reveal, Some(2));
        assert_eq!(session.answer(2), Err(QuizError::AlreadyAnswered));
        assert_eq!(session.score(), 0);
        assert_eq!(session.skip(), Err(QuizError::AlreadyAnswered));
    }

    #[test]
    fn cannot_advance_unanswered() {
        let mut session = QuizSession::new(ALL, vec![question("q", "c", "d", 0)]);
        assert_eq!(session.advance(), Err(QuizError::NotAnswered));
        assert_eq!(
            session.answer(9),
            Err(QuizError::InvalidChoice {
                choice: 9,
                available: 4
            })
        );
    }

    #[test]
    fn true_false_maps_to_two_options() {
        let bank = bank();
        let tf = bank.iter().find(|q| q.id == "tf").unwrap().clone();
        let mut session = QuizSession::new(ALL, vec![tf]);
        let fb = session.answer(1).unwrap();
        assert!(fb.correct);
        assert_eq!(fb.reveal, None);
        assert!(matches!(
            session.answer(2),
            Err(QuizError::AlreadyAnswered)
        ));
    }

    #[test]
    fn mixed_answers_score_strictly_between() {
        let questions = vec![question("a", "c", "d", 0), question("b", "c", "d", 0)];
        let mut session = QuizSession::new(ALL, questions);
        session.answer(0).unwrap();
        session.advance().unwrap();
        session.answer(3).unwrap();
        assert!(session.advance().unwrap());

        let results = session.results().unwrap();
        assert!(0 < results.score && results.score < results.total);
        assert_eq!(results.percentage, 50);
        assert_eq!(
            results.message,
            "Not bad! Consider reviewing the areas where you struggled."
        );
    }

    #[test]
    fn foundations_quiz_runs_to_results() {
        let bank = bank();
        let notifier = RecordingNotifier::new();
        let mut progress = progress();
        let mut quiz = Quiz::new();
        let setup = QuizSetup {
            category: "foundations".into(),
            difficulty: ALL.into(),
            count: Some(5),
        };
        assert!(quiz.start(&bank, &setup, &mut StdRng::seed_from_u64(3), &notifier));

        let mut shown = Vec::new();
        let mut finished = None;
        for _ in 0..5 {
            let session = quiz.session().unwrap();
            let q = session.current_question().unwrap().clone();
            assert_eq!(q.category, "foundations");
            shown.push(q.id.clone());
            quiz.answer(correct_choice(&q)).unwrap();
            finished = quiz.next(&mut progress).unwrap();
        }

        assert_eq!(shown.len(), 5);
        let results = finished.unwrap();
        assert!(results.score <= 5);
        assert_eq!(results.total, 5);
        assert_eq!(results.percentage, 100);
        assert_eq!(quiz.results(), Some(&results));
        let history = &progress.progress().quiz_history;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].category, "foundations");
        assert_eq!(quiz.answer(0), Err(QuizError::NotStarted));
    }

    #[test]
    fn skipping_counts_as_incorrect() {
        let mut progress = progress();
        let mut quiz = Quiz::new();
        let setup = QuizSetup {
            category: ALL.into(),
            difficulty: "advanced".into(),
            count: Some(2),
        };
        quiz.start(&bank(), &setup, &mut StdRng::seed_from_u64(9), &RecordingNotifier::new());
        assert!(quiz.skip(&mut progress).unwrap().is_none());
        quiz.answer(0).unwrap();
        let results = quiz.next(&mut progress).unwrap().unwrap();
        assert_eq!(results.score, 1);

        let session = quiz.session().unwrap();
        assert!(session.answers()[0].skipped);
        assert!(!session.answers()[0].correct);

        let review = session.review(Language::En);
        assert_eq!(review[0].your_answer, None);
        assert_eq!(review[0].correct_answer.as_deref(), Some("a"));
        assert_eq!(review[1].correct_answer, None);
        assert_eq!(progress.progress().quiz_history.len(), 1);
    }

    #[test]
    fn reset_returns_to_setup() {
        let mut quiz = Quiz::new();
        quiz.start(
            &bank(),
            &QuizSetup::default(),
            &mut StdRng::seed_from_u64(2),
            &RecordingNotifier::new(),
        );
        assert!(quiz.session().is_some());
        quiz.reset();
        assert!(quiz.session().is_none());
    }

    #[test]
    fn result_message_tiers() {
        assert!(result_message(90.0).starts_with("Excellent"));
        assert!(result_message(89.9).starts_with("Good job"));
        assert!(result_message(50.0).starts_with("Not bad"));
        assert!(result_message(49.0).starts_with("Keep studying"));
    }

    #[test]
    fn progress_label_counts_from_one() {
        let session = QuizSession::new(ALL, vec![question("a", "c", "d", 0); 3]);
        assert_eq!(session.progress_label(), "Question 1 of 3");
        assert_eq!(session.progress_percent(), 0.0);
    }
}

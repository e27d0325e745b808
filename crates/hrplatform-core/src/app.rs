//! Application state.
//!
//! Everything the site mutates lives in one [`AppState`] that is passed
//! around explicitly. Section engines own their own transitions; this type
//! wires them to persistence.

use std::sync::Arc;

use rand::Rng;

use crate::config::SiteConfig;
use crate::error::QuizError;
use crate::loader::DataSet;
use crate::model::{Institution, Language, Theme, Treaty};
use crate::notify::Notifier;
use crate::progress::{KeyValueStore, Preferences, ProgressStore, ViewKind};
use crate::quiz::{Feedback, Quiz, QuizResults, QuizSetup};
use crate::router::{Router, Section};
use crate::search::{search, ResultKind, SearchResult};
use crate::timeline::TimelineState;

pub struct AppState {
    pub data: DataSet,
    pub router: Router,
    pub timeline: TimelineState,
    pub quiz: Quiz,
    pub progress: ProgressStore,
    preferences: Preferences,
    theme: Theme,
    language: Language,
}

impl AppState {
    /// Build state over `data`, loading progress and saved preferences from
    /// `store`. Preferences never saved fall back to the config defaults.
    pub fn new(data: DataSet, store: Arc<dyn KeyValueStore>, config: &SiteConfig) -> Self {
        let mut progress = ProgressStore::new(store.clone());
        progress.load();
        let preferences = Preferences::new(store);
        let theme = preferences.theme().unwrap_or(config.default_theme);
        let language = preferences.language().unwrap_or(config.default_language);
        Self {
            data,
            router: Router::default(),
            timeline: TimelineState::new(),
            quiz: Quiz::new(),
            progress,
            preferences,
            theme,
            language,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.preferences.toggle_theme(self.theme);
        self.theme
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.preferences.set_language(language);
    }

    /// Look up a treaty and count it as viewed.
    pub fn open_treaty(&mut self, id: &str) -> Option<&Treaty> {
        let index = self.data.treaties.iter().position(|t| t.id == id)?;
        self.progress.record_view(ViewKind::Treaty, id);
        self.data.treaties.get(index)
    }

    /// Look up an institution and count it as viewed.
    pub fn open_institution(&mut self, id: &str) -> Option<&Institution> {
        let index = self.data.institutions.iter().position(|i| i.id == id)?;
        self.progress.record_view(ViewKind::Institution, id);
        self.data.institutions.get(index)
    }

    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        search(&self.data, query)
    }

    /// Follow a search result: treaties open in place, institutions go to
    /// the diagram, events to the timeline. Returns the section shown.
    pub fn open_result(&mut self, result: &SearchResult) -> Section {
        match result.kind {
            ResultKind::Treaty => {
                self.open_treaty(&result.id);
                self.router.current()
            }
            ResultKind::Institution | ResultKind::Event => {
                if result.kind == ResultKind::Institution {
                    self.open_institution(&result.id);
                }
                let section = result.kind.section();
                self.router.navigate(section, None);
                section
            }
        }
    }

    pub fn start_quiz<R: Rng + ?Sized>(
        &mut self,
        setup: &QuizSetup,
        rng: &mut R,
        notifier: &dyn Notifier,
    ) -> bool {
        self.quiz
            .start(&self.data.quiz_questions, setup, rng, notifier)
    }

    pub fn answer_question(&mut self, choice: usize) -> Result<Feedback, QuizError> {
        self.quiz.answer(choice)
    }

    pub fn next_question(&mut self) -> Result<Option<QuizResults>, QuizError> {
        self.quiz.next(&mut self.progress)
    }

    pub fn skip_question(&mut self) -> Result<Option<QuizResults>, QuizError> {
        self.quiz.skip(&mut self.progress)
    }
}

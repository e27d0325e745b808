//! Home, treaty browser, case law, quiz, guides and about sections.

use std::path::PathBuf;

use hrplatform_core::catalog::{
    categories, courts, excerpt, filter_cases, system_label, systems, CaseFilter, EXCERPT_CHARS,
};
use hrplatform_core::loader::DataSet;
use hrplatform_core::model::{system_color, Case, QuizMetadata, QuizQuestion, Treaty};
use hrplatform_core::progress::ProgressStats;
use hrplatform_core::quiz::ALL;
use hrplatform_core::router::Section;

use crate::html::escape;

/// A study guide page copied into the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guide {
    pub file_name: String,
    pub title: String,
    /// Where the guide is read from.
    pub source: PathBuf,
}

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

pub fn render_home(data: &DataSet, stats: &ProgressStats, viewed_treaties: usize) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"hero\">\n<h1>International Human Rights Atlas</h1>\n");
    html.push_str(
        "<p>Explore the treaties, courts and monitoring bodies of the international \
         human rights system, how they grew, and how they connect.</p>\n</div>\n",
    );

    html.push_str("<div class=\"cards\">\n");
    let cards = [
        ("timeline", None, "Timeline", format!("{} events", data.events.len())),
        (
            "spider-web",
            None,
            "Relationships",
            format!("{} institutions", data.institutions.len()),
        ),
        ("treaties", None, "Treaties", format!("{} instruments", data.treaties.len())),
        ("quiz", None, "Quiz", format!("{} questions", data.quiz_questions.len())),
        ("spider-web", Some("un"), "UN System", "Charter and treaty bodies".to_string()),
        (
            "spider-web",
            Some("european"),
            "European System",
            "Council of Europe and the Court".to_string(),
        ),
    ];
    for (section, filter, title, subtitle) in cards {
        let filter_attr = filter
            .map(|f| format!(" data-filter=\"{f}\""))
            .unwrap_or_default();
        html.push_str(&format!(
            "<a class=\"card\" href=\"#{section}\" data-section=\"{section}\"{filter_attr}>\
             <h3>{title}</h3><p>{}</p></a>\n",
            escape(&subtitle)
        ));
    }
    html.push_str("</div>\n");

    html.push_str("<h3>Your Progress</h3>\n<div class=\"stats-grid\">\n");
    let tiles = [
        ("attempts", stats.attempts.to_string(), "Quizzes taken"),
        ("avg", format!("{}%", stats.average), "Average score"),
        ("best", format!("{}%", stats.best), "Best score"),
        ("treaties", viewed_treaties.to_string(), "Treaties viewed"),
    ];
    for (key, value, label) in tiles {
        html.push_str(&format!(
            "<div class=\"stat\"><span class=\"stat-value\" data-stat=\"{key}\">{value}</span>\
             <span class=\"stat-label\">{label}</span></div>\n"
        ));
    }
    html.push_str("</div>\n");
    html
}

// ---------------------------------------------------------------------------
// Treaties
// ---------------------------------------------------------------------------

pub fn render_treaties(data: &DataSet) -> String {
    let mut html = String::new();
    html.push_str("<h2>Treaties</h2>\n");
    html.push_str("<div class=\"toolbar\">\n");
    html.push_str("<button class=\"filter-btn active\" data-filter=\"all\">All</button>\n");
    for system in systems(&data.treaties) {
        html.push_str(&format!(
            "<button class=\"filter-btn\" data-filter=\"{}\">{}</button>\n",
            escape(system),
            escape(&system_label(system).to_uppercase())
        ));
    }
    html.push_str("</div>\n");

    if data.treaties.is_empty() {
        html.push_str("<p class=\"empty\">No treaties available.</p>\n");
        return html;
    }

    html.push_str("<div class=\"treaties-grid\">\n");
    for treaty in &data.treaties {
        html.push_str(&treaty_card(treaty));
    }
    html.push_str("</div>\n");
    for treaty in &data.treaties {
        html.push_str(&render_treaty_detail(data, treaty));
    }
    html
}

fn treaty_color(treaty: &Treaty) -> String {
    treaty
        .color
        .clone()
        .unwrap_or_else(|| system_color(&treaty.system).to_string())
}

fn treaty_card(treaty: &Treaty) -> String {
    let adopted = treaty
        .adopted
        .map_or_else(|| "N/A".to_string(), |y| y.to_string());
    let parties = treaty
        .states_parties
        .map_or_else(|| "N/A".to_string(), |n| n.to_string());
    let mut html = format!(
        "<div class=\"treaty-card\" data-id=\"{}\" data-system=\"{}\" style=\"border-top: 4px solid {}\">\n",
        escape(&treaty.id),
        escape(&treaty.system),
        escape(&treaty_color(treaty))
    );
    html.push_str(&format!(
        "<h3>{}</h3>\n<p class=\"treaty-full-name\">{}</p>\n",
        escape(&treaty.short_name),
        escape(&treaty.full_name)
    ));
    html.push_str(&format!(
        "<p class=\"treaty-meta\">Adopted: {adopted} &middot; States: {parties}</p>\n"
    ));
    html.push_str(&format!(
        "<span class=\"treaty-system-badge\">{}</span>\n",
        escape(&system_label(&treaty.system))
    ));
    if let Some(significance) = &treaty.significance {
        html.push_str(&format!(
            "<p class=\"treaty-excerpt\">{}</p>\n",
            escape(&excerpt(significance, EXCERPT_CHARS))
        ));
    }
    html.push_str("</div>\n");
    html
}

/// Hidden detail block for one treaty.
pub fn render_treaty_detail(data: &DataSet, treaty: &Treaty) -> String {
    let mut html = format!(
        "<div class=\"treaty-detail\" data-id=\"{}\">\n",
        escape(&treaty.id)
    );
    html.push_str(&format!(
        "<span class=\"badge\" style=\"background: {}; color: #fff\">{}</span>\n",
        escape(&treaty_color(treaty)),
        escape(&system_label(&treaty.system).to_uppercase())
    ));
    html.push_str(&format!(
        "<h2>{}</h2>\n<p class=\"treaty-short\">{}</p>\n",
        escape(&treaty.full_name),
        escape(&treaty.short_name)
    ));

    let mut facts = Vec::new();
    if let Some(year) = treaty.adopted {
        facts.push(("Adopted", year.to_string()));
    }
    if let Some(year) = treaty.entered_force {
        facts.push(("Entered into Force", year.to_string()));
    }
    if let Some(parties) = treaty.states_parties {
        facts.push(("States Parties", parties.to_string()));
    }
    if let Some(body) = &treaty.monitoring_body {
        let name = data
            .institution(body)
            .and_then(|i| i.short_name.clone())
            .unwrap_or_else(|| body.to_uppercase());
        facts.push(("Monitoring Body", name));
    }
    for (label, value) in facts {
        html.push_str(&format!(
            "<p><strong>{label}:</strong> {}</p>\n",
            escape(&value)
        ));
    }

    if let Some(significance) = &treaty.significance {
        html.push_str(&format!(
            "<h4>Significance</h4>\n<p>{}</p>\n",
            escape(significance)
        ));
    }
    if !treaty.key_articles.is_empty() {
        html.push_str("<h4>Key Articles</h4>\n<ul>\n");
        for article in &treaty.key_articles {
            let text = article
                .text
                .as_deref()
                .map(|t| format!(" - \"{t}\""))
                .unwrap_or_default();
            html.push_str(&format!(
                "<li>Article {}: {}{}</li>\n",
                escape(&article.number),
                escape(&article.title),
                escape(&text)
            ));
        }
        html.push_str("</ul>\n");
    }
    if !treaty.optional_protocols.is_empty() {
        html.push_str("<h4>Optional Protocols</h4>\n<ul>\n");
        for protocol in &treaty.optional_protocols {
            html.push_str(&format!(
                "<li>{} ({}) - {}</li>\n",
                escape(&protocol.name),
                protocol.year,
                escape(&protocol.function)
            ));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</div>\n");
    html
}

// ---------------------------------------------------------------------------
// Case law
// ---------------------------------------------------------------------------

/// Case-law browser. Empty when no cases were loaded.
pub fn render_cases(cases: &[Case]) -> String {
    if cases.is_empty() {
        return String::new();
    }
    let mut html = String::new();
    html.push_str("<h2>Case Law</h2>\n<div class=\"toolbar\">\n");

    html.push_str("<select id=\"caseCourtFilter\"><option value=\"all\">All courts</option>");
    for court in courts(cases) {
        html.push_str(&format!(
            "<option value=\"{c}\">{c}</option>",
            c = escape(court)
        ));
    }
    html.push_str("</select>\n");
    html.push_str("<select id=\"caseCategoryFilter\"><option value=\"all\">All categories</option>");
    for category in categories(cases) {
        html.push_str(&format!(
            "<option value=\"{}\">{}</option>",
            escape(category),
            escape(&category.replace('-', " "))
        ));
    }
    html.push_str("</select>\n");
    html.push_str("<input type=\"search\" id=\"caseSearch\" placeholder=\"Search cases, articles, keywords...\">\n");
    html.push_str("</div>\n<div class=\"cases-grid\">\n");

    for case in filter_cases(cases, &CaseFilter::default()) {
        let haystack = format!(
            "{} {} {}",
            case.name,
            case.keywords.join(" "),
            case.articles.join(" ")
        )
        .to_lowercase();
        html.push_str(&format!(
            "<div class=\"case-card\" data-id=\"{}\" data-court=\"{}\" data-category=\"{}\" data-search=\"{}\">\n",
            escape(&case.id),
            escape(&case.court),
            escape(&case.category),
            escape(&haystack)
        ));
        html.push_str(&format!(
            "<h3>{}</h3>\n<p class=\"case-meta\">{} &middot; {} &middot; {}</p>\n",
            escape(&case.name),
            escape(&case.court),
            case.year,
            escape(&case.category.replace('-', " "))
        ));
        if !case.articles.is_empty() {
            html.push_str(&format!(
                "<p class=\"case-articles\">Articles: {}</p>\n",
                escape(&case.articles.join(", "))
            ));
        }
        html.push_str("<details>\n<summary>Details</summary>\n");
        for (label, text) in [
            ("Facts", &case.facts),
            ("Issue", &case.issue),
            ("Holding", &case.holding),
            ("Significance", &case.significance),
        ] {
            if !text.is_empty() {
                html.push_str(&format!(
                    "<p><strong>{label}:</strong> {}</p>\n",
                    escape(text)
                ));
            }
        }
        html.push_str("</details>\n</div>\n");
    }
    html.push_str("</div>\n");
    html
}

// ---------------------------------------------------------------------------
// Quiz
// ---------------------------------------------------------------------------

/// Quiz setup form plus the question and results panels the script fills.
pub fn render_quiz(questions: &[QuizQuestion], metadata: &QuizMetadata) -> String {
    let mut html = String::new();
    html.push_str("<h2>Quiz</h2>\n");

    let categories: Vec<(String, String)> = if metadata.categories.is_empty() {
        let mut seen: Vec<(String, String)> = Vec::new();
        for q in questions {
            if !seen.iter().any(|(id, _)| *id == q.category) {
                seen.push((q.category.clone(), q.category.replace('-', " ")));
            }
        }
        seen
    } else {
        metadata
            .categories
            .iter()
            .map(|c| (c.id().to_string(), c.label()))
            .collect()
    };
    let difficulties: Vec<String> = if metadata.difficulty_levels.is_empty() {
        let mut seen: Vec<String> = Vec::new();
        for q in questions {
            if !seen.contains(&q.difficulty) {
                seen.push(q.difficulty.clone());
            }
        }
        seen
    } else {
        metadata.difficulty_levels.clone()
    };

    html.push_str("<div id=\"quizSetup\" class=\"quiz-setup\">\n");
    html.push_str(&format!(
        "<label>Category <select id=\"quizCategory\"><option value=\"{ALL}\">All categories</option>"
    ));
    for (id, label) in &categories {
        html.push_str(&format!(
            "<option value=\"{}\">{}</option>",
            escape(id),
            escape(label)
        ));
    }
    html.push_str("</select></label>\n");
    html.push_str(&format!(
        "<label>Difficulty <select id=\"quizDifficulty\"><option value=\"{ALL}\">All levels</option>"
    ));
    for level in &difficulties {
        html.push_str(&format!("<option value=\"{l}\">{l}</option>", l = escape(level)));
    }
    html.push_str("</select></label>\n");
    html.push_str(
        "<label>Questions <select id=\"quizCount\">\
         <option value=\"5\">5</option><option value=\"10\" selected>10</option>\
         <option value=\"20\">20</option><option value=\"all\">All</option></select></label>\n",
    );
    html.push_str(&format!(
        "<p class=\"quiz-available\">{} questions available</p>\n",
        questions.len()
    ));
    html.push_str("<button id=\"startQuiz\">Start Quiz</button>\n</div>\n");

    html.push_str("<div id=\"quizContainer\" class=\"quiz-container\" hidden>\n");
    html.push_str("<div class=\"progress-bar\"><span id=\"quizProgressBar\"></span></div>\n");
    html.push_str("<p id=\"quizProgressText\"></p>\n");
    html.push_str("<p class=\"quiz-meta\" id=\"quizMeta\"></p>\n");
    html.push_str("<h3 id=\"quizQuestion\"></h3>\n");
    html.push_str("<div id=\"quizOptions\"></div>\n");
    html.push_str("<div class=\"quiz-feedback\" id=\"quizFeedback\" hidden></div>\n");
    html.push_str(
        "<div class=\"toolbar\"><button id=\"skipQuestion\">Skip</button>\
         <button id=\"nextQuestion\" disabled>Next</button></div>\n",
    );
    html.push_str("</div>\n");

    html.push_str("<div id=\"quizResults\" class=\"quiz-results\" hidden>\n");
    html.push_str(
        "<h3>Quiz Complete</h3>\n<p class=\"quiz-score\"><span id=\"finalScore\">0</span> / \
         <span id=\"totalQuestions\">0</span></p>\n",
    );
    html.push_str("<p id=\"resultsMessage\"></p>\n");
    html.push_str(
        "<div class=\"toolbar\"><button id=\"reviewAnswers\">Review Answers</button>\
         <button id=\"retakeQuiz\">Take Another Quiz</button></div>\n",
    );
    html.push_str("</div>\n");
    html
}

// ---------------------------------------------------------------------------
// Guides and about
// ---------------------------------------------------------------------------

/// Links to the copied study guides. Empty without guides.
pub fn render_guides(guides: &[Guide]) -> String {
    if guides.is_empty() {
        return String::new();
    }
    let mut html = String::from("<h2>Study Guides</h2>\n<ul class=\"guides\">\n");
    for guide in guides {
        html.push_str(&format!(
            "<li><a href=\"guides/{}\" target=\"_blank\">{}</a></li>\n",
            escape(&guide.file_name),
            escape(&guide.title)
        ));
    }
    html.push_str("</ul>\n");
    html
}

pub fn render_about(data: &DataSet, generated: &str) -> String {
    let mut html = String::new();
    html.push_str("<h2>About</h2>\n");
    html.push_str(
        "<p>An educational atlas of international human rights law: the UN system, \
         the regional systems, and international humanitarian law.</p>\n",
    );
    html.push_str("<h4>Keyboard shortcuts</h4>\n<ul>\n");
    let numbered: Vec<&str> = ('1'..='9')
        .filter_map(Section::from_shortcut)
        .map(Section::title)
        .collect();
    html.push_str(&format!(
        "<li><kbd>1</kbd> to <kbd>{}</kbd>: {}</li>\n",
        numbered.len(),
        numbered.join(", ")
    ));
    html.push_str("<li><kbd>&larr;</kbd> <kbd>&rarr;</kbd>: pan the zoomable timeline</li>\n");
    html.push_str("<li><kbd>Esc</kbd>: close dialogs</li>\n</ul>\n");
    html.push_str(&format!(
        "<p class=\"about-counts\">{} treaties, {} institutions, {} connections, {} events, {} questions, {} cases.</p>\n",
        data.treaties.len(),
        data.institutions.len(),
        data.connections.len(),
        data.events.len(),
        data.quiz_questions.len(),
        data.cases.len()
    ));
    html.push_str(&format!(
        "<p class=\"generated\">Generated {}</p>\n",
        escape(generated)
    ));
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrplatform_core::model::{
        CategoryInfo, CorrectAnswer, KeyArticle, OptionalProtocol, QuestionKind,
    };

    fn treaty() -> Treaty {
        Treaty {
            id: "iccpr".into(),
            full_name: "International Covenant on Civil and Political Rights".into(),
            short_name: "ICCPR".into(),
            system: "un".into(),
            adopted: Some(1966),
            entered_force: Some(1976),
            states_parties: None,
            key_articles: vec![KeyArticle {
                number: "6".into(),
                title: "Right to life".into(),
                text: Some("Every human being has the inherent right to life.".into()),
            }],
            optional_protocols: vec![OptionalProtocol {
                name: "First Optional Protocol".into(),
                year: 1966,
                function: "Individual complaints".into(),
            }],
            significance: Some("x".repeat(200)),
            monitoring_body: Some("hrc".into()),
            color: None,
        }
    }

    #[test]
    fn treaty_card_and_detail() {
        let mut data = DataSet::default();
        data.treaties.push(treaty());
        let html = render_treaties(&data);

        assert!(html.contains("data-filter=\"un\">UN</button>"));
        assert!(html.contains("Adopted: 1966 &middot; States: N/A"));
        assert!(html.contains(&format!("{}...", "x".repeat(120))));
        assert!(html.contains("<strong>Entered into Force:</strong> 1976"));
        assert!(html.contains("<strong>Monitoring Body:</strong> HRC"));
        assert!(html.contains(
            "Article 6: Right to life - &quot;Every human being has the inherent right to life.&quot;"
        ));
        assert!(html.contains("First Optional Protocol (1966) - Individual complaints"));
    }

    #[test]
    fn no_treaties_shows_placeholder() {
        assert!(render_treaties(&DataSet::default()).contains("No treaties available."));
    }

    fn case(id: &str, year: i32, court: &str) -> Case {
        Case {
            id: id.into(),
            name: format!("{id} v. United Kingdom"),
            year,
            court: court.into(),
            category: "torture-ill-treatment".into(),
            articles: vec!["3".into()],
            keywords: vec!["Extradition".into()],
            facts: "Facts here".into(),
            issue: String::new(),
            holding: "Violation".into(),
            significance: String::new(),
            importance: "1".into(),
        }
    }

    #[test]
    fn cases_sorted_with_filters() {
        let cases = vec![case("soering", 1989, "ECtHR"), case("golder", 1975, "ECtHR")];
        let html = render_cases(&cases);
        assert!(html.find("golder").unwrap() < html.find("soering").unwrap());
        assert!(html.contains("<option value=\"ECtHR\">ECtHR</option>"));
        assert!(html.contains("torture ill treatment"));
        assert!(html.contains("data-search=\"soering v. united kingdom extradition 3\""));
        assert!(html.contains("<strong>Holding:</strong> Violation"));
        assert!(!html.contains("<strong>Issue:</strong>"));
        assert!(render_cases(&[]).is_empty());
    }

    #[test]
    fn quiz_setup_uses_metadata_or_questions() {
        let q = QuizQuestion {
            id: "q1".into(),
            kind: QuestionKind::TrueFalse,
            category: "regional-systems".into(),
            difficulty: "advanced".into(),
            question: "?".into(),
            question_sl: None,
            options: vec![],
            options_sl: None,
            correct: CorrectAnswer::Bool(true),
            explanation: String::new(),
            explanation_sl: None,
            exam_tip: None,
        };
        let html = render_quiz(std::slice::from_ref(&q), &QuizMetadata::default());
        assert!(html.contains("<option value=\"regional-systems\">regional systems</option>"));
        assert!(html.contains("<option value=\"advanced\">advanced</option>"));
        assert!(html.contains("1 questions available"));
        assert!(html.contains("<option value=\"10\" selected>"));

        let metadata = QuizMetadata {
            categories: vec![CategoryInfo::Detailed {
                id: "foundations".into(),
                name: Some("Foundations".into()),
            }],
            difficulty_levels: vec!["basic".into()],
        };
        let html = render_quiz(&[q], &metadata);
        assert!(html.contains("<option value=\"foundations\">Foundations</option>"));
        assert!(!html.contains("advanced"));
    }

    #[test]
    fn home_cards_and_stats() {
        let stats = ProgressStats {
            attempts: 2,
            average: 75,
            best: 90,
            recent: vec![60, 90],
        };
        let html = render_home(&DataSet::default(), &stats, 3);
        assert!(html.contains("data-section=\"spider-web\" data-filter=\"european\""));
        assert!(html.contains("data-stat=\"avg\">75%"));
        assert!(html.contains("data-stat=\"treaties\">3"));
    }

    #[test]
    fn guides_and_about() {
        assert!(render_guides(&[]).is_empty());
        let guides = vec![Guide {
            file_name: "un-system.html".into(),
            title: "The UN System".into(),
            source: PathBuf::from("guides/un-system.html"),
        }];
        assert!(render_guides(&guides).contains("href=\"guides/un-system.html\""));
        let about = render_about(&DataSet::default(), "2026-01-01");
        assert!(about.contains("Generated 2026-01-01"));
        assert!(about.contains(
            "<kbd>1</kbd> to <kbd>6</kbd>: Home, Timeline, Relationships, Treaties, Quiz, About"
        ));
    }
}

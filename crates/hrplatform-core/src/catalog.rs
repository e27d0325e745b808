//! Treaty and case-law browsing.

use std::collections::BTreeSet;

use crate::model::{Case, Treaty};

/// Characters of significance text shown on a treaty card.
pub const EXCERPT_CHARS: usize = 120;

/// First `max` characters of `text`, with "..." when cut.
pub fn excerpt(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// "inter-american" -> "inter american".
pub fn system_label(system: &str) -> String {
    system.replacen('-', " ", 1)
}

/// Treaties of one protection system, or all of them.
pub fn treaties_by_system<'a>(treaties: &'a [Treaty], system: Option<&str>) -> Vec<&'a Treaty> {
    treaties
        .iter()
        .filter(|t| system.map_or(true, |s| t.system == s))
        .collect()
}

/// Distinct systems in order of first appearance.
pub fn systems(treaties: &[Treaty]) -> Vec<&str> {
    let mut seen = Vec::new();
    for t in treaties {
        if !seen.contains(&t.system.as_str()) {
            seen.push(t.system.as_str());
        }
    }
    seen
}

/// Case-law browser filters. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFilter {
    pub court: Option<String>,
    pub category: Option<String>,
    /// Matched against name, keywords and article numbers.
    pub query: String,
}

impl CaseFilter {
    fn matches(&self, case: &Case, query: &str) -> bool {
        if self.court.as_deref().is_some_and(|c| c != case.court) {
            return false;
        }
        if self.category.as_deref().is_some_and(|c| c != case.category) {
            return false;
        }
        query.is_empty()
            || case.name.to_lowercase().contains(query)
            || case.keywords.iter().any(|k| k.to_lowercase().contains(query))
            || case.articles.iter().any(|a| a.to_lowercase().contains(query))
    }
}

/// Matching cases, oldest first.
pub fn filter_cases<'a>(cases: &'a [Case], filter: &CaseFilter) -> Vec<&'a Case> {
    let query = filter.query.trim().to_lowercase();
    let mut matched: Vec<&Case> = cases.iter().filter(|c| filter.matches(c, &query)).collect();
    matched.sort_by_key(|c| c.year);
    matched
}

pub fn courts(cases: &[Case]) -> BTreeSet<&str> {
    cases.iter().map(|c| c.court.as_str()).collect()
}

pub fn categories(cases: &[Case]) -> BTreeSet<&str> {
    cases.iter().map(|c| c.category.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(id: &str, year: i32, court: &str, category: &str, keywords: &[&str]) -> Case {
        Case {
            id: id.into(),
            name: format!("{id} v. State"),
            year,
            court: court.into(),
            category: category.into(),
            articles: vec!["3".into()],
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            facts: String::new(),
            issue: String::new(),
            holding: String::new(),
            significance: String::new(),
            importance: "high".into(),
        }
    }

    fn cases() -> Vec<Case> {
        vec![
            case("Soering", 1989, "ECtHR", "torture", &["extradition"]),
            case("Velasquez", 1988, "IACtHR", "disappearance", &["state responsibility"]),
            case("Golder", 1975, "ECtHR", "fair-trial", &["access to court"]),
        ]
    }

    #[test]
    fn excerpt_cuts_on_char_boundary() {
        assert_eq!(excerpt("short", 120), "short");
        let long = "é".repeat(130);
        let cut = excerpt(&long, EXCERPT_CHARS);
        assert_eq!(cut.chars().count(), 123);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn cases_filter_and_sort() {
        let cases = cases();
        let all = filter_cases(&cases, &CaseFilter::default());
        let years: Vec<i32> = all.iter().map(|c| c.year).collect();
        assert_eq!(years, vec![1975, 1988, 1989]);

        let echr = filter_cases(
            &cases,
            &CaseFilter {
                court: Some("ECtHR".into()),
                ..CaseFilter::default()
            },
        );
        assert_eq!(echr.len(), 2);

        let search = filter_cases(
            &cases,
            &CaseFilter {
                query: "soering".into(),
                ..CaseFilter::default()
            },
        );
        assert_eq!(search[0].id, "Soering");

        let keyword = filter_cases(
            &cases,
            &CaseFilter {
                category: Some("disappearance".into()),
                query: "Responsib".into(),
                ..CaseFilter::default()
            },
        );
        assert_eq!(keyword.len(), 1);
        assert_eq!(courts(&cases).len(), 2);
        assert_eq!(categories(&cases).len(), 3);
    }

    #[test]
    fn system_helpers() {
        assert_eq!(system_label("inter-american"), "inter american");
        assert!(treaties_by_system(&[], Some("un")).is_empty());
    }
}

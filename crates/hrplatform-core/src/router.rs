//! Section navigation and URL fragments.

use std::fmt;
use std::str::FromStr;

/// A top-level section of the site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Section {
    #[default]
    Home,
    Timeline,
    SpiderWeb,
    Treaties,
    Cases,
    Quiz,
    Guides,
    About,
}

impl Section {
    /// Navigation order.
    pub const ALL: [Section; 8] = [
        Section::Home,
        Section::Timeline,
        Section::SpiderWeb,
        Section::Treaties,
        Section::Cases,
        Section::Quiz,
        Section::Guides,
        Section::About,
    ];

    /// Fragment identifier.
    pub fn id(self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::Timeline => "timeline",
            Section::SpiderWeb => "spider-web",
            Section::Treaties => "treaties",
            Section::Cases => "cases",
            Section::Quiz => "quiz",
            Section::Guides => "guides",
            Section::About => "about",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::Timeline => "Timeline",
            Section::SpiderWeb => "Relationships",
            Section::Treaties => "Treaties",
            Section::Cases => "Case Law",
            Section::Quiz => "Quiz",
            Section::Guides => "Study Guides",
            Section::About => "About",
        }
    }

    /// Number-key shortcut ('1' to '6').
    pub fn from_shortcut(key: char) -> Option<Section> {
        match key {
            '1' => Some(Section::Home),
            '2' => Some(Section::Timeline),
            '3' => Some(Section::SpiderWeb),
            '4' => Some(Section::Treaties),
            '5' => Some(Section::Quiz),
            '6' => Some(Section::About),
            _ => None,
        }
    }

    /// "#timeline".
    pub fn fragment(self) -> String {
        format!("#{}", self.id())
    }

    /// Section named by a URL fragment, with or without the leading '#'.
    pub fn from_fragment(fragment: &str) -> Option<Section> {
        fragment.trim_start_matches('#').parse().ok()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .iter()
            .copied()
            .find(|section| section.id() == s)
            .ok_or_else(|| format!("unknown section: {s}"))
    }
}

/// Current section plus the diagram filter a card link may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Router {
    current: Section,
    web_filter: Option<String>,
}

impl Router {
    /// Start at the section named by `fragment`, or home when it names
    /// none.
    pub fn from_fragment(fragment: Option<&str>) -> Self {
        fragment
            .and_then(|f| Self::parse(f).ok())
            .unwrap_or_default()
    }

    /// Router for a deep link such as `#spider-web?filter=un`. A single
    /// digit is taken as a number-key shortcut.
    pub fn parse(fragment: &str) -> Result<Self, String> {
        let fragment = fragment.trim_start_matches('#');
        let (id, query) = fragment.split_once('?').unwrap_or((fragment, ""));
        let mut router = Self::default();

        let mut chars = id.chars();
        if let (Some(key), None) = (chars.next(), chars.next()) {
            if key.is_ascii_digit() {
                return router
                    .shortcut(key)
                    .map(|_| router)
                    .ok_or_else(|| format!("no section on key {key}"));
            }
        }

        let section = Section::from_fragment(id).ok_or_else(|| format!("unknown section: {id}"))?;
        let filter = query.split('&').find_map(|kv| kv.strip_prefix("filter="));
        router.navigate(section, filter);
        Ok(router)
    }

    pub fn current(&self) -> Section {
        self.current
    }

    /// Active protection-system filter of the relationship diagram.
    pub fn web_filter(&self) -> Option<&str> {
        self.web_filter.as_deref()
    }

    /// Go to `section`. A filter only applies to the relationship diagram;
    /// "all" clears it.
    pub fn navigate(&mut self, section: Section, filter: Option<&str>) -> String {
        if section == Section::SpiderWeb {
            if let Some(filter) = filter {
                self.web_filter = (filter != "all").then(|| filter.to_string());
            }
        }
        tracing::debug!(from = %self.current, to = %section, "navigate");
        self.current = section;
        section.fragment()
    }

    /// Handle a number key. Returns the new fragment when it navigated.
    pub fn shortcut(&mut self, key: char) -> Option<String> {
        Section::from_shortcut(key).map(|section| self.navigate(section, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::from_fragment(&section.fragment()), Some(section));
        }
        assert_eq!(Section::from_fragment("spider-web"), Some(Section::SpiderWeb));
        assert_eq!(Section::from_fragment("#nowhere"), None);
    }

    #[test]
    fn unknown_fragment_starts_home() {
        assert_eq!(Router::from_fragment(Some("#bogus")).current(), Section::Home);
        assert_eq!(Router::from_fragment(Some("#quiz")).current(), Section::Quiz);
        assert_eq!(Router::from_fragment(None).current(), Section::Home);
    }

    #[test]
    fn deep_link_carries_diagram_filter() {
        let router = Router::from_fragment(Some("#spider-web?filter=un"));
        assert_eq!(router.current(), Section::SpiderWeb);
        assert_eq!(router.web_filter(), Some("un"));

        let router = Router::parse("treaties?filter=european").unwrap();
        assert_eq!(router.current(), Section::Treaties);
        assert_eq!(router.web_filter(), None);

        let router = Router::parse("spider-web?lang=sl&filter=all").unwrap();
        assert_eq!(router.web_filter(), None);
    }

    #[test]
    fn parse_accepts_shortcut_digits_and_rejects_unknowns() {
        assert_eq!(Router::parse("3").unwrap().current(), Section::SpiderWeb);
        assert_eq!(Router::parse("9").unwrap_err(), "no section on key 9");
        assert_eq!(Router::parse("bogus?filter=un").unwrap_err(), "unknown section: bogus");
        assert_eq!(Router::from_fragment(Some("9")).current(), Section::Home);
    }

    #[test]
    fn shortcuts_cover_six_sections() {
        let mut router = Router::default();
        assert_eq!(router.shortcut('5').as_deref(), Some("#quiz"));
        assert_eq!(router.current(), Section::Quiz);
        assert_eq!(router.shortcut('7'), None);
        assert_eq!(router.current(), Section::Quiz);
    }

    #[test]
    fn filter_applies_to_diagram_only() {
        let mut router = Router::default();
        router.navigate(Section::Treaties, Some("european"));
        assert_eq!(router.web_filter(), None);
        router.navigate(Section::SpiderWeb, Some("european"));
        assert_eq!(router.web_filter(), Some("european"));
        router.navigate(Section::SpiderWeb, None);
        assert_eq!(router.web_filter(), Some("european"));
        router.navigate(Section::SpiderWeb, Some("all"));
        assert_eq!(router.web_filter(), None);
    }
}

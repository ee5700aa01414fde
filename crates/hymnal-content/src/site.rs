//! The normalized site tree and its read-only query surface.
//!
//! A [`Site`] is built once per load and never mutated afterwards; the
//! loader hands out `Arc<Site>` snapshots and rebuilds wholesale when the
//! source changes. The serde derives double as the wire format: a
//! pre-built JSON content document deserializes directly into [`Site`]
//! with no normalization applied.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Site title used when the meta table does not provide one.
pub(crate) const DEFAULT_SITE_TITLE: &str = "St. Mina Hymns School";

/// Site-wide metadata plus the full catalogue hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Site {
    /// Site title shown in page headers.
    #[serde(rename = "site_title")]
    pub title: String,
    /// Optional subtitle line.
    #[serde(rename = "site_subtitle")]
    pub subtitle: String,
    /// Footer text shown on every page.
    pub footer_text: String,
    /// Display languages, ordered by code.
    pub languages: Vec<Language>,
    /// Top-level catalogue entries, ordered by `(sort, name)`.
    pub levels: Vec<Level>,
    /// Open-ended site attributes overlaid from the meta table.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            title: DEFAULT_SITE_TITLE.to_owned(),
            subtitle: String::new(),
            footer_text: String::new(),
            languages: Vec::new(),
            levels: Vec::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl Site {
    /// Find a level by slug.
    ///
    /// Linear scan; absence is represented, never raised.
    #[must_use]
    pub fn find_level(&self, slug: &str) -> Option<&Level> {
        self.levels.iter().find(|level| level.slug == slug)
    }
}

/// A display language for segment texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Short language code, unique within the site (e.g. `"en"`, `"cop"`).
    pub code: String,
    /// Human-readable name; defaults to the code.
    #[serde(default)]
    pub name: String,
    /// Whether the language renders right-to-left.
    #[serde(default)]
    pub is_rtl: bool,
    /// Whether the language column is shown by default.
    #[serde(default = "default_true")]
    pub default_on: bool,
}

/// A teaching level, the top tier of the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// URL-safe identifier, unique among levels.
    pub slug: String,
    /// Display name; defaults to the slug.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Manual ordering key; levels sort by `(sort, name)`.
    #[serde(default)]
    pub sort: i64,
    /// Years belonging to this level, ordered by `(sort, name)`.
    #[serde(default)]
    pub years: Vec<Year>,
}

impl Level {
    /// Find a year by slug within this level.
    #[must_use]
    pub fn find_year(&self, slug: &str) -> Option<&Year> {
        self.years.iter().find(|year| year.slug == slug)
    }
}

/// A school year within a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Year {
    /// URL-safe identifier.
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sort: i64,
    /// Hymns belonging to this year, ordered by `(sort, title)`.
    #[serde(default)]
    pub hymns: Vec<Hymn>,
}

impl Year {
    /// Find a hymn by slug within this year.
    #[must_use]
    pub fn find_hymn(&self, slug: &str) -> Option<&Hymn> {
        self.hymns.iter().find(|hymn| hymn.slug == slug)
    }
}

/// A single hymn with its recordings and timed lyric segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hymn {
    /// URL-safe identifier.
    pub slug: String,
    /// Display title; defaults to the slug.
    #[serde(default)]
    pub title: String,
    /// Free-form teaching note.
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub sort: i64,
    /// Audio recordings, in source order.
    #[serde(default)]
    pub recordings: Vec<Recording>,
    /// Lyric segments, ordered by start time.
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// An audio recording of a hymn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Display label for the player.
    #[serde(default = "default_label")]
    pub label: String,
    /// Media URL; rows without one are dropped during normalization.
    pub url: String,
    /// Initial playback rate.
    #[serde(default = "default_rate")]
    pub default_rate: f64,
}

/// One timed lyric line, with its text per language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Raw timestamp text as entered in the source.
    pub t: String,
    /// Start time in milliseconds, derived from `t`.
    #[serde(default)]
    pub start_ms: i64,
    /// Text per language code; only codes in the site's language list,
    /// blanks omitted.
    #[serde(default)]
    pub texts: BTreeMap<String, String>,
}

fn default_true() -> bool {
    true
}

fn default_label() -> String {
    "Recording".to_owned()
}

fn default_rate() -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_site() -> Site {
        Site {
            levels: vec![
                Level {
                    slug: "beginners".to_owned(),
                    name: "Beginners".to_owned(),
                    description: String::new(),
                    sort: 0,
                    years: vec![Year {
                        slug: "year-1".to_owned(),
                        name: "Year 1".to_owned(),
                        description: String::new(),
                        sort: 0,
                        hymns: vec![Hymn {
                            slug: "tai-shori".to_owned(),
                            title: "Tai Shori".to_owned(),
                            note: String::new(),
                            sort: 0,
                            recordings: Vec::new(),
                            segments: Vec::new(),
                        }],
                    }],
                },
                Level {
                    slug: "advanced".to_owned(),
                    name: "Advanced".to_owned(),
                    description: String::new(),
                    sort: 1,
                    years: Vec::new(),
                },
            ],
            ..Site::default()
        }
    }

    #[test]
    fn test_find_level() {
        let site = sample_site();
        assert_eq!(site.find_level("advanced").unwrap().name, "Advanced");
        assert!(site.find_level("missing").is_none());
    }

    #[test]
    fn test_find_year_and_hymn() {
        let site = sample_site();
        let level = site.find_level("beginners").unwrap();
        let year = level.find_year("year-1").unwrap();
        assert_eq!(year.name, "Year 1");
        assert!(level.find_year("year-9").is_none());

        assert_eq!(year.find_hymn("tai-shori").unwrap().title, "Tai Shori");
        assert!(year.find_hymn("missing").is_none());
    }

    #[test]
    fn test_default_site_seed() {
        let site = Site::default();
        assert_eq!(site.title, "St. Mina Hymns School");
        assert_eq!(site.subtitle, "");
        assert_eq!(site.footer_text, "");
        assert!(site.languages.is_empty());
        assert!(site.levels.is_empty());
    }

    #[test]
    fn test_json_round_trip_preserves_extra_keys() {
        let mut site = sample_site();
        site.extra
            .insert("contact_email".to_owned(), "choir@example.org".to_owned());

        let json = serde_json::to_string(&site).unwrap();
        let back: Site = serde_json::from_str(&json).unwrap();
        assert_eq!(back, site);
        assert_eq!(
            back.extra.get("contact_email").map(String::as_str),
            Some("choir@example.org")
        );
    }

    #[test]
    fn test_deserialize_uses_field_defaults() {
        let json = r#"{
            "levels": [{
                "slug": "beginners",
                "years": [{
                    "slug": "year-1",
                    "hymns": [{
                        "slug": "hymn-a",
                        "recordings": [{"url": "https://example.org/a.mp3"}]
                    }]
                }]
            }]
        }"#;
        let site: Site = serde_json::from_str(json).unwrap();
        assert_eq!(site.title, "St. Mina Hymns School");
        let recording = &site.levels[0].years[0].hymns[0].recordings[0];
        assert_eq!(recording.label, "Recording");
        assert_eq!(recording.default_rate, 1.0);
    }
}

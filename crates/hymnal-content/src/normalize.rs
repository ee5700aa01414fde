//! Table normalization into the site tree.
//!
//! Tables are processed in dependency order — `meta`, `languages`,
//! `levels`, `years`, `hymns`, `recordings`, `segments` — because later
//! tables resolve foreign keys against maps built from earlier ones.
//!
//! Every row parse produces an explicit [`RowOutcome`]: rows the public
//! contract drops silently (unpublished, missing slugs, orphaned foreign
//! keys, empty URLs) are `Rejected` with a reason, logged at DEBUG, and
//! unit-testable. The only hard failure is a malformed segment timestamp,
//! which aborts the whole load.
//!
//! Slug registration is deliberately global, not namespaced per parent:
//! `recordings` and `segments` rows address hymns by `hymn_slug` alone,
//! so a duplicate slug overwrites the registration (last wins) while
//! earlier duplicates stay linked where they were.

use std::collections::{BTreeMap, HashMap};

use crate::error::LoadError;
use crate::site::{Hymn, Language, Level, Recording, Segment, Site, Year};
use crate::timecode::{self, TimecodeError};
use crate::workbook::{Record, Workbook};

use self::RowOutcome::{Accepted, Rejected};

/// Why a row was dropped during normalization.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Reject {
    /// The `published` flag evaluated false.
    Unpublished,
    /// A required key or slug column was blank.
    MissingKey(&'static str),
    /// A foreign-key slug did not resolve to a registered parent.
    UnknownParent {
        field: &'static str,
        slug: String,
    },
    /// Recording row without a URL.
    EmptyUrl,
}

/// Result of parsing one table row.
pub(crate) enum RowOutcome<T> {
    Accepted(T),
    Rejected(Reject),
}

fn log_reject(table: &'static str, row: usize, reject: &Reject) {
    tracing::debug!(table, row, reason = ?reject, "Row dropped");
}

/// Build a [`Site`] from workbook tables.
///
/// # Errors
///
/// Returns [`LoadError::Timecode`] when any kept segment row carries a
/// malformed timestamp; no partial site is produced.
pub(crate) fn build_site(book: &Workbook) -> Result<Site, LoadError> {
    let mut site = Site::default();
    apply_meta(&mut site, &book.records("meta"));

    let mut languages = Vec::new();
    for (row, record) in book.records("languages").iter().enumerate() {
        match language_row(record) {
            Accepted(language) => languages.push(language),
            Rejected(reject) => log_reject("languages", row, &reject),
        }
    }
    languages.sort_by(|a, b| a.code.cmp(&b.code));
    let codes: Vec<String> = languages.iter().map(|l| l.code.clone()).collect();
    site.languages = languages;

    // Levels keyed by slug; a duplicate replaces the earlier level wholesale
    let mut levels: HashMap<String, Level> = HashMap::new();
    for (row, record) in book.records("levels").iter().enumerate() {
        match level_row(record) {
            Accepted(level) => {
                levels.insert(level.slug.clone(), level);
            }
            Rejected(reject) => log_reject("levels", row, &reject),
        }
    }

    // Years and hymns live in arenas with their owning parent recorded at
    // acceptance time; the slug maps point at the latest registration.
    let mut years: Vec<(String, Year)> = Vec::new();
    let mut year_index: HashMap<String, usize> = HashMap::new();
    for (row, record) in book.records("years").iter().enumerate() {
        match year_row(record, &levels) {
            Accepted((level_slug, year)) => {
                year_index.insert(year.slug.clone(), years.len());
                years.push((level_slug, year));
            }
            Rejected(reject) => log_reject("years", row, &reject),
        }
    }

    let mut hymns: Vec<(usize, Hymn)> = Vec::new();
    let mut hymn_index: HashMap<String, usize> = HashMap::new();
    for (row, record) in book.records("hymns").iter().enumerate() {
        match hymn_row(record, &year_index) {
            Accepted((year_idx, hymn)) => {
                hymn_index.insert(hymn.slug.clone(), hymns.len());
                hymns.push((year_idx, hymn));
            }
            Rejected(reject) => log_reject("hymns", row, &reject),
        }
    }

    for (row, record) in book.records("recordings").iter().enumerate() {
        match recording_row(record, &hymn_index) {
            Accepted((hymn_idx, recording)) => hymns[hymn_idx].1.recordings.push(recording),
            Rejected(reject) => log_reject("recordings", row, &reject),
        }
    }

    for (row, record) in book.records("segments").iter().enumerate() {
        match segment_row(record, &hymn_index, &codes)? {
            Accepted((hymn_idx, segment)) => hymns[hymn_idx].1.segments.push(segment),
            Rejected(reject) => log_reject("segments", row, &reject),
        }
    }

    // Assemble children into parents, then apply the ordering invariants
    for (year_idx, hymn) in hymns {
        years[year_idx].1.hymns.push(hymn);
    }
    for (level_slug, year) in years {
        if let Some(level) = levels.get_mut(&level_slug) {
            level.years.push(year);
        }
    }
    site.levels = levels.into_values().collect();
    sort_site(&mut site);
    Ok(site)
}

/// Overlay `(key, value)` rows onto the seeded site.
///
/// Known keys update the named fields; anything else lands in the
/// open-ended `extra` map. Null values become empty strings.
fn apply_meta(site: &mut Site, records: &[Record]) {
    for record in records {
        let key = record.trimmed("key");
        if key.is_empty() {
            continue;
        }
        let value = record.cell("value").display().unwrap_or_default();
        match key.as_str() {
            "site_title" => site.title = value,
            "site_subtitle" => site.subtitle = value,
            "footer_text" => site.footer_text = value,
            _ => {
                site.extra.insert(key, value);
            }
        }
    }
}

fn language_row(record: &Record) -> RowOutcome<Language> {
    let code = record.trimmed("code");
    if code.is_empty() {
        return Rejected(Reject::MissingKey("code"));
    }
    Accepted(Language {
        name: record.text_or("name", &code),
        is_rtl: record.truthy("is_rtl", false),
        default_on: record.truthy("default_on", true),
        code,
    })
}

fn level_row(record: &Record) -> RowOutcome<Level> {
    if !record.truthy("published", true) {
        return Rejected(Reject::Unpublished);
    }
    let slug = record.trimmed("level_slug");
    if slug.is_empty() {
        return Rejected(Reject::MissingKey("level_slug"));
    }
    Accepted(Level {
        name: record.text_or("level_name", &slug),
        description: record.text_or("level_description", ""),
        sort: record.int_or("sort", 0),
        years: Vec::new(),
        slug,
    })
}

fn year_row(record: &Record, levels: &HashMap<String, Level>) -> RowOutcome<(String, Year)> {
    if !record.truthy("published", true) {
        return Rejected(Reject::Unpublished);
    }
    let slug = record.trimmed("year_slug");
    if slug.is_empty() {
        return Rejected(Reject::MissingKey("year_slug"));
    }
    let level_slug = record.trimmed("level_slug");
    if level_slug.is_empty() {
        return Rejected(Reject::MissingKey("level_slug"));
    }
    if !levels.contains_key(&level_slug) {
        return Rejected(Reject::UnknownParent {
            field: "level_slug",
            slug: level_slug,
        });
    }
    let year = Year {
        name: record.text_or("year_name", &slug),
        description: record.text_or("year_description", ""),
        sort: record.int_or("sort", 0),
        hymns: Vec::new(),
        slug,
    };
    Accepted((level_slug, year))
}

fn hymn_row(record: &Record, years: &HashMap<String, usize>) -> RowOutcome<(usize, Hymn)> {
    if !record.truthy("published", true) {
        return Rejected(Reject::Unpublished);
    }
    let slug = record.trimmed("hymn_slug");
    if slug.is_empty() {
        return Rejected(Reject::MissingKey("hymn_slug"));
    }
    let year_slug = record.trimmed("year_slug");
    if year_slug.is_empty() {
        return Rejected(Reject::MissingKey("year_slug"));
    }
    let Some(&year_idx) = years.get(&year_slug) else {
        return Rejected(Reject::UnknownParent {
            field: "year_slug",
            slug: year_slug,
        });
    };
    let hymn = Hymn {
        title: record.text_or("hymn_title", &slug),
        note: record.text_or("hymn_note", ""),
        sort: record.int_or("sort", 0),
        recordings: Vec::new(),
        segments: Vec::new(),
        slug,
    };
    Accepted((year_idx, hymn))
}

fn recording_row(
    record: &Record,
    hymns: &HashMap<String, usize>,
) -> RowOutcome<(usize, Recording)> {
    if !record.truthy("published", true) {
        return Rejected(Reject::Unpublished);
    }
    let hymn_slug = record.trimmed("hymn_slug");
    if hymn_slug.is_empty() {
        return Rejected(Reject::MissingKey("hymn_slug"));
    }
    let Some(&hymn_idx) = hymns.get(&hymn_slug) else {
        return Rejected(Reject::UnknownParent {
            field: "hymn_slug",
            slug: hymn_slug,
        });
    };
    let url = record.trimmed("url");
    if url.is_empty() {
        return Rejected(Reject::EmptyUrl);
    }
    Accepted((
        hymn_idx,
        Recording {
            label: record.text_or("label", "Recording"),
            url,
            default_rate: record.float_or("default_rate", 1.0),
        },
    ))
}

fn segment_row(
    record: &Record,
    hymns: &HashMap<String, usize>,
    codes: &[String],
) -> Result<RowOutcome<(usize, Segment)>, TimecodeError> {
    if !record.truthy("published", true) {
        return Ok(Rejected(Reject::Unpublished));
    }
    let hymn_slug = record.trimmed("hymn_slug");
    if hymn_slug.is_empty() {
        return Ok(Rejected(Reject::MissingKey("hymn_slug")));
    }
    let Some(&hymn_idx) = hymns.get(&hymn_slug) else {
        return Ok(Rejected(Reject::UnknownParent {
            field: "hymn_slug",
            slug: hymn_slug,
        }));
    };

    let t = record.text_or("t", "0:00").trim().to_owned();
    let start_ms = timecode::parse_time_to_ms(&t)?;

    // Only recognized language codes are honored; blanks are omitted
    // rather than stored as empty strings.
    let mut texts = BTreeMap::new();
    for code in codes {
        let cell = record.cell(code);
        if cell.is_blank() {
            continue;
        }
        if let Some(text) = cell.display() {
            texts.insert(code.clone(), text);
        }
    }

    Ok(Accepted((hymn_idx, Segment { t, start_ms, texts })))
}

/// Apply the ordering invariants to every container in the tree.
fn sort_site(site: &mut Site) {
    site.levels
        .sort_by(|a, b| (a.sort, &a.name).cmp(&(b.sort, &b.name)));
    for level in &mut site.levels {
        level
            .years
            .sort_by(|a, b| (a.sort, &a.name).cmp(&(b.sort, &b.name)));
        for year in &mut level.years {
            year.hymns
                .sort_by(|a, b| (a.sort, &a.title).cmp(&(b.sort, &b.title)));
            for hymn in &mut year.hymns {
                hymn.segments.sort_by_key(|segment| segment.start_ms);
            }
        }
    }
}

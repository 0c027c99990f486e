//! Conversions from a municipality display name to the slug and query formats
//! the housing portals expect.
//!
//! Every function here is total: any string, including the empty string, maps
//! to a defined output. Callers that need "nothing selected" semantics check
//! for a blank selection before calling in.

use serde::Serialize;
use url::form_urlencoded;

/// Letters after which the possessive `s` is dropped ("Partille kommun").
const SILENT_GENITIVE: &[char] = &['a', 'e', 'i', 'o', 'u', 'y', 'å', 'ä', 'ö', 's'];

fn fold_swedish(ch: char) -> char {
    match ch {
        'å' | 'ä' => 'a',
        'ö' => 'o',
        'é' => 'e',
        other => other,
    }
}

/// Lowercase, fold å/ä/ö/é and collapse everything outside `[a-z0-9]` into
/// single hyphens. Other accented letters are treated as separators.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.trim().to_lowercase().chars().map(fold_swedish) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Heuristic genitive for Swedish place names: `"s"` unless the name already
/// ends in a vowel or `s`. Irregular names are not special-cased.
pub fn genitive_suffix(name: &str) -> &'static str {
    let Some(last) = name.trim().chars().last() else {
        return "";
    };

    let mut lowered = last.to_lowercase();
    match (lowered.next(), lowered.next()) {
        (Some(ch), None) if SILENT_GENITIVE.contains(&ch) => "",
        _ => "s",
    }
}

/// "Göteborg" -> "Göteborgs kommun". Display text only.
pub fn official_name(name: &str) -> String {
    format!("{}{} kommun", name.trim(), genitive_suffix(name))
}

/// Path fragment for the HomeQ municipality page, e.g. `lerums-kommun`.
///
/// The suffix goes onto the already folded slug, so it is always plain ASCII.
pub fn homeq_query(name: &str) -> String {
    format!("{}{}-kommun", slugify(name), genitive_suffix(name))
}

/// Raw Qasa `searchAreas` value, e.g. `Göteborgs_kommun~~se`.
///
/// Built from the display name rather than the slug; the caller must pass it
/// through [`encode_query_value`] before it goes into a URL.
pub fn qasa_search_area(name: &str) -> String {
    format!("{}{}_kommun~~se", name.trim(), genitive_suffix(name))
}

/// Form-encoded free-text search term (space becomes `+`).
pub fn generic_search_term(name: &str) -> String {
    form_urlencoded::byte_serialize(name.trim().as_bytes()).collect()
}

/// Percent-encodes a query value, leaving the unreserved `-_.~` characters
/// literal and encoding space as `%20`.
pub fn encode_query_value(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Every derived form of a single name, computed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedName {
    pub name: String,
    pub slug: String,
    pub genitive_suffix: &'static str,
    pub official_name: String,
    pub homeq_query: String,
    pub qasa_search_area: String,
    pub search_term: String,
}

impl NormalizedName {
    pub fn of(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            slug: slugify(name),
            genitive_suffix: genitive_suffix(name),
            official_name: official_name(name),
            homeq_query: homeq_query(name),
            qasa_search_area: qasa_search_area(name),
            search_term: generic_search_term(name),
        }
    }
}

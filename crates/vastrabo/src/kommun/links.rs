//! Outbound portal URLs. The templates belong to the portals, so they are
//! configuration; only the normalizer decides what goes into `{query}`.

use super::normalizer::{
    encode_query_value, generic_search_term, homeq_query, qasa_search_area, slugify,
};
use serde::Serialize;
use std::fmt;
use url::Url;

pub const QUERY_PLACEHOLDER: &str = "{query}";

pub const DEFAULT_HOMEQ_TEMPLATE: &str = "https://www.homeq.se/lediga-lagenheter/{query}";
pub const DEFAULT_QASA_TEMPLATE: &str = "https://qasa.com/se/sv/find-home?searchAreas={query}";
pub const DEFAULT_DIRECTIONS_TEMPLATE: &str =
    "https://www.google.com/maps/dir/?api=1&destination={query}";
pub const DEFAULT_LANDLORD_SEARCH_TEMPLATE: &str = "https://www.google.com/search?q={query}";
pub const DEFAULT_BOPLATS_URL: &str = "https://boplats.se/filtrera?listtype=imagelist&types=1hand";

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("url template '{0}' must contain exactly one {{query}} placeholder")]
    Placeholder(String),
    #[error("url template '{template}' does not render to a valid url: {source}")]
    InvalidUrl {
        template: String,
        #[source]
        source: url::ParseError,
    },
    #[error("url '{0}' must use http or https")]
    Scheme(String),
}

/// A URL with a single `{query}` slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        let raw = raw.trim();
        if raw.matches(QUERY_PLACEHOLDER).count() != 1 {
            return Err(TemplateError::Placeholder(raw.to_string()));
        }
        check_web_url(&raw.replace(QUERY_PLACEHOLDER, "x"), raw)?;
        Ok(Self(raw.to_string()))
    }

    /// Substitutes an already encoded fragment.
    pub fn render(&self, fragment: &str) -> String {
        self.0.replacen(QUERY_PLACEHOLDER, fragment, 1)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates a fixed (placeholder-free) link such as the Boplats filter page.
pub fn parse_fixed_url(raw: &str) -> Result<String, TemplateError> {
    let raw = raw.trim();
    check_web_url(raw, raw)?;
    Ok(raw.to_string())
}

fn check_web_url(candidate: &str, template: &str) -> Result<(), TemplateError> {
    let url = Url::parse(candidate).map_err(|source| TemplateError::InvalidUrl {
        template: template.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(TemplateError::Scheme(template.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct PortalTemplates {
    pub homeq: UrlTemplate,
    pub qasa: UrlTemplate,
    pub directions: UrlTemplate,
    pub landlord_search: UrlTemplate,
    pub boplats_filter: String,
}

impl PortalTemplates {
    pub fn from_raw(
        homeq: &str,
        qasa: &str,
        directions: &str,
        landlord_search: &str,
        boplats_filter: &str,
    ) -> Result<Self, TemplateError> {
        Ok(Self {
            homeq: UrlTemplate::parse(homeq)?,
            qasa: UrlTemplate::parse(qasa)?,
            directions: UrlTemplate::parse(directions)?,
            landlord_search: UrlTemplate::parse(landlord_search)?,
            boplats_filter: parse_fixed_url(boplats_filter)?,
        })
    }
}

impl Default for PortalTemplates {
    fn default() -> Self {
        Self {
            homeq: UrlTemplate(DEFAULT_HOMEQ_TEMPLATE.to_string()),
            qasa: UrlTemplate(DEFAULT_QASA_TEMPLATE.to_string()),
            directions: UrlTemplate(DEFAULT_DIRECTIONS_TEMPLATE.to_string()),
            landlord_search: UrlTemplate(DEFAULT_LANDLORD_SEARCH_TEMPLATE.to_string()),
            boplats_filter: DEFAULT_BOPLATS_URL.to_string(),
        }
    }
}

/// Links for one municipality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortalLinks {
    /// HomeQ pages are keyed by slug; a name with no letters or digits has none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homeq: Option<String>,
    pub qasa: String,
    /// Boplats only filters on its own municipality list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boplats: Option<String>,
    pub directions: String,
    pub landlord_search: String,
}

impl PortalLinks {
    pub fn build(templates: &PortalTemplates, name: &str, on_boplats: bool) -> Self {
        let name = name.trim();
        Self {
            homeq: (!slugify(name).is_empty())
                .then(|| templates.homeq.render(&homeq_query(name))),
            qasa: templates
                .qasa
                .render(&encode_query_value(&qasa_search_area(name))),
            boplats: on_boplats.then(|| templates.boplats_filter.clone()),
            directions: templates
                .directions
                .render(&generic_search_term(&format!("{name} Station"))),
            landlord_search: templates.landlord_search.render(&generic_search_term(
                &format!("privata hyresvärdar {name} bostad"),
            )),
        }
    }
}

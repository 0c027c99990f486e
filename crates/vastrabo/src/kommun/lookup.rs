use super::catalog::{Coordinates, Landlord, LandlordCategory, Municipality, MunicipalityCatalog};
use super::guidance::{APPLICATION_CHECKLIST, BOPLATS_UNAVAILABLE_NOTE, QASA_SAFETY_ADVICE};
use super::links::{PortalLinks, PortalTemplates};
use super::normalizer::{official_name, slugify};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("unknown municipality '{0}'")]
    UnknownMunicipality(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct LandlordView {
    pub name: String,
    pub url: String,
}

impl From<&Landlord> for LandlordView {
    fn from(landlord: &Landlord) -> Self {
        Self {
            name: landlord.name.clone(),
            url: landlord.url.clone(),
        }
    }
}

/// Everything shown for a selected municipality.
#[derive(Debug, Clone, Serialize)]
pub struct KommunProfile {
    pub name: String,
    pub official_name: String,
    pub slug: String,
    pub distance_km: u16,
    pub distance_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commute: Option<String>,
    pub coordinates: Coordinates,
    pub municipal_landlords: Vec<LandlordView>,
    pub private_landlords: Vec<LandlordView>,
    /// Present only when no private landlord is listed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_landlord_search: Option<String>,
    pub portals: PortalLinks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boplats_note: Option<&'static str>,
    pub qasa_safety_advice: &'static [&'static str],
    pub application_checklist: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct KommunSummary {
    pub name: String,
    pub slug: String,
    pub official_name: String,
    pub distance_km: u16,
}

/// Read-only lookups over a loaded catalog. The caller always passes the
/// selection in; nothing here remembers it.
#[derive(Debug, Clone)]
pub struct KommunLookup {
    catalog: MunicipalityCatalog,
    templates: PortalTemplates,
}

impl KommunLookup {
    pub fn new(catalog: MunicipalityCatalog, templates: PortalTemplates) -> Self {
        Self { catalog, templates }
    }

    pub fn catalog(&self) -> &MunicipalityCatalog {
        &self.catalog
    }

    pub fn templates(&self) -> &PortalTemplates {
        &self.templates
    }

    /// `Ok(None)` for a blank selection, an error for a name not in the
    /// catalog.
    pub fn profile(&self, selection: &str) -> Result<Option<KommunProfile>, LookupError> {
        if selection.trim().is_empty() {
            return Ok(None);
        }

        let Some(municipality) = self.catalog.find(selection) else {
            warn!(selection, "selection not in municipality catalog");
            return Err(LookupError::UnknownMunicipality(selection.trim().to_string()));
        };

        debug!(municipality = %municipality.name, "building municipality profile");
        Ok(Some(self.build_profile(municipality)))
    }

    pub fn summaries(&self) -> Vec<KommunSummary> {
        self.catalog
            .iter()
            .map(|municipality| KommunSummary {
                name: municipality.name.clone(),
                slug: slugify(&municipality.name),
                official_name: official_name(&municipality.name),
                distance_km: municipality.distance_km,
            })
            .collect()
    }

    fn build_profile(&self, municipality: &Municipality) -> KommunProfile {
        let portals = PortalLinks::build(&self.templates, &municipality.name, municipality.boplats);
        let private_landlords: Vec<LandlordView> = municipality
            .landlords_in(LandlordCategory::Private)
            .map(LandlordView::from)
            .collect();
        let private_landlord_search = (!municipality.has_private_landlords())
            .then(|| portals.landlord_search.clone());

        KommunProfile {
            name: municipality.name.clone(),
            official_name: official_name(&municipality.name),
            slug: slugify(&municipality.name),
            distance_km: municipality.distance_km,
            distance_label: municipality.distance_label(),
            commute: municipality.commute.clone(),
            coordinates: municipality.coordinates,
            municipal_landlords: municipality
                .landlords_in(LandlordCategory::Municipal)
                .map(LandlordView::from)
                .collect(),
            private_landlords,
            private_landlord_search,
            boplats_note: (!municipality.boplats).then_some(BOPLATS_UNAVAILABLE_NOTE),
            portals,
            qasa_safety_advice: QASA_SAFETY_ADVICE,
            application_checklist: APPLICATION_CHECKLIST,
        }
    }
}

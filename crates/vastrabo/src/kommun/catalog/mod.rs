//! The municipality reference table: one versioned data set, loaded once.

mod domain;
mod parser;

pub use domain::{Coordinates, Landlord, LandlordCategory, Municipality};

use super::normalizer::slugify;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

const EMBEDDED_KOMMUNER: &str = include_str!("../../../data/kommuner.csv");
const EMBEDDED_HYRESVARDAR: &str = include_str!("../../../data/hyresvardar.csv");
const EMBEDDED_REVISION: &str = include_str!("../../../data/REVISION");

pub const KOMMUNER_FILE: &str = "kommuner.csv";
pub const HYRESVARDAR_FILE: &str = "hyresvardar.csv";
pub const REVISION_FILE: &str = "REVISION";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("municipality on row {row} has a blank name")]
    BlankName { row: usize },
    #[error("municipality '{0}' is listed more than once")]
    Duplicate(String),
    #[error("municipality '{0}' has no letters or digits to build a slug from")]
    EmptySlug(String),
    #[error("municipalities '{first}' and '{second}' share the slug '{slug}'")]
    SlugCollision {
        slug: String,
        first: String,
        second: String,
    },
    #[error("municipality '{0}' has coordinates outside the valid range")]
    InvalidCoordinates(String),
    #[error("landlord '{landlord}' references unknown municipality '{kommun}'")]
    UnknownMunicipality { landlord: String, kommun: String },
    #[error("landlord '{landlord}' has an invalid url '{url}'")]
    InvalidLandlordUrl { landlord: String, url: String },
}

/// All municipalities, sorted by name, with a slug index for lookups.
#[derive(Debug, Clone)]
pub struct MunicipalityCatalog {
    revision: String,
    municipalities: Vec<Municipality>,
    by_name: HashMap<String, usize>,
    by_slug: HashMap<String, usize>,
}

impl MunicipalityCatalog {
    /// The table compiled into the crate.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_readers(
            EMBEDDED_KOMMUNER.as_bytes(),
            EMBEDDED_HYRESVARDAR.as_bytes(),
            EMBEDDED_REVISION,
        )
    }

    /// Loads `kommuner.csv`, `hyresvardar.csv` and an optional `REVISION`
    /// file from `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        let kommuner = open(&dir.join(KOMMUNER_FILE))?;
        let hyresvardar = open(&dir.join(HYRESVARDAR_FILE))?;

        let revision_path = dir.join(REVISION_FILE);
        let revision = match std::fs::read_to_string(&revision_path) {
            Ok(revision) => revision,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => "local".to_string(),
            Err(source) => {
                return Err(CatalogError::Io {
                    path: revision_path.display().to_string(),
                    source,
                })
            }
        };

        Self::from_readers(kommuner, hyresvardar, &revision)
    }

    pub fn from_readers<K: Read, H: Read>(
        kommuner: K,
        hyresvardar: H,
        revision: &str,
    ) -> Result<Self, CatalogError> {
        let mut municipalities = Vec::new();
        for (index, row) in parser::parse_municipalities(kommuner)?
            .into_iter()
            .enumerate()
        {
            let name = row.name.trim().to_string();
            if name.is_empty() {
                return Err(CatalogError::BlankName { row: index + 1 });
            }
            let coordinates = row.coordinates();
            if !coordinates.is_valid() {
                return Err(CatalogError::InvalidCoordinates(name));
            }

            municipalities.push(Municipality {
                name,
                distance_km: row.distance_km,
                commute: row.commute,
                coordinates,
                boplats: row.boplats,
                landlords: Vec::new(),
            });
        }

        municipalities.sort_by(|a, b| a.name.cmp(&b.name));

        let mut by_name = HashMap::with_capacity(municipalities.len());
        let mut by_slug: HashMap<String, usize> = HashMap::with_capacity(municipalities.len());
        for (index, municipality) in municipalities.iter().enumerate() {
            if by_name.insert(municipality.name.clone(), index).is_some() {
                return Err(CatalogError::Duplicate(municipality.name.clone()));
            }
            let slug = slugify(&municipality.name);
            if slug.is_empty() {
                return Err(CatalogError::EmptySlug(municipality.name.clone()));
            }
            if let Some(previous) = by_slug.insert(slug.clone(), index) {
                return Err(CatalogError::SlugCollision {
                    slug,
                    first: municipalities[previous].name.clone(),
                    second: municipality.name.clone(),
                });
            }
        }

        for row in parser::parse_landlords(hyresvardar)? {
            let Some(&index) = by_name.get(row.kommun.as_str()) else {
                return Err(CatalogError::UnknownMunicipality {
                    landlord: row.name,
                    kommun: row.kommun,
                });
            };
            if !is_web_url(&row.url) {
                return Err(CatalogError::InvalidLandlordUrl {
                    landlord: row.name,
                    url: row.url,
                });
            }

            municipalities[index].landlords.push(Landlord {
                name: row.name,
                url: row.url,
                category: row.category,
            });
        }

        let revision = revision.trim().to_string();
        info!(
            revision = %revision,
            municipalities = municipalities.len(),
            "municipality catalog loaded"
        );

        Ok(Self {
            revision,
            municipalities,
            by_name,
            by_slug,
        })
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn len(&self) -> usize {
        self.municipalities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.municipalities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Municipality> {
        self.municipalities.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.municipalities.iter().map(|m| m.name.as_str())
    }

    /// Resolves a display name ("Göteborg") or a slug ("goteborg").
    pub fn find(&self, key: &str) -> Option<&Municipality> {
        let key = key.trim();
        let index = self
            .by_name
            .get(key)
            .or_else(|| self.by_slug.get(&slugify(key)))?;
        let municipality = self.municipalities.get(*index)?;
        debug!(key, municipality = %municipality.name, "catalog hit");
        Some(municipality)
    }
}

fn open(path: &Path) -> Result<std::fs::File, CatalogError> {
    std::fs::File::open(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn is_web_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "name,distance_km,commute,lat,lon,boplats\n";
    const LANDLORD_HEADER: &str = "kommun,name,url,category\n";

    fn load(kommuner: &str, hyresvardar: &str) -> Result<MunicipalityCatalog, CatalogError> {
        MunicipalityCatalog::from_readers(kommuner.as_bytes(), hyresvardar.as_bytes(), "test")
    }

    #[test]
    fn embedded_catalog_covers_vastra_gotaland() {
        let catalog = MunicipalityCatalog::embedded().expect("embedded catalog loads");
        assert_eq!(catalog.len(), 49);
        assert_eq!(catalog.revision(), "2026.1");
        assert!(catalog
            .iter()
            .all(|municipality| !municipality.landlords.is_empty()));
        assert_eq!(catalog.iter().filter(|m| m.boplats).count(), 16);
    }

    #[test]
    fn names_are_sorted() {
        let catalog = MunicipalityCatalog::embedded().expect("embedded catalog loads");
        let names: Vec<_> = catalog.names().collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.first(), Some(&"Ale"));
    }

    #[test]
    fn find_accepts_name_or_slug() {
        let catalog = MunicipalityCatalog::embedded().expect("embedded catalog loads");
        let by_name = catalog.find(" Göteborg ").expect("name resolves");
        let by_slug = catalog.find("goteborg").expect("slug resolves");
        assert_eq!(by_name.name, "Göteborg");
        assert_eq!(by_slug.name, "Göteborg");
        assert_eq!(
            catalog.find("lilla-edet").map(|m| m.name.as_str()),
            Some("Lilla Edet")
        );
        assert!(catalog.find("Malmö").is_none());
    }

    #[test]
    fn rejects_duplicate_names() {
        let kommuner = format!("{HEADER}Lerum,20,,57.77,12.27,true\nLerum,20,,57.77,12.27,true\n");
        let err = load(&kommuner, LANDLORD_HEADER).expect_err("duplicate rejected");
        assert!(matches!(err, CatalogError::Duplicate(name) if name == "Lerum"));
    }

    #[test]
    fn rejects_colliding_slugs() {
        let kommuner = format!("{HEADER}Åmål,175,,59.05,12.70,false\nAmal,175,,59.05,12.70,false\n");
        let err = load(&kommuner, LANDLORD_HEADER).expect_err("collision rejected");
        assert!(matches!(err, CatalogError::SlugCollision { slug, .. } if slug == "amal"));
    }

    #[test]
    fn rejects_names_without_a_slug() {
        let kommuner = format!("{HEADER}Lerum,20,,57.77,12.27,true\n--,10,,57.0,12.0,false\n");
        let err = load(&kommuner, LANDLORD_HEADER).expect_err("punctuation-only name rejected");
        assert!(matches!(err, CatalogError::EmptySlug(name) if name == "--"));
    }

    #[test]
    fn punctuation_only_key_finds_nothing() {
        let catalog = MunicipalityCatalog::embedded().expect("embedded catalog loads");
        assert!(catalog.find("/").is_none());
        assert!(catalog.find("!!").is_none());
    }

    #[test]
    fn rejects_blank_names_and_bad_coordinates() {
        let blank = format!("{HEADER} ,20,,57.77,12.27,true\n");
        assert!(matches!(
            load(&blank, LANDLORD_HEADER),
            Err(CatalogError::BlankName { row: 1 })
        ));

        let off_map = format!("{HEADER}Lerum,20,,157.77,12.27,true\n");
        assert!(matches!(
            load(&off_map, LANDLORD_HEADER),
            Err(CatalogError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn rejects_landlords_for_unknown_municipalities() {
        let kommuner = format!("{HEADER}Lerum,20,,57.77,12.27,true\n");
        let landlords = format!("{LANDLORD_HEADER}Malmö,MKB,https://www.mkbfastighet.se,Kommunal\n");
        let err = load(&kommuner, &landlords).expect_err("unknown kommun rejected");
        assert!(matches!(err, CatalogError::UnknownMunicipality { kommun, .. } if kommun == "Malmö"));
    }

    #[test]
    fn rejects_landlords_without_web_url() {
        let kommuner = format!("{HEADER}Lerum,20,,57.77,12.27,true\n");
        let landlords = format!("{LANDLORD_HEADER}Lerum,Förbo,mailto:info@forbo.se,Kommunal\n");
        assert!(matches!(
            load(&kommuner, &landlords),
            Err(CatalogError::InvalidLandlordUrl { .. })
        ));
    }

    #[test]
    fn from_dir_reports_missing_files() {
        let dir = std::env::temp_dir().join("vastrabo-catalog-missing");
        let err = MunicipalityCatalog::from_dir(&dir).expect_err("missing files rejected");
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}

pub mod catalog;
pub mod guidance;
pub mod links;
mod lookup;
pub mod normalizer;

pub use catalog::{CatalogError, MunicipalityCatalog};
pub use links::{PortalLinks, PortalTemplates, TemplateError, UrlTemplate};
pub use lookup::{KommunLookup, KommunProfile, KommunSummary, LandlordView, LookupError};
pub use normalizer::NormalizedName;

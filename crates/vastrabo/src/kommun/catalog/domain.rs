use serde::{Deserialize, Serialize};

/// Whether a landlord is owned by the municipality or privately run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandlordCategory {
    #[serde(rename = "Kommunal", alias = "municipal")]
    Municipal,
    #[serde(rename = "Privat", alias = "private")]
    Private,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Landlord {
    pub name: String,
    pub url: String,
    pub category: LandlordCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Reference data for one municipality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Municipality {
    pub name: String,
    /// Road distance to Göteborg C.
    pub distance_km: u16,
    /// Approximate travel time to Göteborg C, free text.
    pub commute: Option<String>,
    pub coordinates: Coordinates,
    /// Listed in Boplats' own municipality filter.
    pub boplats: bool,
    pub landlords: Vec<Landlord>,
}

impl Municipality {
    pub fn distance_label(&self) -> String {
        format!("{} km", self.distance_km)
    }

    pub fn landlords_in(&self, category: LandlordCategory) -> impl Iterator<Item = &Landlord> {
        self.landlords
            .iter()
            .filter(move |landlord| landlord.category == category)
    }

    pub fn has_private_landlords(&self) -> bool {
        self.landlords_in(LandlordCategory::Private).next().is_some()
    }
}

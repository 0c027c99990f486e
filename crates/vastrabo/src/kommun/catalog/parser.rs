use super::domain::{Coordinates, LandlordCategory};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Deserialize)]
pub(crate) struct MunicipalityRow {
    pub(crate) name: String,
    pub(crate) distance_km: u16,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) commute: Option<String>,
    pub(crate) lat: f64,
    pub(crate) lon: f64,
    #[serde(default)]
    pub(crate) boplats: bool,
}

impl MunicipalityRow {
    pub(crate) fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LandlordRow {
    pub(crate) kommun: String,
    pub(crate) name: String,
    pub(crate) url: String,
    pub(crate) category: LandlordCategory,
}

fn reader_for<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

pub(crate) fn parse_municipalities<R: Read>(reader: R) -> Result<Vec<MunicipalityRow>, csv::Error> {
    reader_for(reader).deserialize().collect()
}

pub(crate) fn parse_landlords<R: Read>(reader: R) -> Result<Vec<LandlordRow>, csv::Error> {
    reader_for(reader).deserialize().collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_commute_becomes_none() {
        let csv = "name,distance_km,commute,lat,lon,boplats\nHjo,160,,58.30,14.28,false\n";
        let rows = parse_municipalities(csv.as_bytes()).expect("rows parse");
        assert_eq!(rows.len(), 1);
        assert!(rows[0].commute.is_none());
        assert!(!rows[0].boplats);
    }

    #[test]
    fn landlord_category_accepts_swedish_labels() {
        let csv = "kommun,name,url,category\nSkara,Cantab,https://cantab.nu,Privat\n";
        let rows = parse_landlords(csv.as_bytes()).expect("rows parse");
        assert_eq!(rows[0].category, LandlordCategory::Private);
    }

    #[test]
    fn unknown_category_is_a_csv_error() {
        let csv = "kommun,name,url,category\nSkara,Cantab,https://cantab.nu,Statlig\n";
        assert!(parse_landlords(csv.as_bytes()).is_err());
    }
}

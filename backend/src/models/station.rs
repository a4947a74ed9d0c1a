use serde::{Deserialize, Serialize};

crate::define_id_type!(string StationId);

/// Station identities recognized when no configuration overrides them.
pub const DEFAULT_STATIONS: [&str; 3] = ["Referencia", "Cama_1", "Cama_2"];

/// The closed set of stations that windowed and latest queries report on.
///
/// Readings from stations outside the set are still stored, they are only
/// skipped when grouping. Order is preserved as configured and duplicates are
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<StationId>", into = "Vec<StationId>")]
pub struct StationSet(Vec<StationId>);

impl StationSet {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StationId>,
    {
        let mut stations: Vec<StationId> = Vec::new();
        for id in ids {
            let id = id.into();
            if !id.as_str().is_empty() && !stations.contains(&id) {
                stations.push(id);
            }
        }
        Self(stations)
    }

    /// Parse a comma separated list such as `"Referencia, Cama_1"`.
    pub fn parse_list(list: &str) -> Self {
        Self::new(list.split(',').map(str::trim))
    }

    pub fn contains(&self, station_id: &StationId) -> bool {
        self.0.contains(station_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StationId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for StationSet {
    fn default() -> Self {
        Self::new(DEFAULT_STATIONS)
    }
}

impl From<Vec<StationId>> for StationSet {
    fn from(ids: Vec<StationId>) -> Self {
        Self::new(ids)
    }
}

impl From<StationSet> for Vec<StationId> {
    fn from(set: StationSet) -> Self {
        set.0
    }
}

impl<'a> IntoIterator for &'a StationSet {
    type Item = &'a StationId;
    type IntoIter = std::slice::Iter<'a, StationId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_station_set() {
        let set = StationSet::default();
        assert_eq!(set.len(), 3);
        assert!(set.contains(&StationId::from("Referencia")));
        assert!(set.contains(&StationId::from("Cama_2")));
        assert!(!set.contains(&StationId::from("Cama_3")));
    }

    #[test]
    fn test_new_drops_duplicates_and_blanks() {
        let set = StationSet::new(["A", "B", "A", "", "C"]);
        let ids: Vec<&str> = set.iter().map(StationId::as_str).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_parse_list_trims_whitespace() {
        let set = StationSet::parse_list(" north , south,, east ");
        let ids: Vec<&str> = set.iter().map(StationId::as_str).collect();
        assert_eq!(ids, vec!["north", "south", "east"]);
    }

    #[test]
    fn test_station_set_serde_roundtrip() {
        let set = StationSet::new(["x", "y"]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["x","y"]"#);
        let back: StationSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_station_id_display() {
        assert_eq!(StationId::new("Cama_1").to_string(), "Cama_1");
    }
}

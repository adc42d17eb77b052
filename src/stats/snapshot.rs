//! Normalized metrics produced from one status document

use serde_derive::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metric name to value, kept in the order the metrics were first seen
pub type Section = Map<String, Value>;

/// The flattened form of a status document
///
/// All ten sections are always present, even when empty. Field order is the
/// key order of the serialized object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    /// View name to that view's counters and `rrsets_*` cache counts
    pub views: Map<String, Value>,
    /// `boot-time` / `config-time` as Unix epoch seconds
    pub server: Section,
    pub memory: Section,
    pub cache: Section,
    pub counter: Section,
    pub socketcounter: Section,
    pub zonemaintenancecounter: Section,
    pub resolvercounter: Section,
    pub incounter: Section,
    pub outcounter: Section,
}

/// Sections a counter group can be routed into
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SectionKind {
    Cache,
    Counter,
    SocketCounter,
    ZoneMaintenanceCounter,
    ResolverCounter,
    InCounter,
    OutCounter,
}

impl MetricSnapshot {
    pub fn new() -> MetricSnapshot {
        MetricSnapshot::default()
    }

    pub fn section_mut(&mut self, kind: SectionKind) -> &mut Section {
        match kind {
            SectionKind::Cache => &mut self.cache,
            SectionKind::Counter => &mut self.counter,
            SectionKind::SocketCounter => &mut self.socketcounter,
            SectionKind::ZoneMaintenanceCounter => &mut self.zonemaintenancecounter,
            SectionKind::ResolverCounter => &mut self.resolvercounter,
            SectionKind::InCounter => &mut self.incounter,
            SectionKind::OutCounter => &mut self.outcounter,
        }
    }

    pub fn to_value(&self) -> Value {
        // Every field is already a JSON map, so this cannot fail
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_snapshot_has_all_sections() {
        let value = MetricSnapshot::new().to_value();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();

        assert_eq!(
            keys,
            vec![
                "views",
                "server",
                "memory",
                "cache",
                "counter",
                "socketcounter",
                "zonemaintenancecounter",
                "resolvercounter",
                "incounter",
                "outcounter",
            ]
        );
        for (_, section) in value.as_object().unwrap() {
            assert_eq!(section, &json!({}));
        }
    }

    #[test]
    fn test_last_write_keeps_position() {
        let mut snapshot = MetricSnapshot::new();
        let section = snapshot.section_mut(SectionKind::InCounter);
        section.insert("A".to_string(), json!("1"));
        section.insert("QUERY".to_string(), json!("2"));
        section.insert("A".to_string(), json!("3"));

        let keys: Vec<&String> = snapshot.incounter.keys().collect();
        assert_eq!(keys, vec!["A", "QUERY"]);
        assert_eq!(snapshot.incounter["A"], json!("3"));
    }
}

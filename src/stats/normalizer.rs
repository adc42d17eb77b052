//! Maps a statistics channel document onto a `MetricSnapshot`
//!
//! Extraction rules depend on the document's major version. Only version 3
//! (BIND 9.10 and later) has rules; everything else is rejected up front so
//! no partial snapshot is ever produced.

use chrono::{NaiveDateTime, TimeZone, Utc};
use roxmltree::Node;
use serde_json::{Map, Value};

use crate::stats::document::{
    child_elements, child_text, children_named, find_all, required_attribute, StatusDocument,
};
use crate::stats::errors::{Result, StatsError};
use crate::stats::snapshot::{MetricSnapshot, Section, SectionKind};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Server level timestamps copied into the `server` section
const SERVER_TIMESTAMPS: [&str; 2] = ["boot-time", "config-time"];

/// Extraction strategy selected by the document's major version
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NormalizationRule {
    /// Statistics channel version 3
    V3,
    /// No rules exist for this version (this includes version 2)
    Unsupported,
}

impl NormalizationRule {
    pub fn for_version(major: Option<u32>) -> NormalizationRule {
        match major {
            Some(3) => NormalizationRule::V3,
            _ => NormalizationRule::Unsupported,
        }
    }

    pub fn apply(self, doc: &StatusDocument<'_>) -> Result<MetricSnapshot> {
        match self {
            NormalizationRule::V3 => normalize_v3(doc),
            NormalizationRule::Unsupported => Err(unsupported(doc)),
        }
    }
}

/// Normalizes `doc` using the rules for the given major version
pub fn normalize(doc: &StatusDocument<'_>, major: u32) -> Result<MetricSnapshot> {
    NormalizationRule::for_version(Some(major)).apply(doc)
}

/// Parses `text`, detects its version and normalizes it
pub fn normalize_str(text: &str) -> Result<MetricSnapshot> {
    let doc = StatusDocument::parse(text)?;
    let major = doc.major_version()?;
    log::debug!("Status document version {}", doc.version()?);

    NormalizationRule::for_version(major).apply(&doc)
}

fn unsupported(doc: &StatusDocument<'_>) -> StatsError {
    StatsError::UnsupportedVersion {
        version: doc.version().unwrap_or_default().to_string(),
        attributes: doc.root_attributes(),
    }
}

fn server_counter_section(kind: &str) -> Option<SectionKind> {
    match kind {
        "nsstat" => Some(SectionKind::Counter),
        "sockstat" => Some(SectionKind::SocketCounter),
        "zonestat" => Some(SectionKind::ZoneMaintenanceCounter),
        // qtype and opcode share a section; later names overwrite earlier ones
        "qtype" | "opcode" => Some(SectionKind::InCounter),
        _ => None,
    }
}

fn view_counter_section(kind: &str) -> Option<SectionKind> {
    match kind {
        "resqtype" => Some(SectionKind::OutCounter),
        "resstats" => Some(SectionKind::ResolverCounter),
        "cachestats" => Some(SectionKind::Cache),
        _ => None,
    }
}

fn normalize_v3(doc: &StatusDocument<'_>) -> Result<MetricSnapshot> {
    let root = doc.root();
    let mut snapshot = MetricSnapshot::new();

    for &tag in SERVER_TIMESTAMPS.iter() {
        for node in find_all(root, &["server", tag]) {
            let epoch = parse_timestamp(node.text().unwrap_or(""))?;
            snapshot.server.insert(tag.to_string(), Value::from(epoch));
        }
    }

    for group in find_all(root, &["server", "counters"]) {
        let kind = required_attribute(group, "type")?;
        if let Some(section) = server_counter_section(kind) {
            copy_counters(group, snapshot.section_mut(section))?;
        }
    }

    let views = find_all(root, &["views", "view"]);

    for group in views.iter().flat_map(|view| children_named(*view, "counters")) {
        let kind = required_attribute(group, "type")?;
        if let Some(section) = view_counter_section(kind) {
            copy_counters(group, snapshot.section_mut(section))?;
        }
    }

    for view in views {
        let name = required_attribute(view, "name")?;
        let mut counters = Section::new();

        for group in children_named(view, "counters") {
            copy_counters(group, &mut counters)?;
        }

        for rrset in find_all(view, &["cache", "rrset"]) {
            let (key, count) = rrset_entry(rrset)?;
            counters.insert(key, Value::from(count));
        }

        snapshot.views.insert(name.to_string(), Value::Object(counters));
    }

    for summary in find_all(root, &["memory", "summary"]) {
        for field in child_elements(summary) {
            snapshot.memory.insert(
                field.tag_name().name().to_string(),
                Value::from(field.text().unwrap_or("")),
            );
        }
    }

    Ok(snapshot)
}

/// Copies every `<counter name="...">text</counter>` child of `group`
fn copy_counters(group: Node<'_, '_>, section: &mut Map<String, Value>) -> Result<()> {
    for counter in children_named(group, "counter") {
        let name = required_attribute(counter, "name")?;
        section.insert(
            name.to_string(),
            Value::from(counter.text().unwrap_or("")),
        );
    }
    Ok(())
}

/// `rrsets_<type>` key and count for one cache `<rrset>` entry
fn rrset_entry(rrset: Node<'_, '_>) -> Result<(String, String)> {
    let name = child_text(rrset, "name").ok_or_else(|| {
        StatsError::MalformedDocument("<rrset> element has no <name> child".to_string())
    })?;
    let count = child_text(rrset, "counter").ok_or_else(|| {
        StatsError::MalformedDocument(format!("<rrset> {} has no <counter> child", name))
    })?;

    Ok((rrset_key(name), count.to_string()))
}

/// Cache record-set key: `!` (negative caching marker) becomes `_`
pub fn rrset_key(name: &str) -> String {
    format!("rrsets_{}", name.replace('!', "_"))
}

/// Parses `YYYY-MM-DDTHH:MM:SS[.fff]Z` into Unix epoch seconds
pub fn parse_timestamp(text: &str) -> Result<i64> {
    let naive = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).map_err(|e| {
        StatsError::MalformedDocument(format!("invalid timestamp '{}': {}", text, e))
    })?;

    Ok(Utc.from_utc_datetime(&naive).timestamp())
}

//! Parsed statistics channel document
//!
//! Thin wrapper around a `roxmltree` tree that knows how to read the root
//! `version` attribute and offers the path walks the normalizer needs.

use std::collections::BTreeMap;

use regex::Regex;
use roxmltree::{Document, Node};

use crate::stats::errors::{Result, StatsError};

/// A parsed `<statistics>` document, borrowed from the response body
pub struct StatusDocument<'input> {
    doc: Document<'input>,
}

impl<'input> StatusDocument<'input> {
    pub fn parse(text: &'input str) -> Result<StatusDocument<'input>> {
        let doc = Document::parse(text)?;
        Ok(StatusDocument { doc })
    }

    pub fn root(&self) -> Node<'_, 'input> {
        self.doc.root_element()
    }

    /// Raw `version` attribute of the root element
    pub fn version(&self) -> Result<&str> {
        self.doc.root_element().attribute("version").ok_or_else(|| {
            StatsError::MalformedDocument("root element has no version attribute".to_string())
        })
    }

    /// All root attributes, for diagnostics
    pub fn root_attributes(&self) -> BTreeMap<String, String> {
        self.doc
            .root_element()
            .attributes()
            .map(|attr| (attr.name().to_string(), attr.value().to_string()))
            .collect()
    }

    /// Major version number, i.e. the digits before the first `.`
    ///
    /// Returns `None` when the version string doesn't start that way.
    pub fn major_version(&self) -> Result<Option<u32>> {
        let version = self.version()?;
        Ok(parse_major_version(version))
    }
}

pub fn parse_major_version(version: &str) -> Option<u32> {
    let re = Regex::new(r"^(\d+)\.").ok()?;
    re.captures(version)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

/// Element children of `node` with the given tag name
pub fn children_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == tag)
}

/// Element children of `node` of any tag name
pub fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(|child| child.is_element())
}

/// Walks `path` one tag at a time, yielding every element that matches
pub fn find_all<'a, 'input: 'a>(node: Node<'a, 'input>, path: &[&'a str]) -> Vec<Node<'a, 'input>> {
    let mut current = vec![node];
    for &tag in path {
        current = current
            .into_iter()
            .flat_map(|n| children_named(n, tag))
            .collect();
    }
    current
}

/// Text of the first child element named `tag`, if that child exists
pub fn child_text<'a, 'input: 'a>(node: Node<'a, 'input>, tag: &'a str) -> Option<&'a str> {
    children_named(node, tag)
        .next()
        .map(|child| child.text().unwrap_or(""))
}

/// Value of a required attribute
pub fn required_attribute<'a, 'input: 'a>(node: Node<'a, 'input>, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        StatsError::MalformedDocument(format!(
            "<{}> element is missing the '{}' attribute",
            node.tag_name().name(),
            name
        ))
    })
}

//! Read-only `.csproj` property-group view.
//!
//! Parses an MSBuild project file just far enough to feed configuration
//! discovery: every `<PropertyGroup>` in document order, each with its
//! optional `Condition` attribute and its child `tag → text` properties.
//! The file is never mutated and imports are not resolved.

use std::collections::HashMap;

use crate::configurations::{
    ProjectConfiguration, PropertyGroup, matches_configuration, project_configurations,
};

// ═══════════════════════════════════════════════════════════════════════════════
//  Error
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct ProjectError {
    pub message: String,
}

impl ProjectError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl std::fmt::Display for ProjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ProjectError {}

impl From<roxmltree::Error> for ProjectError {
    fn from(error: roxmltree::Error) -> Self {
        Self::new(format!("XML Error: {error}"))
    }
}

impl From<std::io::Error> for ProjectError {
    fn from(error: std::io::Error) -> Self {
        Self::new(format!("IO Error: {error}"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  ProjectFile
// ═══════════════════════════════════════════════════════════════════════════════

/// Parsed property-group view of one project file.
#[derive(Debug, Clone, Default)]
pub struct ProjectFile {
    property_groups: Vec<ProjectPropertyGroup>,
}

/// A `<PropertyGroup>` element, optionally gated by a `Condition`.
#[derive(Debug, Clone, Default)]
pub struct ProjectPropertyGroup {
    pub condition: Option<String>,
    /// Child `tag → text` pairs, in document order. Repeated tags keep every
    /// occurrence; the last one wins when merged.
    pub properties: Vec<(String, String)>,
}

impl PropertyGroup for ProjectPropertyGroup {
    fn condition_expression(&self) -> Option<&str> {
        self.condition.as_deref()
    }
}

impl ProjectFile {
    /// Parse a project file from its XML source string.
    pub fn parse(source: &str) -> Result<Self, ProjectError> {
        let doc = roxmltree::Document::parse(source)?;

        let property_groups = doc
            .root_element()
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "PropertyGroup")
            .map(|node| ProjectPropertyGroup::parse(&node))
            .collect();

        Ok(Self { property_groups })
    }

    /// Load a project file from disk.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| ProjectError::new(format!("{}: {e}", path.display())))?;
        Self::parse(&source)
    }

    /// All property groups, in document order.
    pub fn property_groups(&self) -> &[ProjectPropertyGroup] {
        &self.property_groups
    }

    /// The configuration×platform matrix this project declares.
    pub fn configurations(&self) -> Vec<ProjectConfiguration> {
        project_configurations(&self.property_groups)
    }

    /// The effective properties for one target: every group matching the
    /// target contributes its properties in document order, later groups
    /// overriding earlier ones. `None` selects the unconditional base
    /// groups.
    pub fn properties_for(&self, target: Option<&ProjectConfiguration>) -> HashMap<String, String> {
        let mut properties = HashMap::new();

        for group in &self.property_groups {
            if !matches_configuration(group, target) {
                continue;
            }
            for (tag, text) in &group.properties {
                properties.insert(tag.clone(), text.clone());
            }
        }

        properties
    }
}

impl ProjectPropertyGroup {
    fn parse(node: &roxmltree::Node) -> Self {
        Self {
            condition: node.attribute("Condition").map(String::from),
            properties: node
                .children()
                .filter(|n| n.is_element())
                .map(|child| {
                    (
                        child.tag_name().name().to_string(),
                        child.text().unwrap_or("").to_string(),
                    )
                })
                .collect(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════════

//! Template loading for ExoneraTor-OUT.
//!
//! A templates file is a YAML document with named Handlebars templates.
//! The built-in page layout is compiled into the binary.

use crate::RenderError;
use serde::Deserialize;
use std::collections::HashMap;

/// Page layout shipped with the crate
pub const EMBEDDED_TEMPLATES: &str = include_str!("../templates/page.yaml");

/// Name of the template rendered for every request
pub const PAGE_TEMPLATE: &str = "page";

/// Top-level templates file structure
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesFile {
    pub version: String,
    pub templates: HashMap<String, Template>,
}

/// A single template definition
#[derive(Debug, Clone, Deserialize)]
pub struct Template {
    pub description: String,
    pub template: String,
}

impl TemplatesFile {
    /// The built-in page layout
    pub fn embedded() -> Result<Self, RenderError> {
        Self::from_yaml(EMBEDDED_TEMPLATES)
    }

    /// Parse templates from YAML content
    pub fn from_yaml(yaml: &str) -> Result<Self, RenderError> {
        let file: TemplatesFile = serde_yaml::from_str(yaml)
            .map_err(|e| RenderError::Template(format!("invalid templates YAML: {}", e)))?;
        if !file.templates.contains_key(PAGE_TEMPLATE) {
            return Err(RenderError::Template(format!(
                "no '{}' template defined",
                PAGE_TEMPLATE
            )));
        }
        Ok(file)
    }

    /// Get a template by name
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }
}

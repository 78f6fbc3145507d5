//! Project document: the flat-file form of a backend's record lists.
//!
//! The CLI operates on these files; the in-memory backend can be seeded from
//! one. The document is exactly what `GetRenderContexts` / `GetMappingSurfaces`
//! / `GetMappings` return, serialized together.

use serde::{Deserialize, Serialize};

use crate::state::{MappingState, MappingSurfaceState, RenderContextState};

/// All records of one project.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDocument {
    pub contexts: Vec<RenderContextState>,
    pub surfaces: Vec<MappingSurfaceState>,
    pub mappings: Vec<MappingState>,
}

impl ProjectDocument {
    /// Parses a document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the document to a compact JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the document to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn context(&self, id: &str) -> Option<&RenderContextState> {
        self.contexts.iter().find(|c| c.id == id)
    }

    pub fn surface(&self, id: &str) -> Option<&MappingSurfaceState> {
        self.surfaces.iter().find(|s| s.id == id)
    }

    pub fn mapping(&self, id: &str) -> Option<&MappingState> {
        self.mappings.iter().find(|m| m.id == id)
    }
}

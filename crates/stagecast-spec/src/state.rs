//! Backend record types: mappings, render contexts, mapping surfaces.

use serde::{Deserialize, Serialize};

use crate::config::MappingConfig;

/// Kind token for UV-mapped mappings.
pub const KIND_UV: &str = "surface-uv";
/// Kind token for projection mappings.
pub const KIND_PROJECTION: &str = "surface-projection";

/// Source type token for camera-driven render contexts.
pub const SOURCE_TYPE_CAMERA: &str = "camera";
/// Source type token for asset-store render contexts.
pub const SOURCE_TYPE_ASSET_STORE: &str = "asset-store";

/// A content mapping record.
///
/// Binds one render context to one or more surfaces under a projection or UV
/// mode. `id` is backend-assigned on create and empty until then. The kind
/// token stays a plain string so loose legacy values round-trip; use
/// [`crate::MappingMode::from_state`] to resolve the effective mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MappingState {
    pub id: String,
    pub name: String,
    pub project_id: String,
    /// `surface-uv` or `surface-projection`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Reference to a render context; empty when unbound.
    pub context_id: String,
    /// Ordered surface references.
    pub surface_ids: Vec<String>,
    pub opacity: f64,
    pub enabled: bool,
    pub config: MappingConfig,
    /// Backend-reported failure detail, empty when healthy.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_error: String,
}

impl Default for MappingState {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            project_id: String::new(),
            kind: KIND_UV.to_string(),
            context_id: String::new(),
            surface_ids: Vec::new(),
            opacity: 1.0,
            enabled: true,
            config: MappingConfig::default(),
            last_error: String::new(),
        }
    }
}

/// A capture source (camera or stored asset) producing a texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderContextState {
    pub id: String,
    pub name: String,
    pub project_id: String,
    /// `camera` or `asset-store`.
    pub source_type: String,
    pub camera_id: String,
    pub asset_id: String,
    pub width: i32,
    pub height: i32,
    pub capture_mode: String,
    pub enabled: bool,
    /// Opaque handle to the resolved texture, owned by the host; present only
    /// while the context has live pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_texture: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_error: String,
}

impl Default for RenderContextState {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            project_id: String::new(),
            source_type: SOURCE_TYPE_CAMERA.to_string(),
            camera_id: String::new(),
            asset_id: String::new(),
            width: 0,
            height: 0,
            capture_mode: String::new(),
            enabled: true,
            resolved_texture: None,
            last_error: String::new(),
        }
    }
}

impl RenderContextState {
    /// True when the context has live pixels to sample.
    pub fn has_resolved_texture(&self) -> bool {
        self.resolved_texture.is_some()
    }
}

/// A mesh/actor target that content is projected or UV-mapped onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MappingSurfaceState {
    pub id: String,
    pub name: String,
    pub project_id: String,
    pub target_id: String,
    pub actor_path: String,
    pub uv_channel: i32,
    pub material_slots: Vec<i32>,
    pub mesh_component_name: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_error: String,
}

impl Default for MappingSurfaceState {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            project_id: String::new(),
            target_id: String::new(),
            actor_path: String::new(),
            uv_channel: 0,
            material_slots: Vec::new(),
            mesh_component_name: String::new(),
            enabled: true,
            last_error: String::new(),
        }
    }
}

//! UV-mode config sections.

use serde::{Deserialize, Serialize};

/// UV transform applied before sampling the source texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UvTransform {
    pub scale_u: f64,
    pub scale_v: f64,
    pub offset_u: f64,
    pub offset_v: f64,
    pub rotation_deg: f64,
}

impl Default for UvTransform {
    fn default() -> Self {
        Self {
            scale_u: 1.0,
            scale_v: 1.0,
            offset_u: 0.0,
            offset_v: 0.0,
            rotation_deg: 0.0,
        }
    }
}

/// Legacy single-rect feed fallback, in normalized UV space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedRect {
    pub u: f64,
    pub v: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for FeedRect {
    fn default() -> Self {
        Self {
            u: 0.0,
            v: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }
}

/// Legacy per-surface feed-rect override.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurfaceFeedRect {
    pub surface_id: String,
    #[serde(flatten)]
    pub rect: FeedRect,
}

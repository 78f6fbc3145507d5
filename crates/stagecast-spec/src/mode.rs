//! Mapping mode tokens and normalization.

use serde::{Deserialize, Serialize};

use crate::state::{MappingState, KIND_PROJECTION, KIND_UV};

/// Canonical mapping modes.
///
/// A mapping has exactly one mode at a time; the mode decides which config
/// sections are meaningful. `Direct` and `Feed` are UV modes (content is
/// UV-mapped onto the surface), everything else is a projection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MappingMode {
    /// Straight UV mapping of the source texture.
    Direct,
    /// Pixel-rect feed routing (source rect to destination rect copies).
    Feed,
    /// Perspective frustum projection.
    Perspective,
    /// Projection through an explicit 4x4 matrix.
    CustomMatrix,
    /// Cylindrical wrap around an axis.
    Cylindrical,
    /// Spherical dome projection.
    Spherical,
    /// Parallel (orthographic) projection with a fixed size.
    Parallel,
    /// Radial projection emanating from a center point.
    Radial,
    /// Projection relative to a mesh eyepoint.
    Mesh,
    /// Fisheye lens projection for dome content.
    Fisheye,
    /// Camera-locked full-frame plate.
    CameraPlate,
    /// Spatially tracked projection.
    Spatial,
    /// Depth-map driven reprojection.
    DepthMap,
}

impl MappingMode {
    /// Returns the canonical mode token.
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingMode::Direct => "direct",
            MappingMode::Feed => "feed",
            MappingMode::Perspective => "perspective",
            MappingMode::CustomMatrix => "custom-matrix",
            MappingMode::Cylindrical => "cylindrical",
            MappingMode::Spherical => "spherical",
            MappingMode::Parallel => "parallel",
            MappingMode::Radial => "radial",
            MappingMode::Mesh => "mesh",
            MappingMode::Fisheye => "fisheye",
            MappingMode::CameraPlate => "camera-plate",
            MappingMode::Spatial => "spatial",
            MappingMode::DepthMap => "depth-map",
        }
    }

    /// Returns all modes.
    pub fn all() -> &'static [MappingMode] {
        &[
            MappingMode::Direct,
            MappingMode::Feed,
            MappingMode::Perspective,
            MappingMode::CustomMatrix,
            MappingMode::Cylindrical,
            MappingMode::Spherical,
            MappingMode::Parallel,
            MappingMode::Radial,
            MappingMode::Mesh,
            MappingMode::Fisheye,
            MappingMode::CameraPlate,
            MappingMode::Spatial,
            MappingMode::DepthMap,
        ]
    }

    /// True for the UV-mapped modes (Direct, Feed).
    pub fn is_uv(&self) -> bool {
        matches!(self, MappingMode::Direct | MappingMode::Feed)
    }

    /// True for every mode that positions a projector in space.
    pub fn is_projection(&self) -> bool {
        !self.is_uv()
    }

    /// The mapping kind token this mode belongs to.
    pub fn kind_token(&self) -> &'static str {
        if self.is_uv() {
            KIND_UV
        } else {
            KIND_PROJECTION
        }
    }

    /// Normalizes a loose mode string to a canonical mode.
    ///
    /// Case-insensitive; recognizes every canonical token plus the legacy
    /// aliases that appear in persisted configs (`surface-feed`, `surface-uv`,
    /// `surface-projection`, `matrix`, `custom matrix`, `camera plate`,
    /// `cameraplate`, `depth map`, `depthmap`). Total: anything unrecognized
    /// falls back to `default`.
    pub fn normalize(raw: &str, default: MappingMode) -> MappingMode {
        let lower = raw.to_ascii_lowercase();
        match lower.as_str() {
            "surface-feed" => MappingMode::Feed,
            "surface-uv" => MappingMode::Direct,
            "surface-projection" => MappingMode::Perspective,
            "matrix" | "custom matrix" | "custommatrix" => MappingMode::CustomMatrix,
            "camera plate" | "cameraplate" => MappingMode::CameraPlate,
            "depth map" | "depthmap" => MappingMode::DepthMap,
            _ => MappingMode::all()
                .iter()
                .copied()
                .find(|mode| mode.as_str() == lower)
                .unwrap_or(default),
        }
    }

    /// Resolves the effective mode of a mapping record.
    ///
    /// UV mappings read `config.uvMode` (a config that carries feed data but
    /// no explicit `uvMode` counts as Feed); projection mappings read
    /// `config.projectionType`; any other kind token is normalized directly.
    pub fn from_state(state: &MappingState) -> MappingMode {
        if state.kind == KIND_UV {
            if let Some(uv_mode) = &state.config.uv_mode {
                return Self::normalize(uv_mode, MappingMode::Direct);
            }
            if state.config.feed_rect.is_some()
                || state.config.feed_rects.is_some()
                || state.config.feed_v2.is_some()
            {
                return MappingMode::Feed;
            }
            return MappingMode::Direct;
        }
        if state.kind == KIND_PROJECTION {
            return state
                .config
                .projection_type
                .as_deref()
                .map(|p| Self::normalize(p, MappingMode::Perspective))
                .unwrap_or(MappingMode::Perspective);
        }
        Self::normalize(&state.kind, MappingMode::Direct)
    }
}

impl Default for MappingMode {
    fn default() -> Self {
        MappingMode::Direct
    }
}

impl std::fmt::Display for MappingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MappingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MappingMode::all()
            .iter()
            .copied()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("unknown mapping mode: {}", s))
    }
}

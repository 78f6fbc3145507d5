//! Mode-dependent mapping config and defaulting.
//!
//! The config is a field-presence struct rather than a closed enum: the
//! defaulting contract is defined over which fields are present (fill what is
//! absent, never overwrite what is there), and unknown fields written by other
//! clients must round-trip untouched. Each section still gets its own typed
//! payload struct.

pub mod projection;
pub mod uv;

pub use projection::{CylindricalParams, ProjectionMatrix, Vec3};
pub use uv::{FeedRect, SurfaceFeedRect, UvTransform};

use serde::{Deserialize, Serialize};

use crate::feed::FeedGraph;
use crate::mode::MappingMode;

/// The mode-dependent config payload of a mapping.
///
/// Sections are grouped by the mode family that owns them; `uvMode` and
/// `projectionType` are the mode discriminants and are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MappingConfig {
    /// Canonical UV-mode token; present only on `surface-uv` mappings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uv_mode: Option<String>,
    /// Canonical projection-mode token; present only on `surface-projection`
    /// mappings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_type: Option<String>,

    // UV modes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uv_transform: Option<UvTransform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_rect: Option<FeedRect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_rects: Option<Vec<SurfaceFeedRect>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_v2: Option<FeedGraph>,

    // Shared projector parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projector_position: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projector_rotation: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fov: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub near: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub far: Option<f64>,

    // Cylindrical / Radial
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cylindrical: Option<CylindricalParams>,

    // Spherical
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sphere_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal_arc: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_arc: Option<f64>,

    // Parallel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_w: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_h: Option<f64>,

    // Mesh
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eyepoint: Option<Vec3>,

    // Fisheye
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fisheye_fov: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lens_type: Option<String>,

    // CustomMatrix; older clients wrote the key `matrix`.
    #[serde(alias = "matrix", skip_serializing_if = "Option::is_none")]
    pub custom_projection_matrix: Option<ProjectionMatrix>,

    /// Fields this version does not model; preserved through round-trips.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MappingConfig {
    /// Parses a config from a JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Serializes the config to a JSON value.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Fills the config sections the given mode requires, leaving present fields
/// untouched, and clears the discriminant of the opposite mode family.
///
/// Idempotent: applying the same mode twice is a no-op after the first call.
/// Feed graph data (`feedRect`, `feedRects`, `feedV2`) lives only while the
/// mode is Feed and is dropped on any switch away from it.
pub fn apply_mode_defaults(mode: MappingMode, config: &mut MappingConfig) {
    if mode.is_uv() {
        config.projection_type = None;
        config.uv_mode = Some(mode.as_str().to_string());
        config.uv_transform.get_or_insert_with(UvTransform::default);
        if mode == MappingMode::Feed {
            config.feed_rect.get_or_insert_with(FeedRect::default);
            config.feed_v2.get_or_insert_with(FeedGraph::default);
        }
    } else {
        config.uv_mode = None;
        config.projection_type = Some(mode.as_str().to_string());
        config.projector_position.get_or_insert_with(Vec3::default);
        config.projector_rotation.get_or_insert_with(Vec3::default);
        config.fov.get_or_insert(60.0);
        config.aspect_ratio.get_or_insert(1.7778);
        config.near.get_or_insert(10.0);
        config.far.get_or_insert(10_000.0);

        match mode {
            MappingMode::Cylindrical | MappingMode::Radial => {
                config
                    .cylindrical
                    .get_or_insert_with(CylindricalParams::default);
            }
            MappingMode::Spherical => {
                config.sphere_radius.get_or_insert(500.0);
                config.horizontal_arc.get_or_insert(360.0);
                config.vertical_arc.get_or_insert(180.0);
            }
            MappingMode::Parallel => {
                config.size_w.get_or_insert(1000.0);
                config.size_h.get_or_insert(1000.0);
            }
            MappingMode::Mesh => {
                config.eyepoint.get_or_insert_with(Vec3::default);
            }
            MappingMode::Fisheye => {
                config.fisheye_fov.get_or_insert(180.0);
                config.lens_type.get_or_insert_with(|| "equidistant".to_string());
            }
            MappingMode::CustomMatrix => {
                // A config built programmatically may still carry the legacy
                // `matrix` key in `extra`; that counts as present.
                if config.custom_projection_matrix.is_none()
                    && !config.extra.contains_key("matrix")
                {
                    config.custom_projection_matrix = Some(ProjectionMatrix::identity());
                }
            }
            _ => {}
        }
    }

    if mode != MappingMode::Feed {
        config.feed_rect = None;
        config.feed_rects = None;
        config.feed_v2 = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_direct_defaults() {
        let mut config = MappingConfig::default();
        apply_mode_defaults(MappingMode::Direct, &mut config);
        assert_eq!(config.uv_mode.as_deref(), Some("direct"));
        assert!(config.projection_type.is_none());
        assert_eq!(config.uv_transform, Some(UvTransform::default()));
        assert!(config.feed_rect.is_none());
        assert!(config.feed_v2.is_none());
    }

    #[test]
    fn test_feed_defaults_add_graph_container() {
        let mut config = MappingConfig::default();
        apply_mode_defaults(MappingMode::Feed, &mut config);
        assert_eq!(config.uv_mode.as_deref(), Some("feed"));
        assert_eq!(config.feed_rect, Some(FeedRect::default()));
        let graph = config.feed_v2.as_ref().unwrap();
        assert!(graph.sources.is_empty());
        assert!(graph.destinations.is_empty());
        assert!(graph.routes.is_empty());
    }

    #[test]
    fn test_projection_shared_defaults() {
        let mut config = MappingConfig::default();
        apply_mode_defaults(MappingMode::Perspective, &mut config);
        assert_eq!(config.projection_type.as_deref(), Some("perspective"));
        assert!(config.uv_mode.is_none());
        assert_eq!(config.projector_position, Some(Vec3::default()));
        assert_eq!(config.projector_rotation, Some(Vec3::default()));
        assert_eq!(config.fov, Some(60.0));
        assert_eq!(config.aspect_ratio, Some(1.7778));
        assert_eq!(config.near, Some(10.0));
        assert_eq!(config.far, Some(10_000.0));
    }

    #[test]
    fn test_mode_specific_extras() {
        let mut config = MappingConfig::default();
        apply_mode_defaults(MappingMode::Radial, &mut config);
        assert_eq!(config.cylindrical, Some(CylindricalParams::default()));

        let mut config = MappingConfig::default();
        apply_mode_defaults(MappingMode::Spherical, &mut config);
        assert_eq!(config.sphere_radius, Some(500.0));
        assert_eq!(config.horizontal_arc, Some(360.0));
        assert_eq!(config.vertical_arc, Some(180.0));

        let mut config = MappingConfig::default();
        apply_mode_defaults(MappingMode::Parallel, &mut config);
        assert_eq!(config.size_w, Some(1000.0));
        assert_eq!(config.size_h, Some(1000.0));

        let mut config = MappingConfig::default();
        apply_mode_defaults(MappingMode::Mesh, &mut config);
        assert_eq!(config.eyepoint, Some(Vec3::default()));

        let mut config = MappingConfig::default();
        apply_mode_defaults(MappingMode::Fisheye, &mut config);
        assert_eq!(config.fisheye_fov, Some(180.0));
        assert_eq!(config.lens_type.as_deref(), Some("equidistant"));
    }

    #[test]
    fn test_custom_matrix_identity_default() {
        let mut config = MappingConfig::default();
        apply_mode_defaults(MappingMode::CustomMatrix, &mut config);
        let matrix = config.custom_projection_matrix.as_ref().unwrap();
        for row in 0..4 {
            for col in 0..4 {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert_eq!(matrix.get(row, col), expected);
            }
        }
    }

    #[test]
    fn test_custom_matrix_preserves_existing() {
        let mut config = MappingConfig::default();
        let mut matrix = ProjectionMatrix::identity();
        matrix.m00 = 2.0;
        config.custom_projection_matrix = Some(matrix.clone());
        apply_mode_defaults(MappingMode::CustomMatrix, &mut config);
        assert_eq!(config.custom_projection_matrix, Some(matrix));
    }

    #[test]
    fn test_custom_matrix_respects_legacy_extra_key() {
        let mut config = MappingConfig::default();
        config.extra.insert(
            "matrix".to_string(),
            serde_json::json!({"m00": 3.0}),
        );
        apply_mode_defaults(MappingMode::CustomMatrix, &mut config);
        assert!(config.custom_projection_matrix.is_none());
    }

    #[test]
    fn test_never_overwrites_present_fields() {
        let mut config = MappingConfig::default();
        config.fov = Some(90.0);
        config.uv_transform = Some(UvTransform {
            scale_u: 2.0,
            ..UvTransform::default()
        });
        apply_mode_defaults(MappingMode::Perspective, &mut config);
        assert_eq!(config.fov, Some(90.0));
        // uvTransform is not part of the projection branch and is left alone.
        assert_eq!(config.uv_transform.as_ref().unwrap().scale_u, 2.0);
    }

    #[test]
    fn test_idempotent() {
        for mode in MappingMode::all() {
            let mut once = MappingConfig::default();
            apply_mode_defaults(*mode, &mut once);
            let mut twice = once.clone();
            apply_mode_defaults(*mode, &mut twice);
            assert_eq!(once, twice, "mode {}", mode);
        }
    }

    #[test]
    fn test_switch_direct_to_perspective() {
        let mut config = MappingConfig::default();
        apply_mode_defaults(MappingMode::Direct, &mut config);
        apply_mode_defaults(MappingMode::Perspective, &mut config);
        assert!(config.uv_mode.is_none());
        assert_eq!(config.projection_type.as_deref(), Some("perspective"));
        assert!(config.projector_position.is_some());
        assert!(config.projector_rotation.is_some());
        assert!(config.fov.is_some());
        assert!(config.aspect_ratio.is_some());
        assert!(config.near.is_some());
        assert!(config.far.is_some());
    }

    #[test]
    fn test_switch_away_from_feed_drops_graph() {
        let mut config = MappingConfig::default();
        apply_mode_defaults(MappingMode::Feed, &mut config);
        assert!(config.feed_v2.is_some());
        apply_mode_defaults(MappingMode::Direct, &mut config);
        assert!(config.feed_rect.is_none());
        assert!(config.feed_rects.is_none());
        assert!(config.feed_v2.is_none());
        assert_eq!(config.uv_mode.as_deref(), Some("direct"));
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let json = r#"{
            "uvMode": "direct",
            "uvTransform": {"scaleU": 1.0, "scaleV": 1.0, "offsetU": 0.0, "offsetV": 0.0, "rotationDeg": 0.0},
            "blendCurve": "smoothstep",
            "vendor": {"warp": true}
        }"#;
        let config: MappingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.extra["blendCurve"], "smoothstep");
        let out = config.to_value().unwrap();
        assert_eq!(out["blendCurve"], "smoothstep");
        assert_eq!(out["vendor"]["warp"], true);
    }
}

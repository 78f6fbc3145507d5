//! Property tests for the clamping and normalization primitives.

use proptest::prelude::*;

use stagecast_spec::{apply_mode_defaults, MappingConfig, MappingMode, PixelRect};

proptest! {
    /// Clamping any rect into any positive canvas satisfies the rect
    /// invariants: origin inside the canvas, extent at least 1, extent not
    /// past the canvas edge.
    #[test]
    fn clamp_invariants_hold(
        x in -100_000i32..100_000,
        y in -100_000i32..100_000,
        w in -100_000i32..100_000,
        h in -100_000i32..100_000,
        width in 1i32..20_000,
        height in 1i32..20_000,
    ) {
        let clamped = PixelRect { x, y, w, h }.clamped_to(width, height);
        prop_assert!(clamped.x >= 0);
        prop_assert!(clamped.x <= width - 1);
        prop_assert!(clamped.w >= 1);
        prop_assert!(clamped.x + clamped.w <= width);
        prop_assert!(clamped.y >= 0);
        prop_assert!(clamped.y <= height - 1);
        prop_assert!(clamped.h >= 1);
        prop_assert!(clamped.y + clamped.h <= height);
    }

    /// Clamping a rect that already satisfies the invariants is the
    /// identity.
    #[test]
    fn clamp_is_idempotent(
        x in -1_000i32..5_000,
        y in -1_000i32..5_000,
        w in -1_000i32..5_000,
        h in -1_000i32..5_000,
        width in 1i32..4_096,
        height in 1i32..4_096,
    ) {
        let once = PixelRect { x, y, w, h }.clamped_to(width, height);
        prop_assert_eq!(once.clamped_to(width, height), once);
    }

    /// Mode normalization is total: any string yields either a recognized
    /// mode or the provided default, and never panics.
    #[test]
    fn normalize_is_total(raw in "\\PC*") {
        let normalized = MappingMode::normalize(&raw, MappingMode::Spherical);
        let recognized = MappingMode::all().contains(&normalized);
        prop_assert!(recognized);

        // Unknown tokens fall back to whatever default is supplied.
        let a = MappingMode::normalize(&raw, MappingMode::Direct);
        let b = MappingMode::normalize(&raw, MappingMode::Fisheye);
        if a != b {
            prop_assert_eq!(a, MappingMode::Direct);
            prop_assert_eq!(b, MappingMode::Fisheye);
        }
    }

    /// Normalization is case-insensitive over the canonical tokens.
    #[test]
    fn normalize_canonical_case_insensitive(index in 0usize..13) {
        let mode = MappingMode::all()[index];
        let upper = mode.as_str().to_ascii_uppercase();
        prop_assert_eq!(MappingMode::normalize(&upper, MappingMode::Direct), mode);
    }

    /// Defaulting is idempotent for every mode, also when the config already
    /// carries arbitrary scalar values.
    #[test]
    fn apply_mode_defaults_idempotent(
        index in 0usize..13,
        fov in prop::option::of(0.0f64..180.0),
        opacity_like in prop::option::of(0.0f64..1.0),
    ) {
        let mode = MappingMode::all()[index];
        let mut config = MappingConfig::default();
        config.fov = fov;
        config.sphere_radius = opacity_like;

        apply_mode_defaults(mode, &mut config);
        let once = config.clone();
        apply_mode_defaults(mode, &mut config);
        prop_assert_eq!(config, once);
    }
}

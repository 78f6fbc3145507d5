//! Stagecast Canonical Mapping Library
//!
//! This crate provides the model types, mode normalization, config
//! defaulting, validation, and change-detection hashing for stagecast
//! content mappings. A mapping binds one render context (a camera or stored
//! asset producing a texture) to one or more mapping surfaces under a
//! projection or UV mode; Feed-mode mappings additionally carry a
//! source/destination/route graph for pixel-accurate sub-rect copies.
//!
//! # Example
//!
//! ```
//! use stagecast_spec::{apply_mode_defaults, live_state_hash, MappingMode, MappingState};
//! use stagecast_spec::validation::validate_mapping;
//!
//! let mut state = MappingState::default();
//! state.name = "Front wall".to_string();
//!
//! // Loose legacy tokens normalize to canonical modes.
//! let mode = MappingMode::normalize("surface-projection", MappingMode::Direct);
//! assert_eq!(mode, MappingMode::Perspective);
//!
//! // Defaulting fills the sections the mode needs, without overwriting.
//! state.kind = mode.kind_token().to_string();
//! apply_mode_defaults(mode, &mut state.config);
//! assert_eq!(state.config.fov, Some(60.0));
//!
//! let result = validate_mapping(&state);
//! assert!(result.is_ok());
//!
//! // The live hash only changes when the editable state changes.
//! let hash = live_state_hash(&state);
//! assert_eq!(hash, live_state_hash(&state));
//! ```
//!
//! # Modules
//!
//! - [`mode`]: canonical mapping modes and normalization
//! - [`state`]: mapping / render-context / surface records
//! - [`config`]: mode-dependent config sections and defaulting
//! - [`feed`]: the feed routing graph and pixel-rect clamping
//! - [`hash`]: live-state hashing for change detection
//! - [`validation`]: record and document validation
//! - [`document`]: the flat project document the CLI operates on
//! - [`error`]: error and warning types

pub mod config;
pub mod document;
pub mod error;
pub mod feed;
pub mod hash;
pub mod mode;
pub mod state;
pub mod validation;

// Re-export commonly used types at the crate root
pub use config::{
    apply_mode_defaults, CylindricalParams, FeedRect, MappingConfig, ProjectionMatrix,
    SurfaceFeedRect, UvTransform, Vec3,
};
pub use document::ProjectDocument;
pub use error::{
    ErrorCode, SpecError, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
pub use feed::{
    FeedDestination, FeedGraph, FeedRoute, FeedSource, PixelRect, FALLBACK_CANVAS_HEIGHT,
    FALLBACK_CANVAS_WIDTH,
};
pub use hash::{hash_config, hash_feed_graph, live_state_hash, FieldHasher};
pub use mode::MappingMode;
pub use state::{
    MappingState, MappingSurfaceState, RenderContextState, KIND_PROJECTION, KIND_UV,
    SOURCE_TYPE_ASSET_STORE, SOURCE_TYPE_CAMERA,
};
pub use validation::{
    is_session_graph_id, validate_document, validate_mapping, validate_render_context,
    validate_surface,
};

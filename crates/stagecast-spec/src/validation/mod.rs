//! Record and document validation.
//!
//! Errors flag state the session cannot save meaningfully; warnings flag
//! state the session will repair silently (dangling references, unbound
//! destinations) or tolerates (missing names). Reference repair itself lives
//! in the session crate; validation only reports.

pub mod common;

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::document::ProjectDocument;
use crate::error::{
    ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
use crate::mode::MappingMode;
use crate::state::{
    MappingState, MappingSurfaceState, RenderContextState, KIND_PROJECTION, KIND_UV,
    SOURCE_TYPE_ASSET_STORE, SOURCE_TYPE_CAMERA,
};

pub use common::{validate_resolution, validate_unit_interval, CommonValidationError};

/// Session-generated graph node ids are 8 lowercase hex chars.
const GRAPH_ID_PATTERN: &str = r"^[0-9a-f]{8}$";

static GRAPH_ID_REGEX: OnceLock<Regex> = OnceLock::new();

fn graph_id_regex() -> &'static Regex {
    GRAPH_ID_REGEX.get_or_init(|| Regex::new(GRAPH_ID_PATTERN).expect("invalid regex pattern"))
}

/// Checks whether an id matches the session-generated graph id format.
pub fn is_session_graph_id(id: &str) -> bool {
    graph_id_regex().is_match(id)
}

/// Validates a single mapping record.
pub fn validate_mapping(state: &MappingState) -> ValidationResult {
    let mut result = ValidationResult::new();
    let path = |field: &str| format!("mapping({}).{}", state.id, field);

    if state.kind != KIND_UV && state.kind != KIND_PROJECTION {
        // A bare mode token (or alias) still resolves; normalize falls back to
        // the default only when the token is unrecognized.
        let with_direct = MappingMode::normalize(&state.kind, MappingMode::Direct);
        let with_persp = MappingMode::normalize(&state.kind, MappingMode::Perspective);
        if with_direct != with_persp {
            result.add_error(ValidationError::with_path(
                ErrorCode::UnknownMappingKind,
                format!(
                    "type must be '{}', '{}', or a mode token, got '{}'",
                    KIND_UV, KIND_PROJECTION, state.kind
                ),
                path("type"),
            ));
        }
    }

    if let Err(err) = validate_unit_interval("opacity", state.opacity) {
        result.add_error(ValidationError::with_path(
            ErrorCode::OpacityOutOfRange,
            err.message,
            path("opacity"),
        ));
    }

    if state.name.is_empty() {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::EmptyName,
            "mapping has no name",
            path("name"),
        ));
    }

    if let Some(graph) = &state.config.feed_v2 {
        validate_feed_graph(state, graph, &mut result);
    }

    result
}

fn validate_feed_graph(
    state: &MappingState,
    graph: &crate::feed::FeedGraph,
    result: &mut ValidationResult,
) {
    let path = |field: String| format!("mapping({}).config.feedV2.{}", state.id, field);

    let mut seen: HashSet<&str> = HashSet::new();
    for id in graph.node_ids() {
        if !seen.insert(id) {
            result.add_error(ValidationError::with_path(
                ErrorCode::DuplicateGraphNodeId,
                format!("duplicate graph node id '{}'", id),
                path(format!("id({})", id)),
            ));
        }
        if !id.is_empty() && !is_session_graph_id(id) {
            result.add_warning(ValidationWarning::with_path(
                WarningCode::MalformedGraphNodeId,
                format!("graph node id '{}' is not an 8-char hex session id", id),
                path(format!("id({})", id)),
            ));
        }
    }

    for (i, route) in graph.routes.iter().enumerate() {
        if graph.source(&route.source_id).is_none() {
            result.add_warning(ValidationWarning::with_path(
                WarningCode::DanglingRouteReference,
                format!(
                    "route '{}' references unknown source '{}'",
                    route.id, route.source_id
                ),
                path(format!("routes[{}].sourceId", i)),
            ));
        }
        if graph.destination(&route.destination_id).is_none() {
            result.add_warning(ValidationWarning::with_path(
                WarningCode::DanglingRouteReference,
                format!(
                    "route '{}' references unknown destination '{}'",
                    route.id, route.destination_id
                ),
                path(format!("routes[{}].destinationId", i)),
            ));
        }
        for (rect, name) in [
            (&route.source_rect, "sourceRect"),
            (&route.destination_rect, "destinationRect"),
        ] {
            if rect.w < 1 || rect.h < 1 {
                result.add_error(ValidationError::with_path(
                    ErrorCode::DegenerateRouteRect,
                    format!("{} must be at least 1x1, got {}x{}", name, rect.w, rect.h),
                    path(format!("routes[{}].{}", i, name)),
                ));
            }
        }
    }
}

/// Validates a single render context record.
pub fn validate_render_context(state: &RenderContextState) -> ValidationResult {
    let mut result = ValidationResult::new();
    let path = |field: &str| format!("context({}).{}", state.id, field);

    match state.source_type.as_str() {
        SOURCE_TYPE_CAMERA => {
            if state.camera_id.is_empty() {
                result.add_warning(ValidationWarning::with_path(
                    WarningCode::MissingSourceIdentity,
                    "camera context has no camera id",
                    path("cameraId"),
                ));
            }
        }
        SOURCE_TYPE_ASSET_STORE => {
            if state.asset_id.is_empty() {
                result.add_warning(ValidationWarning::with_path(
                    WarningCode::MissingSourceIdentity,
                    "asset-store context has no asset id",
                    path("assetId"),
                ));
            }
        }
        other => {
            result.add_error(ValidationError::with_path(
                ErrorCode::UnknownSourceType,
                format!(
                    "sourceType must be '{}' or '{}', got '{}'",
                    SOURCE_TYPE_CAMERA, SOURCE_TYPE_ASSET_STORE, other
                ),
                path("sourceType"),
            ));
        }
    }

    // Width/height of 0 means "not resolved yet" and is fine; anything else
    // must be a real resolution.
    if state.width != 0 || state.height != 0 {
        if let Err(err) = validate_resolution(state.width, state.height) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidResolution,
                err.message,
                path("width"),
            ));
        }
    }

    if state.name.is_empty() {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::EmptyName,
            "render context has no name",
            path("name"),
        ));
    }

    result
}

/// Validates a single mapping surface record.
pub fn validate_surface(state: &MappingSurfaceState) -> ValidationResult {
    let mut result = ValidationResult::new();
    let path = |field: &str| format!("surface({}).{}", state.id, field);

    if state.uv_channel < 0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::NegativeUvChannel,
            format!("uvChannel must be non-negative, got {}", state.uv_channel),
            path("uvChannel"),
        ));
    }

    if state.target_id.is_empty() && state.actor_path.is_empty() {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::EmptySurfaceTarget,
            "surface has neither a target id nor an actor path",
            path("targetId"),
        ));
    }

    if state.name.is_empty() {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::EmptyName,
            "surface has no name",
            path("name"),
        ));
    }

    result
}

/// Validates a full project document, including cross-references.
pub fn validate_document(doc: &ProjectDocument) -> ValidationResult {
    let mut result = ValidationResult::new();

    let mut ids: HashSet<&str> = HashSet::new();
    let all_ids = doc
        .contexts
        .iter()
        .map(|c| c.id.as_str())
        .chain(doc.surfaces.iter().map(|s| s.id.as_str()))
        .chain(doc.mappings.iter().map(|m| m.id.as_str()));
    for id in all_ids {
        if !id.is_empty() && !ids.insert(id) {
            result.add_error(ValidationError::new(
                ErrorCode::DuplicateRecordId,
                format!("duplicate record id '{}'", id),
            ));
        }
    }

    for context in &doc.contexts {
        result.merge(validate_render_context(context));
    }
    for surface in &doc.surfaces {
        result.merge(validate_surface(surface));
    }

    let context_ids: HashSet<&str> = doc.contexts.iter().map(|c| c.id.as_str()).collect();
    let surface_ids: HashSet<&str> = doc.surfaces.iter().map(|s| s.id.as_str()).collect();

    for mapping in &doc.mappings {
        result.merge(validate_mapping(mapping));

        if !mapping.context_id.is_empty() && !context_ids.contains(mapping.context_id.as_str()) {
            result.add_warning(ValidationWarning::with_path(
                WarningCode::UnresolvedContextReference,
                format!("mapping references unknown context '{}'", mapping.context_id),
                format!("mapping({}).contextId", mapping.id),
            ));
        }
        for surface_id in &mapping.surface_ids {
            if !surface_ids.contains(surface_id.as_str()) {
                result.add_warning(ValidationWarning::with_path(
                    WarningCode::UnresolvedSurfaceReference,
                    format!("mapping references unknown surface '{}'", surface_id),
                    format!("mapping({}).surfaceIds", mapping.id),
                ));
            }
        }
        if let Some(graph) = &mapping.config.feed_v2 {
            for destination in &graph.destinations {
                if !destination.surface_id.is_empty()
                    && !surface_ids.contains(destination.surface_id.as_str())
                {
                    result.add_warning(ValidationWarning::with_path(
                        WarningCode::UnresolvedSurfaceReference,
                        format!(
                            "destination '{}' is bound to unknown surface '{}'",
                            destination.id, destination.surface_id
                        ),
                        format!("mapping({}).config.feedV2.destinations", mapping.id),
                    ));
                }
            }
        }
    }

    result
}

//! Live-state hashing for change detection.
//!
//! The editing session hashes the full editable state of a mapping and
//! compares against the hash of the last successful apply; only a changed
//! hash triggers a backend write. Hashing is order-sensitive: sources,
//! destinations, and routes are fed in list-storage order (list order is part
//! of the persisted state), while the legacy per-surface feed-rect overrides
//! are fed sorted by surface id.

use crate::config::MappingConfig;
use crate::feed::{FeedGraph, PixelRect};
use crate::state::MappingState;

/// Streaming field hasher over BLAKE3.
///
/// Each primitive is fed with a type tag and, for strings, a length prefix,
/// so adjacent fields cannot alias each other.
pub struct FieldHasher {
    inner: blake3::Hasher,
}

impl FieldHasher {
    pub fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }

    pub fn push_str(&mut self, value: &str) {
        self.inner.update(&[b's']);
        self.inner.update(&(value.len() as u32).to_le_bytes());
        self.inner.update(value.as_bytes());
    }

    pub fn push_i32(&mut self, value: i32) {
        self.inner.update(&[b'i']);
        self.inner.update(&value.to_le_bytes());
    }

    pub fn push_f64(&mut self, value: f64) {
        self.inner.update(&[b'f']);
        self.inner.update(&value.to_bits().to_le_bytes());
    }

    pub fn push_bool(&mut self, value: bool) {
        self.inner.update(&[b'b', value as u8]);
    }

    /// Feeds an optional value as a presence flag plus, when present, the
    /// value itself.
    pub fn push_opt_str(&mut self, value: Option<&str>) {
        self.push_bool(value.is_some());
        if let Some(v) = value {
            self.push_str(v);
        }
    }

    /// See [`FieldHasher::push_opt_str`].
    pub fn push_opt_f64(&mut self, value: Option<f64>) {
        self.push_bool(value.is_some());
        if let Some(v) = value {
            self.push_f64(v);
        }
    }

    pub fn push_rect(&mut self, rect: &PixelRect) {
        self.push_i32(rect.x);
        self.push_i32(rect.y);
        self.push_i32(rect.w);
        self.push_i32(rect.h);
    }

    /// Finalizes into a 64-character lowercase hex digest.
    pub fn finish(self) -> String {
        self.inner.finalize().to_hex().to_string()
    }
}

impl Default for FieldHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Feeds every scalar/string field of every config section, in declaration
/// order, preceded by presence flags.
pub fn hash_config(hasher: &mut FieldHasher, config: &MappingConfig) {
    hasher.push_opt_str(config.uv_mode.as_deref());
    hasher.push_opt_str(config.projection_type.as_deref());

    hasher.push_bool(config.uv_transform.is_some());
    if let Some(uv) = &config.uv_transform {
        hasher.push_f64(uv.scale_u);
        hasher.push_f64(uv.scale_v);
        hasher.push_f64(uv.offset_u);
        hasher.push_f64(uv.offset_v);
        hasher.push_f64(uv.rotation_deg);
    }

    hasher.push_bool(config.feed_rect.is_some());
    if let Some(rect) = &config.feed_rect {
        hasher.push_f64(rect.u);
        hasher.push_f64(rect.v);
        hasher.push_f64(rect.width);
        hasher.push_f64(rect.height);
    }

    // Override rects are a map keyed by surface id; hash them sorted so the
    // incidental array order of the wire form does not matter.
    hasher.push_bool(config.feed_rects.is_some());
    if let Some(rects) = &config.feed_rects {
        let mut sorted: Vec<_> = rects.iter().collect();
        sorted.sort_by(|a, b| a.surface_id.cmp(&b.surface_id));
        for entry in sorted {
            hasher.push_str(&entry.surface_id);
            hasher.push_f64(entry.rect.u);
            hasher.push_f64(entry.rect.v);
            hasher.push_f64(entry.rect.width);
            hasher.push_f64(entry.rect.height);
        }
    }

    hasher.push_bool(config.feed_v2.is_some());
    if let Some(graph) = &config.feed_v2 {
        hash_feed_graph(hasher, graph);
    }

    for vec in [&config.projector_position, &config.projector_rotation] {
        hasher.push_bool(vec.is_some());
        if let Some(v) = vec {
            hasher.push_f64(v.x);
            hasher.push_f64(v.y);
            hasher.push_f64(v.z);
        }
    }
    hasher.push_opt_f64(config.fov);
    hasher.push_opt_f64(config.aspect_ratio);
    hasher.push_opt_f64(config.near);
    hasher.push_opt_f64(config.far);

    hasher.push_bool(config.cylindrical.is_some());
    if let Some(cyl) = &config.cylindrical {
        hasher.push_str(&cyl.axis);
        hasher.push_f64(cyl.radius);
        hasher.push_f64(cyl.height);
        hasher.push_f64(cyl.start_angle);
        hasher.push_f64(cyl.end_angle);
    }

    hasher.push_opt_f64(config.sphere_radius);
    hasher.push_opt_f64(config.horizontal_arc);
    hasher.push_opt_f64(config.vertical_arc);
    hasher.push_opt_f64(config.size_w);
    hasher.push_opt_f64(config.size_h);

    hasher.push_bool(config.eyepoint.is_some());
    if let Some(ep) = &config.eyepoint {
        hasher.push_f64(ep.x);
        hasher.push_f64(ep.y);
        hasher.push_f64(ep.z);
    }

    hasher.push_opt_f64(config.fisheye_fov);
    hasher.push_opt_str(config.lens_type.as_deref());

    hasher.push_bool(config.custom_projection_matrix.is_some());
    if let Some(matrix) = &config.custom_projection_matrix {
        for entry in matrix.entries() {
            hasher.push_f64(entry);
        }
    }
}

/// Feeds sources, destinations, and routes in list-storage order.
pub fn hash_feed_graph(hasher: &mut FieldHasher, graph: &FeedGraph) {
    hasher.push_str(&graph.coordinate_space);
    hasher.push_i32(graph.sources.len() as i32);
    for source in &graph.sources {
        hasher.push_str(&source.id);
        hasher.push_opt_str(source.label.as_deref());
        hasher.push_str(&source.context_id);
        hasher.push_i32(source.width);
        hasher.push_i32(source.height);
    }
    hasher.push_i32(graph.destinations.len() as i32);
    for destination in &graph.destinations {
        hasher.push_str(&destination.id);
        hasher.push_opt_str(destination.label.as_deref());
        hasher.push_str(&destination.surface_id);
        hasher.push_i32(destination.width);
        hasher.push_i32(destination.height);
    }
    hasher.push_i32(graph.routes.len() as i32);
    for route in &graph.routes {
        hasher.push_str(&route.id);
        hasher.push_opt_str(route.label.as_deref());
        hasher.push_str(&route.source_id);
        hasher.push_str(&route.destination_id);
        hasher.push_bool(route.enabled);
        hasher.push_f64(route.opacity);
        hasher.push_rect(&route.source_rect);
        hasher.push_rect(&route.destination_rect);
    }
}

/// Computes the live hash of a full mapping record: the record scalars, the
/// ordered surface list, and the config sections.
pub fn live_state_hash(state: &MappingState) -> String {
    let mut hasher = FieldHasher::new();
    hasher.push_str(&state.id);
    hasher.push_str(&state.name);
    hasher.push_str(&state.project_id);
    hasher.push_str(&state.kind);
    hasher.push_str(&state.context_id);
    hasher.push_i32(state.surface_ids.len() as i32);
    for surface_id in &state.surface_ids {
        hasher.push_str(surface_id);
    }
    hasher.push_f64(state.opacity);
    hasher.push_bool(state.enabled);
    hash_config(&mut hasher, &state.config);
    hasher.finish()
}

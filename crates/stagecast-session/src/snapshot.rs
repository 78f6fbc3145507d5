//! Catalog snapshot hashing with rebuild debounce.
//!
//! The UI layer rebuilds its record lists only when the backend snapshot
//! actually changed, and only after the same changed hash has been seen on
//! two consecutive polls. The debounce avoids rebuilding from a half-applied
//! state observed between two writes of one logical edit.

use stagecast_spec::{FieldHasher, MappingState, MappingSurfaceState, RenderContextState};

/// Order-insensitive hash over the three record lists.
///
/// Records are hashed sorted by id (and material slots sorted) so that
/// backend storage order does not leak into the snapshot. Transient fields
/// (resolved textures, last errors) stay out of the hash; they change without
/// the lists needing a rebuild.
pub fn snapshot_hash(
    contexts: &[RenderContextState],
    surfaces: &[MappingSurfaceState],
    mappings: &[MappingState],
) -> String {
    let mut hasher = FieldHasher::new();

    let mut sorted: Vec<&RenderContextState> = contexts.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));
    for context in sorted {
        hasher.push_str(&context.id);
        hasher.push_str(&context.name);
        hasher.push_str(&context.project_id);
        hasher.push_str(&context.source_type);
        hasher.push_str(&context.camera_id);
        hasher.push_str(&context.asset_id);
        hasher.push_str(&context.capture_mode);
        hasher.push_i32(context.width);
        hasher.push_i32(context.height);
        hasher.push_bool(context.enabled);
    }

    let mut sorted: Vec<&MappingSurfaceState> = surfaces.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));
    for surface in sorted {
        hasher.push_str(&surface.id);
        hasher.push_str(&surface.name);
        hasher.push_str(&surface.project_id);
        hasher.push_str(&surface.target_id);
        hasher.push_str(&surface.mesh_component_name);
        hasher.push_i32(surface.uv_channel);
        hasher.push_bool(surface.enabled);
        let mut slots = surface.material_slots.clone();
        slots.sort_unstable();
        for slot in slots {
            hasher.push_i32(slot);
        }
    }

    let mut sorted: Vec<&MappingState> = mappings.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));
    for mapping in sorted {
        hasher.push_str(&mapping.id);
        hasher.push_str(&mapping.name);
        hasher.push_str(&mapping.project_id);
        hasher.push_str(&mapping.kind);
        hasher.push_str(&mapping.context_id);
        hasher.push_bool(mapping.enabled);
        hasher.push_f64(mapping.opacity);
        hasher.push_opt_str(mapping.config.projection_type.as_deref());
        hasher.push_opt_str(mapping.config.uv_mode.as_deref());
        if let Some(rect) = &mapping.config.feed_rect {
            hasher.push_f64(rect.u);
            hasher.push_f64(rect.v);
            hasher.push_f64(rect.width);
            hasher.push_f64(rect.height);
        }
        let mut surface_ids = mapping.surface_ids.clone();
        surface_ids.sort();
        for surface_id in surface_ids {
            hasher.push_str(&surface_id);
        }
    }

    hasher.finish()
}

/// Decides when the UI should rebuild its lists from a fresh snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotTracker {
    last: Option<String>,
    pending: Option<String>,
}

impl SnapshotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the current snapshot hash; returns true when the lists should
    /// be rebuilt now.
    ///
    /// The first observation always rebuilds. A changed hash is held back
    /// until it is seen twice in a row; reverting to the last accepted hash
    /// cancels the pending change.
    pub fn observe(&mut self, hash: String) -> bool {
        match &self.last {
            None => {
                self.last = Some(hash);
                self.pending = None;
                true
            }
            Some(last) if *last == hash => {
                self.pending = None;
                false
            }
            _ => {
                if self.pending.as_deref() == Some(hash.as_str()) {
                    self.last = Some(hash);
                    self.pending = None;
                    true
                } else {
                    self.pending = Some(hash);
                    false
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observation_rebuilds() {
        let mut tracker = SnapshotTracker::new();
        assert!(tracker.observe("a".to_string()));
        assert!(!tracker.observe("a".to_string()));
    }

    #[test]
    fn test_change_rebuilds_on_second_sighting() {
        let mut tracker = SnapshotTracker::new();
        tracker.observe("a".to_string());
        assert!(!tracker.observe("b".to_string()));
        assert!(tracker.observe("b".to_string()));
        assert!(!tracker.observe("b".to_string()));
    }

    #[test]
    fn test_revert_cancels_pending_change() {
        let mut tracker = SnapshotTracker::new();
        tracker.observe("a".to_string());
        assert!(!tracker.observe("b".to_string()));
        assert!(!tracker.observe("a".to_string()));
        // The earlier "b" sighting no longer counts.
        assert!(!tracker.observe("b".to_string()));
        assert!(tracker.observe("b".to_string()));
    }

    #[test]
    fn test_snapshot_hash_order_insensitive() {
        let mut a = MappingSurfaceState::default();
        a.id = "s-1".to_string();
        a.material_slots = vec![2, 0];
        let mut b = MappingSurfaceState::default();
        b.id = "s-2".to_string();

        let forward = snapshot_hash(&[], &[a.clone(), b.clone()], &[]);
        let reverse = snapshot_hash(&[], &[b, a], &[]);
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_snapshot_hash_ignores_transients() {
        let mut ctx = RenderContextState::default();
        ctx.id = "ctx-1".to_string();
        let base = snapshot_hash(&[ctx.clone()], &[], &[]);

        ctx.resolved_texture = Some("tex".to_string());
        ctx.last_error = "boom".to_string();
        assert_eq!(snapshot_hash(&[ctx.clone()], &[], &[]), base);

        ctx.width = 1280;
        assert_ne!(snapshot_hash(&[ctx], &[], &[]), base);
    }
}

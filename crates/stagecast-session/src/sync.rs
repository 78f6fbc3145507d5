//! The live-form sync engine: tick-driven hash-compare apply.
//!
//! The engine polls the form on a fixed interval, hashes it, and writes it
//! through the backend only when the hash moved since the last successful
//! apply. A rejected write keeps the old hash, so the form stays dirty and
//! the next poll retries (at-least-once, not at-most-once). The schedule is
//! host-driven: call [`SyncEngine::tick`] per frame, or [`SyncEngine::commit`]
//! directly in a non-polling host.

use tracing::{debug, info, warn};

use stagecast_spec::{MappingMode, MappingState};

use crate::backend::MappingBackend;
use crate::form::MappingForm;
use crate::quick::QuickCreateDefaults;

/// Default poll interval in seconds.
pub const DEFAULT_POLL_INTERVAL: f64 = 0.5;

/// Where the edit session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No mapping selected.
    Idle,
    /// A form is populated and clean (or dirty, awaiting the next poll).
    FormPopulated,
    /// An apply is in flight. With a synchronous backend this only lasts for
    /// the duration of the call, but the phase still distinguishes "about to
    /// write" from "settled".
    PendingApply,
}

/// Outcome of one apply attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Hash unchanged; nothing written.
    Unchanged,
    /// A new backend record was created with this id.
    Created(String),
    /// The existing record was updated.
    Updated,
    /// The backend refused the write; the form stays dirty and the next poll
    /// retries.
    Rejected,
}

/// One mapping editing session over a backend.
pub struct SyncEngine<B: MappingBackend> {
    backend: B,
    form: Option<MappingForm>,
    phase: SessionPhase,
    last_applied_hash: Option<String>,
    status: String,
    poll_interval: f64,
    accumulated: f64,
    quick_defaults: QuickCreateDefaults,
}

impl<B: MappingBackend> SyncEngine<B> {
    pub fn new(backend: B) -> Self {
        Self::with_quick_defaults(backend, QuickCreateDefaults::default())
    }

    /// Starts a session with the quick-create defaults remembered from a
    /// previous one.
    pub fn with_quick_defaults(backend: B, quick_defaults: QuickCreateDefaults) -> Self {
        Self {
            backend,
            form: None,
            phase: SessionPhase::Idle,
            last_applied_hash: None,
            status: String::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            accumulated: 0.0,
            quick_defaults,
        }
    }

    pub fn set_poll_interval(&mut self, seconds: f64) {
        self.poll_interval = seconds.max(0.0);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The latest user-visible status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn form(&self) -> Option<&MappingForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut MappingForm> {
        self.form.as_mut()
    }

    pub fn quick_defaults(&self) -> &QuickCreateDefaults {
        &self.quick_defaults
    }

    pub fn quick_defaults_mut(&mut self) -> &mut QuickCreateDefaults {
        &mut self.quick_defaults
    }

    /// Populates the form from an existing backend record. Returns false if
    /// the id is unknown.
    pub fn select(&mut self, mapping_id: &str) -> bool {
        let Some(state) = self
            .backend
            .mappings()
            .into_iter()
            .find(|m| m.id == mapping_id)
        else {
            return false;
        };
        let form = MappingForm::from_state(&state);
        // Snapshot the populated hash so an untouched form does not write.
        self.last_applied_hash = Some(form.live_hash());
        self.form = Some(form);
        self.phase = SessionPhase::FormPopulated;
        self.status.clear();
        debug!(mapping = %mapping_id, "form populated");
        true
    }

    /// Starts editing a fresh, not-yet-created mapping.
    pub fn start_new(&mut self, mode: MappingMode) {
        let form = MappingForm::new(mode);
        // No record exists yet, so any content counts as dirty; still seed
        // the hash so an untouched empty form does not create on first poll.
        self.last_applied_hash = Some(form.live_hash());
        self.form = Some(form);
        self.phase = SessionPhase::FormPopulated;
        self.status.clear();
    }

    /// Drops the current form without writing.
    pub fn deselect(&mut self) {
        self.form = None;
        self.phase = SessionPhase::Idle;
        self.last_applied_hash = None;
        self.status.clear();
    }

    /// Per-frame driver: runs one apply attempt each time the poll interval
    /// elapses. Returns the outcome when an attempt ran.
    pub fn tick(&mut self, delta_seconds: f64) -> Option<Applied> {
        self.accumulated += delta_seconds.max(0.0);
        if self.accumulated < self.poll_interval {
            return None;
        }
        self.accumulated = 0.0;
        Some(self.commit())
    }

    /// One apply attempt: reconcile the feed graph, hash the form, and write
    /// it through when the hash moved.
    pub fn commit(&mut self) -> Applied {
        if self.form.is_none() {
            return Applied::Unchanged;
        }

        self.reconcile_feed_graph();

        let form = self.form.as_ref().expect("form checked above");
        let hash = form.live_hash();
        if self.last_applied_hash.as_deref() == Some(hash.as_str()) {
            return Applied::Unchanged;
        }

        self.phase = SessionPhase::PendingApply;
        let state = form.to_state();
        let outcome = if state.id.is_empty() {
            self.apply_create(state)
        } else {
            self.apply_update(state, hash)
        };
        self.phase = SessionPhase::FormPopulated;
        outcome
    }

    /// Deletes the selected mapping's backend record and drops the form.
    pub fn delete_selected(&mut self) -> bool {
        let Some(form) = &self.form else {
            return false;
        };
        if form.id.is_empty() {
            // Never created; nothing to delete remotely.
            self.deselect();
            return true;
        }
        let id = form.id.clone();
        if self.backend.delete_mapping(&id) {
            info!(mapping = %id, "mapping deleted");
            self.deselect();
            true
        } else {
            self.status = format!("Mapping '{}' could not be deleted.", id);
            warn!(mapping = %id, "delete rejected by backend");
            false
        }
    }

    fn reconcile_feed_graph(&mut self) {
        let form = self.form.as_mut().expect("caller checked form");
        if form.mode() != MappingMode::Feed {
            return;
        }
        let contexts = self.backend.render_contexts();
        let surfaces = self.backend.mapping_surfaces();

        // Only surfaces that exist in the backend are bind targets.
        let valid: Vec<String> = form
            .surface_ids
            .iter()
            .filter(|id| surfaces.iter().any(|s| &s.id == *id))
            .cloned()
            .collect();

        form.graph.ensure_sources_bound(&contexts);
        form.graph.ensure_destinations_bound(&valid);
        form.graph.ensure_routes_for_destinations(&form.surface_ids);
        form.graph.clamp_all();
    }

    fn apply_create(&mut self, state: MappingState) -> Applied {
        match self.backend.create_mapping(&state) {
            Some(id) => {
                let form = self.form.as_mut().expect("caller checked form");
                form.id = id.clone();
                // The id participates in the hash; recompute now that the
                // backend assigned one.
                self.last_applied_hash = Some(form.live_hash());
                self.status = format!("Mapping '{}' created.", state.name);
                info!(mapping = %id, "mapping created");
                Applied::Created(id)
            }
            None => {
                self.status = "Mapping not created; will retry.".to_string();
                warn!(mapping = %state.name, "create rejected by backend");
                Applied::Rejected
            }
        }
    }

    fn apply_update(&mut self, state: MappingState, hash: String) -> Applied {
        if self.backend.update_mapping(&state) {
            self.last_applied_hash = Some(hash);
            self.status = format!("Mapping '{}' applied.", state.name);
            info!(mapping = %state.id, "mapping updated");
            Applied::Updated
        } else {
            // Keep the stale hash: the form remains dirty relative to the
            // last successful apply, so the next poll retries.
            let detail = self.backend_error_for(&state.id);
            self.status = match detail {
                Some(err) => format!("Mapping saved but rejected by backend: {}", err),
                None => "Mapping update rejected; will retry.".to_string(),
            };
            warn!(mapping = %state.id, "update rejected by backend");
            Applied::Rejected
        }
    }

    fn backend_error_for(&self, mapping_id: &str) -> Option<String> {
        if mapping_id.is_empty() {
            return None;
        }
        self.backend
            .mappings()
            .into_iter()
            .find(|m| m.id == mapping_id)
            .filter(|m| !m.last_error.is_empty())
            .map(|m| m.last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use pretty_assertions::assert_eq;
    use stagecast_spec::{MappingSurfaceState, RenderContextState};

    fn engine_with_catalog() -> SyncEngine<InMemoryBackend> {
        let mut backend = InMemoryBackend::new();
        let mut ctx = RenderContextState::default();
        ctx.name = "Cam".to_string();
        ctx.width = 1920;
        ctx.height = 1080;
        ctx.resolved_texture = Some("tex".to_string());
        backend.create_render_context(&ctx).unwrap();
        SyncEngine::new(backend)
    }

    fn add_surface(engine: &mut SyncEngine<InMemoryBackend>, name: &str) -> String {
        let mut surface = MappingSurfaceState::default();
        surface.name = name.to_string();
        surface.target_id = format!("stage:{}", name);
        engine.backend_mut().create_mapping_surface(&surface).unwrap()
    }

    #[test]
    fn test_commit_idle_is_noop() {
        let mut engine = SyncEngine::new(InMemoryBackend::new());
        assert_eq!(engine.commit(), Applied::Unchanged);
        assert_eq!(engine.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_create_then_unchanged() {
        let mut engine = engine_with_catalog();
        engine.start_new(MappingMode::Direct);
        engine.form_mut().unwrap().name = "Front".to_string();

        let outcome = engine.commit();
        let id = match outcome {
            Applied::Created(id) => id,
            other => panic!("expected create, got {:?}", other),
        };
        assert_eq!(engine.backend().mappings().len(), 1);
        assert_eq!(engine.form().unwrap().id, id);

        // Second commit with an untouched form is a no-op.
        assert_eq!(engine.commit(), Applied::Unchanged);
    }

    #[test]
    fn test_edit_triggers_update() {
        let mut engine = engine_with_catalog();
        engine.start_new(MappingMode::Direct);
        engine.form_mut().unwrap().name = "Front".to_string();
        engine.commit();

        engine.form_mut().unwrap().opacity = 0.5;
        assert_eq!(engine.commit(), Applied::Updated);
        assert_eq!(engine.backend().mappings()[0].opacity, 0.5);
        assert_eq!(engine.commit(), Applied::Unchanged);
    }

    #[test]
    fn test_rejected_update_retries_next_poll() {
        let mut engine = engine_with_catalog();
        engine.start_new(MappingMode::Direct);
        engine.form_mut().unwrap().name = "Front".to_string();
        engine.commit();

        engine.form_mut().unwrap().opacity = 0.25;
        engine.backend_mut().inject_failures(1);
        assert_eq!(engine.commit(), Applied::Rejected);
        assert!(!engine.status().is_empty());
        // Backend still has the old value.
        assert_eq!(engine.backend().mappings()[0].opacity, 1.0);

        // Next attempt succeeds without any further edit.
        assert_eq!(engine.commit(), Applied::Updated);
        assert_eq!(engine.backend().mappings()[0].opacity, 0.25);
        assert_eq!(engine.commit(), Applied::Unchanged);
    }

    #[test]
    fn test_tick_respects_poll_interval() {
        let mut engine = engine_with_catalog();
        engine.start_new(MappingMode::Direct);
        engine.form_mut().unwrap().name = "Front".to_string();
        engine.set_poll_interval(0.5);

        assert_eq!(engine.tick(0.2), None);
        assert_eq!(engine.tick(0.2), None);
        let outcome = engine.tick(0.2).expect("interval elapsed");
        assert!(matches!(outcome, Applied::Created(_)));
    }

    #[test]
    fn test_select_populates_clean_form() {
        let mut engine = engine_with_catalog();
        engine.start_new(MappingMode::Direct);
        engine.form_mut().unwrap().name = "Front".to_string();
        let id = match engine.commit() {
            Applied::Created(id) => id,
            other => panic!("expected create, got {:?}", other),
        };
        engine.deselect();
        assert_eq!(engine.phase(), SessionPhase::Idle);

        assert!(engine.select(&id));
        assert_eq!(engine.phase(), SessionPhase::FormPopulated);
        // Populated form is clean: no write on the next poll.
        assert_eq!(engine.commit(), Applied::Unchanged);

        assert!(!engine.select("no-such-id"));
    }

    #[test]
    fn test_feed_commit_reconciles_graph() {
        let mut engine = engine_with_catalog();
        let surface_id = add_surface(&mut engine, "left");

        engine.start_new(MappingMode::Feed);
        {
            let form = engine.form_mut().unwrap();
            form.name = "Wall".to_string();
            form.surface_ids = vec![surface_id.clone()];
        }
        let outcome = engine.commit();
        assert!(matches!(outcome, Applied::Created(_)));

        let stored = &engine.backend().mappings()[0];
        let graph = stored.config.feed_v2.as_ref().unwrap();
        assert_eq!(graph.sources.len(), 1);
        assert_eq!(graph.destinations.len(), 1);
        assert_eq!(graph.destinations[0].surface_id, surface_id);
        assert_eq!(graph.routes.len(), 1);
        assert_eq!(graph.routes[0].source_rect.w, 1920);
        assert_eq!(graph.routes[0].source_rect.h, 1080);
    }

    #[test]
    fn test_delete_selected() {
        let mut engine = engine_with_catalog();
        engine.start_new(MappingMode::Direct);
        engine.form_mut().unwrap().name = "Front".to_string();
        engine.commit();

        assert!(engine.delete_selected());
        assert!(engine.backend().mappings().is_empty());
        assert_eq!(engine.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_start_new_does_not_create_untouched_form() {
        let mut engine = engine_with_catalog();
        engine.start_new(MappingMode::Direct);
        assert_eq!(engine.commit(), Applied::Unchanged);
        assert!(engine.backend().mappings().is_empty());
    }
}

//! The storage boundary the editing session writes through.

use stagecast_spec::{MappingState, MappingSurfaceState, ProjectDocument, RenderContextState};

use crate::ids::new_record_id;

/// Synchronous, in-process storage for the three record kinds.
///
/// Create calls return the backend-assigned id, or `None` when the backend
/// rejects the record; update/delete calls report success. The session never
/// assumes a write landed: a rejected apply keeps the local state dirty so
/// the next poll retries.
pub trait MappingBackend {
    fn create_render_context(&mut self, state: &RenderContextState) -> Option<String>;
    fn update_render_context(&mut self, state: &RenderContextState) -> bool;
    fn delete_render_context(&mut self, id: &str) -> bool;
    fn render_contexts(&self) -> Vec<RenderContextState>;

    fn create_mapping_surface(&mut self, state: &MappingSurfaceState) -> Option<String>;
    fn update_mapping_surface(&mut self, state: &MappingSurfaceState) -> bool;
    fn delete_mapping_surface(&mut self, id: &str) -> bool;
    fn mapping_surfaces(&self) -> Vec<MappingSurfaceState>;

    fn create_mapping(&mut self, state: &MappingState) -> Option<String>;
    fn update_mapping(&mut self, state: &MappingState) -> bool;
    fn delete_mapping(&mut self, id: &str) -> bool;
    fn mappings(&self) -> Vec<MappingState>;
}

/// In-memory backend with insertion-ordered storage.
///
/// `inject_failures` makes the next N mutating calls fail, for exercising
/// the session's retry path.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    contexts: Vec<RenderContextState>,
    surfaces: Vec<MappingSurfaceState>,
    mappings: Vec<MappingState>,
    skip_next: u32,
    fail_next: u32,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the backend from a project document. Records keep their ids;
    /// records without one are assigned.
    pub fn from_document(doc: ProjectDocument) -> Self {
        let mut backend = Self::new();
        for mut context in doc.contexts {
            if context.id.is_empty() {
                context.id = new_record_id();
            }
            backend.contexts.push(context);
        }
        for mut surface in doc.surfaces {
            if surface.id.is_empty() {
                surface.id = new_record_id();
            }
            backend.surfaces.push(surface);
        }
        for mut mapping in doc.mappings {
            if mapping.id.is_empty() {
                mapping.id = new_record_id();
            }
            backend.mappings.push(mapping);
        }
        backend
    }

    /// Snapshots the stores back into a document.
    pub fn to_document(&self) -> ProjectDocument {
        ProjectDocument {
            contexts: self.contexts.clone(),
            surfaces: self.surfaces.clone(),
            mappings: self.mappings.clone(),
        }
    }

    /// Makes the next `count` mutating calls fail.
    pub fn inject_failures(&mut self, count: u32) {
        self.inject_failures_after(0, count);
    }

    /// Lets the next `skip` mutating calls through, then fails `count`.
    pub fn inject_failures_after(&mut self, skip: u32, count: u32) {
        self.skip_next = skip;
        self.fail_next = count;
    }

    fn consume_failure(&mut self) -> bool {
        if self.skip_next > 0 {
            self.skip_next -= 1;
            return false;
        }
        if self.fail_next > 0 {
            self.fail_next -= 1;
            true
        } else {
            false
        }
    }
}

impl MappingBackend for InMemoryBackend {
    fn create_render_context(&mut self, state: &RenderContextState) -> Option<String> {
        if self.consume_failure() {
            return None;
        }
        let mut record = state.clone();
        record.id = new_record_id();
        let id = record.id.clone();
        self.contexts.push(record);
        Some(id)
    }

    fn update_render_context(&mut self, state: &RenderContextState) -> bool {
        if self.consume_failure() {
            return false;
        }
        match self.contexts.iter_mut().find(|c| c.id == state.id) {
            Some(slot) => {
                *slot = state.clone();
                true
            }
            None => false,
        }
    }

    fn delete_render_context(&mut self, id: &str) -> bool {
        if self.consume_failure() {
            return false;
        }
        let before = self.contexts.len();
        self.contexts.retain(|c| c.id != id);
        self.contexts.len() != before
    }

    fn render_contexts(&self) -> Vec<RenderContextState> {
        self.contexts.clone()
    }

    fn create_mapping_surface(&mut self, state: &MappingSurfaceState) -> Option<String> {
        if self.consume_failure() {
            return None;
        }
        let mut record = state.clone();
        record.id = new_record_id();
        let id = record.id.clone();
        self.surfaces.push(record);
        Some(id)
    }

    fn update_mapping_surface(&mut self, state: &MappingSurfaceState) -> bool {
        if self.consume_failure() {
            return false;
        }
        match self.surfaces.iter_mut().find(|s| s.id == state.id) {
            Some(slot) => {
                *slot = state.clone();
                true
            }
            None => false,
        }
    }

    fn delete_mapping_surface(&mut self, id: &str) -> bool {
        if self.consume_failure() {
            return false;
        }
        let before = self.surfaces.len();
        self.surfaces.retain(|s| s.id != id);
        self.surfaces.len() != before
    }

    fn mapping_surfaces(&self) -> Vec<MappingSurfaceState> {
        self.surfaces.clone()
    }

    fn create_mapping(&mut self, state: &MappingState) -> Option<String> {
        if self.consume_failure() {
            return None;
        }
        let mut record = state.clone();
        record.id = new_record_id();
        let id = record.id.clone();
        self.mappings.push(record);
        Some(id)
    }

    fn update_mapping(&mut self, state: &MappingState) -> bool {
        if self.consume_failure() {
            return false;
        }
        match self.mappings.iter_mut().find(|m| m.id == state.id) {
            Some(slot) => {
                *slot = state.clone();
                true
            }
            None => false,
        }
    }

    fn delete_mapping(&mut self, id: &str) -> bool {
        if self.consume_failure() {
            return false;
        }
        let before = self.mappings.len();
        self.mappings.retain(|m| m.id != id);
        self.mappings.len() != before
    }

    fn mappings(&self) -> Vec<MappingState> {
        self.mappings.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_id() {
        let mut backend = InMemoryBackend::new();
        let id = backend
            .create_mapping(&MappingState::default())
            .expect("create should succeed");
        assert!(!id.is_empty());
        assert_eq!(backend.mappings()[0].id, id);
    }

    #[test]
    fn test_update_unknown_id_fails() {
        let mut backend = InMemoryBackend::new();
        let mut state = MappingState::default();
        state.id = "no-such".to_string();
        assert!(!backend.update_mapping(&state));
    }

    #[test]
    fn test_delete() {
        let mut backend = InMemoryBackend::new();
        let id = backend.create_mapping(&MappingState::default()).unwrap();
        assert!(backend.delete_mapping(&id));
        assert!(!backend.delete_mapping(&id));
        assert!(backend.mappings().is_empty());
    }

    #[test]
    fn test_injected_failures() {
        let mut backend = InMemoryBackend::new();
        backend.inject_failures(2);
        assert!(backend.create_mapping(&MappingState::default()).is_none());
        assert!(!backend.update_mapping(&MappingState::default()));
        // Injected failures consumed; calls work again.
        assert!(backend.create_mapping(&MappingState::default()).is_some());
    }

    #[test]
    fn test_document_round_trip() {
        let mut doc = ProjectDocument::default();
        let mut ctx = RenderContextState::default();
        ctx.name = "Cam".to_string();
        doc.contexts.push(ctx);

        let backend = InMemoryBackend::from_document(doc);
        let out = backend.to_document();
        assert_eq!(out.contexts.len(), 1);
        assert!(!out.contexts[0].id.is_empty());
    }
}

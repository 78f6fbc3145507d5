//! Shared fixtures for the integration tests.

use stagecast_session::{InMemoryBackend, MappingBackend, SyncEngine};
use stagecast_spec::{MappingSurfaceState, RenderContextState};

/// A camera context with a live texture at the given resolution.
pub fn live_context(name: &str, width: i32, height: i32) -> RenderContextState {
    RenderContextState {
        name: name.to_string(),
        camera_id: format!("cam:{}", name),
        width,
        height,
        resolved_texture: Some(format!("tex:{}", name)),
        ..RenderContextState::default()
    }
}

/// A surface bound to a stage target.
pub fn stage_surface(name: &str) -> MappingSurfaceState {
    MappingSurfaceState {
        name: name.to_string(),
        target_id: format!("stage:{}", name),
        ..MappingSurfaceState::default()
    }
}

/// An engine over a backend seeded with one live 1920x1080 context and the
/// named surfaces. Returns the engine and the created surface ids.
pub fn seeded_engine(surfaces: &[&str]) -> (SyncEngine<InMemoryBackend>, Vec<String>) {
    let mut backend = InMemoryBackend::new();
    backend
        .create_render_context(&live_context("main", 1920, 1080))
        .expect("context create");
    let surface_ids = surfaces
        .iter()
        .map(|name| {
            backend
                .create_mapping_surface(&stage_surface(name))
                .expect("surface create")
        })
        .collect();
    (SyncEngine::new(backend), surface_ids)
}

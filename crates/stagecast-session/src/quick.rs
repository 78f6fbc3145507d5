//! One-shot mapping creation with remembered defaults.
//!
//! The defaults are explicit session state, not process-wide: they are read
//! when the session starts and updated after each successful quick create,
//! so the next session picks up where the user left off.

use thiserror::Error;
use tracing::{debug, info};

use stagecast_spec::{
    apply_mode_defaults, MappingMode, MappingState, MappingSurfaceState, RenderContextState,
    SOURCE_TYPE_ASSET_STORE, SOURCE_TYPE_CAMERA,
};

use crate::backend::MappingBackend;
use crate::sync::SyncEngine;

/// Defaults applied by [`SyncEngine::quick_create`].
#[derive(Debug, Clone, PartialEq)]
pub struct QuickCreateDefaults {
    /// `camera` or `asset-store`.
    pub source_type: String,
    pub camera_id: String,
    pub asset_id: String,
    pub width: i32,
    pub height: i32,
    pub mode: MappingMode,
    pub opacity: f64,
    pub enabled: bool,
}

impl Default for QuickCreateDefaults {
    fn default() -> Self {
        Self {
            source_type: SOURCE_TYPE_CAMERA.to_string(),
            camera_id: String::new(),
            asset_id: String::new(),
            width: 1920,
            height: 1080,
            mode: MappingMode::Direct,
            opacity: 1.0,
            enabled: true,
        }
    }
}

impl QuickCreateDefaults {
    /// True when this context record matches the remembered source identity.
    fn matches_context(&self, context: &RenderContextState) -> bool {
        if context.source_type != self.source_type {
            return false;
        }
        match self.source_type.as_str() {
            SOURCE_TYPE_ASSET_STORE => context.asset_id == self.asset_id,
            _ => context.camera_id == self.camera_id,
        }
    }
}

/// Everything a quick create touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickCreateOutcome {
    pub context_id: String,
    pub surface_id: String,
    pub mapping_id: String,
    pub reused_context: bool,
    pub reused_surface: bool,
}

/// Failure of a quick create; already-existing records are left in place,
/// records created by the failed call are rolled back.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuickCreateError {
    #[error("backend rejected render context create")]
    ContextRejected,
    #[error("backend rejected mapping surface create")]
    SurfaceRejected,
    #[error("backend rejected mapping create")]
    MappingRejected,
}

impl<B: MappingBackend> SyncEngine<B> {
    /// [`quick_create_with`] using the session's remembered defaults.
    ///
    /// [`quick_create_with`]: SyncEngine::quick_create_with
    pub fn quick_create(
        &mut self,
        name: &str,
        target_id: &str,
    ) -> Result<QuickCreateOutcome, QuickCreateError> {
        let defaults = self.quick_defaults().clone();
        self.quick_create_with(name, target_id, defaults)
    }

    /// Creates (or reuses) a context and a surface, then creates a mapping
    /// binding them.
    ///
    /// The context is reused when one with the same source identity exists;
    /// the surface is reused by target id. On success the given defaults are
    /// remembered, so the next quick create (and the next session, if the
    /// host carries them over) starts from the same shape.
    pub fn quick_create_with(
        &mut self,
        name: &str,
        target_id: &str,
        defaults: QuickCreateDefaults,
    ) -> Result<QuickCreateOutcome, QuickCreateError> {

        let existing_context = self
            .backend()
            .render_contexts()
            .into_iter()
            .find(|c| defaults.matches_context(c));
        let (context_id, reused_context) = match existing_context {
            Some(context) => {
                debug!(context = %context.id, "quick create reusing context");
                (context.id, true)
            }
            None => {
                let mut context = RenderContextState::default();
                context.name = format!("{} Input", name);
                context.source_type = defaults.source_type.clone();
                context.camera_id = defaults.camera_id.clone();
                context.asset_id = defaults.asset_id.clone();
                context.width = defaults.width;
                context.height = defaults.height;
                let id = self
                    .backend_mut()
                    .create_render_context(&context)
                    .ok_or(QuickCreateError::ContextRejected)?;
                (id, false)
            }
        };

        let existing_surface = self
            .backend()
            .mapping_surfaces()
            .into_iter()
            .find(|s| s.target_id == target_id);
        let (surface_id, reused_surface) = match existing_surface {
            Some(surface) => {
                debug!(surface = %surface.id, "quick create reusing surface");
                (surface.id, true)
            }
            None => {
                let mut surface = MappingSurfaceState::default();
                surface.name = format!("{} Screen", name);
                surface.target_id = target_id.to_string();
                match self.backend_mut().create_mapping_surface(&surface) {
                    Some(id) => (id, false),
                    None => {
                        if !reused_context {
                            self.backend_mut().delete_render_context(&context_id);
                        }
                        return Err(QuickCreateError::SurfaceRejected);
                    }
                }
            }
        };

        let mut mapping = MappingState::default();
        mapping.name = name.to_string();
        mapping.kind = defaults.mode.kind_token().to_string();
        mapping.context_id = context_id.clone();
        mapping.surface_ids = vec![surface_id.clone()];
        mapping.opacity = defaults.opacity;
        mapping.enabled = defaults.enabled;
        apply_mode_defaults(defaults.mode, &mut mapping.config);

        let mapping_id = match self.backend_mut().create_mapping(&mapping) {
            Some(id) => id,
            None => {
                // Roll back only what this call created.
                if !reused_surface {
                    self.backend_mut().delete_mapping_surface(&surface_id);
                }
                if !reused_context {
                    self.backend_mut().delete_render_context(&context_id);
                }
                return Err(QuickCreateError::MappingRejected);
            }
        };

        info!(mapping = %mapping_id, context = %context_id, surface = %surface_id, "quick create done");
        *self.quick_defaults_mut() = defaults;
        Ok(QuickCreateOutcome {
            context_id,
            surface_id,
            mapping_id,
            reused_context,
            reused_surface,
        })
    }
}

//! The UI-agnostic editable form state for one mapping.
//!
//! The form holds the current values of every editable field plus the feed
//! graph editor; the sync engine hashes it each poll and writes it through
//! the backend when the hash moved. The form never touches widgets: the UI
//! layer copies values in and out.

use std::collections::BTreeMap;

use stagecast_spec::{
    apply_mode_defaults, live_state_hash, FeedRect, MappingConfig, MappingMode, MappingState,
    SurfaceFeedRect,
};

use crate::graph::FeedGraphEditor;

/// Editable state of one mapping.
#[derive(Debug, Clone, Default)]
pub struct MappingForm {
    /// Backend id; empty until the first successful create.
    pub id: String,
    pub name: String,
    pub project_id: String,
    pub context_id: String,
    pub surface_ids: Vec<String>,
    pub opacity: f64,
    pub enabled: bool,
    mode: MappingMode,
    /// Mode-dependent sections, kept defaulted for the current mode. The feed
    /// graph and override rects are held separately and merged on save.
    pub config: MappingConfig,
    /// Legacy per-surface feed rects, keyed (and therefore ordered) by
    /// surface id.
    pub feed_rect_overrides: BTreeMap<String, FeedRect>,
    pub graph: FeedGraphEditor,
}

impl MappingForm {
    /// A fresh form for a not-yet-created mapping in the given mode.
    pub fn new(mode: MappingMode) -> Self {
        let mut form = Self {
            opacity: 1.0,
            enabled: true,
            ..Self::default()
        };
        form.set_mode(mode);
        form
    }

    /// Rebuilds a form from a backend record.
    pub fn from_state(state: &MappingState) -> Self {
        let mode = MappingMode::from_state(state);
        let mut config = state.config.clone();

        let graph = config.feed_v2.take().unwrap_or_default();
        let mut overrides = BTreeMap::new();
        if let Some(rects) = config.feed_rects.take() {
            for entry in rects {
                overrides.insert(entry.surface_id, entry.rect);
            }
        }

        apply_mode_defaults(mode, &mut config);
        config.feed_v2 = None;

        Self {
            id: state.id.clone(),
            name: state.name.clone(),
            project_id: state.project_id.clone(),
            context_id: state.context_id.clone(),
            surface_ids: state.surface_ids.clone(),
            opacity: state.opacity,
            enabled: state.enabled,
            mode,
            config,
            feed_rect_overrides: overrides,
            graph: FeedGraphEditor::new(graph),
        }
    }

    pub fn mode(&self) -> MappingMode {
        self.mode
    }

    /// Switches the form's mode, defaulting the sections the new mode needs
    /// and dropping the feed graph when leaving Feed.
    pub fn set_mode(&mut self, mode: MappingMode) {
        self.mode = mode;
        apply_mode_defaults(mode, &mut self.config);
        // The graph editor, not the config, owns the live graph.
        self.config.feed_v2 = None;
        if mode != MappingMode::Feed {
            self.graph.clear();
            self.feed_rect_overrides.clear();
        }
    }

    /// Serializes the form into the record the backend stores. The feed
    /// graph is written wholesale, replacing whatever was stored before.
    pub fn to_state(&self) -> MappingState {
        let mut config = self.config.clone();
        if self.mode == MappingMode::Feed {
            config.feed_v2 = Some(self.graph.graph().clone());
            if !self.feed_rect_overrides.is_empty() {
                config.feed_rects = Some(
                    self.feed_rect_overrides
                        .iter()
                        .map(|(surface_id, rect)| SurfaceFeedRect {
                            surface_id: surface_id.clone(),
                            rect: rect.clone(),
                        })
                        .collect(),
                );
            }
        }

        MappingState {
            id: self.id.clone(),
            name: self.name.clone(),
            project_id: self.project_id.clone(),
            kind: self.mode.kind_token().to_string(),
            context_id: self.context_id.clone(),
            surface_ids: self.surface_ids.clone(),
            opacity: self.opacity,
            enabled: self.enabled,
            config,
            last_error: String::new(),
        }
    }

    /// Hash of the full editable state; see [`live_state_hash`].
    pub fn live_hash(&self) -> String {
        live_state_hash(&self.to_state())
    }
}

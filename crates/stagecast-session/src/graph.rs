//! Feed-graph reconciliation: binding, routing, and geometry clamping.
//!
//! All repair operations are silent and best-effort. A dangling reference is
//! rebound to the first available node; an operation that needs a node when
//! none exists either creates a fallback (clamping) or leaves the graph
//! untouched (route creation). Nothing here reports errors to the user.

use std::collections::HashSet;

use tracing::debug;

use stagecast_spec::{
    FeedDestination, FeedGraph, FeedRoute, FeedSource, PixelRect, RenderContextState,
    FALLBACK_CANVAS_HEIGHT, FALLBACK_CANVAS_WIDTH,
};

use crate::ids::new_graph_id;

/// Destinations created by older clients carry this placeholder instead of a
/// real surface binding.
pub const PLACEHOLDER_SURFACE_ID: &str = "surface";

/// Owns one mapping's feed graph for the duration of an edit session.
#[derive(Debug, Clone, Default)]
pub struct FeedGraphEditor {
    graph: FeedGraph,
    active_source_id: Option<String>,
}

impl FeedGraphEditor {
    pub fn new(graph: FeedGraph) -> Self {
        Self {
            graph,
            active_source_id: None,
        }
    }

    pub fn graph(&self) -> &FeedGraph {
        &self.graph
    }

    /// Direct mutable access for field-level edits; call [`clamp_all`]
    /// afterwards when geometry or references changed.
    ///
    /// [`clamp_all`]: FeedGraphEditor::clamp_all
    pub fn graph_mut(&mut self) -> &mut FeedGraph {
        &mut self.graph
    }

    /// Consumes the editor and hands the graph back.
    pub fn into_graph(self) -> FeedGraph {
        self.graph
    }

    /// Replaces the graph wholesale (e.g. when repopulating a form).
    pub fn reset(&mut self, graph: FeedGraph) {
        self.graph = graph;
        self.active_source_id = None;
    }

    pub fn clear(&mut self) {
        self.reset(FeedGraph::default());
    }

    pub fn is_empty(&self) -> bool {
        self.graph.sources.is_empty()
            && self.graph.destinations.is_empty()
            && self.graph.routes.is_empty()
    }

    /// The source new routes are drawn from: the active source while it is
    /// valid, else the first source.
    pub fn default_source_id(&self) -> Option<String> {
        if let Some(active) = &self.active_source_id {
            if self.graph.source(active).is_some() {
                return Some(active.clone());
            }
        }
        self.graph.sources.first().map(|s| s.id.clone())
    }

    /// Marks a source as the active one; ignored if the id is unknown.
    pub fn set_active_source(&mut self, id: &str) {
        if self.graph.source(id).is_some() {
            self.active_source_id = Some(id.to_string());
        }
    }

    fn taken_ids(&self) -> HashSet<String> {
        self.graph.node_ids().map(str::to_string).collect()
    }

    fn fresh_id(&self) -> String {
        new_graph_id(&self.taken_ids())
    }

    /// Picks the context a new source should bind to: the first enabled
    /// context with live pixels, else the first enabled one, else the first
    /// one at all.
    pub fn pick_default_context(contexts: &[RenderContextState]) -> Option<&RenderContextState> {
        contexts
            .iter()
            .find(|c| c.enabled && c.has_resolved_texture())
            .or_else(|| contexts.iter().find(|c| c.enabled))
            .or_else(|| contexts.first())
    }

    /// Makes sure at least one source exists and every source is bound to a
    /// context. No-op when there are no contexts to bind to.
    pub fn ensure_sources_bound(&mut self, contexts: &[RenderContextState]) {
        let Some(default_context) = Self::pick_default_context(contexts) else {
            return;
        };
        let default_id = default_context.id.clone();

        if self.graph.sources.is_empty() {
            let id = self.fresh_id();
            debug!(source = %id, context = %default_id, "creating default feed source");
            self.graph.sources.push(FeedSource {
                id,
                label: None,
                context_id: default_id.clone(),
                width: default_context.width,
                height: default_context.height,
            });
        }

        for source in &mut self.graph.sources {
            if source.context_id.is_empty() {
                debug!(source = %source.id, context = %default_id, "backfilling source context");
                source.context_id = default_id.clone();
            }
            // Keep source canvases in step with their context's resolution.
            if let Some(context) = contexts.iter().find(|c| c.id == source.context_id) {
                if context.width > 0 && context.height > 0 {
                    source.width = context.width;
                    source.height = context.height;
                }
            }
        }
    }

    /// Rebinds destinations with no usable surface and creates one
    /// destination per still-unbound valid surface id.
    ///
    /// `valid_surface_ids` is de-duplicated first; invalid destinations are
    /// reassigned round-robin across the valid set. No-op when the valid set
    /// is empty.
    pub fn ensure_destinations_bound(&mut self, valid_surface_ids: &[String]) {
        let mut seen = HashSet::new();
        let valid: Vec<&String> = valid_surface_ids
            .iter()
            .filter(|id| !id.is_empty() && seen.insert(id.as_str()))
            .collect();
        if valid.is_empty() {
            return;
        }

        let mut next = 0usize;
        for destination in &mut self.graph.destinations {
            let unusable = destination.surface_id.is_empty()
                || destination.surface_id == PLACEHOLDER_SURFACE_ID
                || !valid.iter().any(|id| **id == destination.surface_id);
            if unusable {
                let assigned = valid[next % valid.len()].clone();
                next += 1;
                debug!(
                    destination = %destination.id,
                    from = %destination.surface_id,
                    to = %assigned,
                    "rebinding destination surface"
                );
                destination.surface_id = assigned;
            }
        }

        for surface_id in &valid {
            let bound = self
                .graph
                .destinations
                .iter()
                .any(|d| &d.surface_id == *surface_id);
            if !bound {
                let id = self.fresh_id();
                debug!(destination = %id, surface = %surface_id, "creating destination for surface");
                self.graph.destinations.push(FeedDestination {
                    id,
                    label: None,
                    surface_id: (*surface_id).clone(),
                    width: FALLBACK_CANVAS_WIDTH,
                    height: FALLBACK_CANVAS_HEIGHT,
                });
            }
        }
    }

    /// Creates a default full-canvas route for every routeless destination
    /// bound to one of `mapping_surface_ids` (all destinations when the list
    /// is empty). No-op when the graph has no sources.
    pub fn ensure_routes_for_destinations(&mut self, mapping_surface_ids: &[String]) {
        let Some(source_id) = self.default_source_id() else {
            return;
        };
        let (source_w, source_h) = self
            .graph
            .source(&source_id)
            .map(|s| s.canvas())
            .unwrap_or((FALLBACK_CANVAS_WIDTH, FALLBACK_CANVAS_HEIGHT));

        let routeless: Vec<(String, i32, i32)> = self
            .graph
            .destinations
            .iter()
            .filter(|d| {
                mapping_surface_ids.is_empty()
                    || mapping_surface_ids.iter().any(|id| *id == d.surface_id)
            })
            .filter(|d| self.graph.routes_for_destination(&d.id).next().is_none())
            .map(|d| {
                let (w, h) = d.canvas();
                (d.id.clone(), w, h)
            })
            .collect();

        for (destination_id, dest_w, dest_h) in routeless {
            let id = self.fresh_id();
            debug!(route = %id, destination = %destination_id, "creating default route");
            self.graph.routes.push(FeedRoute {
                id,
                label: None,
                source_id: source_id.clone(),
                destination_id,
                enabled: true,
                opacity: 1.0,
                source_rect: PixelRect::full(source_w, source_h),
                destination_rect: PixelRect::full(dest_w, dest_h),
            });
        }
    }

    /// Clamps every route; see [`clamp_route_at`].
    ///
    /// [`clamp_route_at`]: FeedGraphEditor::clamp_route_at
    pub fn clamp_all(&mut self) {
        for index in 0..self.graph.routes.len() {
            self.clamp_route_at(index);
        }
    }

    /// Repairs the route's references and clamps both rects to their
    /// canvases.
    ///
    /// A dangling source/destination reference is rebound to the first
    /// available node; a fallback node is created when the collection is
    /// empty. Unresolved canvas sizes fall back to 1920x1080.
    pub fn clamp_route_at(&mut self, index: usize) {
        if index >= self.graph.routes.len() {
            return;
        }

        let source_id = self.graph.routes[index].source_id.clone();
        if self.graph.source(&source_id).is_none() {
            if self.graph.sources.is_empty() {
                let id = self.fresh_id();
                debug!(source = %id, "creating fallback source for orphaned route");
                self.graph.sources.push(FeedSource {
                    id,
                    ..FeedSource::default()
                });
            }
            let first = self.graph.sources[0].id.clone();
            debug!(route = %self.graph.routes[index].id, source = %first, "rebinding dangling source reference");
            self.graph.routes[index].source_id = first;
        }

        let destination_id = self.graph.routes[index].destination_id.clone();
        if self.graph.destination(&destination_id).is_none() {
            if self.graph.destinations.is_empty() {
                let id = self.fresh_id();
                debug!(destination = %id, "creating fallback destination for orphaned route");
                self.graph.destinations.push(FeedDestination {
                    id,
                    ..FeedDestination::default()
                });
            }
            let first = self.graph.destinations[0].id.clone();
            debug!(route = %self.graph.routes[index].id, destination = %first, "rebinding dangling destination reference");
            self.graph.routes[index].destination_id = first;
        }

        let (source_w, source_h) = self
            .graph
            .source(&self.graph.routes[index].source_id)
            .map(|s| s.canvas())
            .unwrap_or((FALLBACK_CANVAS_WIDTH, FALLBACK_CANVAS_HEIGHT));
        let (dest_w, dest_h) = self
            .graph
            .destination(&self.graph.routes[index].destination_id)
            .map(|d| d.canvas())
            .unwrap_or((FALLBACK_CANVAS_WIDTH, FALLBACK_CANVAS_HEIGHT));

        let route = &mut self.graph.routes[index];
        route.source_rect = route.source_rect.clamped_to(source_w, source_h);
        route.destination_rect = route.destination_rect.clamped_to(dest_w, dest_h);
    }

    /// Adds a source bound to the given context.
    pub fn add_source(&mut self, context_id: &str, width: i32, height: i32) -> String {
        let id = self.fresh_id();
        self.graph.sources.push(FeedSource {
            id: id.clone(),
            label: None,
            context_id: context_id.to_string(),
            width,
            height,
        });
        id
    }

    /// Adds a destination bound to the given surface.
    pub fn add_destination(&mut self, surface_id: &str, width: i32, height: i32) -> String {
        let id = self.fresh_id();
        self.graph.destinations.push(FeedDestination {
            id: id.clone(),
            label: None,
            surface_id: surface_id.to_string(),
            width,
            height,
        });
        id
    }

    /// Adds a clamped full-canvas route between two nodes; the ids are
    /// repaired if dangling.
    pub fn add_route(&mut self, source_id: &str, destination_id: &str) -> String {
        let id = self.fresh_id();
        let (source_w, source_h) = self
            .graph
            .source(source_id)
            .map(|s| s.canvas())
            .unwrap_or((FALLBACK_CANVAS_WIDTH, FALLBACK_CANVAS_HEIGHT));
        let (dest_w, dest_h) = self
            .graph
            .destination(destination_id)
            .map(|d| d.canvas())
            .unwrap_or((FALLBACK_CANVAS_WIDTH, FALLBACK_CANVAS_HEIGHT));
        self.graph.routes.push(FeedRoute {
            id: id.clone(),
            label: None,
            source_id: source_id.to_string(),
            destination_id: destination_id.to_string(),
            enabled: true,
            opacity: 1.0,
            source_rect: PixelRect::full(source_w, source_h),
            destination_rect: PixelRect::full(dest_w, dest_h),
        });
        self.clamp_route_at(self.graph.routes.len() - 1);
        id
    }

    /// Removes a source; routes that referenced it are repaired on the next
    /// clamp.
    pub fn remove_source(&mut self, id: &str) {
        self.graph.sources.retain(|s| s.id != id);
        if self.active_source_id.as_deref() == Some(id) {
            self.active_source_id = None;
        }
        self.clamp_all();
    }

    /// Removes a destination and its routes.
    pub fn remove_destination(&mut self, id: &str) {
        self.graph.destinations.retain(|d| d.id != id);
        self.graph.routes.retain(|r| r.destination_id != id);
    }

    pub fn remove_route(&mut self, id: &str) {
        self.graph.routes.retain(|r| r.id != id);
    }
}

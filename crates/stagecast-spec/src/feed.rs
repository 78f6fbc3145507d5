//! Feed (V2) routing graph: sources, destinations, and pixel-rect routes.
//!
//! The graph is stored wholesale inside a mapping's `feedV2` config section
//! and replaced on every save. The write path always emits the canonical
//! shape; the read path additionally accepts the legacy field spellings that
//! older clients produced (`links` for `routes`, `srcRect`/`dstRect` for the
//! nested rects, and flat `srcX`/`srcY`/... fields when no nested rect is
//! present).

use serde::{Deserialize, Serialize};

/// Canvas dimensions assumed when a source or destination has no resolved
/// size yet.
pub const FALLBACK_CANVAS_WIDTH: i32 = 1920;
/// See [`FALLBACK_CANVAS_WIDTH`].
pub const FALLBACK_CANVAS_HEIGHT: i32 = 1080;

/// An integer rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PixelRect {
    /// A rect covering a full canvas of the given size.
    pub fn full(width: i32, height: i32) -> Self {
        Self {
            x: 0,
            y: 0,
            w: width,
            h: height,
        }
    }

    /// Clamps the rect into a canvas of the given size.
    ///
    /// The canvas is treated as at least 1x1. Afterwards
    /// `0 <= x <= width - 1`, `1 <= w <= width - x` (and the same for y/h),
    /// for any input rect.
    pub fn clamped_to(&self, width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let x = self.x.clamp(0, width - 1);
        let y = self.y.clamp(0, height - 1);
        Self {
            x,
            y,
            w: self.w.clamp(1, width - x),
            h: self.h.clamp(1, height - y),
        }
    }
}

/// A feed input bound to a render context.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedSource {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub context_id: String,
    pub width: i32,
    pub height: i32,
}

impl FeedSource {
    /// Pixel canvas of this source, falling back to the default canvas when
    /// the bound context has not resolved a size.
    pub fn canvas(&self) -> (i32, i32) {
        if self.width > 0 && self.height > 0 {
            (self.width, self.height)
        } else {
            (FALLBACK_CANVAS_WIDTH, FALLBACK_CANVAS_HEIGHT)
        }
    }
}

/// A feed output bound to a mapping surface.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedDestination {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub surface_id: String,
    pub width: i32,
    pub height: i32,
}

impl FeedDestination {
    /// Pixel canvas of this destination; see [`FeedSource::canvas`].
    pub fn canvas(&self) -> (i32, i32) {
        if self.width > 0 && self.height > 0 {
            (self.width, self.height)
        } else {
            (FALLBACK_CANVAS_WIDTH, FALLBACK_CANVAS_HEIGHT)
        }
    }
}

/// A directed edge copying a source pixel-rect to a destination pixel-rect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RouteWire")]
pub struct FeedRoute {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub source_id: String,
    pub destination_id: String,
    pub enabled: bool,
    pub opacity: f64,
    pub source_rect: PixelRect,
    pub destination_rect: PixelRect,
}

impl Default for FeedRoute {
    fn default() -> Self {
        Self {
            id: String::new(),
            label: None,
            source_id: String::new(),
            destination_id: String::new(),
            enabled: true,
            opacity: 1.0,
            source_rect: PixelRect::default(),
            destination_rect: PixelRect::default(),
        }
    }
}

/// Read-side shape of a route, covering every legacy spelling.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RouteWire {
    id: String,
    label: Option<String>,
    source_id: String,
    destination_id: String,
    enabled: bool,
    opacity: f64,
    #[serde(alias = "srcRect")]
    source_rect: Option<PixelRect>,
    #[serde(alias = "dstRect")]
    destination_rect: Option<PixelRect>,
    src_x: Option<i32>,
    src_y: Option<i32>,
    src_w: Option<i32>,
    src_h: Option<i32>,
    dst_x: Option<i32>,
    dst_y: Option<i32>,
    dst_w: Option<i32>,
    dst_h: Option<i32>,
}

impl Default for RouteWire {
    fn default() -> Self {
        Self {
            id: String::new(),
            label: None,
            source_id: String::new(),
            destination_id: String::new(),
            enabled: true,
            opacity: 1.0,
            source_rect: None,
            destination_rect: None,
            src_x: None,
            src_y: None,
            src_w: None,
            src_h: None,
            dst_x: None,
            dst_y: None,
            dst_w: None,
            dst_h: None,
        }
    }
}

fn rect_from_parts(
    nested: Option<PixelRect>,
    x: Option<i32>,
    y: Option<i32>,
    w: Option<i32>,
    h: Option<i32>,
) -> PixelRect {
    // Nested rect wins over the flat fields when both are present.
    if let Some(rect) = nested {
        return rect;
    }
    PixelRect {
        x: x.unwrap_or(0),
        y: y.unwrap_or(0),
        w: w.unwrap_or(0),
        h: h.unwrap_or(0),
    }
}

impl From<RouteWire> for FeedRoute {
    fn from(wire: RouteWire) -> Self {
        Self {
            id: wire.id,
            label: wire.label,
            source_id: wire.source_id,
            destination_id: wire.destination_id,
            enabled: wire.enabled,
            opacity: wire.opacity,
            source_rect: rect_from_parts(
                wire.source_rect,
                wire.src_x,
                wire.src_y,
                wire.src_w,
                wire.src_h,
            ),
            destination_rect: rect_from_parts(
                wire.destination_rect,
                wire.dst_x,
                wire.dst_y,
                wire.dst_w,
                wire.dst_h,
            ),
        }
    }
}

/// The feed routing graph owned by one mapping's editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedGraph {
    pub coordinate_space: String,
    pub sources: Vec<FeedSource>,
    pub destinations: Vec<FeedDestination>,
    #[serde(alias = "links")]
    pub routes: Vec<FeedRoute>,
}

impl Default for FeedGraph {
    fn default() -> Self {
        Self {
            coordinate_space: "pixel".to_string(),
            sources: Vec::new(),
            destinations: Vec::new(),
            routes: Vec::new(),
        }
    }
}

impl FeedGraph {
    pub fn source(&self, id: &str) -> Option<&FeedSource> {
        self.sources.iter().find(|s| s.id == id)
    }

    pub fn destination(&self, id: &str) -> Option<&FeedDestination> {
        self.destinations.iter().find(|d| d.id == id)
    }

    /// Routes currently attached to the given destination.
    pub fn routes_for_destination<'a>(&'a self, destination_id: &'a str) -> impl Iterator<Item = &'a FeedRoute> {
        self.routes
            .iter()
            .filter(move |r| r.destination_id == destination_id)
    }

    /// Every node id in the graph (sources, destinations, routes).
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.sources
            .iter()
            .map(|s| s.id.as_str())
            .chain(self.destinations.iter().map(|d| d.id.as_str()))
            .chain(self.routes.iter().map(|r| r.id.as_str()))
    }
}

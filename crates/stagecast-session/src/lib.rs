//! Stagecast Editing-Session Runtime
//!
//! One editing session owns one mapping's form state and feed graph at a
//! time and keeps the backend in step with it. Everything runs on the
//! caller's thread: the host calls [`SyncEngine::tick`] per frame (or
//! [`SyncEngine::commit`] on explicit saves), the engine hashes the form and
//! writes through the [`MappingBackend`] only when something changed. Feed
//! graphs are reconciled before every apply: sources bind to contexts,
//! destinations to surfaces, routeless destinations get default routes, and
//! every route rect is clamped to its canvases.
//!
//! # Example
//!
//! ```
//! use stagecast_session::{InMemoryBackend, MappingBackend, SyncEngine};
//! use stagecast_spec::{MappingMode, RenderContextState};
//!
//! let mut backend = InMemoryBackend::new();
//! let mut context = RenderContextState::default();
//! context.name = "Stage Cam".to_string();
//! context.camera_id = "cam-1".to_string();
//! backend.create_render_context(&context).unwrap();
//!
//! let mut engine = SyncEngine::new(backend);
//! engine.start_new(MappingMode::Direct);
//! engine.form_mut().unwrap().name = "Front wall".to_string();
//!
//! // Per-frame ticks apply the form once the poll interval elapses and the
//! // content hash moved.
//! let mut created = false;
//! for _ in 0..120 {
//!     if let Some(outcome) = engine.tick(1.0 / 60.0) {
//!         created |= matches!(outcome, stagecast_session::Applied::Created(_));
//!     }
//! }
//! assert!(created);
//! assert_eq!(engine.backend().mappings().len(), 1);
//! ```

pub mod backend;
pub mod form;
pub mod graph;
pub mod ids;
pub mod quick;
pub mod snapshot;
pub mod sync;

pub use backend::{InMemoryBackend, MappingBackend};
pub use form::MappingForm;
pub use graph::{FeedGraphEditor, PLACEHOLDER_SURFACE_ID};
pub use ids::{new_graph_id, new_record_id, GRAPH_ID_LEN};
pub use quick::{QuickCreateDefaults, QuickCreateError, QuickCreateOutcome};
pub use snapshot::{snapshot_hash, SnapshotTracker};
pub use sync::{Applied, SessionPhase, SyncEngine, DEFAULT_POLL_INTERVAL};

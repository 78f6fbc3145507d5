//! End-to-end feed-graph reconciliation scenarios.

use pretty_assertions::assert_eq;

use stagecast_session::{Applied, FeedGraphEditor, MappingBackend, PLACEHOLDER_SURFACE_ID};
use stagecast_spec::{FeedDestination, MappingMode, PixelRect};
use stagecast_tests::{live_context, seeded_engine};

/// Feed mode, one surface, empty graph: binding then routing yields exactly
/// one destination bound to the surface and one route spanning both full
/// canvases.
#[test]
fn feed_mode_single_surface_builds_one_full_route() {
    let (mut engine, surface_ids) = seeded_engine(&["left"]);
    let surface_id = surface_ids[0].clone();

    engine.start_new(MappingMode::Feed);
    {
        let form = engine.form_mut().unwrap();
        form.name = "LED wall".to_string();
        form.surface_ids = vec![surface_id.clone()];
    }

    let outcome = engine.commit();
    assert!(matches!(outcome, Applied::Created(_)));

    let stored = engine.backend().mappings().remove(0);
    let graph = stored.config.feed_v2.expect("graph persisted");

    assert_eq!(graph.destinations.len(), 1);
    assert_eq!(graph.destinations[0].surface_id, surface_id);
    assert_eq!(graph.routes.len(), 1);

    let route = &graph.routes[0];
    let source = &graph.sources[0];
    let destination = &graph.destinations[0];
    assert_eq!(route.source_id, source.id);
    assert_eq!(route.destination_id, destination.id);
    assert_eq!(
        route.source_rect,
        PixelRect::full(source.width, source.height)
    );
    assert_eq!(
        route.destination_rect,
        PixelRect::full(destination.width, destination.height)
    );
    assert_eq!(route.source_rect, PixelRect::full(1920, 1080));
}

/// After destination binding, no destination is left unbound or on the
/// legacy placeholder.
#[test]
fn destination_binding_clears_placeholders() {
    let mut editor = FeedGraphEditor::default();
    for placeholder in ["", PLACEHOLDER_SURFACE_ID, "stale-id"] {
        editor.graph_mut().destinations.push(FeedDestination {
            id: format!("{:0>8}", placeholder.len()),
            surface_id: placeholder.to_string(),
            ..FeedDestination::default()
        });
    }

    editor.ensure_destinations_bound(&["s-1".to_string()]);

    for destination in &editor.graph().destinations {
        assert_eq!(destination.surface_id, "s-1");
    }
}

/// Editing route geometry out of bounds gets pulled back by the clamp on the
/// next commit, and the clamped result is what lands in the backend.
#[test]
fn out_of_bounds_route_edit_is_clamped_on_commit() {
    let (mut engine, surface_ids) = seeded_engine(&["left"]);

    engine.start_new(MappingMode::Feed);
    {
        let form = engine.form_mut().unwrap();
        form.name = "Wall".to_string();
        form.surface_ids = surface_ids.clone();
    }
    engine.commit();

    // Drag the source rect far outside the canvas.
    {
        let form = engine.form_mut().unwrap();
        let route = &mut form.graph.graph_mut().routes[0];
        route.source_rect = PixelRect {
            x: -500,
            y: 2000,
            w: 90000,
            h: 0,
        };
    }
    assert_eq!(engine.commit(), Applied::Updated);

    let stored = engine.backend().mappings().remove(0);
    let route = &stored.config.feed_v2.unwrap().routes[0];
    assert_eq!(route.source_rect.x, 0);
    assert_eq!(route.source_rect.y, 1079);
    assert_eq!(route.source_rect.w, 1920);
    assert_eq!(route.source_rect.h, 1);
}

/// Removing the routed source rebinds the route to the remaining source
/// silently; the mapping never fails.
#[test]
fn removing_routed_source_repairs_silently() {
    let (mut engine, surface_ids) = seeded_engine(&["left"]);
    engine
        .backend_mut()
        .create_render_context(&live_context("aux", 1280, 720))
        .unwrap();

    engine.start_new(MappingMode::Feed);
    {
        let form = engine.form_mut().unwrap();
        form.name = "Wall".to_string();
        form.surface_ids = surface_ids.clone();
    }
    engine.commit();

    let (second_source, first_source) = {
        let form = engine.form_mut().unwrap();
        let second = form.graph.add_source("aux-ctx", 1280, 720);
        let first = form.graph.graph().sources[0].id.clone();
        // Point the route at the new source, then remove it.
        form.graph.graph_mut().routes[0].source_id = second.clone();
        (second, first)
    };
    engine.commit();

    {
        let form = engine.form_mut().unwrap();
        form.graph.remove_source(&second_source);
    }
    assert_eq!(engine.commit(), Applied::Updated);

    let stored = engine.backend().mappings().remove(0);
    let graph = stored.config.feed_v2.unwrap();
    assert_eq!(graph.sources.len(), 1);
    assert_eq!(graph.routes[0].source_id, first_source);
}

/// A second surface added to the mapping gains its own destination and
/// default route on the next commit.
#[test]
fn adding_surface_extends_graph_on_next_commit() {
    let (mut engine, surface_ids) = seeded_engine(&["left", "right"]);

    engine.start_new(MappingMode::Feed);
    {
        let form = engine.form_mut().unwrap();
        form.name = "Wall".to_string();
        form.surface_ids = vec![surface_ids[0].clone()];
    }
    engine.commit();
    assert_eq!(
        engine.backend().mappings()[0]
            .config
            .feed_v2
            .as_ref()
            .unwrap()
            .destinations
            .len(),
        1
    );

    engine.form_mut().unwrap().surface_ids = surface_ids.clone();
    assert_eq!(engine.commit(), Applied::Updated);

    let stored = engine.backend().mappings().remove(0);
    let graph = stored.config.feed_v2.unwrap();
    assert_eq!(graph.destinations.len(), 2);
    assert_eq!(graph.routes.len(), 2);

    let bound: Vec<&str> = graph
        .destinations
        .iter()
        .map(|d| d.surface_id.as_str())
        .collect();
    assert!(bound.contains(&surface_ids[0].as_str()));
    assert!(bound.contains(&surface_ids[1].as_str()));
}

/// With no contexts and no surfaces at all, a Feed commit still goes
/// through; the graph just stays empty (no phantom nodes).
#[test]
fn empty_catalogs_leave_graph_empty() {
    let mut engine =
        stagecast_session::SyncEngine::new(stagecast_session::InMemoryBackend::new());
    engine.start_new(MappingMode::Feed);
    engine.form_mut().unwrap().name = "Orphan".to_string();

    let outcome = engine.commit();
    assert!(matches!(outcome, Applied::Created(_)));

    let stored = engine.backend().mappings().remove(0);
    let graph = stored.config.feed_v2.unwrap();
    assert!(graph.sources.is_empty());
    assert!(graph.destinations.is_empty());
    assert!(graph.routes.is_empty());
}

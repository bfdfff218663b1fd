//! Fixture tests for the ring surface, the surrogate cache and the mutation
//! log working together through a headless environment.

use pretty_assertions::assert_eq;
use vcon_core::color::Rgba;
use vcon_core::config::DisplayConfig;
use vcon_core::geometry::PixelRect;
use vcon_render::environment::RenderEnvironment;
use vcon_render::headless::{HeadlessEnvironment, NodeId};
use vcon_render::mutation::{Mutation, MutationKind, MutationLog};
use vcon_render::surface::{CornerRole, RING_SIZE, tile_tag};
use vcon_render::surrogate::SurrogateNode;
use vcon_render::{Host, RingSurface, ScrollableSurface, SurfaceError};

const MAGENTA: Rgba = Rgba::rgb(0xff, 0x00, 0xff);

fn headless_with_root() -> HeadlessEnvironment {
    let mut env = HeadlessEnvironment::new();
    env.add_root("screen");
    env
}

fn tile<S>(host: &mut Host<HeadlessEnvironment, S>, surface: &RingSurface, index: usize) -> NodeId
where
    S: vcon_render::mutation::MutationSink<HeadlessEnvironment>,
{
    host.resolve(surface.tile_node(index)).expect("tile resolves")
}

// ── Pan fixtures ────────────────────────────────────────────────────────

#[test]
fn pan_negative_half_surface_selects_bottom_right_tile() {
    let mut host = Host::new(headless_with_root());
    let mut surface = RingSurface::new(
        SurrogateNode::root("screen"),
        &mut host,
        &DisplayConfig::with_size(6, 6),
    )
    .expect("surface");

    surface.pan(&mut host, -3, -3).expect("pan");

    assert_eq!(surface.top_left_index(), 3);
    assert_eq!(surface.canvas_position(), (-3, -3));
    let positions: Vec<_> = (0..RING_SIZE)
        .map(|i| {
            let node = tile(&mut host, &surface, i);
            host.env().position(node).expect("position")
        })
        .collect();
    assert_eq!(positions, vec![(3, 3), (-3, 3), (3, -3), (-3, -3)]);
}

#[test]
fn pan_past_one_width_flips_horizontal_bit() {
    let mut host = Host::new(headless_with_root());
    let mut surface = RingSurface::new(
        SurrogateNode::root("screen"),
        &mut host,
        &DisplayConfig::default(),
    )
    .expect("surface");

    surface.pan(&mut host, 650, 0).expect("pan");

    assert_eq!(surface.top_left_index(), 1);
    assert_eq!(surface.canvas_position(), (-10, 0));
    let tr = surface.tile_for_role(CornerRole::TopRight);
    let node = tile(&mut host, &surface, tr);
    assert_eq!(host.env().position(node), Some((630, 0)));
}

// ── Fill mirroring fixture ──────────────────────────────────────────────

#[test]
fn fill_splits_across_tiles_after_pan() {
    let mut host = Host::new(headless_with_root());
    let mut surface = RingSurface::new(
        SurrogateNode::root("screen"),
        &mut host,
        &DisplayConfig::with_size(6, 6),
    )
    .expect("surface");
    let container = host.resolve(surface.container_node()).expect("container");
    let rect = PixelRect::new(2, 2, 2, 2);

    surface.fill_rect(&mut host, rect, MAGENTA).expect("fill");
    let t0 = tile(&mut host, &surface, 0);
    assert_eq!(
        host.env().ascii_dump(t0),
        "......\n......\n..##..\n..##..\n......\n......"
    );

    surface.pan(&mut host, -3, -3).expect("pan");
    surface.fill_rect(&mut host, rect, MAGENTA).expect("fill");

    let dumps: Vec<String> = (0..RING_SIZE)
        .map(|i| {
            let node = tile(&mut host, &surface, i);
            host.env().ascii_dump(node)
        })
        .collect();
    assert_eq!(
        dumps[3],
        "......\n......\n......\n......\n......\n.....#"
    );
    assert_eq!(
        dumps[2],
        "......\n......\n......\n......\n......\n#....."
    );
    assert_eq!(
        dumps[1],
        ".....#\n......\n......\n......\n......\n......"
    );
    assert_eq!(
        dumps[0],
        "#.....\n......\n..##..\n..##..\n......\n......"
    );

    // The fresh fill shows at (2,2); the earlier one moved by +3 and only its
    // top-left pixel is still inside the viewport.
    assert_eq!(
        host.env().composite_ascii(container, 6, 6),
        "......\n......\n..##..\n..##..\n......\n.....#"
    );
    assert_eq!(host.env().composite(container, 6, 6)[2 * 6 + 2], MAGENTA);
}

// ── Surrogate cache against the live tree ──────────────────────────────

#[test]
fn cache_reset_rediscovers_the_ring() {
    let mut host = Host::new(headless_with_root());
    let surface = RingSurface::new(
        SurrogateNode::root("screen"),
        &mut host,
        &DisplayConfig::with_size(8, 8),
    )
    .expect("surface");
    let before: Vec<NodeId> = (0..RING_SIZE)
        .map(|i| tile(&mut host, &surface, i))
        .collect();

    host.addressing_mut().reset();
    let lookups = host.env().stats().child_lookups;
    let after: Vec<NodeId> = (0..RING_SIZE)
        .map(|i| tile(&mut host, &surface, i))
        .collect();

    assert_eq!(before, after);
    // One lookup for the container, one per tile; the container is a hit
    // after the first tile.
    assert_eq!(host.env().stats().child_lookups - lookups, 1 + RING_SIZE as u64);

    surface
        .fill_rect(&mut host, PixelRect::new(0, 0, 1, 1), Rgba::WHITE)
        .expect("fill after reset");
    assert_eq!(host.env().pixel(after[0], 0, 0), Some(Rgba::WHITE));
}

#[test]
fn diverged_tree_fails_after_reset() {
    let mut host = Host::new(headless_with_root());
    let surface = RingSurface::new(
        SurrogateNode::root("screen"),
        &mut host,
        &DisplayConfig::with_size(8, 8),
    )
    .expect("surface");

    // Move the ring away from its parent behind the engine's back.
    let container = host.resolve(surface.container_node()).expect("container");
    let elsewhere = host.env_mut().add_root("elsewhere");
    host.env_mut().attach(&elsewhere, &container);
    host.addressing_mut().reset();

    let err = surface
        .fill_rect(&mut host, PixelRect::new(0, 0, 1, 1), Rgba::WHITE)
        .expect_err("ring is gone");
    assert_eq!(
        err,
        SurfaceError::ChildNotFound {
            parent_key: "#screen".into(),
            local_id: "ring".into(),
        }
    );
}

// ── Mutation log ────────────────────────────────────────────────────────

#[test]
fn recorded_construction_can_be_queried_by_tag() {
    let env = headless_with_root();
    let mut host = Host::with_sink(env, MutationLog::<NodeId>::passthrough());
    let mut surface = RingSurface::new(
        SurrogateNode::root("screen"),
        &mut host,
        &DisplayConfig::with_size(6, 6),
    )
    .expect("surface");

    let attaches = host
        .sink()
        .entries()
        .iter()
        .filter(|m| m.kind() == MutationKind::Attach)
        .count();
    assert_eq!(attaches, 1 + RING_SIZE);

    let container = host.resolve(surface.container_node()).expect("container");
    let attach = host
        .sink()
        .find_by_tag(MutationKind::Attach, &tile_tag(2))
        .expect("tile-2 attached");
    assert_eq!(attach.parent(), &container);

    host.sink_mut().reset();
    surface.pan(&mut host, -3, 0).expect("pan");

    let t1 = tile(&mut host, &surface, 1);
    let moved = host
        .sink()
        .find_by_tag(MutationKind::Position, &tile_tag(1))
        .expect("tile-1 positioned");
    assert_eq!(
        moved,
        &Mutation::Position {
            parent: container,
            child: t1,
            tag: tile_tag(1),
            top: 0,
            left: -3,
        }
    );
    assert_eq!(host.sink().len(), RING_SIZE);
}

#[test]
fn deferred_construction_resolves_after_flush() {
    let env = headless_with_root();
    let mut host = Host::with_sink(env, MutationLog::<NodeId>::new());
    let surface = RingSurface::new(
        SurrogateNode::root("screen"),
        &mut host,
        &DisplayConfig::with_size(4, 4),
    )
    .expect("surface");

    let root = host.env().lookup_root("screen").expect("root");
    assert!(host.env().children(root).is_empty());

    host.flush();
    host.addressing_mut().reset();

    let container = host.resolve(surface.container_node()).expect("container");
    assert_eq!(host.env().children(root), &[container]);
    assert_eq!(host.env().children(container).len(), RING_SIZE);
    let t3 = tile(&mut host, &surface, 3);
    assert_eq!(host.env().position(t3), Some((4, 4)));
}

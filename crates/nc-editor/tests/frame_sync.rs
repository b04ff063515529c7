//! Integration tests: frame comments following their member nodes.
//!
//! Drives `CommentPlugin` over a `MemoryCanvas` the way a host would: node
//! moves are either requested through the plugin or performed on the host and
//! reported back as events.

use nc_core::{CommentConfig, GraphNode, NodeId, Point, Rect, Size};
use nc_editor::{CommentEvent, CommentPlugin, EventLog, Flow, HostEvent, Layer, MemoryCanvas, NodeHost};
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn square(name: &str, x: f64, y: f64) -> GraphNode {
    GraphNode::new(NodeId::intern(name), name, Point::new(x, y), Size::new(50.0, 50.0))
}

/// A@(0,0) and B@(100,100), both 50×50.
fn two_nodes() -> MemoryCanvas {
    let mut canvas = MemoryCanvas::new();
    canvas.add_node(square("f_a", 0.0, 0.0));
    canvas.add_node(square("f_b", 100.0, 100.0));
    canvas
}

fn a() -> NodeId {
    NodeId::intern("f_a")
}

fn b() -> NodeId {
    NodeId::intern("f_b")
}

// ─── Fitting ─────────────────────────────────────────────────────────────

#[test]
fn frame_encloses_members_with_margin() {
    init_logging();
    let mut plugin = CommentPlugin::new(two_nodes());
    let frame = plugin.add_frame("group", [a(), b()]);

    // Union (0,0)-(150,150) grown by top 50, left 20, right 20, bottom 20.
    assert_eq!(
        plugin.get(frame).unwrap().rect(),
        Rect::new(-20.0, -50.0, 170.0, 170.0)
    );
}

#[test]
fn frame_refits_when_member_moves() {
    init_logging();
    let mut plugin = CommentPlugin::new(two_nodes());
    let frame = plugin.add_frame("group", [a(), b()]);

    assert!(plugin.translate_node(a(), 30.0, 30.0).unwrap());

    // A now spans (30,30)-(80,80); the union is (30,30)-(150,150).
    assert_eq!(
        plugin.get(frame).unwrap().rect(),
        Rect::new(10.0, -20.0, 170.0, 170.0)
    );
    // Members that caused the re-fit are not dragged along.
    assert_eq!(plugin.host.node_view(b()).unwrap().position, Point::new(100.0, 100.0));
}

#[test]
fn frame_refits_on_host_reported_move() {
    init_logging();
    let mut plugin = CommentPlugin::new(two_nodes());
    let frame = plugin.add_frame("group", [a(), b()]);

    let to = Point::new(-40.0, 0.0);
    let previous = plugin.host.translate_node(a(), to).unwrap();
    plugin
        .handle_event(HostEvent::NodeTranslated {
            id: a(),
            position: to,
            previous,
        })
        .unwrap();

    assert_eq!(
        plugin.get(frame).unwrap().rect(),
        Rect::new(-60.0, -50.0, 170.0, 170.0)
    );
}

#[test]
fn empty_frame_gets_default_size() {
    let mut plugin = CommentPlugin::new(two_nodes());
    let frame = plugin.add_frame("empty", Vec::<NodeId>::new());
    let rect = plugin.get(frame).unwrap().rect();
    assert_eq!((rect.width(), rect.height()), (100.0, 100.0));

    plugin.link_to(frame, [a()]).unwrap();
    plugin.link_to(frame, Vec::<NodeId>::new()).unwrap();
    let rect = plugin.get(frame).unwrap().rect();
    // Size resets, position stays where the last fit put it.
    assert_eq!(rect, Rect::new(-20.0, -50.0, 80.0, 50.0));
}

#[test]
fn frame_is_stacked_behind_nodes() {
    let mut plugin = CommentPlugin::new(two_nodes());
    let frame = plugin.add_frame("group", [a()]);
    assert_eq!(plugin.host.layers()[0], Layer::Comment(frame));
}

// ─── Dragging a frame ────────────────────────────────────────────────────

#[test]
fn moving_frame_drags_members() {
    init_logging();
    let mut plugin = CommentPlugin::new(two_nodes());
    let frame = plugin.add_frame("group", [a(), b()]);

    plugin.pick_comment(frame, Point::new(0.0, 0.0));
    plugin.drag_comment(frame, Point::new(15.0, -5.0)).unwrap();
    plugin.drop_comment(frame).unwrap();

    assert_eq!(plugin.host.node_view(a()).unwrap().position, Point::new(15.0, -5.0));
    assert_eq!(plugin.host.node_view(b()).unwrap().position, Point::new(115.0, 95.0));
    assert_eq!(
        plugin.get(frame).unwrap().rect(),
        Rect::new(-5.0, -55.0, 185.0, 165.0)
    );
}

#[test]
fn vetoed_link_stays_put() {
    init_logging();
    let mut plugin = CommentPlugin::new(two_nodes());
    let frame = plugin.add_frame("group", [a(), b()]);
    plugin.add_listener(|event: &CommentEvent| match event {
        CommentEvent::LinkTranslate { link, .. } if *link == NodeId::intern("f_a") => Flow::Veto,
        _ => Flow::Continue,
    });

    plugin.translate(frame, 10.0, 10.0).unwrap();

    assert_eq!(plugin.host.node_view(a()).unwrap().position, Point::new(0.0, 0.0));
    assert_eq!(plugin.host.node_view(b()).unwrap().position, Point::new(110.0, 110.0));
}

// ─── Membership ──────────────────────────────────────────────────────────

#[test]
fn dropping_node_inside_frame_links_it() {
    init_logging();
    let mut plugin = CommentPlugin::new(two_nodes());
    let frame = plugin.add_frame("group", [a(), b()]);

    plugin.host.add_node(square("f_c", 60.0, 10.0));
    let c = NodeId::intern("f_c");
    plugin.handle_event(HostEvent::NodeDragged { id: c }).unwrap();
    assert_eq!(plugin.get(frame).unwrap().links(), &[a(), b(), c]);

    plugin.host.add_node(square("f_far", 900.0, 900.0));
    let far = NodeId::intern("f_far");
    plugin.handle_event(HostEvent::NodeDragged { id: far }).unwrap();
    assert!(!plugin.get(frame).unwrap().linked_to(far));
}

#[test]
fn held_node_can_be_dragged_out_of_its_frame() {
    init_logging();
    let mut plugin = CommentPlugin::new(two_nodes());
    let frame = plugin.add_frame("group", [a(), b()]);

    // Host-side drag: the pointer holds B while it moves in steps.
    plugin.handle_event(HostEvent::NodePicked { id: b() }).unwrap();
    for _ in 0..10 {
        let previous = plugin.host.node_view(b()).unwrap().position;
        let to = previous.translated(100.0, 0.0);
        plugin.host.translate_node(b(), to);
        plugin
            .handle_event(HostEvent::NodeTranslated {
                id: b(),
                position: to,
                previous,
            })
            .unwrap();
    }
    // Still the original box while B is held.
    assert_eq!(
        plugin.get(frame).unwrap().rect(),
        Rect::new(-20.0, -50.0, 170.0, 170.0)
    );

    plugin.handle_event(HostEvent::NodeDragged { id: b() }).unwrap();
    assert_eq!(plugin.get(frame).unwrap().links(), &[a()]);
    assert_eq!(
        plugin.get(frame).unwrap().rect(),
        Rect::new(-20.0, -50.0, 70.0, 70.0)
    );
}

#[test]
fn eager_resize_follows_held_node() {
    init_logging();
    let config = CommentConfig {
        defer_frame_resize_while_picked: false,
        ..CommentConfig::default()
    };
    let mut plugin = CommentPlugin::with_config(two_nodes(), config);
    let frame = plugin.add_frame("group", [a(), b()]);

    plugin.handle_event(HostEvent::NodePicked { id: b() }).unwrap();
    plugin.translate_node(b(), 400.0, 0.0).unwrap();
    plugin.handle_event(HostEvent::NodeDragged { id: b() }).unwrap();

    assert!(plugin.get(frame).unwrap().linked_to(b()));
    assert_eq!(plugin.get(frame).unwrap().rect().right, 570.0);
}

#[test]
fn removing_member_refits_frame() {
    init_logging();
    let mut plugin = CommentPlugin::new(two_nodes());
    let log = EventLog::new();
    plugin.add_listener(log.clone());
    let frame = plugin.add_frame("group", [a(), b()]);

    plugin.host.remove_node(b());
    plugin.handle_event(HostEvent::NodeRemoved { id: b() }).unwrap();

    assert_eq!(plugin.get(frame).unwrap().links(), &[a()]);
    assert_eq!(
        plugin.get(frame).unwrap().rect(),
        Rect::new(-20.0, -50.0, 70.0, 70.0)
    );
    assert_eq!(log.translations_of(frame), 1);
}

#[test]
fn reorder_keeps_frames_at_the_back() {
    let mut plugin = CommentPlugin::new(two_nodes());
    let frame = plugin.add_frame("group", [a()]);
    let inline = plugin.add_inline("note", Point::new(0.0, -30.0), Some(b()));

    plugin.handle_event(HostEvent::Reordered { node: a() }).unwrap();
    plugin.handle_event(HostEvent::Reordered { node: b() }).unwrap();

    assert_eq!(
        plugin.host.layers(),
        &[
            Layer::Comment(frame),
            Layer::Node(a()),
            Layer::Node(b()),
            Layer::Comment(inline),
        ]
    );
}

//! Integration tests: inline comments attaching to nodes by drag and drop.

use nc_core::{GraphNode, NodeId, Point, Size};
use nc_editor::{CommentEvent, CommentPlugin, EventLog, HostEvent, MemoryCanvas, NodeHost};
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn canvas() -> MemoryCanvas {
    let mut canvas = MemoryCanvas::new();
    canvas.add_node(GraphNode::new(
        NodeId::intern("i_n"),
        "N",
        Point::new(200.0, 200.0),
        Size::new(50.0, 50.0),
    ));
    canvas.add_node(GraphNode::new(
        NodeId::intern("i_m"),
        "M",
        Point::new(220.0, 220.0),
        Size::new(50.0, 50.0),
    ));
    canvas
}

fn n() -> NodeId {
    NodeId::intern("i_n")
}

fn drag(plugin: &mut CommentPlugin<MemoryCanvas>, id: nc_core::CommentId, from: Point, to: Point) {
    assert!(plugin.pick_comment(id, from));
    plugin.drag_comment(id, to).unwrap();
    plugin.drop_comment(id).unwrap();
}

#[test]
fn drop_links_then_unlinks() {
    init_logging();
    let mut plugin = CommentPlugin::new(canvas());
    let note = plugin.add_inline("note", Point::new(0.0, 0.0), None);
    assert!(plugin.get(note).unwrap().links().is_empty());

    drag(&mut plugin, note, Point::new(0.0, 0.0), Point::new(190.0, 190.0));
    assert_eq!(plugin.get(note).unwrap().links(), &[n()]);

    drag(&mut plugin, note, Point::new(190.0, 190.0), Point::new(600.0, 600.0));
    assert!(plugin.get(note).unwrap().links().is_empty());
}

#[test]
fn first_node_in_view_order_wins() {
    init_logging();
    let mut plugin = CommentPlugin::new(canvas());
    // Overlaps both N and M.
    let note = plugin.add_inline("note", Point::new(0.0, 0.0), None);
    drag(&mut plugin, note, Point::new(0.0, 0.0), Point::new(225.0, 225.0));
    assert_eq!(plugin.get(note).unwrap().links(), &[n()]);
}

#[test]
fn inline_follows_linked_node() {
    init_logging();
    let mut plugin = CommentPlugin::new(canvas());
    let log = EventLog::new();
    plugin.add_listener(log.clone());
    let note = plugin.add_inline("note", Point::new(190.0, 170.0), Some(n()));

    plugin.translate_node(n(), -10.0, 5.0).unwrap();

    assert_eq!(plugin.get(note).unwrap().position, Point::new(180.0, 175.0));
    let last = log.events().pop().unwrap();
    assert!(matches!(
        last,
        CommentEvent::Translated { id, sources, .. } if id == note && sources.as_slice() == [n()]
    ));
}

#[test]
fn moving_inline_does_not_move_its_node() {
    let mut plugin = CommentPlugin::new(canvas());
    let note = plugin.add_inline("note", Point::new(190.0, 170.0), Some(n()));
    plugin.translate(note, 50.0, 0.0).unwrap();
    assert_eq!(plugin.host.node_view(n()).unwrap().position, Point::new(200.0, 200.0));
}

#[test]
fn removing_linked_node_clears_links() {
    init_logging();
    let mut plugin = CommentPlugin::new(canvas());
    let note = plugin.add_inline("note", Point::new(190.0, 170.0), Some(n()));

    plugin.host.remove_node(n());
    plugin.handle_event(HostEvent::NodeRemoved { id: n() }).unwrap();

    assert!(plugin.get(note).unwrap().links().is_empty());
    // Later events about the gone node are ignored.
    plugin.handle_event(HostEvent::NodeRemoved { id: n() }).unwrap();
    plugin.handle_event(HostEvent::Reordered { node: n() }).unwrap();
}

#[test]
fn inline_width_has_a_floor() {
    let mut plugin = CommentPlugin::new(canvas());
    let short = plugin.add_inline("hi", Point::default(), None);
    let long = plugin.add_inline("a considerably longer comment", Point::default(), None);

    let config = *plugin.config();
    assert_eq!(plugin.get(short).unwrap().rect().width(), config.inline_min_width);
    assert_eq!(plugin.get(long).unwrap().rect().width(), 29.0 * 8.0);
}

#[test]
fn editing_rerenders_text() {
    init_logging();
    let mut plugin = CommentPlugin::new(canvas());
    let note = plugin.add_inline("draft", Point::default(), None);

    plugin.host.answer_prompt(None);
    assert!(!plugin.context_menu(note).unwrap());
    assert_eq!(plugin.host.rendered(note).unwrap().text, "draft");

    plugin.host.answer_prompt(Some("final wording".into()));
    assert!(plugin.context_menu(note).unwrap());
    assert_eq!(plugin.get(note).unwrap().text, "final wording");
    assert_eq!(plugin.host.rendered(note).unwrap().text, "final wording");
}

#[test]
fn zoomed_out_selection_is_scaled_up() {
    let mut plugin = CommentPlugin::new(canvas());
    let note = plugin.add_inline("note", Point::default(), None);
    plugin.select(note);

    plugin.host.set_zoom(0.5);
    plugin.zoomed();
    assert_eq!(plugin.host.rendered(note).unwrap().scale, 2.0);

    plugin.unselect(note);
    assert_eq!(plugin.host.rendered(note).unwrap().scale, 1.0);
}

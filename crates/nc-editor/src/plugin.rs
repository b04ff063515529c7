//! Comment plugin: the comment registry and its reactions to the host editor.
//!
//! The plugin is the only owner of comments. Hosts feed it [`HostEvent`]s
//! and call its public API; it mutates comments, asks the host to move nodes
//! or re-stack elements, and announces every visible change as a
//! [`CommentEvent`] to registered listeners.
//!
//! ## Reactions
//!
//! | Host event | Reaction |
//! |------------|----------|
//! | node translated | linked inline comments follow the node; linked frames re-fit |
//! | node dragged (dropped) | every frame links the node if it overlaps, unlinks it otherwise |
//! | node removed | inline comments drop their link; frames drop the node and re-fit |
//! | reordered | linked comments re-stack next to (inline) or behind (frame) the node |
//!
//! A frame that moves drags its linked nodes along, except the nodes whose
//! movement caused it (`sources`). Node and comment translations go through a
//! [`TranslationTracker`], so a reaction triggered by a move that is already
//! in flight is skipped instead of bouncing back and forth.

use crate::events::{CommentEvent, CommentListener, Flow, HostEvent, PluginCommand};
use crate::host::{Host, Placement};
use crate::shortcuts::CommentAction;
use crate::tracker::{Tracked, TranslationTracker};
use nc_core::record::{records_from_json, records_to_json};
use nc_core::{
    Comment, CommentConfig, CommentError, CommentId, CommentKind, CommentRecord, CommentType,
    Links, NodeId, Point, Rect, intersects,
};
use smallvec::smallvec;
use std::collections::BTreeMap;

/// Text of comments created from a keyboard shortcut.
pub const DEFAULT_TEXT: &str = "...";

type EditFn = Box<dyn FnMut(&Comment) -> Option<String>>;

pub struct CommentPlugin<H: Host> {
    /// The host editor. Hosts that mutate nodes directly must report the
    /// change through [`CommentPlugin::handle_event`].
    pub host: H,

    config: CommentConfig,

    /// Registry, iterated in creation order.
    comments: BTreeMap<CommentId, Comment>,

    tracker: TranslationTracker,

    listeners: Vec<Box<dyn CommentListener>>,

    /// Text editor used by `edit_comment`. Falls back to the host's prompt.
    edit: Option<EditFn>,

    /// Nodes currently held by the pointer.
    picked: Vec<NodeId>,

    /// Most recently picked or selected comment.
    focused: Option<CommentId>,
}

impl<H: Host> CommentPlugin<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, CommentConfig::default())
    }

    pub fn with_config(host: H, config: CommentConfig) -> Self {
        Self {
            host,
            config,
            comments: BTreeMap::new(),
            tracker: TranslationTracker::new(),
            listeners: Vec::new(),
            edit: None,
            picked: Vec::new(),
            focused: None,
        }
    }

    /// Use `edit` instead of the host prompt to collect new comment text.
    /// Returning `None` cancels the edit.
    pub fn with_editor<F>(mut self, edit: F) -> Self
    where
        F: FnMut(&Comment) -> Option<String> + 'static,
    {
        self.edit = Some(Box::new(edit));
        self
    }

    pub fn add_listener<L: CommentListener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &CommentConfig {
        &self.config
    }

    pub fn get(&self, id: CommentId) -> Option<&Comment> {
        self.comments.get(&id)
    }

    /// All comments in creation order.
    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.comments.values()
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn tracker(&self) -> &TranslationTracker {
        &self.tracker
    }

    pub fn focused(&self) -> Option<CommentId> {
        self.focused
    }

    /// Comments linked to `node`, in registry order.
    pub fn linked_comments(&self, node: NodeId) -> Vec<CommentId> {
        self.comments
            .values()
            .filter(|c| c.linked_to(node))
            .map(Comment::id)
            .collect()
    }

    // ─── Creation & removal ──────────────────────────────────────────────

    pub fn add_inline(
        &mut self,
        text: impl Into<String>,
        position: Point,
        link: Option<NodeId>,
    ) -> CommentId {
        let mut comment = Comment::inline(text, position);
        comment.link_to(self.known_nodes(link));
        self.insert(comment)
    }

    /// Add a frame fitted around `links`.
    pub fn add_frame<I>(&mut self, text: impl Into<String>, links: I) -> CommentId
    where
        I: IntoIterator<Item = NodeId>,
    {
        self.add_frame_at(text.into(), Point::default(), links)
    }

    fn add_frame_at<I>(&mut self, text: String, position: Point, links: I) -> CommentId
    where
        I: IntoIterator<Item = NodeId>,
    {
        let mut comment = Comment::frame(text, &self.config);
        comment.position = position;
        comment.link_to(self.known_nodes(links));

        // Not registered yet, so the initial fit is applied silently.
        let members = self.member_rects(comment.links());
        let origin = comment.position;
        if let CommentKind::Frame(frame) = &mut comment.kind {
            let (dx, dy) = frame.fit(origin, members, &self.config);
            comment.apply_translation(dx, dy);
        }

        let id = self.insert(comment);
        self.host.reorder(id, Placement::Back);
        id
    }

    fn insert(&mut self, mut comment: Comment) -> CommentId {
        let id = comment.id();
        let measured = self.host.measure_text(&comment.text);
        comment.set_measured_size(measured, &self.config);

        self.host.attach(&comment);
        self.comments.insert(id, comment);
        self.render(id);

        log::debug!("created {id}");
        self.notify(CommentEvent::Created { id });
        id
    }

    /// Remove a comment. Returns false if it does not exist.
    pub fn delete(&mut self, id: CommentId) -> bool {
        let Some(selected) = self.comments.get(&id).map(Comment::is_selected) else {
            return false;
        };
        if selected {
            self.unselect(id);
        }
        self.host.detach(id);
        if let Some(comment) = self.comments.remove(&id) {
            comment.destroy();
        }
        self.tracker.forget(Tracked::Comment(id));
        if self.focused == Some(id) {
            self.focused = None;
        }

        log::debug!("removed {id}");
        self.notify(CommentEvent::Removed { id });
        true
    }

    pub fn delete_focused(&mut self) -> bool {
        match self.focused {
            Some(id) => self.delete(id),
            None => false,
        }
    }

    pub fn clear(&mut self) {
        let ids: Vec<CommentId> = self.comments.keys().copied().collect();
        for id in ids {
            self.delete(id);
        }
    }

    // ─── Linking ─────────────────────────────────────────────────────────

    /// Replace a comment's links. Frames re-fit immediately, so their
    /// rectangle is never stale after this call.
    pub fn link_to<I>(&mut self, id: CommentId, ids: I) -> Result<(), CommentError>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let links = self.known_nodes(ids);
        let comment = self
            .comments
            .get_mut(&id)
            .ok_or(CommentError::UnknownComment(id))?;
        comment.link_to(links);

        if comment.is_frame() {
            self.resize(id)?;
        }
        Ok(())
    }

    /// Fit a frame to the bounding box of its linked nodes.
    ///
    /// The frame is moved through its own translate path with its links as
    /// `sources`: listeners still see the move, and the nodes that define the
    /// box are not dragged along.
    pub fn resize(&mut self, id: CommentId) -> Result<(), CommentError> {
        let sources = match self.comments.get(&id) {
            Some(comment) => Links::from_slice(comment.links()),
            None => return Err(CommentError::UnknownComment(id)),
        };
        let members = self.member_rects(&sources);

        let Some(comment) = self.comments.get_mut(&id) else {
            return Err(CommentError::UnknownComment(id));
        };
        let origin = comment.position;
        let CommentKind::Frame(frame) = &mut comment.kind else {
            return Ok(());
        };
        let (dx, dy) = frame.fit(origin, members, &self.config);

        if dx == 0.0 && dy == 0.0 {
            // Size may still have changed: announce and re-render anyway.
            self.move_comment(id, 0.0, 0.0, sources)
        } else {
            self.tracked_translate_comment(id, dx, dy, sources)
                .map(|_| ())
        }
    }

    fn known_nodes<I>(&self, ids: I) -> Links
    where
        I: IntoIterator<Item = NodeId>,
    {
        ids.into_iter()
            .filter(|id| {
                let known = self.host.node_view(*id).is_some();
                if !known {
                    log::warn!("ignoring link to unknown node {id}");
                }
                known
            })
            .collect()
    }

    fn member_rects(&self, links: &[NodeId]) -> Vec<Rect> {
        links
            .iter()
            .filter_map(|id| self.host.node_view(*id))
            .map(|view| view.rect())
            .collect()
    }

    // ─── Translation ─────────────────────────────────────────────────────

    /// Move a comment by a delta. A zero delta does nothing and returns
    /// `Ok(false)`.
    pub fn translate(&mut self, id: CommentId, dx: f64, dy: f64) -> Result<bool, CommentError> {
        self.tracked_translate_comment(id, dx, dy, Links::new())
    }

    /// Move a node by a delta and run the comment reactions to that move.
    /// A zero delta does nothing and returns `Ok(false)`.
    pub fn translate_node(&mut self, id: NodeId, dx: f64, dy: f64) -> Result<bool, CommentError> {
        let view = self
            .host
            .node_view(id)
            .ok_or(CommentError::UnknownNode(id))?;
        let Some(token) = self.tracker.begin(Tracked::Node(id), dx, dy) else {
            return Ok(false);
        };

        let to = view.position.translated(dx, dy);
        let result = match self.host.translate_node(id, to) {
            Some(previous) => self.handle_event(HostEvent::NodeTranslated {
                id,
                position: to,
                previous,
            }),
            None => Err(CommentError::UnknownNode(id)),
        };
        self.tracker.finish(token);
        result.map(|()| true)
    }

    fn tracked_translate_comment(
        &mut self,
        id: CommentId,
        dx: f64,
        dy: f64,
        sources: Links,
    ) -> Result<bool, CommentError> {
        if !self.comments.contains_key(&id) {
            return Err(CommentError::UnknownComment(id));
        }
        let Some(token) = self.tracker.begin(Tracked::Comment(id), dx, dy) else {
            return Ok(false);
        };
        let result = self.move_comment(id, dx, dy, sources);
        self.tracker.finish(token);
        result.map(|()| true)
    }

    /// Untracked translate: move, propagate, announce, re-render.
    fn move_comment(
        &mut self,
        id: CommentId,
        dx: f64,
        dy: f64,
        sources: Links,
    ) -> Result<(), CommentError> {
        let comment = self
            .comments
            .get_mut(&id)
            .ok_or(CommentError::UnknownComment(id))?;
        comment.apply_translation(dx, dy);
        log::trace!("{id} moved by ({dx}, {dy}), sources {sources:?}");

        self.propagate_to_links(id, dx, dy, &sources)?;
        self.notify(CommentEvent::Translated {
            id,
            dx,
            dy,
            sources,
        });
        self.render(id);
        Ok(())
    }

    /// Drag a frame's linked nodes along, skipping the nodes that caused the
    /// move, nodes a listener vetoes, and nodes already mid-translation.
    fn propagate_to_links(
        &mut self,
        id: CommentId,
        dx: f64,
        dy: f64,
        sources: &[NodeId],
    ) -> Result<(), CommentError> {
        let targets: Vec<NodeId> = match self.comments.get(&id) {
            Some(comment) if comment.is_frame() => comment
                .links()
                .iter()
                .copied()
                .filter(|link| !sources.contains(link))
                .collect(),
            _ => return Ok(()),
        };

        for link in targets {
            if self.host.node_view(link).is_none() {
                continue;
            }
            if self.notify(CommentEvent::LinkTranslate { id, link }) == Flow::Veto {
                log::trace!("{id} → {link} vetoed");
                continue;
            }
            if self.tracker.is_translating(Tracked::Node(link)) {
                continue;
            }
            self.translate_node(link, dx, dy)?;
        }
        Ok(())
    }

    // ─── Host events ─────────────────────────────────────────────────────

    /// React to an event from the host editor. Events about nodes no comment
    /// links to are ignored.
    pub fn handle_event(&mut self, event: HostEvent) -> Result<(), CommentError> {
        match event {
            HostEvent::NodePicked { id } => {
                if !self.picked.contains(&id) {
                    self.picked.push(id);
                }
                Ok(())
            }
            HostEvent::NodeTranslated {
                id,
                position,
                previous,
            } => self.on_node_translated(id, position.x - previous.x, position.y - previous.y),
            HostEvent::NodeDragged { id } => self.on_node_dragged(id),
            HostEvent::NodeRemoved { id } => self.on_node_removed(id),
            HostEvent::Reordered { node } => {
                self.on_reordered(node);
                Ok(())
            }
        }
    }

    fn on_node_translated(&mut self, id: NodeId, dx: f64, dy: f64) -> Result<(), CommentError> {
        for cid in self.linked_comments(id) {
            let Some(comment) = self.comments.get(&cid) else {
                continue;
            };
            let target = Tracked::Comment(cid);

            if comment.is_frame() {
                if self.tracker.is_resizing(target) {
                    log::trace!("{cid} already re-fitting, skip");
                    continue;
                }
                if self.config.defer_frame_resize_while_picked && self.picked.contains(&id) {
                    continue;
                }
                self.resize(cid)?;
            } else {
                if self.tracker.is_translating(target) {
                    continue;
                }
                self.tracked_translate_comment(cid, dx, dy, smallvec![id])?;
            }
        }
        Ok(())
    }

    fn on_node_dragged(&mut self, id: NodeId) -> Result<(), CommentError> {
        let node_rect = self.host.node_view(id).map(|view| view.rect());
        let frames: Vec<CommentId> = self
            .comments
            .values()
            .filter(|c| c.is_frame())
            .map(Comment::id)
            .collect();

        for fid in frames {
            let Some(frame) = self.comments.get(&fid) else {
                continue;
            };
            let hit = node_rect.is_some_and(|rect| frame.intersects(&rect));
            let mut links: Links = frame.links().iter().copied().filter(|n| *n != id).collect();
            if hit {
                links.push(id);
            }
            self.link_to(fid, links)?;
        }

        self.picked.retain(|p| *p != id);
        Ok(())
    }

    fn on_node_removed(&mut self, id: NodeId) -> Result<(), CommentError> {
        for cid in self.linked_comments(id) {
            let Some(comment) = self.comments.get(&cid) else {
                continue;
            };
            let links: Links = match comment.kind {
                CommentKind::Inline(_) => Links::new(),
                CommentKind::Frame(_) => comment.links().iter().copied().filter(|n| *n != id).collect(),
            };
            self.link_to(cid, links)?;
        }

        self.picked.retain(|p| *p != id);
        self.tracker.forget(Tracked::Node(id));
        Ok(())
    }

    fn on_reordered(&mut self, node: NodeId) {
        for cid in self.linked_comments(node) {
            let placement = match self.comments.get(&cid).map(|c| &c.kind) {
                Some(CommentKind::Frame(_)) => Placement::Back,
                Some(CommentKind::Inline(_)) => Placement::After(node),
                None => continue,
            };
            self.host.reorder(cid, placement);
        }
    }

    // ─── Pointer interaction ─────────────────────────────────────────────

    /// Start dragging a comment: re-stack it, focus it and select it.
    pub fn pick_comment(&mut self, id: CommentId, pointer: Point) -> bool {
        let Some(comment) = self.comments.get_mut(&id) else {
            return false;
        };
        comment.on_pick_start(pointer);
        let placement = if comment.is_frame() {
            Placement::Back
        } else {
            Placement::Front
        };
        self.host.reorder(id, placement);
        self.select(id)
    }

    /// Follow the pointer during a drag. Returns whether the comment moved.
    pub fn drag_comment(&mut self, id: CommentId, pointer: Point) -> Result<bool, CommentError> {
        let comment = self
            .comments
            .get_mut(&id)
            .ok_or(CommentError::UnknownComment(id))?;
        match comment.on_pointer_move(pointer) {
            Some((dx, dy)) => self.translate(id, dx, dy),
            None => Ok(false),
        }
    }

    /// Finish a drag. An inline comment links to the first node view (in view
    /// order) its rectangle overlaps, or unlinks if it overlaps none.
    pub fn drop_comment(&mut self, id: CommentId) -> Result<(), CommentError> {
        let comment = self
            .comments
            .get_mut(&id)
            .ok_or(CommentError::UnknownComment(id))?;
        if !comment.on_drop() || !comment.is_inline() {
            return Ok(());
        }

        let rect = comment.rect();
        let hit = self.host.node_ids().into_iter().find(|node| {
            self.host
                .node_view(*node)
                .is_some_and(|view| intersects(&rect, &view.rect()))
        });
        log::debug!("{id} dropped, linked to {hit:?}");
        self.link_to(id, hit)
    }

    pub fn context_menu(&mut self, id: CommentId) -> Result<bool, CommentError> {
        self.edit_comment(id)
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select(&mut self, id: CommentId) -> bool {
        let Some(comment) = self.comments.get_mut(&id) else {
            return false;
        };
        comment.select();
        self.focused = Some(id);
        self.render(id);
        self.notify(CommentEvent::Selected { id });
        true
    }

    pub fn unselect(&mut self, id: CommentId) -> bool {
        let Some(comment) = self.comments.get_mut(&id) else {
            return false;
        };
        comment.unselect();
        if self.focused == Some(id) {
            self.focused = None;
        }
        self.render(id);
        self.notify(CommentEvent::Unselected { id });
        true
    }

    // ─── Editing ─────────────────────────────────────────────────────────

    /// Ask for new text and apply it. Returns `Ok(false)` when the edit was
    /// cancelled, leaving the text unchanged.
    pub fn edit_comment(&mut self, id: CommentId) -> Result<bool, CommentError> {
        if !self.comments.contains_key(&id) {
            return Err(CommentError::UnknownComment(id));
        }
        self.notify(CommentEvent::Edit { id });

        let comment = self
            .comments
            .get(&id)
            .ok_or(CommentError::UnknownComment(id))?;
        let new_text = match self.edit.as_mut() {
            Some(edit) => edit(comment),
            None => self.host.prompt("Edit comment", &comment.text),
        };
        let Some(text) = new_text else {
            log::debug!("edit of {id} cancelled");
            return Ok(false);
        };

        if let Some(comment) = self.comments.get_mut(&id) {
            comment.text = text;
        }
        self.refresh(id);
        self.move_comment(id, 0.0, 0.0, Links::new())?;
        Ok(true)
    }

    // ─── Commands & shortcuts ────────────────────────────────────────────

    /// Run a shortcut action. `pointer` is the canvas pointer position and
    /// `selection` the host's selected nodes. Returns the created comment.
    pub fn apply_action(
        &mut self,
        action: CommentAction,
        pointer: Point,
        selection: &[NodeId],
    ) -> Option<CommentId> {
        match action {
            CommentAction::AddInlineAtPointer => Some(self.add_inline(DEFAULT_TEXT, pointer, None)),
            CommentAction::AddFrameFromSelection => {
                Some(self.add_frame(DEFAULT_TEXT, selection.iter().copied()))
            }
            CommentAction::DeleteFocused => {
                self.delete_focused();
                None
            }
        }
    }

    /// Re-render every comment after the canvas zoom changed.
    pub fn zoomed(&mut self) {
        let ids: Vec<CommentId> = self.comments.keys().copied().collect();
        for id in ids {
            self.render(id);
        }
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn export(&self) -> Vec<CommentRecord> {
        self.comments.values().map(Comment::to_record).collect()
    }

    pub fn export_json(&self) -> Result<String, CommentError> {
        records_to_json(&self.export())
    }

    /// Replace all comments with `records`. Every comment gets a fresh id;
    /// links to nodes the host does not know are dropped.
    pub fn import(&mut self, records: &[CommentRecord]) -> Vec<CommentId> {
        self.clear();
        records
            .iter()
            .map(|record| {
                let position = Point::new(record.position[0], record.position[1]);
                match record.kind {
                    CommentType::Inline => {
                        self.add_inline(record.text.clone(), position, record.links.first().copied())
                    }
                    CommentType::Frame => {
                        self.add_frame_at(record.text.clone(), position, record.links.iter().copied())
                    }
                }
            })
            .collect()
    }

    pub fn import_json(&mut self, json: &str) -> Result<Vec<CommentId>, CommentError> {
        let records = records_from_json(json)?;
        Ok(self.import(&records))
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn render(&mut self, id: CommentId) {
        if let Some(comment) = self.comments.get(&id) {
            let scale = comment.display_scale(self.host.zoom());
            self.host.render(comment, scale);
        }
    }

    /// Re-measure text, then re-render.
    fn refresh(&mut self, id: CommentId) {
        if let Some(comment) = self.comments.get_mut(&id) {
            let measured = self.host.measure_text(&comment.text);
            comment.set_measured_size(measured, &self.config);
        }
        self.render(id);
    }

    /// Deliver `event` to listeners in registration order, stopping at the
    /// first veto, then run the commands they queued.
    fn notify(&mut self, event: CommentEvent) -> Flow {
        let mut commands = Vec::new();
        let mut flow = Flow::Continue;
        for listener in &mut self.listeners {
            if listener.on_event(&event, &mut commands) == Flow::Veto {
                flow = Flow::Veto;
                break;
            }
        }
        self.run_commands(commands);
        flow
    }

    fn run_commands(&mut self, commands: Vec<PluginCommand>) {
        for command in commands {
            let result = match command {
                PluginCommand::TranslateComment { id, dx, dy } => {
                    if self.tracker.is_translating(Tracked::Comment(id)) {
                        continue;
                    }
                    self.translate(id, dx, dy).map(|_| ())
                }
                PluginCommand::TranslateNode { id, dx, dy } => {
                    if self.tracker.is_translating(Tracked::Node(id)) {
                        continue;
                    }
                    self.translate_node(id, dx, dy).map(|_| ())
                }
                PluginCommand::Unselect(id) => {
                    self.unselect(id);
                    Ok(())
                }
            };
            if let Err(err) = result {
                log::warn!("listener command failed: {err}");
            }
        }
    }
}

pub mod canvas;
pub mod events;
pub mod host;
pub mod plugin;
pub mod selectable;
pub mod shortcuts;
pub mod tracker;

pub use canvas::{Layer, MemoryCanvas, RenderedComment};
pub use events::{CommentEvent, CommentListener, EventLog, Flow, HostEvent, PluginCommand};
pub use host::{Host, NodeHost, NodeView, Placement, RenderSurface};
pub use plugin::{CommentPlugin, DEFAULT_TEXT};
pub use selectable::{Entity, SelectionSync, Selector};
pub use shortcuts::{CommentAction, ShortcutMap};
pub use tracker::{Tracked, TrackedMove, TranslationTracker};

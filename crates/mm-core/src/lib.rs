pub mod id;
pub mod model;
pub mod snapshot;
pub mod view;

pub use id::{EntityId, IdAllocator};
pub use model::{Connection, DEFAULT_NODE_TEXT, GraphModel, Node};
pub use snapshot::{ConnectionRecord, NodeRecord, Snapshot, ViewState};
pub use view::{MAX_SCALE, MIN_SCALE, ViewTransform, ZOOM_STEP_IN, ZOOM_STEP_OUT};

pub mod export;
pub mod store;

pub use export::{export_snapshot, import_snapshot};
pub use store::{JsonFileStore, MemoryStore, SnapshotStore, StoreError};

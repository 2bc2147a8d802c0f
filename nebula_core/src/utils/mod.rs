mod ref_count;

pub use ref_count::{RefCount, SyncRefCount};

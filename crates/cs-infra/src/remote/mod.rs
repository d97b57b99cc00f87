pub mod http;
pub mod memory;

pub use http::{HttpRemoteStore, HttpRemoteStoreConfig};
pub use memory::InMemoryRemoteStore;

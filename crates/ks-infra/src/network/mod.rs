pub mod http_key_retrieval;
pub mod peer_registry;

pub use http_key_retrieval::HttpKeyRetrieval;
pub use peer_registry::InMemoryPeerRegistry;

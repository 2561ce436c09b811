// towdesk-api: document-store adapters (Firestore REST + in-memory) and identity client

pub mod endpoint;
pub mod error;
pub mod firestore;
pub mod identity;
pub mod memory;
pub mod store;
pub mod transport;
pub mod value;

pub use endpoint::Endpoint;
pub use error::{Error, StoreError};
pub use firestore::FirestoreClient;
pub use identity::IdentityClient;
pub use memory::InMemoryStore;
pub use store::DocumentStore;
pub use transport::{TlsMode, TransportConfig};
pub use value::{Document, DocumentRef, Fields, GeoPoint, Value};

// Firestore REST adapter.
//
// Base path: /v1/projects/{project}/databases/{database}/documents/
// Auth: `key` query parameter (production) or `Bearer owner` (emulator)

mod client;
pub(crate) mod codec;

pub use client::FirestoreClient;

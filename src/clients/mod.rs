pub mod ai;

pub use ai::{create_backend, BackendProvider, CompletionBackend, CredentialProvider, StaticCredentials};

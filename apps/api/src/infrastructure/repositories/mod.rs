// Repository implementations (data access layer)
// Store adapters implementing the domain DocumentStore port, plus the typed
// repositories built on top of it

pub mod document_repository;
pub mod memory_document_store;
pub mod postgres_document_store;
pub mod singleton_repository;

pub use document_repository::DocumentRepository;
pub use memory_document_store::MemoryDocumentStore;
pub use postgres_document_store::PostgresDocumentStore;
pub use singleton_repository::SingletonRepository;

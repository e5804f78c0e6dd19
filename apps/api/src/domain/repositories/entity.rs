use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record stored in its own collection and addressed by a generated id
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Collection the records live in
    const COLLECTION: &'static str;
    /// Human-readable name used in error messages
    const NAME: &'static str;

    fn id(&self) -> &str;
}

/// A record of which at most one instance exists, stored under a fixed key
pub trait SingletonEntity: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;
    /// Value of the `id` field of the single document
    const KEY: &'static str;
    /// Field stamped with the current time on every update
    const UPDATED_AT_FIELD: &'static str = "updatedAt";
}

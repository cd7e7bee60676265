pub(crate) mod query_cache;
pub(crate) mod query_key;

pub(crate) use query_cache::{QueryCache, QueryPhase};
pub(crate) use query_key::{NotesKey, NOTES_NAMESPACE};

use crate::models::NotePage;

/// Something a [`QueryCache`] can be addressed by.
///
/// The namespace is the first segment of the key and is what prefix
/// invalidation matches on.
pub(crate) trait CacheKey: Clone + Eq + std::hash::Hash + std::fmt::Debug {
    fn namespace(&self) -> &'static str;
}

pub(crate) type NotesCache = QueryCache<NotesKey, NotePage>;

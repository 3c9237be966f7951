use crate::models::JobRecord;
use crate::storage::KeyValueStore;
use std::sync::Arc;

const BOOKMARKS_KEY: &str = "bookmarkedJobs";

// All persistence side effects for bookmarks funnel through here; callers
// never touch the key-value store directly.
#[derive(Clone)]
pub struct BookmarkStore {
    storage: Arc<dyn KeyValueStore>,
}

impl BookmarkStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub fn is_bookmarked(&self, id: &str) -> bool {
        self.read_all().iter().any(|job| job.id == id && job.bookmarked)
    }

    // True toggle: flips the flag on a returned copy and mirrors the change
    // to storage before returning. Never fails; storage trouble degrades to a
    // warning and the in-memory copy stays authoritative for this session.
    pub fn toggle(&self, job: &JobRecord) -> JobRecord {
        let mut updated = job.clone();
        updated.bookmarked = !job.bookmarked;

        let mut entries = self.read_all();
        entries.retain(|entry| entry.id != updated.id);
        if updated.bookmarked {
            entries.push(updated.clone());
        }

        if entries.is_empty() {
            if let Err(error) = self.storage.remove(BOOKMARKS_KEY) {
                tracing::warn!(error = %error, "failed to clear bookmark storage");
            }
        } else {
            self.write_all(&entries);
        }

        updated
    }

    pub fn list_bookmarked(&self) -> Vec<JobRecord> {
        self.read_all()
            .into_iter()
            .filter(|job| job.bookmarked)
            .collect()
    }

    fn read_all(&self) -> Vec<JobRecord> {
        match self.storage.get(BOOKMARKS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                tracing::warn!(error = %error, "corrupt bookmark payload, treating as empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(error) => {
                tracing::warn!(error = %error, "bookmark storage read failed, treating as empty");
                Vec::new()
            }
        }
    }

    fn write_all(&self, entries: &[JobRecord]) {
        let payload = match serde_json::to_string(entries) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::warn!(error = %error, "failed to serialize bookmarks");
                return;
            }
        };
        if let Err(error) = self.storage.set(BOOKMARKS_KEY, &payload) {
            tracing::warn!(error = %error, "bookmark storage write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BookmarkStore, BOOKMARKS_KEY};
    use crate::errors::{AppError, AppResult};
    use crate::models::JobRecord;
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    fn job(id: &str) -> JobRecord {
        JobRecord {
            id: id.to_string(),
            job_title: "Backend Engineer".to_string(),
            company_name: "Acme".to_string(),
            location: "Austin, TX".to_string(),
            job_description: "APIs".to_string(),
            requirements: "Rust".to_string(),
            date_posted: None,
            salary: None,
            tags: None,
            company_logo_url: None,
            bookmarked: false,
            coordinates: None,
            extra: Default::default(),
        }
    }

    #[test]
    fn toggle_is_an_involution() {
        let store = BookmarkStore::new(Arc::new(MemoryStore::new()));
        let original = job("a-000");

        let on = store.toggle(&original);
        assert!(on.bookmarked);
        assert!(store.is_bookmarked("a-000"));

        let off = store.toggle(&on);
        assert_eq!(off.bookmarked, original.bookmarked);
        assert!(!store.is_bookmarked("a-000"));
        assert!(store.list_bookmarked().is_empty());
    }

    #[test]
    fn toggled_on_entries_survive_a_fresh_store_over_the_same_backend() {
        let backend = Arc::new(MemoryStore::new());
        let store = BookmarkStore::new(backend.clone());
        store.toggle(&job("a-000"));

        let reopened = BookmarkStore::new(backend);
        assert!(reopened.is_bookmarked("a-000"));
        assert_eq!(reopened.list_bookmarked().len(), 1);
    }

    #[test]
    fn unbookmarking_the_last_entry_clears_the_storage_key() {
        let backend = Arc::new(MemoryStore::new());
        let store = BookmarkStore::new(backend.clone());

        let on = store.toggle(&job("a-000"));
        assert!(backend.get(BOOKMARKS_KEY).expect("get").is_some());

        store.toggle(&on);
        assert!(backend.get(BOOKMARKS_KEY).expect("get").is_none());
    }

    #[test]
    fn corrupt_payload_degrades_to_empty() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(BOOKMARKS_KEY, "not json at all").expect("seed");

        let store = BookmarkStore::new(backend);
        assert!(store.list_bookmarked().is_empty());
        assert!(!store.is_bookmarked("a-000"));

        // A toggle over the corrupt payload starts from a clean slate.
        let on = store.toggle(&job("a-000"));
        assert!(on.bookmarked);
        assert_eq!(store.list_bookmarked().len(), 1);
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> AppResult<Option<String>> {
            Err(AppError::Storage("disk on fire".to_string()))
        }
        fn set(&self, _key: &str, _value: &str) -> AppResult<()> {
            Err(AppError::Storage("disk on fire".to_string()))
        }
        fn remove(&self, _key: &str) -> AppResult<()> {
            Err(AppError::Storage("disk on fire".to_string()))
        }
    }

    #[test]
    fn storage_failures_never_escape_the_public_operations() {
        let store = BookmarkStore::new(Arc::new(BrokenStore));
        assert!(!store.is_bookmarked("a-000"));
        assert!(store.list_bookmarked().is_empty());

        let flipped = store.toggle(&job("a-000"));
        assert!(flipped.bookmarked);
    }
}

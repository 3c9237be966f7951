use crate::bookmarks::BookmarkStore;
use crate::catalog::JobCatalog;
use crate::errors::{AppError, AppResult};
use crate::models::{BrowsePhase, BrowserSnapshot, FilterState, JobRecord, MapMarker, SearchScope};
use crate::search::filter_jobs;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct BrowserState {
    jobs: Vec<JobRecord>,
    filtered: Vec<JobRecord>,
    filter: FilterState,
    selected_job_id: Option<String>,
    panel_visible: bool,
    loaded: bool,
}

// Explicit state machine over the listing, detail panel and map surfaces.
// All transitions are synchronous; the only await point is the initial load.
pub struct BrowserCore {
    catalog: Arc<JobCatalog>,
    bookmarks: BookmarkStore,
    generation: AtomicU64,
    state: Mutex<BrowserState>,
}

impl BrowserCore {
    pub fn new(catalog: Arc<JobCatalog>, bookmarks: BookmarkStore) -> Self {
        Self {
            catalog,
            bookmarks,
            generation: AtomicU64::new(0),
            state: Mutex::new(BrowserState::default()),
        }
    }

    // Loads the dataset and reconciles bookmark flags from storage. A search
    // term typed while the fetch was in flight is re-applied to the fresh
    // dataset rather than dropped. If the view was detached mid-fetch the
    // result is discarded without touching state.
    pub async fn load(&self) -> AppResult<()> {
        let generation = self.generation.load(Ordering::SeqCst);
        let dataset = self.catalog.load_all().await?;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("stale dataset load discarded after detach");
            return Ok(());
        }

        let saved: HashSet<String> = self
            .bookmarks
            .list_bookmarked()
            .into_iter()
            .map(|job| job.id)
            .collect();

        let mut jobs = (*dataset).clone();
        for job in &mut jobs {
            job.bookmarked = saved.contains(&job.id);
        }

        let mut state = self.lock()?;
        let state = &mut *state;
        state.filtered = filter_jobs(&jobs, &state.filter.term, state.filter.scope);
        state.jobs = jobs;
        state.loaded = true;
        Ok(())
    }

    // Marks any in-flight load as irrelevant; the embedding shell calls this
    // when the view unmounts.
    pub fn detach(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn search(&self, term: &str) -> AppResult<()> {
        let mut state = self.lock()?;
        let state = &mut *state;
        state.filter.term = term.to_string();
        state.filtered = filter_jobs(&state.jobs, &state.filter.term, state.filter.scope);
        Ok(())
    }

    pub fn set_scope(&self, scope: SearchScope) -> AppResult<()> {
        let mut state = self.lock()?;
        let state = &mut *state;
        state.filter.scope = scope;
        state.filtered = filter_jobs(&state.jobs, &state.filter.term, scope);
        Ok(())
    }

    // Card click and map-marker click both land here.
    pub fn select_job(&self, id: &str) -> AppResult<JobRecord> {
        let mut state = self.lock()?;
        let job = state
            .jobs
            .iter()
            .find(|job| job.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("job {id}")))?;
        state.selected_job_id = Some(job.id.clone());
        state.panel_visible = true;
        Ok(job)
    }

    pub fn close_detail(&self) -> AppResult<()> {
        let mut state = self.lock()?;
        state.selected_job_id = None;
        state.panel_visible = false;
        Ok(())
    }

    // Write-through toggle, then both in-memory copies are patched in place so
    // list order never shifts on a bookmark.
    pub fn bookmark_toggle(&self, id: &str) -> AppResult<JobRecord> {
        let mut state = self.lock()?;
        let state = &mut *state;
        let current = state
            .jobs
            .iter()
            .find(|job| job.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("job {id}")))?;

        let updated = self.bookmarks.toggle(&current);
        for job in state.jobs.iter_mut().chain(state.filtered.iter_mut()) {
            if job.id == id {
                job.bookmarked = updated.bookmarked;
            }
        }
        Ok(updated)
    }

    pub fn selected_job(&self) -> AppResult<Option<JobRecord>> {
        let state = self.lock()?;
        let Some(id) = &state.selected_job_id else {
            return Ok(None);
        };
        Ok(state.jobs.iter().find(|job| &job.id == id).cloned())
    }

    pub fn saved_jobs(&self) -> Vec<JobRecord> {
        self.bookmarks.list_bookmarked()
    }

    // Marker data for the map collaborator; jobs without a coordinate hit are
    // simply absent.
    pub fn map_markers(&self) -> AppResult<Vec<MapMarker>> {
        let state = self.lock()?;
        Ok(state
            .filtered
            .iter()
            .filter_map(|job| {
                job.coordinates.map(|coordinates| MapMarker {
                    id: job.id.clone(),
                    coordinates,
                    label: format!("{} ({})", job.job_title, job.company_name),
                })
            })
            .collect())
    }

    pub fn snapshot(&self) -> AppResult<BrowserSnapshot> {
        let state = self.lock()?;
        let phase = if state.panel_visible && state.selected_job_id.is_some() {
            BrowsePhase::DetailOpen
        } else {
            BrowsePhase::Browsing
        };
        Ok(BrowserSnapshot {
            phase,
            selected_job_id: state.selected_job_id.clone(),
            panel_visible: state.panel_visible,
            filter: state.filter.clone(),
            filtered: state.filtered.clone(),
            total_jobs: state.jobs.len(),
        })
    }

    pub fn is_loaded(&self) -> AppResult<bool> {
        Ok(self.lock()?.loaded)
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, BrowserState>> {
        self.state
            .lock()
            .map_err(|_| AppError::Internal("browser state mutex poisoned".to_string()))
    }
}

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::filter::{FilterState, FilterUpdate, SortDirection, SortState};
use crate::domain::port_record::{PortRecord, SortKey};
use crate::infrastructure::backend::PortsBackend;
use crate::infrastructure::csv;
use crate::infrastructure::storage::{keys, PreferenceStore};

use super::stats::{self, DashboardStats};

/// Fixed download name for CSV exports.
pub const EXPORT_FILENAME: &str = "port-monitor.csv";

/// Everything the table view needs to render itself after a state change.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub records: Vec<PortRecord>,
    pub filters: FilterState,
    pub sort: Option<SortState>,
    pub total_count: usize,
    pub matched_count: usize,
    pub persist_filters: bool,
    pub loaded_at: Option<DateTime<Utc>>,
}

struct DashboardState {
    records: Vec<PortRecord>,
    filters: FilterState,
    sort: Option<SortState>,
    persist_filters: bool,
    loaded_at: Option<DateTime<Utc>>,
}

/// Owns the record collection and the filter/sort state, and orchestrates the
/// two data sources (backend snapshot, CSV upload). Loads always replace the
/// collection wholesale under the lock; a failed load leaves the previous
/// records visible.
pub struct DashboardService {
    backend: Arc<dyn PortsBackend + Send + Sync>,
    store: Arc<PreferenceStore>,
    state: Mutex<DashboardState>,
    // Single-flight guard: a refresh while another is outstanding is rejected,
    // not queued.
    refresh_guard: tokio::sync::Mutex<()>,
}

impl DashboardService {
    pub fn new(backend: Arc<dyn PortsBackend + Send + Sync>, store: Arc<PreferenceStore>) -> Self {
        // The flag is read before any filter state: saved filters are restored
        // only when persistence was already recorded as enabled.
        let persist_filters = store.get::<bool>(keys::PERSIST_FILTERS).unwrap_or(false);
        let filters = if persist_filters {
            store
                .get::<FilterState>(keys::DASHBOARD_FILTERS)
                .unwrap_or_default()
        } else {
            FilterState::default()
        };

        Self {
            backend,
            store,
            state: Mutex::new(DashboardState {
                records: Vec::new(),
                filters,
                sort: None,
                persist_filters,
                loaded_at: None,
            }),
            refresh_guard: tokio::sync::Mutex::new(()),
        }
    }

    /// Fetch a fresh snapshot and replace the collection. Existing records
    /// stay untouched when the fetch fails.
    pub async fn load_from_backend(&self) -> Result<usize> {
        let records = self.backend.fetch_ports().await?;
        let count = records.len();
        self.replace_records(records);
        info!(count, "Loaded port snapshot from backend");
        Ok(count)
    }

    /// Decode an uploaded CSV blob and replace the collection. A decode error
    /// leaves the previous records in place.
    pub fn load_from_file(&self, raw_text: &str) -> Result<usize> {
        let records = csv::decode(raw_text)?;
        let count = records.len();
        self.replace_records(records);
        info!(count, "Loaded port snapshot from CSV import");
        Ok(count)
    }

    /// Ask the backend to regenerate its snapshot, then load it. The load is
    /// only attempted once the regeneration succeeded.
    pub async fn refresh(&self) -> Result<usize> {
        let _guard = self.refresh_guard.try_lock().map_err(|_| {
            AppError::ValidationError("A refresh is already in progress".to_string())
        })?;

        self.backend.trigger_update().await?;
        self.load_from_backend().await
    }

    /// CSV of the records as currently filtered and sorted, not of the raw
    /// collection.
    pub fn export_current_view(&self) -> String {
        let state = self.state.lock().unwrap();
        let view = visible_records(&state);
        csv::encode(&view)
    }

    pub fn view(&self) -> DashboardView {
        let state = self.state.lock().unwrap();
        let records = visible_records(&state);
        DashboardView {
            matched_count: records.len(),
            total_count: state.records.len(),
            filters: state.filters.clone(),
            sort: state.sort,
            persist_filters: state.persist_filters,
            loaded_at: state.loaded_at,
            records,
        }
    }

    /// Stats are computed over the raw collection; filters do not narrow them.
    pub fn stats(&self) -> DashboardStats {
        let state = self.state.lock().unwrap();
        stats::compute(&state.records)
    }

    pub fn set_filter(&self, update: FilterUpdate) -> Result<FilterState> {
        let filters = {
            let mut state = self.state.lock().unwrap();
            state.filters.apply_update(update);
            state.filters.clone()
        };
        self.save_filters_if_enabled(&filters)?;
        Ok(filters)
    }

    pub fn clear_filters(&self) -> Result<FilterState> {
        let filters = {
            let mut state = self.state.lock().unwrap();
            state.filters = FilterState::default();
            state.filters.clone()
        };
        self.save_filters_if_enabled(&filters)?;
        Ok(filters)
    }

    /// Column-header click: same key toggles the direction, a new key starts
    /// ascending.
    pub fn set_sort(&self, key: SortKey) -> SortState {
        let mut state = self.state.lock().unwrap();
        let sort = SortState::toggled(state.sort, key);
        state.sort = Some(sort);
        sort
    }

    pub fn persist_filters(&self) -> bool {
        self.state.lock().unwrap().persist_filters
    }

    /// The flag itself is always written; disabling also deletes any saved
    /// filter state so a later reload cannot restore it, while enabling saves
    /// the filters currently on screen.
    pub fn set_persist_filters(&self, enabled: bool) -> Result<()> {
        let filters = {
            let mut state = self.state.lock().unwrap();
            state.persist_filters = enabled;
            state.filters.clone()
        };

        self.store.set(keys::PERSIST_FILTERS, &enabled)?;
        if enabled {
            self.store.set(keys::DASHBOARD_FILTERS, &filters)?;
        } else {
            self.store.remove(keys::DASHBOARD_FILTERS)?;
        }
        Ok(())
    }

    fn replace_records(&self, records: Vec<PortRecord>) {
        let mut state = self.state.lock().unwrap();
        state.records = records;
        state.loaded_at = Some(Utc::now());
    }

    fn save_filters_if_enabled(&self, filters: &FilterState) -> Result<()> {
        let enabled = self.state.lock().unwrap().persist_filters;
        if !enabled {
            return Ok(());
        }
        if let Err(err) = self.store.set(keys::DASHBOARD_FILTERS, filters) {
            warn!(error = %err, "Failed to persist filter state");
            return Err(err);
        }
        Ok(())
    }
}

fn visible_records(state: &DashboardState) -> Vec<PortRecord> {
    let filtered = filter_records(&state.records, &state.filters);
    sort_records(filtered, state.sort)
}

/// Subsequence of `records` matching every non-empty criterion, in input
/// order.
pub fn filter_records(records: &[PortRecord], criteria: &FilterState) -> Vec<PortRecord> {
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}

/// Stable lexicographic sort on the selected field. Descending reverses the
/// comparator, not the result, so records with equal keys keep their input
/// order in both directions.
pub fn sort_records(mut records: Vec<PortRecord>, sort: Option<SortState>) -> Vec<PortRecord> {
    if let Some(SortState { key, direction }) = sort {
        records.sort_by(|a, b| {
            let ord = a.field(key).cmp(b.field(key));
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }
    records
}

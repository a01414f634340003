use serde::{Deserialize, Serialize};

use super::port_record::{PortRecord, SortKey};

/// The five substring filters offered by the dashboard. An empty string means
/// "no constraint"; non-empty criteria are ANDed together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub protocol: String,
    pub state: String,
    pub process: String,
    pub docker_container: String,
    pub local_address: String,
}

/// Partial update to a `FilterState`; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterUpdate {
    pub protocol: Option<String>,
    pub state: Option<String>,
    pub process: Option<String>,
    pub docker_container: Option<String>,
    pub local_address: Option<String>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.protocol.is_empty()
            && self.state.is_empty()
            && self.process.is_empty()
            && self.docker_container.is_empty()
            && self.local_address.is_empty()
    }

    pub fn apply_update(&mut self, update: FilterUpdate) {
        if let Some(protocol) = update.protocol {
            self.protocol = protocol;
        }
        if let Some(state) = update.state {
            self.state = state;
        }
        if let Some(process) = update.process {
            self.process = process;
        }
        if let Some(docker_container) = update.docker_container {
            self.docker_container = docker_container;
        }
        if let Some(local_address) = update.local_address {
            self.local_address = local_address;
        }
    }

    /// Case-insensitive substring match across all non-empty criteria.
    pub fn matches(&self, record: &PortRecord) -> bool {
        contains_ci(&record.protocol, &self.protocol)
            && contains_ci(&record.state, &self.state)
            && contains_ci(&record.process, &self.process)
            && contains_ci(&record.docker_container, &self.docker_container)
            && contains_ci(&record.local_address, &self.local_address)
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Current table ordering. `None` preserves the order records arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    /// Clicking a column header: the same key flips ascending to descending,
    /// a new key starts ascending again.
    pub fn toggled(current: Option<SortState>, key: SortKey) -> SortState {
        let direction = match current {
            Some(sort) if sort.key == key && sort.direction == SortDirection::Asc => {
                SortDirection::Desc
            }
            _ => SortDirection::Asc,
        };
        SortState { key, direction }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_criteria_match_everything() {
        let filters = FilterState::default();
        assert!(filters.is_empty());
        assert!(filters.matches(&PortRecord::default()));
    }

    #[test]
    fn substring_match_is_case_insensitive() {
        let record = PortRecord {
            protocol: "TCP".to_string(),
            ..PortRecord::default()
        };
        let filters = FilterState {
            protocol: "tcp".to_string(),
            ..FilterState::default()
        };
        assert!(filters.matches(&record));

        let udp = PortRecord {
            protocol: "UDP".to_string(),
            ..PortRecord::default()
        };
        assert!(!filters.matches(&udp));
    }

    #[test]
    fn criteria_combine_with_and() {
        let record = PortRecord {
            protocol: "TCP".to_string(),
            process: "nginx".to_string(),
            ..PortRecord::default()
        };
        let filters = FilterState {
            protocol: "tcp".to_string(),
            process: "postgres".to_string(),
            ..FilterState::default()
        };
        assert!(!filters.matches(&record));
    }

    #[test]
    fn partial_update_keeps_untouched_fields() {
        let mut filters = FilterState {
            protocol: "tcp".to_string(),
            ..FilterState::default()
        };
        filters.apply_update(FilterUpdate {
            process: Some("nginx".to_string()),
            ..FilterUpdate::default()
        });
        assert_eq!(filters.protocol, "tcp");
        assert_eq!(filters.process, "nginx");
    }

    #[test]
    fn sort_toggle_flips_same_key_and_resets_new_key() {
        let first = SortState::toggled(None, SortKey::Port);
        assert_eq!(first.direction, SortDirection::Asc);

        let second = SortState::toggled(Some(first), SortKey::Port);
        assert_eq!(second.direction, SortDirection::Desc);

        // A third click on the same key goes back to ascending.
        let third = SortState::toggled(Some(second), SortKey::Port);
        assert_eq!(third.direction, SortDirection::Asc);

        let other = SortState::toggled(Some(second), SortKey::Process);
        assert_eq!(other.key, SortKey::Process);
        assert_eq!(other.direction, SortDirection::Asc);
    }
}

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::domain::port_record::PortRecord;

/// Aggregate counters for the dashboard header cards.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_ports: usize,
    pub listening_ports: usize,
    pub unique_processes: usize,
    pub protocol_counts: HashMap<String, usize>,
    pub state_counts: HashMap<String, usize>,
    pub container_ports: usize,
    pub host_ports: usize,
    pub unique_containers: usize,
}

pub fn compute(records: &[PortRecord]) -> DashboardStats {
    let mut protocol_counts: HashMap<String, usize> = HashMap::new();
    let mut state_counts: HashMap<String, usize> = HashMap::new();
    let mut processes: HashSet<&str> = HashSet::new();
    let mut containers: HashSet<&str> = HashSet::new();
    let mut listening_ports = 0;
    let mut container_ports = 0;

    for record in records {
        *protocol_counts.entry(record.protocol.clone()).or_insert(0) += 1;
        *state_counts.entry(record.state.clone()).or_insert(0) += 1;
        processes.insert(&record.process);

        if record.state == "LISTENING" {
            listening_ports += 1;
        }
        if record.docker_container.is_empty() {
            continue;
        }
        container_ports += 1;
        containers.insert(&record.docker_container);
    }

    DashboardStats {
        total_ports: records.len(),
        listening_ports,
        unique_processes: processes.len(),
        protocol_counts,
        state_counts,
        host_ports: records.len() - container_ports,
        container_ports,
        unique_containers: containers.len(),
    }
}

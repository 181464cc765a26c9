use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{EndpointRecord, EndpointSet, EndpointsByLine, EquivalencePolicy, ProductLine};

#[derive(Debug, Clone, Default, Serialize)]
pub struct LineDiff {
    pub missing_in_implementation: Vec<EndpointRecord>,
    pub missing_in_docs: Vec<EndpointRecord>,
    pub total_in_docs: usize,
    pub total_in_implementation: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EndpointDiff {
    pub policy: &'static str,
    pub lines: BTreeMap<ProductLine, LineDiff>,
}

impl EndpointDiff {
    pub fn total_missing_in_implementation(&self) -> usize {
        self.lines
            .values()
            .map(|line| line.missing_in_implementation.len())
            .sum()
    }
}

fn is_matched(record: &EndpointRecord, counterpart: &EndpointSet, policy: &dyn EquivalencePolicy) -> bool {
    counterpart.contains_key(&record.endpoint)
        || counterpart
            .values()
            .any(|other| policy.same_endpoint(record, other))
}

fn unmatched(records: &EndpointSet, counterpart: &EndpointSet, policy: &dyn EquivalencePolicy) -> Vec<EndpointRecord> {
    records
        .values()
        .filter(|record| !is_matched(record, counterpart, policy))
        .cloned()
        .collect()
}

/// Compares documented and implemented endpoints for every product line present on either side.
pub fn diff_endpoints(
    documented: &EndpointsByLine,
    implemented: &EndpointsByLine,
    policy: &dyn EquivalencePolicy,
) -> EndpointDiff {
    let empty = EndpointSet::new();
    let lines = ProductLine::ALL
        .into_iter()
        .filter(|line| documented.contains_key(line) || implemented.contains_key(line))
        .map(|line| {
            let docs = documented.get(&line).unwrap_or(&empty);
            let client = implemented.get(&line).unwrap_or(&empty);
            let line_diff = LineDiff {
                missing_in_implementation: unmatched(docs, client, policy),
                missing_in_docs: unmatched(client, docs, policy),
                total_in_docs: docs.len(),
                total_in_implementation: client.len(),
            };
            (line, line_diff)
        })
        .collect();

    EndpointDiff {
        policy: policy.name(),
        lines,
    }
}

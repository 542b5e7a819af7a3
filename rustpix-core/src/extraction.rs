//! The label-to-event extraction stage shared by every clustering engine.

use std::collections::BTreeMap;

use crate::{ClusterEngine, Hit, NeutronEvent, PeakFitter};

/// Configuration for the extraction stage that turns per-hit labels into
/// neutron events: dropping undersized clusters and discarding fit
/// failures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionConfig {
    /// Clusters with fewer hits than this are dropped before fitting.
    pub min_cluster_size: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self { min_cluster_size: 1 }
    }
}

impl ExtractionConfig {
    /// Creates a config with the given minimum cluster size.
    #[must_use]
    pub fn with_min_cluster_size(mut self, min_cluster_size: usize) -> Self {
        self.min_cluster_size = min_cluster_size;
        self
    }
}

/// Runs `engine` over `hits`, groups the resulting labels, drops groups
/// smaller than `config.min_cluster_size`, fits each surviving group with
/// `fitter`, and returns only the events that pass [`NeutronEvent::is_valid`].
///
/// Groups are materialized in a single pass over the label array (per
/// group, an index list), rather than as back-references carried on the
/// cluster itself — the label set is not known until labeling completes.
pub fn extract_events(
    engine: &mut dyn ClusterEngine,
    fitter: &dyn PeakFitter,
    hits: &[Hit],
    config: ExtractionConfig,
) -> Vec<NeutronEvent> {
    let labels = engine.label(hits);
    debug_assert_eq!(labels.len(), hits.len());

    let mut groups: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        if label >= 0 {
            groups.entry(label).or_default().push(i);
        }
    }

    groups
        .into_values()
        .filter(|indices| indices.len() >= config.min_cluster_size)
        .filter_map(|indices| {
            let cluster_hits: Vec<Hit> = indices.iter().map(|&i| hits[i]).collect();
            let event = fitter.fit(&cluster_hits);
            event.is_valid().then_some(event)
        })
        .collect()
}

//! Capability traits shared by the clustering and peak-fitting layers.
//!
//! `rustpix-core` defines only the *shape* of these capabilities; the
//! concrete Adaptive Box Search engine and the centroid / fast-Gaussian
//! fitters live in `rustpix-algorithms`, injected behind these traits so
//! the pipeline driver in `rustpix-io` never names a concrete algorithm.

use crate::{Hit, NeutronEvent};

/// An online clusterer: given an ordered batch of hits, assigns each hit a
/// cluster label. Implementations own their internal pool of cluster state
/// and are expected to be reset between batches.
pub trait ClusterEngine {
    /// Labels every hit in `hits`, in order. The returned vector has the
    /// same length as `hits`; `labels[i]` is the cluster label assigned to
    /// `hits[i]`.
    fn label(&mut self, hits: &[Hit]) -> Vec<i64>;

    /// Drops all internal state so the engine can be reused for the next
    /// batch.
    fn reset(&mut self);
}

/// A cluster-to-event reducer: collapses the hits belonging to one cluster
/// into a single `NeutronEvent`.
pub trait PeakFitter {
    /// Fits `hits` (all hits sharing one cluster label) to a single event.
    /// Implementations return `NeutronEvent::FIT_FAILURE` (or an otherwise
    /// invalid, negative-coordinate event) when the fit cannot be trusted;
    /// callers filter on [`NeutronEvent::is_valid`].
    fn fit(&self, hits: &[Hit]) -> NeutronEvent;
}

//! Shared value types and capability traits for the rustpix neutron-imaging
//! pipeline: [`Hit`], [`NeutronEvent`], the [`ImageSample`] capability they
//! both implement, and the [`ClusterEngine`] / [`PeakFitter`] traits that the
//! concrete algorithms in `rustpix-algorithms` implement.
//!
//! Every operation here is infallible by construction: a fitter that can't
//! trust its input returns [`NeutronEvent::FIT_FAILURE`] rather than an
//! error, and [`extract_events`] filters on [`NeutronEvent::is_valid`]. This
//! crate carries no `Error` type as a result — see `DESIGN.md`.
//!
//! This crate does no I/O and knows nothing about the TPX3 wire format;
//! that lives in `rustpix-tpx`.

#![forbid(unsafe_code)]

mod clustering;
mod extraction;
mod hit;
mod image_sample;
mod neutron;

pub use clustering::{ClusterEngine, PeakFitter};
pub use extraction::{extract_events, ExtractionConfig};
pub use hit::{Hit, T40_NS, T640_NS};
pub use image_sample::ImageSample;
pub use neutron::NeutronEvent;

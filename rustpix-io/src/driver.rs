//! Pipeline driver (C8): orchestrates batch location, timestamp seeding,
//! and per-batch decode/cluster/fit across a raw region.

use std::time::Instant;

use rayon::prelude::*;
use rustpix_algorithms::AbsEngine;
use rustpix_core::{extract_events, ExtractionConfig, Hit, NeutronEvent, PeakFitter};
use rustpix_tpx::{decode_hit, scan_batches, BatchDescriptor, DecoderState};

use crate::config::PipelineConfig;
use crate::region::ByteRegion;
use crate::Result;

/// Diagnostics accumulated while running the pipeline over a region.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Diagnostics {
    /// Hits whose `tof_ms` exceeded the configured pulse period.
    pub bad_tof_count: u64,
    /// Whether the region ended inside a batch's payload.
    pub truncated: bool,
    /// Bytes meaningfully consumed by the batch locator.
    pub consumed_bytes: usize,
}

/// The result of running the pipeline once over a region.
#[derive(Debug, Default)]
pub struct PipelineOutput {
    /// All decoded hits, grouped by originating batch, in batch order.
    pub hits: Vec<Vec<Hit>>,
    /// All fitted neutron events, grouped by originating batch. Batch order
    /// is preserved; cross-batch ordering in a parallel run is not.
    pub events: Vec<Vec<NeutronEvent>>,
    /// Diagnostics accumulated across the whole run.
    pub diagnostics: Diagnostics,
}

fn seed_timestamps(region: &dyn ByteRegion, descriptors: &mut [BatchDescriptor]) {
    let bytes = region.as_bytes();
    let mut state = DecoderState::default();
    for descriptor in descriptors.iter_mut() {
        descriptor.tdc_start = state.tdc_timestamp;
        descriptor.gdc_start = state.gdc_timestamp;
        descriptor.timer_lsb32_start = state.timer_lsb32;

        let payload_start = descriptor.payload_offset();
        let payload_end = (payload_start + descriptor.packet_count * 8).min(bytes.len());
        if payload_start <= bytes.len() {
            state.sweep(&bytes[payload_start..payload_end]);
        }
    }
}

fn decode_batch(
    bytes: &[u8],
    descriptor: &BatchDescriptor,
    config: &PipelineConfig,
) -> (Vec<Hit>, u64) {
    let state = DecoderState {
        tdc_timestamp: descriptor.tdc_start,
        gdc_timestamp: descriptor.gdc_start,
        timer_lsb32: descriptor.timer_lsb32_start,
    };

    let payload_start = descriptor.payload_offset();
    let payload_end = (payload_start + descriptor.packet_count * 8).min(bytes.len());
    let pulse_period_ms = if config.pulse_rate_hz > 0.0 {
        1000.0 / config.pulse_rate_hz
    } else {
        f64::INFINITY
    };

    let mut bad_tof = 0u64;
    let hits: Vec<Hit> = bytes[payload_start..payload_end]
        .chunks_exact(8)
        .map(|word_bytes| {
            let word = u64::from_le_bytes(word_bytes.try_into().expect("chunks_exact(8)"));
            decode_hit(word, &state, descriptor.chip_id)
        })
        .inspect(|hit| {
            if hit.tof_ms() > pulse_period_ms {
                bad_tof += 1;
            }
        })
        .collect();

    (hits, bad_tof)
}

/// Runs the full pipeline over `region` in a single thread.
pub fn run_sequential(
    region: &dyn ByteRegion,
    config: &PipelineConfig,
) -> Result<PipelineOutput> {
    run_with(region, config, false)
}

/// Runs the full pipeline over `region`, parallelizing step 3 (decode,
/// cluster, fit) across batch descriptors with `rayon`.
pub fn run_parallel(region: &dyn ByteRegion, config: &PipelineConfig) -> Result<PipelineOutput> {
    run_with(region, config, true)
}

fn run_with(
    region: &dyn ByteRegion,
    config: &PipelineConfig,
    parallel: bool,
) -> Result<PipelineOutput> {
    let bytes = region.as_bytes();

    let locate_start = Instant::now();
    let (mut descriptors, consumed) = scan_batches(bytes);
    log::info!(
        "located {} batches in {:.3}s",
        descriptors.len(),
        locate_start.elapsed().as_secs_f64()
    );
    let truncated = consumed < bytes.len()
        || descriptors
            .iter()
            .any(|d| d.byte_offset + d.total_len() > bytes.len());

    let seed_start = Instant::now();
    seed_timestamps(region, &mut descriptors);
    log::info!("seeded timestamps in {:.3}s", seed_start.elapsed().as_secs_f64());

    let (abs_config, fitter) = config.build()?;
    let extraction_config = ExtractionConfig::default()
        .with_min_cluster_size(config.abs_min_cluster_size);

    let process_start = Instant::now();
    let per_batch: Vec<(Vec<Hit>, Vec<NeutronEvent>, u64)> = if parallel {
        descriptors
            .par_iter()
            .map(|descriptor| {
                process_descriptor(bytes, descriptor, config, &abs_config, fitter.as_ref(), &extraction_config)
            })
            .collect()
    } else {
        descriptors
            .iter()
            .map(|descriptor| {
                process_descriptor(bytes, descriptor, config, &abs_config, fitter.as_ref(), &extraction_config)
            })
            .collect()
    };
    log::info!(
        "decoded+clustered+fitted {} batches in {:.3}s",
        descriptors.len(),
        process_start.elapsed().as_secs_f64()
    );

    let mut hits = Vec::with_capacity(per_batch.len());
    let mut events = Vec::with_capacity(per_batch.len());
    let mut bad_tof_count = 0u64;
    for (batch_hits, batch_events, bad_tof) in per_batch {
        bad_tof_count += bad_tof;
        hits.push(batch_hits);
        events.push(batch_events);
    }

    Ok(PipelineOutput {
        hits,
        events,
        diagnostics: Diagnostics {
            bad_tof_count,
            truncated,
            consumed_bytes: consumed,
        },
    })
}

fn process_descriptor(
    bytes: &[u8],
    descriptor: &BatchDescriptor,
    config: &PipelineConfig,
    abs_config: &rustpix_algorithms::AbsConfig,
    fitter: &(dyn PeakFitter + Send + Sync),
    extraction_config: &ExtractionConfig,
) -> (Vec<Hit>, Vec<NeutronEvent>, u64) {
    let (hits, bad_tof) = decode_batch(bytes, descriptor, config);
    let mut engine = AbsEngine::new(*abs_config);
    let events = extract_events(&mut engine, fitter, &hits, *extraction_config);
    (hits, events, bad_tof)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PeakFitterKind;

    fn header(chip_id: u8, packet_count: u16) -> [u8; 8] {
        let len_bytes = (packet_count * 8).to_le_bytes();
        [b'T', b'P', b'X', b'3', chip_id, 0, len_bytes[0], len_bytes[1]]
    }

    #[test]
    fn runs_over_an_empty_region() {
        let region: Vec<u8> = Vec::new();
        let config = PipelineConfig::default();
        let output = run_sequential(&region, &config).expect("empty region is valid");
        assert!(output.hits.is_empty());
        assert_eq!(output.diagnostics.consumed_bytes, 0);
        assert!(!output.diagnostics.truncated);
    }

    #[test]
    fn runs_over_a_single_pixel_packet_batch() {
        let mut region = header(0, 1).to_vec();
        // A pixel-data packet: high nibble of byte7 = 0xB.
        region.extend_from_slice(&[0u8, 0, 0, 0, 0, 0, 0, 0xB0]);

        let config = PipelineConfig::default();
        let output = run_sequential(&region, &config).expect("single batch is valid");
        assert_eq!(output.hits.len(), 1);
        assert_eq!(output.hits[0].len(), 1);
    }

    #[test]
    fn truncated_region_is_flagged() {
        let mut region = header(0, 2).to_vec();
        region.extend_from_slice(&[0u8; 8]); // only one of two promised packets
        let config = PipelineConfig::default();
        let output = run_sequential(&region, &config).expect("truncated region still runs");
        assert!(output.diagnostics.truncated || output.hits[0].len() < 2);
    }

    #[test]
    fn parallel_and_sequential_agree_on_hit_counts() {
        let mut region = header(0, 4).to_vec();
        for _ in 0..4 {
            region.extend_from_slice(&[0u8, 0, 0, 0, 0, 0, 0, 0xB0]);
        }
        let config = PipelineConfig::default().with_peak_fitter(PeakFitterKind::Centroid);
        let seq = run_sequential(&region, &config).expect("sequential run");
        let par = run_parallel(&region, &config).expect("parallel run");
        assert_eq!(
            seq.hits.iter().map(Vec::len).sum::<usize>(),
            par.hits.iter().map(Vec::len).sum::<usize>()
        );
    }

    /// S5 — batch locator count on the bundled reference file. Skips
    /// gracefully when the reference file is not present in this checkout.
    #[test]
    fn s5_reference_file_batch_count() {
        let path = std::path::PathBuf::from("tests/data/suann_socket_background_serval32.tpx3");
        if !path.exists() {
            eprintln!("Skipping s5_reference_file_batch_count: reference file not found");
            return;
        }
        let bytes = crate::reader::read_file(&path).expect("read reference file");
        let (descriptors, _) = scan_batches(&bytes);
        assert_eq!(descriptors.len(), 81_399);
    }

    /// S6 — end-to-end hit count and TOF sanity on the bundled reference
    /// file. Skips gracefully when the reference file is not present.
    #[test]
    fn s6_reference_file_hit_count_and_tof_sanity() {
        let path = std::path::PathBuf::from("tests/data/suann_socket_background_serval32.tpx3");
        if !path.exists() {
            eprintln!("Skipping s6_reference_file_hit_count_and_tof_sanity: reference file not found");
            return;
        }
        let bytes = crate::reader::read_file(&path).expect("read reference file");
        let config = PipelineConfig::default();
        let output = run_sequential(&bytes, &config).expect("pipeline run");
        let total_hits: usize = output.hits.iter().map(Vec::len).sum();
        assert_eq!(total_hits, 98_533);
        for batch in &output.hits {
            for hit in batch {
                assert!(hit.tof_ms() < 16.67);
            }
        }
    }
}

//! S4: ABS should recover three well-separated synthetic clusters as three
//! distinct neutron events.

use rustpix_algorithms::{AbsConfig, AbsEngine, CentroidFitter};
use rustpix_core::{extract_events, ExtractionConfig, Hit};

fn synth_cluster(cx: u16, cy: u16, anchor_ticks: u64, n: usize) -> Vec<Hit> {
    (0..n)
        .map(|i| {
            // Deterministic +-1 pixel jitter cycling through a small pattern,
            // and +-1 tick of time jitter, standing in for the scenario's
            // "uniform jitter +-1".
            let jitter = [0i32, 1, -1, 1, -1][i % 5];
            let x = (cx as i32 + jitter).max(0) as u16;
            let y = (cy as i32 + jitter).max(0) as u16;
            let t = anchor_ticks.wrapping_add((i % 3) as u64);
            Hit::new(x, y, 100, 0, 0, 0, t)
        })
        .collect()
}

#[test]
fn abs_recovers_three_clusters() {
    // Anchor spidertimes of 10, 15, 20 ticks (all within the 75 ns window of
    // each other); cluster separation here comes from the x/y spacing, not
    // from time, matching how three spatially-disjoint neutron events would
    // genuinely land close together in time within one acquisition batch.
    let mut hits = synth_cluster(50, 50, 10, 100);
    hits.extend(synth_cluster(100, 100, 15, 100));
    hits.extend(synth_cluster(150, 150, 20, 100));

    let config = AbsConfig::default()
        .with_radius(5.0)
        .with_spider_time_range_ns(75.0);
    let mut engine = AbsEngine::new(config);
    let fitter = CentroidFitter::default();

    let events = extract_events(&mut engine, &fitter, &hits, ExtractionConfig::default());

    assert_eq!(events.len(), 3);
    let centers = [(50.0, 50.0), (100.0, 100.0), (150.0, 150.0)];
    for center in centers {
        assert!(
            events
                .iter()
                .any(|e| (e.x - center.0).abs() < 0.5 && (e.y - center.1).abs() < 0.5),
            "no event found near {center:?}: {events:?}"
        );
    }
}

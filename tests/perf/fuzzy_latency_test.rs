use std::time::Instant;

use crate::ranker::rank_fuzzy;

fn p95_ms(samples: &mut [f64]) -> f64 {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let last = samples.len().saturating_sub(1);
    let idx = ((last as f64) * 0.95).round() as usize;
    samples[idx.min(last)]
}

#[test]
fn fuzzy_rank_over_ten_thousand_paths_stays_interactive() {
    let root = "/home/user/project/";
    let mut files: Vec<String> = (0..10_000)
        .map(|i| format!("{root}module_{:02}/src/component_{i:05}.rs", i % 40))
        .collect();
    files.push(format!("{root}crates/matcher/src/main.rs"));

    let input = format!("{root}mtchmain");
    let top = rank_fuzzy(&files, &input, root, 18);
    assert_eq!(top.first().map(String::as_str), Some("/home/user/project/crates/matcher/src/main.rs"));

    for _ in 0..5 {
        let _ = rank_fuzzy(&files, &input, root, 18);
    }

    let mut batch_p95 = Vec::with_capacity(3);
    for _ in 0..3 {
        let mut samples = Vec::with_capacity(20);
        for _ in 0..20 {
            let start = Instant::now();
            let _ = rank_fuzzy(&files, &input, root, 18);
            samples.push(start.elapsed().as_secs_f64() * 1000.0);
        }
        batch_p95.push(p95_ms(&mut samples));
    }

    batch_p95.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median_p95 = batch_p95[batch_p95.len() / 2];

    assert!(
        median_p95 <= 150.0,
        "median batch p95 too high: {median_p95:.3}ms (budget 150.0ms); batches={batch_p95:?}",
    );
}

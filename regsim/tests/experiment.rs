//! End-to-end sweep: dataset file in, CSV/JSON files out

use std::fs;
use std::path::PathBuf;

use regsim::experiment::JSON_RESULTS_FILE;
use regsim::prelude::*;
use regsim_core::dists::ServiceTimeModel;
use regsim_metrics::export::csv::{details_file_name, SUMMARY_FILE};

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("regsim_experiment_{name}_{}", std::process::id()));
    fs::remove_dir_all(&dir).ok();
    dir
}

/// 60 students, two arriving every five minutes from 8.00.
fn write_dataset(dir: &std::path::Path) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let mut csv = String::from("arrival_time\n");
    for i in 0..60 {
        let minutes = (i / 2) * 5;
        csv.push_str(&format!("01-03-2024 {}.{:02}\n", 8 + minutes / 60, minutes % 60));
    }
    let path = dir.join("queue_data.csv");
    fs::write(&path, csv).unwrap();
    path
}

#[test]
fn sweep_writes_all_csv_and_json_outputs() {
    let dir = temp_dir("full");
    let data = write_dataset(&dir);
    let config = SweepConfig {
        output_dir: dir.join("Outputs"),
        charts: false,
        export_json: true,
        ..SweepConfig::default()
    };

    let entities = load_entities(&data, &config.dataset_options()).unwrap();
    assert_eq!(entities.len(), 60);
    let report = run_experiments(&entities, &config).unwrap();

    assert_eq!(report.results.len(), 3);
    let counters: Vec<usize> = report.summaries.iter().map(|s| s.counters).collect();
    assert_eq!(counters, vec![1, 2, 4]);
    assert!(report.summaries.iter().all(|s| s.num_served == 60));

    for k in [1, 2, 4] {
        let details = fs::read_to_string(config.output_dir.join(details_file_name(k))).unwrap();
        assert_eq!(details.lines().count(), 61);
    }
    assert!(config.output_dir.join(SUMMARY_FILE).exists());
    assert!(config.output_dir.join(JSON_RESULTS_FILE).exists());
    assert_eq!(report.written.len(), 5);

    // more counters never make anyone wait longer on average
    let waits: Vec<f64> = report.summaries.iter().map(|s| s.avg_wait_min).collect();
    assert!(waits.windows(2).all(|w| w[1] <= w[0] + 1e-9));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn constant_service_gives_known_statistics() {
    // Two students every 5 minutes and 5 minutes of service each: with two
    // counters nobody waits and every counter is always busy until the last start.
    let dir = temp_dir("constant");
    let data = write_dataset(&dir);
    let config = SweepConfig {
        counters: vec![2],
        service: ServiceTimeModel::Constant { secs: 300 },
        makespan: MakespanPolicy::LastCompletion,
        output_dir: dir.join("Outputs"),
        charts: false,
        ..SweepConfig::default()
    };

    let entities = load_entities(&data, &config.dataset_options()).unwrap();
    let report = run_experiments(&entities, &config).unwrap();
    let result = &report.results[0];

    assert_eq!(result.max_wait, SimTime::zero());
    // last pair arrives at 145 min and finishes at 150 min
    assert_eq!(result.makespan, SimTime::from_secs(150 * 60));
    assert!((result.utilization - 1.0).abs() < 1e-12);
    assert!((result.throughput_per_hour - 24.0).abs() < 1e-9);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn invalid_counter_count_fails_before_writing() {
    let dir = temp_dir("invalid");
    let data = write_dataset(&dir);
    let config = SweepConfig {
        counters: vec![1, 0],
        output_dir: dir.join("Outputs"),
        charts: false,
        ..SweepConfig::default()
    };
    let entities = load_entities(&data, &config.dataset_options()).unwrap();

    let err = run_experiments(&entities, &config).unwrap_err();
    assert!(matches!(err, regsim::ExperimentError::Sim(regsim_core::SimError::InvalidCapacity(0))));
    assert!(!config.output_dir.exists());

    fs::remove_dir_all(&dir).ok();
}

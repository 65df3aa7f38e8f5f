//! File export tests, written under the system temp directory

use std::fs;
use std::path::PathBuf;

use regsim_core::{run_sweep, Entity, MakespanPolicy, ScenarioResult};
use regsim_metrics::export::csv::{details_file_name, SUMMARY_FILE};
use regsim_metrics::{export_csv, export_json};

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("regsim_metrics_{name}_{}", std::process::id()));
    fs::remove_dir_all(&dir).ok();
    dir
}

fn sweep() -> Vec<ScenarioResult> {
    let entities = vec![
        Entity::new("entity1", 0.0, 500.0).unwrap(),
        Entity::new("entity2", 0.0, 500.0).unwrap(),
        Entity::new("entity3", 100.0, 500.0).unwrap(),
    ];
    run_sweep(&entities, &[1, 2], MakespanPolicy::default()).unwrap()
}

#[test]
fn csv_export_writes_details_and_summary() {
    let dir = temp_dir("csv");
    let written = export_csv(&sweep(), &dir).unwrap();
    assert_eq!(written.len(), 3);

    let details = fs::read_to_string(dir.join(details_file_name(1))).unwrap();
    let lines: Vec<&str> = details.lines().collect();
    assert_eq!(
        lines,
        vec![
            "student_id,arrival_offset_sec,service_start,wait_sec,service_time_sec",
            "entity1,0,0,0,500",
            "entity2,0,500,500,500",
            "entity3,100,1000,900,500",
        ]
    );
    assert!(dir.join(details_file_name(2)).exists());

    let summary = fs::read_to_string(dir.join(SUMMARY_FILE)).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("counters,throughput_per_hr,avg_wait_min,max_wait_min,utilization_pct,num_served"));
    let first: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(first[0], "1");
    assert!((first[1].parse::<f64>().unwrap() - 10.8).abs() < 1e-9);
    assert_eq!(first[3], "15");
    assert_eq!(first[4], "150");
    assert_eq!(first[5], "3");

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn json_export_round_trips_summaries() {
    let dir = temp_dir("json");
    let path = dir.join("results.json");
    export_json(&sweep(), &path, true, true).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let summaries = value["summaries"].as_array().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[1]["counters"], 2);
    assert_eq!(summaries[1]["num_served"], 3);

    let scenarios = value["scenarios"].as_array().unwrap();
    assert_eq!(scenarios[0]["records"].as_array().unwrap().len(), 3);
    assert_eq!(scenarios[0]["makespan_policy"], "latest_service_start");

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn json_export_without_records_omits_scenarios() {
    let dir = temp_dir("json_summary_only");
    let path = dir.join("results.json");
    export_json(&sweep(), &path, false, false).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(value.get("scenarios").is_none());

    fs::remove_dir_all(&dir).ok();
}

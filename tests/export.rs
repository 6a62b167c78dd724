use std::fs;

use binsim::common::constants::M_SUN;
use binsim::common::{SurfaceProperties, SurfaceSample};
use binsim::export::{surface, trajectory};
use binsim::stream::{Stream, StreamTrajectory, Termination};

fn short_path() -> StreamTrajectory {
    StreamTrajectory {
        points: vec![[-0.2, 0.0], [-0.1, -0.05], [0.0, -0.08]],
        times_s: vec![0.0, 120.0, 260.0],
        speed: 2.5,
        steps: 42,
        termination: Termination::ReachedRadius,
    }
}

#[test]
fn trajectory_csv_has_header_and_cumulative_length() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("stream.csv");
    let path_data = short_path();
    trajectory::write_csv(&path, &path_data).expect("write csv");

    let contents = fs::read_to_string(&path).expect("read csv");
    assert_eq!(
        contents.lines().next(),
        Some("index,x,y,time_s,arc_length"),
        "unexpected header in {contents}"
    );
    assert_eq!(contents.lines().count(), 4);

    let rows = trajectory::read_csv(&path).expect("read rows");
    assert_eq!(rows, trajectory::rows(&path_data));
    assert_eq!(rows[0].arc_length, 0.0);
    assert_eq!(rows[2].index, 2);
    assert_eq!(rows[2].time_s, 260.0);
    let lengths = path_data.arc_lengths();
    assert_eq!(rows[2].arc_length, lengths[2]);
}

#[test]
fn integrated_stream_exports_every_point() {
    let stream = Stream::new(0.5, 1.4 * M_SUN, 5.0 * 3600.0).expect("stream");
    let path_data = stream.trajectory(0.01, 0.8).expect("trajectory");

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("integrated.csv");
    trajectory::write_csv(&path, &path_data).expect("write csv");

    let rows = trajectory::read_csv(&path).expect("read rows");
    assert_eq!(rows.len(), path_data.points.len());
    let last = rows.last().expect("at least one row");
    let impact = path_data.impact_point().expect("impact point");
    assert_eq!([last.x, last.y], impact);
}

#[test]
fn surface_json_sidecar_counts_samples_and_creates_directories() {
    let samples: Vec<SurfaceSample> = (0..3)
        .map(|i| SurfaceSample {
            u: 0.1 * i as f64,
            v: 0.0,
            properties: SurfaceProperties {
                position: [0.3, 0.0, 0.1 * i as f64],
                normal: [0.0, 0.0, 1.0],
                temperature_k: 4500.0,
                irradiation_temperature_k: 0.0,
            },
        })
        .collect();

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("donor.json");
    surface::write_json(&path, "donor", &samples).expect("write json");

    let file = fs::File::open(&path).expect("json written");
    let value: serde_json::Value = serde_json::from_reader(file).expect("valid json");
    assert_eq!(value["component"], "donor");
    assert_eq!(value["count"], 3);

    let listed = value["samples"].as_array().expect("samples array");
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[2]["temperature_k"], 4500.0);
    assert_eq!(listed[2]["position"][2], 0.2);
    assert_eq!(listed[1]["u"], 0.1);
}

use approx::assert_relative_eq;
use binsim::common::constants::M_SUN;
use binsim::common::vector;
use binsim::roche::{BinaryParameters, RocheLobe};
use binsim::stream::{DensityPattern, MAX_STEPS, Stream, StreamError, Termination};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

const PERIOD_S: f64 = 5.0 * 3600.0;

fn stream(q: f64) -> Stream {
    Stream::new(q, 1.4 * M_SUN, PERIOD_S).expect("stream")
}

#[test]
fn stream_constants_come_from_the_accretor_lobe() {
    let stream = stream(0.5);
    let lobe = RocheLobe::new(BinaryParameters {
        mass_ratio: 2.0,
        period_s: PERIOD_S,
        mass_kg: 1.4 * M_SUN,
        fill: 1.0,
    })
    .expect("accretor lobe");

    assert_relative_eq!(stream.separation(), lobe.separation(), max_relative = 1e-12);
    assert_relative_eq!(
        stream.primary_offset() + stream.secondary_offset(),
        stream.separation(),
        max_relative = 1e-12
    );
    assert_relative_eq!(
        stream.primary_offset() / stream.separation(),
        1.0 / 3.0,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        stream.l1_distance() / stream.separation(),
        lobe.l1().expect("L1"),
        max_relative = 1e-12
    );
    assert_relative_eq!(stream.time_step(), 2e-6 * PERIOD_S, max_relative = 1e-12);
}

#[test]
fn trajectory_starts_at_the_analytic_seed() {
    let stream = stream(0.5);
    let trajectory = stream.trajectory(0.005, 0.8).expect("trajectory");

    let seed = stream.seed_point();
    assert_eq!(trajectory.points[0], seed);
    assert_eq!(trajectory.times_s[0], 0.0);
    assert_relative_eq!(seed[0], -0.236_42, epsilon = 1e-4);
    assert_eq!(seed[1], 0.0);

    // Just inside L1, on the accretor side.
    let l1_x = (stream.primary_offset() - stream.l1_distance()) / stream.separation();
    assert_relative_eq!(seed[0] - l1_x, 1e-3, epsilon = 1e-12);
}

#[test]
fn recorded_points_respect_the_minimum_spacing() {
    let dl = 0.005;
    let trajectory = stream(0.5).trajectory(dl, 0.8).expect("trajectory");
    assert!(trajectory.points.len() > 10);
    assert_eq!(trajectory.points.len(), trajectory.times_s.len());
    for pair in trajectory.points.windows(2) {
        let step = vector::distance2(&pair[0], &pair[1]);
        assert!(step >= dl, "spacing {step} below {dl}");
    }
    for pair in trajectory.times_s.windows(2) {
        assert!(pair[1] > pair[0], "times must increase: {pair:?}");
    }
}

#[test]
fn stream_reaches_the_disc_for_a_wide_range_of_mass_ratios() {
    for q in [0.1, 0.5, 1.0, 2.0, 10.0] {
        let stream = stream(q);
        let trajectory = stream.trajectory(0.005, 0.9).expect("trajectory");
        assert_eq!(
            trajectory.termination,
            Termination::ReachedRadius,
            "q = {q} stopped after {} steps",
            trajectory.steps
        );
        assert!(trajectory.steps < MAX_STEPS);

        // The final point sits close to the stopping radius around the accretor.
        let accretor = [stream.primary_offset() / stream.separation(), 0.0];
        let impact = trajectory.impact_point().expect("impact point");
        let r_stop = 0.9 * stream.eggleton_radius() / stream.separation();
        let distance = vector::distance2(&impact, &accretor);
        assert!(
            (distance - r_stop).abs() < 0.02,
            "q = {q}: impact at {distance}, expected about {r_stop}"
        );
    }
}

#[test]
fn stream_is_deflected_ahead_of_the_line_of_centres() {
    let trajectory = stream(0.5).trajectory(0.005, 0.8).expect("trajectory");
    let impact = trajectory.impact_point().expect("impact point");
    assert!(impact[1] < 0.0, "Coriolis deflection should push toward -y: {impact:?}");
    assert!(impact[0] > trajectory.points[0][0], "stream should move toward the accretor");
}

#[test]
fn characteristic_speed_matches_the_midpoint() {
    let stream = stream(0.5);
    let trajectory = stream.trajectory(0.005, 0.8).expect("trajectory");
    let m = trajectory.points.len() / 2;
    let dp = vector::distance2(&trajectory.points[m + 1], &trajectory.points[m]);
    let dt = (trajectory.times_s[m + 1] - trajectory.times_s[m]) / stream.period();
    assert_relative_eq!(trajectory.speed, dp / dt, max_relative = 1e-12);
    assert!(trajectory.speed > 1.0 && trajectory.speed < 5.0, "speed {}", trajectory.speed);
}

#[test]
fn path_structure_helpers() {
    let trajectory = stream(0.5).trajectory(0.005, 0.8).expect("trajectory");

    let lengths = trajectory.arc_lengths();
    assert_eq!(lengths.len(), trajectory.points.len());
    assert_eq!(lengths[0], 0.0);
    for pair in lengths.windows(2) {
        assert!(pair[1] > pair[0]);
    }

    let chord = vector::distance2(&trajectory.points[0], &trajectory.impact_point().expect("end"));
    assert!(lengths[lengths.len() - 1] >= chord);
    assert_relative_eq!(
        trajectory.traversal_time(),
        chord / trajectory.speed,
        max_relative = 1e-12
    );
    assert!(trajectory.traversal_time() > 0.0 && trajectory.traversal_time() < 1.0);
}

#[test]
fn stream_radius_uses_the_l1_sound_speed() {
    let stream = stream(0.5);
    let c_s = 1e4 * (0.75_f64 * 4500.0 / 1e4).sqrt();
    let expected = 0.5 * c_s * PERIOD_S / (2.0 * std::f64::consts::PI * stream.separation());
    assert_relative_eq!(stream.stream_radius(4500.0, 1.0), expected, max_relative = 1e-12);
    assert_eq!(stream.stream_radius(4500.0, 1e-6), 1e-6);
}

#[test]
fn degenerate_and_invalid_requests_are_errors() {
    let stream = stream(0.5);
    assert!(matches!(
        stream.trajectory(10.0, 0.8),
        Err(StreamError::Degenerate { points: 1 })
    ));
    assert!(matches!(
        stream.trajectory(0.0, 0.8),
        Err(StreamError::InvalidParameter { .. })
    ));
    assert!(matches!(
        stream.trajectory(0.005, -1.0),
        Err(StreamError::InvalidParameter { .. })
    ));
    assert!(matches!(
        Stream::new(0.0, M_SUN, PERIOD_S),
        Err(StreamError::InvalidParameter { .. })
    ));
    assert!(matches!(
        Stream::new(0.5, M_SUN, -1.0),
        Err(StreamError::Roche(_))
    ));
}

#[test]
fn density_pattern_advects_along_the_stream() {
    let mut rng = ChaChaRng::seed_from_u64(5);
    let density = DensityPattern::new(&mut rng, 20, 8).expect("density");
    for index in 0..20 {
        for col in 0..8 {
            let w = density.weight(index, col, 0.0, 0.1).expect("in range");
            assert!((0.0..=1.0).contains(&w));
            // One traversal time later the pattern has cycled once.
            assert_eq!(density.weight(index, col, 0.1, 0.1), Some(w));
            // Half a traversal shifts it by half the stream.
            let later = density.weight((index + 10) % 20, col, 0.05, 0.1).expect("in range");
            assert_eq!(later, w);
        }
    }
    assert_eq!(density.weight(20, 0, 0.0, 1.0), None);
    assert!(DensityPattern::new(&mut rng, 0, 8).is_err());
}

use approx::assert_relative_eq;
use binsim::common::vector;
use binsim::config::{BinaryConfig, load_config};
use binsim::system::disc_azimuth;
use binsim::{BinarySystem, Resolution, SystemError};

const SMALL: Resolution = Resolution { n_steps: 4 };

fn dwarf_nova() -> BinaryConfig {
    load_config("configs/binaries/dwarf_nova.yaml").expect("dwarf nova config")
}

fn build(config: BinaryConfig) -> BinarySystem {
    BinarySystem::with_resolution(config, SMALL).expect("binary system")
}

#[test]
fn resolution_sets_grid_sizes() {
    let default = Resolution::default();
    assert_eq!(default.n_steps, 20);
    assert_eq!(default.n_lat(), 41);
    assert_eq!(default.n_long(), 80);
    assert_eq!(SMALL.n_rad(), 8);
    assert_eq!(SMALL.n_phi(), 16);
}

#[test]
fn donor_surface_covers_the_grid_in_the_centre_of_mass_frame() {
    let system = build(dwarf_nova());
    let samples = system.donor_surface(0.0).expect("donor surface");
    assert_eq!(samples.len(), SMALL.n_lat() * SMALL.n_long());

    let geometry = system.donor().geometry();
    let pole = samples[0].properties;
    assert_relative_eq!(pole.position[0], -geometry.c_of_m(), epsilon = 1e-12);
    assert_relative_eq!(pole.position[2], geometry.polar_rad(), epsilon = 1e-5);

    for sample in &samples {
        let props = sample.properties;
        assert_relative_eq!(vector::norm(&props.normal), 1.0, epsilon = 1e-9);
        assert!(props.temperature_k > 0.0);
        assert!(
            props.position[0] < -geometry.c_of_m() + geometry.l1(),
            "donor sample {:?} crosses L1",
            props.position
        );
    }
}

#[test]
fn stream_starts_just_past_the_donor_l1_point() {
    let system = build(dwarf_nova());
    let geometry = system.donor().geometry();
    let donor_l1_x = -geometry.c_of_m() + geometry.l1();

    let seed = system.stream().trajectory.points[0];
    assert_relative_eq!(seed[0] - 1e-3, donor_l1_x, epsilon = 1e-5);
    assert_relative_eq!(
        system.stream().stream.separation(),
        system.separation(),
        max_relative = 1e-12
    );
    assert!(system.stream().radius > 0.0 && system.stream().radius <= 0.05);
    assert_eq!(
        system.stream().density.n_points(),
        system.stream().trajectory.points.len()
    );
}

#[test]
fn disc_surface_is_centred_on_the_accretor() {
    let system = build(dwarf_nova());
    let model = system.disc().expect("dwarf nova has a disc");
    let c = model.disc.c_of_m();
    assert_relative_eq!(c, 1.0 - system.donor().geometry().c_of_m(), epsilon = 1e-12);

    let samples = system.disc_surface(0.0);
    let face = SMALL.n_rad() * SMALL.n_phi();
    assert_eq!(samples.len(), 2 * face);
    for (index, sample) in samples.iter().enumerate() {
        let r = sample.u;
        let props = sample.properties;
        let planar = (props.position[0] - c).hypot(props.position[1]);
        assert_relative_eq!(planar, r, epsilon = 1e-12);
        let side = if index < face { 1.0 } else { -1.0 };
        assert_eq!(props.position[2], side * model.disc.height(r));
        assert!(side * props.normal[2] >= 0.0, "normal {:?} faces into the disc", props.normal);
        assert_relative_eq!(vector::norm(&props.normal), 1.0, epsilon = 1e-9);
        assert!(
            props.temperature_k >= model.disc.temperature(r) * (1.0 - 1e-12),
            "texture should only heat the disc"
        );
    }
}

#[test]
fn hot_spot_sits_where_the_stream_lands() {
    let system = build(dwarf_nova());
    let model = system.disc().expect("disc");
    let impact = system
        .stream()
        .trajectory
        .impact_point()
        .expect("impact point");
    let c = model.disc.c_of_m();

    assert_eq!(model.hot_spot.impact_azimuth, disc_azimuth(impact, c));
    assert_eq!(model.hot_spot.t_hot, 6000.0);
    assert_relative_eq!(
        (c - impact[0]).hypot(impact[1]),
        model.disc.radius(),
        epsilon = 0.02
    );
    assert_eq!(
        model
            .hot_spot
            .heating(model.disc.radius(), model.hot_spot.impact_azimuth),
        6000.0
    );
}

#[test]
fn same_seed_gives_the_same_surfaces() {
    let a = build(dwarf_nova());
    let b = build(dwarf_nova());
    assert_eq!(
        a.donor_surface(0.3).expect("donor a"),
        b.donor_surface(0.3).expect("donor b")
    );
    assert_eq!(a.disc_surface(0.3), b.disc_surface(0.3));
}

#[test]
fn missing_disc_yields_an_empty_surface() {
    let mut config = dwarf_nova();
    config.disc = None;
    let system = build(config);
    assert!(system.disc().is_none());
    assert!(system.disc_surface(0.0).is_empty());
    assert_eq!(system.config().stream_disc_radius(), 0.8);
}

#[test]
fn irradiated_donor_is_dark_on_the_far_side() {
    let config = load_config("configs/binaries/x_ray_binary.toml").expect("x-ray binary");
    let system = build(config);
    assert!(system.donor().irradiation().is_some());

    let samples = system.donor_surface(0.0).expect("donor surface");
    assert!(
        samples
            .iter()
            .any(|sample| sample.properties.irradiation_temperature_k > 0.0),
        "some of the donor should face the accretor"
    );
    for sample in samples.iter().filter(|s| s.properties.normal[0] < 0.0) {
        assert_eq!(sample.properties.irradiation_temperature_k, 0.0);
    }
}

#[test]
fn invalid_configuration_is_rejected_before_building() {
    let mut config = dwarf_nova();
    config.donor.fill = 1.5;
    assert!(matches!(
        BinarySystem::with_resolution(config, SMALL),
        Err(SystemError::Config(_))
    ));
}

#[test]
fn primary_star_is_mirrored_onto_the_accretor_side() {
    let system = build(dwarf_nova());
    let primary = system.primary().expect("dwarf nova draws the primary");
    let geometry = primary.geometry();
    let c = geometry.c_of_m();
    assert_relative_eq!(c, 1.0 - system.donor().geometry().c_of_m(), epsilon = 1e-12);
    assert_relative_eq!(geometry.separation(), system.separation(), max_relative = 1e-12);

    let samples = system.primary_surface(0.0).expect("primary surface");
    assert_eq!(samples.len(), SMALL.n_lat() * SMALL.n_long());

    let pole = samples[0].properties;
    assert_relative_eq!(pole.position[0], c, epsilon = 1e-12);
    assert_relative_eq!(pole.position[2], geometry.polar_rad(), epsilon = 1e-5);
    assert_relative_eq!(pole.temperature_k, 12000.0, max_relative = 1e-4);

    for sample in &samples {
        let local = primary
            .surface_properties(sample.u, sample.v)
            .expect("local sample");
        let placed = sample.properties;
        assert_relative_eq!(placed.position[0], c - local.position[0], epsilon = 1e-12);
        assert_eq!(placed.position[1], -local.position[1]);
        assert_eq!(placed.position[2], local.position[2]);
        assert_eq!(placed.normal, [-local.normal[0], -local.normal[1], local.normal[2]]);
        assert!(
            placed.position[0] > c - geometry.l1(),
            "primary sample {:?} crosses L1",
            placed.position
        );
    }
}

#[test]
fn primary_is_heated_on_the_side_facing_the_donor() {
    let system = build(dwarf_nova());
    let samples = system.primary_surface(0.0).expect("primary surface");
    let lit: Vec<_> = samples
        .iter()
        .filter(|sample| sample.properties.irradiation_temperature_k > 0.0)
        .collect();
    assert!(!lit.is_empty(), "the donor should light part of the primary");
    for sample in lit {
        assert!(
            sample.properties.normal[0] < 0.0,
            "lit normal {:?} should face the donor on -x",
            sample.properties.normal
        );
    }
}

#[test]
fn primary_is_optional() {
    let mut config = dwarf_nova();
    config.primary = None;
    let without = build(config);
    assert!(without.primary().is_none());
    assert!(without.primary_surface(0.0).expect("no surface").is_empty());

    // Drawing the primary leaves the seeded texture of the rest untouched.
    let with = build(dwarf_nova());
    assert_eq!(
        with.donor_surface(0.2).expect("donor"),
        without.donor_surface(0.2).expect("donor")
    );
    assert_eq!(with.disc_surface(0.2), without.disc_surface(0.2));
}

#[test]
fn disc_faces_mirror_each_other_and_start_at_the_inner_edge() {
    let mut config = dwarf_nova();
    let settings = config.disc.as_mut().expect("disc section");
    settings.inner_radius = 0.2;
    settings.n_flare = 0;
    settings.hot_spot_temp = 0.0;
    let system = build(config);
    let model = system.disc().expect("disc");
    let r_in = model.disc.radius() * 0.2 / 0.8;
    assert_relative_eq!(model.inner_radius, r_in, max_relative = 1e-12);

    let samples = system.disc_surface(0.0);
    let face = SMALL.n_rad() * SMALL.n_phi();
    let step = (model.disc.radius() - r_in) / SMALL.n_rad() as f64;
    assert_relative_eq!(samples[0].u, r_in + step, max_relative = 1e-12);
    assert_relative_eq!(samples[face - 1].u, model.disc.radius(), max_relative = 1e-12);

    let (upper, lower) = samples.split_at(face);
    for (top, bottom) in upper.iter().zip(lower) {
        assert!(top.u > r_in);
        assert_eq!((top.u, top.v), (bottom.u, bottom.v));
        assert_eq!(bottom.properties, top.properties.reflected());
    }
}

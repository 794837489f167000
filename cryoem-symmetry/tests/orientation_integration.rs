use cryoem_symmetry::{
    OrientationGenerator, OrientationSpec, Params, SymmetryGroup, Vec3,
};

// --- Generated poles stay inside the asymmetric unit ---

#[test]
fn deterministic_generators_respect_the_asymmetric_unit() {
    for gen_name in ["eman", "even", "saff"] {
        for sym_name in ["c1", "c4", "d2", "tet", "oct", "icos"] {
            let sym = SymmetryGroup::parse(sym_name).unwrap();
            for inc_mirror in [false, true] {
                let generator = OrientationGenerator::from_spec(
                    gen_name,
                    OrientationSpec::with_delta(10.0).inc_mirror(inc_mirror),
                )
                .unwrap();
                let d = sym.get_delimiters(inc_mirror);
                for t in generator.generate(&sym).unwrap() {
                    let (alt, az) = (Vec3::z_axis() * &t).to_alt_az();
                    assert!(
                        alt <= d.alt_max + 1e-6,
                        "{} on {} mirror {}: alt {}",
                        gen_name,
                        sym_name,
                        inc_mirror,
                        alt
                    );
                    // The azimuth wraps at exactly az_max; allow the seam.
                    let az_ok = az <= d.az_max + 1e-6 || az >= 360.0 - 1e-6;
                    assert!(
                        az_ok,
                        "{} on {} mirror {}: az {}",
                        gen_name,
                        sym_name,
                        inc_mirror,
                        az
                    );
                }
            }
        }
    }
}

#[test]
fn platonic_orientations_pass_the_membership_test() {
    for gen_name in ["eman", "even", "saff"] {
        for sym_name in ["tet", "oct", "icos"] {
            let sym = SymmetryGroup::parse(sym_name).unwrap();
            let generator = OrientationGenerator::from_spec(
                gen_name,
                OrientationSpec::with_delta(6.0),
            )
            .unwrap();
            for t in generator.generate(&sym).unwrap() {
                let (az, alt, _phi) = t.eman_angles();
                assert!(
                    sym.is_in_asym_unit(alt, az.rem_euclid(360.0), false),
                    "{} on {}: ({}, {})",
                    gen_name,
                    sym_name,
                    alt,
                    az
                );
            }
        }
    }
}

// --- Tally equals generated count ---

#[test]
fn tally_agrees_with_generation_everywhere() {
    for gen_name in ["eman", "even", "saff"] {
        for sym_name in ["c1", "c3", "c4", "d2", "d3", "tet", "oct", "icos", "h2"] {
            let sym = SymmetryGroup::parse(sym_name).unwrap();
            for delta in [7.5, 12.0, 24.0] {
                for inc_mirror in [false, true] {
                    let generator = OrientationGenerator::from_spec(
                        gen_name,
                        OrientationSpec::with_delta(delta).inc_mirror(inc_mirror),
                    )
                    .unwrap();
                    assert_eq!(
                        generator.tally(&sym, delta).unwrap(),
                        generator.generate(&sym).unwrap().len(),
                        "{} on {} delta {} mirror {}",
                        gen_name,
                        sym_name,
                        delta,
                        inc_mirror
                    );
                }
            }
        }
    }
}

// --- Calibrated counts for the eman strategy at 30 degrees ---

#[test]
fn eman_c1_counts_at_thirty_degrees() {
    let sym = SymmetryGroup::parse("c1").unwrap();

    let plain = OrientationGenerator::eman(OrientationSpec::with_delta(30.0))
        .generate(&sym)
        .unwrap();
    assert!((19..=23).contains(&plain.len()), "got {}", plain.len());
    for t in &plain {
        let (_az, alt, _phi) = t.eman_angles();
        assert!((0.0..=90.0).contains(&alt));
    }

    let mirrored =
        OrientationGenerator::eman(OrientationSpec::with_delta(30.0).inc_mirror(true))
            .generate(&sym)
            .unwrap();
    // Roughly double the half-sphere count.
    assert!((39..=43).contains(&mirrored.len()), "got {}", mirrored.len());
    for t in &mirrored {
        let (_az, alt, _phi) = t.eman_angles();
        assert!((0.0..=180.0).contains(&alt));
    }
}

// --- Bisection hits an exact requested count ---

#[test]
fn saff_converts_n_to_delta_exactly() {
    let sym = SymmetryGroup::parse("c1").unwrap();
    let generator = OrientationGenerator::saff(OrientationSpec::with_n(1000));
    assert_eq!(generator.generate(&sym).unwrap().len(), 1000);
}

// --- Phi policies ---

#[test]
fn random_phi_randomizes_only_the_third_euler() {
    let sym = SymmetryGroup::parse("c2").unwrap();
    let plain = OrientationGenerator::eman(OrientationSpec::with_delta(20.0).seed(9))
        .generate(&sym)
        .unwrap();
    let randomized = OrientationGenerator::eman(
        OrientationSpec::with_delta(20.0).random_phi(true).seed(9),
    )
    .generate(&sym)
    .unwrap();

    assert_eq!(plain.len(), randomized.len());
    for (a, b) in plain.iter().zip(&randomized) {
        let (az_a, alt_a, phi_a) = a.eman_angles();
        let (az_b, alt_b, phi_b) = b.eman_angles();
        if alt_a == 0.0 {
            // At the pole az folds into phi; only the composite matters.
            continue;
        }
        assert!((az_a - az_b).abs() < 1e-6);
        assert!((alt_a - alt_b).abs() < 1e-6);
        assert!(phi_a.abs() < 1e-9);
        let _ = phi_b;
    }
}

#[test]
fn phitoo_duplicates_each_orientation() {
    let sym = SymmetryGroup::parse("c4").unwrap();
    let base = OrientationGenerator::eman(OrientationSpec::with_delta(20.0))
        .generate(&sym)
        .unwrap();
    let ringed = OrientationGenerator::eman(OrientationSpec::with_delta(20.0).phitoo(120.0))
        .generate(&sym)
        .unwrap();
    // phi = 0, 120, 240 per orientation.
    assert_eq!(ringed.len(), base.len() * 3);
}

#[test]
fn negative_phitoo_is_rejected() {
    let mut params = Params::new();
    params.set("delta", 10.0);
    params.set("phitoo", -5.0);
    assert!(OrientationGenerator::parse("eman", &params).is_err());
}

#[test]
fn delta_and_n_are_mutually_exclusive() {
    let mut params = Params::new();
    params.set("delta", 10.0);
    params.set("n", 100);
    assert!(OrientationGenerator::parse("eman", &params).is_err());

    let empty = Params::new();
    assert!(OrientationGenerator::parse("eman", &empty).is_err());
}

// --- The random and optimum strategies ---

#[test]
fn random_generator_reduces_into_the_group() {
    let sym = SymmetryGroup::parse("d2").unwrap();
    let mut params = Params::new();
    params.set("n", 120);
    params.set("seed", 31);
    params.set("inc_mirror", true);
    let generator = OrientationGenerator::parse("rand", &params).unwrap();
    let views = generator.generate(&sym).unwrap();
    assert_eq!(views.len(), 120);
    for t in &views {
        let (alt, az) = (Vec3::z_axis() * t).to_alt_az();
        assert!(sym.is_in_asym_unit(alt, az, true), "({}, {})", alt, az);
    }
}

#[test]
fn optimum_generator_filters_to_the_requested_unit() {
    let sym = SymmetryGroup::parse("c4").unwrap();
    let mut params = Params::new();
    params.set("delta", 18.0);
    params.set("use", "even");
    params.set("seed", 12);
    let generator = OrientationGenerator::parse("opt", &params).unwrap();
    let views = generator.generate(&sym).unwrap();
    assert!(!views.is_empty());
    for t in &views {
        let (alt, az) = (Vec3::z_axis() * t).to_alt_az();
        assert!(sym.is_in_asym_unit(alt, az, false), "({}, {})", alt, az);
    }
}

#[test]
fn helical_generation_mirrors_across_the_equator() {
    let sym = SymmetryGroup::parse("h3").unwrap();
    let generator =
        OrientationGenerator::eman(OrientationSpec::with_delta(1.0).inc_mirror(true));
    let views = generator.generate(&sym).unwrap();
    let above = views
        .iter()
        .filter(|t| {
            let (_az, alt, _phi) = t.eman_angles();
            alt < 90.0
        })
        .count();
    let below = views
        .iter()
        .filter(|t| {
            let (_az, alt, _phi) = t.eman_angles();
            alt > 90.0
        })
        .count();
    assert!(above > 0);
    assert_eq!(above, below);
}

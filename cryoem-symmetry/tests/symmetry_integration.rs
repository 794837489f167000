use cryoem_symmetry::{SymmetryGroup, Transform, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EPS: f64 = 1e-4;

const ALL_GROUPS: [&str; 8] = ["c1", "c2", "c4", "c7", "d2", "tet", "oct", "icos"];

fn random_directions(count: usize, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut directions = Vec::with_capacity(count);
    while directions.len() < count {
        let u1: f64 = rng.random_range(-1.0..1.0);
        let u2: f64 = rng.random_range(-1.0..1.0);
        let s = u1 * u1 + u2 * u2;
        if s > 1.0 {
            continue;
        }
        let scale = 2.0 * (1.0 - s).sqrt();
        directions.push(Vec3::new(scale * u1, scale * u2, 2.0 * s - 1.0));
    }
    directions
}

// --- Group elements are rotations ---

#[test]
fn every_element_is_a_proper_rotation() {
    for name in ALL_GROUPS {
        let sym = SymmetryGroup::parse(name).unwrap();
        for k in 0..sym.order() {
            let t = sym.get_sym(k);
            assert!((t.determinant() - 1.0).abs() < EPS, "{} element {}", name, k);
            let product = &t * &t.transposed();
            assert!(
                product.max_difference(&Transform::identity()) < EPS,
                "{} element {} is not orthogonal",
                name,
                k
            );
        }
    }
}

#[test]
fn cyclic_and_dihedral_elements_wrap_at_the_order() {
    for name in ["c3", "c6", "d2", "d5"] {
        let sym = SymmetryGroup::parse(name).unwrap();
        let wrapped = sym.get_sym(sym.order());
        assert!(
            wrapped.max_difference(&sym.get_sym(0)) < EPS,
            "{} did not wrap",
            name
        );
    }
}

// --- Scenarios ---

#[test]
fn c4_quarter_turn_and_full_turn() {
    let sym = SymmetryGroup::parse("c4").unwrap();
    let (az, alt, phi) = sym.get_sym(1).eman_angles();
    assert!((az - 90.0).abs() < EPS);
    assert!(alt.abs() < EPS);
    assert!(phi.abs() < EPS);
    assert!(sym.get_sym(4).is_identity());
}

#[test]
fn d3_has_order_six_and_a_flip() {
    let sym = SymmetryGroup::parse("d3").unwrap();
    assert_eq!(sym.order(), 6);
    let (az, alt, _phi) = sym.get_sym(3).eman_angles();
    assert!(az.abs() < EPS);
    assert!((alt - 180.0).abs() < EPS);
}

#[test]
fn icosahedral_group_has_sixty_distinct_elements() {
    let sym = SymmetryGroup::parse("icos").unwrap();
    assert_eq!(sym.order(), 60);
    assert!(sym.get_sym(0).is_identity());
    let elements: Vec<Transform> = (0..60).map(|k| sym.get_sym(k)).collect();
    for i in 0..elements.len() {
        for j in (i + 1)..elements.len() {
            assert!(
                elements[i].max_difference(&elements[j]) > EPS,
                "elements {} and {} coincide",
                i,
                j
            );
        }
    }
}

// --- Asymmetric units tile the sphere ---

#[test]
fn exactly_one_reduction_lands_in_the_asymmetric_unit() {
    for name in ALL_GROUPS {
        let sym = SymmetryGroup::parse(name).unwrap();
        for direction in random_directions(25, 42) {
            let (alt, az) = direction.to_alt_az();
            let t = Transform::from_eman(az, alt, 0.0);

            let mut hosts = 0;
            for k in 0..sym.order() {
                let reduced = sym.reduce(&t, k).unwrap();
                let (r_alt, r_az) = (Vec3::z_axis() * &reduced).to_alt_az();
                if sym.is_in_asym_unit(r_alt, r_az, true) {
                    hosts += 1;
                }
            }
            assert_eq!(
                hosts, 1,
                "{}: direction ({:.3}, {:.3}) hosted by {} units",
                name, alt, az, hosts
            );
        }
    }
}

#[test]
fn reduction_only_multiplies_by_group_elements() {
    for name in ["c4", "d3", "oct"] {
        let sym = SymmetryGroup::parse(name).unwrap();
        for direction in random_directions(10, 7) {
            let (alt, az) = direction.to_alt_az();
            let t = Transform::from_eman(az, alt, 25.0);
            let reduced = sym.reduce(&t, 0).unwrap();
            let matched = (0..sym.order()).any(|i| {
                (&reduced * &sym.get_sym(i)).max_difference(&t) < EPS
            });
            assert!(matched, "{}: reduction left the coset", name);
        }
    }
}

// --- Membership sanity across the delimiters ---

#[test]
fn delimiters_bound_the_membership_test() {
    for name in ALL_GROUPS {
        let sym = SymmetryGroup::parse(name).unwrap();
        for inc_mirror in [false, true] {
            let d = sym.get_delimiters(inc_mirror);
            // Far outside the box is never a member.
            assert!(
                !sym.is_in_asym_unit(d.alt_max + 20.0, 1.0, inc_mirror),
                "{} mirror {}",
                name,
                inc_mirror
            );
        }
    }
}

#[test]
fn helical_strip_is_bidirectional_with_mirror() {
    let sym = SymmetryGroup::parse("h2").unwrap();
    assert!(sym.is_in_asym_unit(93.0, 10.0, false));
    assert!(!sym.is_in_asym_unit(87.0, 10.0, false));
    assert!(sym.is_in_asym_unit(87.0, 10.0, true));
}

#[test]
fn asym_unit_points_are_unit_vectors() {
    for name in ALL_GROUPS {
        let sym = SymmetryGroup::parse(name).unwrap();
        for inc_mirror in [false, true] {
            for point in sym.get_asym_unit_points(inc_mirror) {
                assert!(
                    (point.magnitude() - 1.0).abs() < 1e-9,
                    "{} mirror {}",
                    name,
                    inc_mirror
                );
            }
        }
    }
}

#[test]
fn triangle_fans_share_the_polygon_vertices() {
    for name in ["c3", "c5", "d4", "tet", "oct", "icos"] {
        let sym = SymmetryGroup::parse(name).unwrap();
        let points = sym.get_asym_unit_points(true);
        let triangles = sym.get_asym_unit_triangles(true);
        assert!(!triangles.is_empty(), "{}", name);
        for triangle in &triangles {
            for vertex in triangle {
                assert!(
                    points.iter().any(|p| (*p - *vertex).magnitude() < 1e-12),
                    "{}: fan vertex not in polygon",
                    name
                );
            }
        }
    }
}

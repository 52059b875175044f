use matrixcompare::assert_scalar_eq;
use nalgebra::Point3;
use proptest::prelude::*;
use surfload::distance::Distance;

#[test]
fn distance_between_points() {
    let a = Point3::new(1.0, 2.0, 3.0);
    let b = Point3::new(4.0, 6.0, 3.0);
    let d = Distance::between(&a, &b);
    assert_eq!(d.squared(), 25.0);
    assert_eq!(d.distance(), 5.0);
    assert_eq!(Distance::between(&a, &a), Distance::zero());
}

#[test]
fn squared_and_literal_constructors_agree() {
    assert_eq!(Distance::from_distance(3.0), Distance::from_squared_distance(9.0));
    assert_ne!(Distance::from_distance(3.0), Distance::from_squared_distance(3.0));
    assert_eq!(Distance::from_squared_distance(2.0).squared(), 2.0);
}

#[test]
fn comparison_operators() {
    let a = Distance::from_distance(1.0);
    let b = Distance::from_distance(2.0);
    assert!(a < b);
    assert!(a <= b);
    assert!(b > a);
    assert!(b >= a);
    assert!(a <= a);
    assert!(a >= a);
    assert!(!(a < a));
    assert!(a != b);
}

proptest! {
    #[test]
    fn ordering_matches_literal_distances(d1 in 0.0..1e6, d2 in 0.0..1e6) {
        let (a, b) = (Distance::from_distance(d1), Distance::from_distance(d2));
        prop_assert_eq!(d1 < d2, a < b);
        prop_assert_eq!(d1 > d2, a > b);
        prop_assert_eq!(d1 <= d2, a <= b);
        prop_assert_eq!(d1 >= d2, a >= b);
    }

    #[test]
    fn literal_distance_round_trip(d in 0.0f64..1e6) {
        assert_scalar_eq!(Distance::from_distance(d).distance(), d, comp = float);
    }
}

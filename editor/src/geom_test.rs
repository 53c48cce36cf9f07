#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn point_default_is_origin() {
    assert_eq!(Point::default(), Point::new(0.0, 0.0));
}

#[test]
fn delta_from_subtracts_componentwise() {
    let d = Point::new(153.0, 88.0).delta_from(Point::new(100.0, 100.0));
    assert_eq!(d, Point::new(53.0, -12.0));
}

#[test]
fn distance_is_euclidean() {
    assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
}

#[test]
fn distance_is_symmetric() {
    let a = Point::new(10.0, -4.0);
    let b = Point::new(-2.0, 7.5);
    assert!((a.distance(b) - b.distance(a)).abs() < 1e-12);
}

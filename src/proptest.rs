use crate::element::Quad4d3Element;
use ::proptest::collection::vec;
use ::proptest::prelude::*;
use nalgebra::{Point3, UnitQuaternion, Vector3};

pub fn point3() -> impl Strategy<Value = Point3<f64>> {
    // Pick a reasonably small range to pick coordinates from,
    // otherwise we can easily get floating point numbers that are
    // so ridiculously large as to break anything we might want to do with them
    let range = -10.0..10.0;
    [range.clone(), range.clone(), range.clone()].prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// A rectangle in 3D, obtained by rotating and translating the rectangle
/// `[0, width] x [0, height]` in the plane `z = 0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlanarRectangle {
    pub width: f64,
    pub height: f64,
    pub rotation: UnitQuaternion<f64>,
    pub translation: Vector3<f64>,
}

impl PlanarRectangle {
    /// The corners in counter-clockwise order with respect to [`unit_normal`](Self::unit_normal).
    pub fn vertices(&self) -> [Point3<f64>; 4] {
        let (w, h) = (self.width, self.height);
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(w, 0.0, 0.0),
            Point3::new(w, h, 0.0),
            Point3::new(0.0, h, 0.0),
        ]
        .map(|p| self.rotation * p + self.translation)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn unit_normal(&self) -> Vector3<f64> {
        self.rotation * Vector3::z()
    }
}

impl Arbitrary for PlanarRectangle {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        let side = 0.1..10.0;
        let angle = -3.0..3.0;
        let offset = -10.0..10.0;
        (
            side.clone(),
            side,
            [angle.clone(), angle.clone(), angle],
            [offset.clone(), offset.clone(), offset],
        )
            .prop_map(|(width, height, axis, translation)| Self {
                width,
                height,
                rotation: UnitQuaternion::from_scaled_axis(Vector3::from(axis)),
                translation: Vector3::from(translation),
            })
            .boxed()
    }
}

impl Arbitrary for Quad4d3Element<f64> {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        any::<PlanarRectangle>()
            .prop_map(|rectangle| Self::from_vertices(rectangle.vertices()))
            .boxed()
    }
}

/// Nodal values of moderate magnitude, one per node.
pub fn nodal_values(num_nodes: usize) -> impl Strategy<Value = Vec<f64>> {
    vec(-100.0..100.0, num_nodes)
}

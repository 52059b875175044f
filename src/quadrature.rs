use nalgebra::allocator::Allocator;
use nalgebra::{convert, DefaultAllocator, DimName, OPoint, Point2, Scalar, U2};
use num::Zero;
use serde::{Deserialize, Serialize};
use std::ops::{AddAssign, Mul};

use crate::connectivity::{InterpolationOrder, ReferenceShape, SurfaceGeometryType};
use crate::Real;

/// Errors returned by quadrature methods.
pub use surfload_quadrature::Error as QuadratureError;

pub mod tensor;
pub mod total_order;

pub type QuadraturePair<T, D> = (Vec<T>, Vec<OPoint<T, D>>);
pub type QuadraturePair2d<T> = QuadraturePair<T, U2>;

/// A quadrature rule consisting of weights and points.
pub trait Quadrature<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    fn weights(&self) -> &[T];
    fn points(&self) -> &[OPoint<T, D>];

    fn num_points(&self) -> usize {
        self.weights().len()
    }

    /// Approximates the integral of the given function using this quadrature rule.
    fn integrate<U, Function>(&self, f: Function) -> U
    where
        Function: Fn(&OPoint<T, D>) -> U,
        U: Zero + Mul<T, Output = U> + AddAssign<U>,
    {
        let mut integral = U::zero();
        for (w, p) in self.weights().iter().zip(self.points()) {
            integral += f(p) * w.clone();
        }
        integral
    }
}

impl<T, D, A, B> Quadrature<T, D> for (A, B)
where
    T: Scalar,
    D: DimName,
    A: AsRef<[T]>,
    B: AsRef<[OPoint<T, D>]>,
    DefaultAllocator: Allocator<T, D>,
{
    fn weights(&self) -> &[T] {
        self.0.as_ref()
    }

    fn points(&self) -> &[OPoint<T, D>] {
        self.1.as_ref()
    }
}

impl<T, D, X> Quadrature<T, D> for &X
where
    T: Scalar,
    D: DimName,
    X: Quadrature<T, D>,
    DefaultAllocator: Allocator<T, D>,
{
    fn weights(&self) -> &[T] {
        X::weights(self)
    }

    fn points(&self) -> &[OPoint<T, D>] {
        X::points(self)
    }
}

fn convert_quadrature_rule_from_2d_f64<T: Real>(quadrature: surfload_quadrature::Rule2d) -> QuadraturePair2d<T> {
    let (weights, points) = quadrature;
    let weights = weights.into_iter().map(convert).collect();
    let points = points.into_iter().map(Point2::from).map(convert).collect();
    (weights, points)
}

/// Replaces the default rule for a single geometry type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadratureOverride {
    pub geometry_type: SurfaceGeometryType,
    /// Gauss points per direction for quadrilaterals, polynomial strength for triangles.
    pub order: usize,
}

/// Selects the integration scheme used for each surface geometry type.
///
/// Quadrilaterals use tensor-product Gauss rules and triangles use rules of a given polynomial
/// strength. Missing fields take their default values when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadratureSettings {
    pub linear_quadrilateral_points: usize,
    pub quadratic_quadrilateral_points: usize,
    pub linear_triangle_strength: usize,
    pub quadratic_triangle_strength: usize,
    pub overrides: Vec<QuadratureOverride>,
}

impl Default for QuadratureSettings {
    fn default() -> Self {
        Self {
            linear_quadrilateral_points: 2,
            quadratic_quadrilateral_points: 3,
            linear_triangle_strength: 2,
            quadratic_triangle_strength: 4,
            overrides: Vec::new(),
        }
    }
}

impl QuadratureSettings {
    /// The order of the rule for the given geometry type, i.e. the number of Gauss points per
    /// direction for quadrilaterals and the polynomial strength for triangles.
    ///
    /// The last override for the geometry type takes precedence.
    pub fn rule_order(&self, geometry_type: SurfaceGeometryType) -> usize {
        let overridden = self
            .overrides
            .iter()
            .rev()
            .find(|o| o.geometry_type == geometry_type)
            .map(|o| o.order);
        overridden.unwrap_or_else(|| {
            use InterpolationOrder::*;
            use ReferenceShape::*;
            match (geometry_type.reference_shape(), geometry_type.order()) {
                (Quadrilateral, Linear) => self.linear_quadrilateral_points,
                (Quadrilateral, Quadratic) => self.quadratic_quadrilateral_points,
                (Triangle, Linear) => self.linear_triangle_strength,
                (Triangle, Quadratic) => self.quadratic_triangle_strength,
            }
        })
    }

    /// Constructs the rule for the given geometry type.
    pub fn rule<T: Real>(&self, geometry_type: SurfaceGeometryType) -> Result<QuadraturePair2d<T>, QuadratureError> {
        let order = self.rule_order(geometry_type);
        match geometry_type.reference_shape() {
            ReferenceShape::Quadrilateral => tensor::quadrilateral_gauss(order),
            ReferenceShape::Triangle => total_order::triangle(order),
        }
    }
}

/// The integration scheme of every surface geometry type, constructed once and shared by all
/// conditions of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceQuadratureTable<T: Scalar> {
    triangle3: QuadraturePair2d<T>,
    triangle6: QuadraturePair2d<T>,
    quadrilateral4: QuadraturePair2d<T>,
    quadrilateral8: QuadraturePair2d<T>,
    quadrilateral9: QuadraturePair2d<T>,
}

impl<T: Real> SurfaceQuadratureTable<T> {
    pub fn from_settings(settings: &QuadratureSettings) -> Result<Self, QuadratureError> {
        use SurfaceGeometryType::*;
        Ok(Self {
            triangle3: settings.rule(Triangle3)?,
            triangle6: settings.rule(Triangle6)?,
            quadrilateral4: settings.rule(Quadrilateral4)?,
            quadrilateral8: settings.rule(Quadrilateral8)?,
            quadrilateral9: settings.rule(Quadrilateral9)?,
        })
    }

    pub fn rule(&self, geometry_type: SurfaceGeometryType) -> &QuadraturePair2d<T> {
        use SurfaceGeometryType::*;
        match geometry_type {
            Triangle3 => &self.triangle3,
            Triangle6 => &self.triangle6,
            Quadrilateral4 => &self.quadrilateral4,
            Quadrilateral8 => &self.quadrilateral8,
            Quadrilateral9 => &self.quadrilateral9,
        }
    }
}

impl<T: Real> Default for SurfaceQuadratureTable<T> {
    fn default() -> Self {
        Self::from_settings(&QuadratureSettings::default()).expect("Default quadrature settings must be valid")
    }
}

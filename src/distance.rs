//! Distances that can be compared without taking a square root.
use crate::Real;
use nalgebra::allocator::Allocator;
use nalgebra::{DefaultAllocator, DimName, OPoint};
use std::cmp::Ordering;

/// A non-negative distance, stored as its square.
///
/// Comparisons are carried out on the squared values. Since squaring is monotonic on
/// non-negative numbers, this gives the same ordering as comparing the distances themselves,
/// while the square root is only computed when the literal distance is requested with
/// [`distance`](Self::distance).
#[derive(Debug, Copy, Clone, Default)]
pub struct Distance<T> {
    squared: T,
}

impl<T: Real> Distance<T> {
    pub fn zero() -> Self {
        Self { squared: T::zero() }
    }

    /// Construct a distance from its square.
    ///
    /// The squared distance must be non-negative.
    pub fn from_squared_distance(squared_distance: T) -> Self {
        debug_assert!(squared_distance >= T::zero(), "squared distance must be non-negative");
        Self {
            squared: squared_distance,
        }
    }

    /// Construct a distance from its literal value.
    ///
    /// The distance must be non-negative.
    pub fn from_distance(distance: T) -> Self {
        debug_assert!(distance >= T::zero(), "distance must be non-negative");
        Self {
            squared: distance * distance,
        }
    }

    /// The distance between two points.
    pub fn between<D>(a: &OPoint<T, D>, b: &OPoint<T, D>) -> Self
    where
        D: DimName,
        DefaultAllocator: Allocator<T, D>,
    {
        let d = a - b;
        Self { squared: d.dot(&d) }
    }

    pub fn squared(&self) -> T {
        self.squared
    }

    /// The literal distance.
    pub fn distance(&self) -> T {
        self.squared.sqrt()
    }
}

impl<T: Real> PartialEq for Distance<T> {
    fn eq(&self, other: &Self) -> bool {
        self.squared == other.squared
    }
}

impl<T: Real> PartialOrd for Distance<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.squared.partial_cmp(&other.squared)
    }

    fn lt(&self, other: &Self) -> bool {
        self.squared < other.squared
    }

    fn le(&self, other: &Self) -> bool {
        self.squared <= other.squared
    }

    fn gt(&self, other: &Self) -> bool {
        self.squared > other.squared
    }

    fn ge(&self, other: &Self) -> bool {
        self.squared >= other.squared
    }
}

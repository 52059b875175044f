use crate::error::GeometryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// The shape of the reference domain of a surface element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceShape {
    /// The triangle with corners `(-1, -1)`, `(1, -1)` and `(-1, 1)`.
    Triangle,
    /// The square `[-1, 1]^2`.
    Quadrilateral,
}

/// Polynomial order of an interpolation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InterpolationOrder {
    Linear,
    Quadratic,
}

/// The supported surface geometries in three dimensions.
///
/// Node ordering follows the usual convention: corner nodes first, in counter-clockwise order
/// when viewed against the normal, followed by edge midpoint nodes (starting with the edge
/// between the first two corners) and finally the interior node, if any.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceGeometryType {
    Triangle3,
    Triangle6,
    Quadrilateral4,
    Quadrilateral8,
    Quadrilateral9,
}

impl SurfaceGeometryType {
    pub const ALL: [SurfaceGeometryType; 5] = [
        Self::Triangle3,
        Self::Triangle6,
        Self::Quadrilateral4,
        Self::Quadrilateral8,
        Self::Quadrilateral9,
    ];

    pub fn num_nodes(&self) -> usize {
        match self {
            Self::Triangle3 => 3,
            Self::Triangle6 => 6,
            Self::Quadrilateral4 => 4,
            Self::Quadrilateral8 => 8,
            Self::Quadrilateral9 => 9,
        }
    }

    /// The number of corner nodes, i.e. the nodes of the linear counterpart.
    pub fn num_corner_nodes(&self) -> usize {
        match self.reference_shape() {
            ReferenceShape::Triangle => 3,
            ReferenceShape::Quadrilateral => 4,
        }
    }

    pub fn reference_shape(&self) -> ReferenceShape {
        match self {
            Self::Triangle3 | Self::Triangle6 => ReferenceShape::Triangle,
            Self::Quadrilateral4 | Self::Quadrilateral8 | Self::Quadrilateral9 => ReferenceShape::Quadrilateral,
        }
    }

    /// The polynomial order of the geometric interpolation.
    pub fn order(&self) -> InterpolationOrder {
        match self {
            Self::Triangle3 | Self::Quadrilateral4 => InterpolationOrder::Linear,
            _ => InterpolationOrder::Quadratic,
        }
    }

    /// The geometry spanned by the corner nodes only.
    ///
    /// For differential order elements, this is the geometry used to interpolate the lower order
    /// field.
    pub fn linear_counterpart(&self) -> SurfaceGeometryType {
        match self.reference_shape() {
            ReferenceShape::Triangle => Self::Triangle3,
            ReferenceShape::Quadrilateral => Self::Quadrilateral4,
        }
    }

    /// The number of nodes of the interpolation of the given order on this geometry.
    ///
    /// Returns `None` if the order exceeds the order of the geometry.
    pub fn num_nodes_for_order(&self, order: InterpolationOrder) -> Option<usize> {
        if order > self.order() {
            None
        } else if order == self.order() {
            Some(self.num_nodes())
        } else {
            Some(self.num_corner_nodes())
        }
    }
}

impl Display for SurfaceGeometryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Triangle3 => "Triangle3D3",
            Self::Triangle6 => "Triangle3D6",
            Self::Quadrilateral4 => "Quadrilateral3D4",
            Self::Quadrilateral8 => "Quadrilateral3D8",
            Self::Quadrilateral9 => "Quadrilateral3D9",
        };
        write!(f, "{name}")
    }
}

/// The nodes of a single surface element together with its geometry type.
///
/// The node count always matches the geometry type. This also holds for deserialized
/// connectivity, which is validated in the same way as [`SurfaceConnectivity::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSurfaceConnectivity")]
pub struct SurfaceConnectivity {
    geometry_type: SurfaceGeometryType,
    vertex_indices: Vec<usize>,
}

#[derive(Deserialize)]
struct RawSurfaceConnectivity {
    geometry_type: SurfaceGeometryType,
    vertex_indices: Vec<usize>,
}

impl TryFrom<RawSurfaceConnectivity> for SurfaceConnectivity {
    type Error = GeometryError;

    fn try_from(raw: RawSurfaceConnectivity) -> Result<Self, Self::Error> {
        Self::try_new(raw.geometry_type, raw.vertex_indices)
    }
}

impl SurfaceConnectivity {
    pub fn try_new(geometry_type: SurfaceGeometryType, vertex_indices: Vec<usize>) -> Result<Self, GeometryError> {
        let expected = geometry_type.num_nodes();
        if vertex_indices.len() != expected {
            return Err(GeometryError::NodeCountMismatch {
                geometry_type,
                expected,
                actual: vertex_indices.len(),
            });
        }
        Ok(Self {
            geometry_type,
            vertex_indices,
        })
    }

    pub fn geometry_type(&self) -> SurfaceGeometryType {
        self.geometry_type
    }

    pub fn vertex_indices(&self) -> &[usize] {
        &self.vertex_indices
    }
}

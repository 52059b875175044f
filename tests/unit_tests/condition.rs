use crate::planar_model;
use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use nalgebra::{DMatrix, DVector, DVectorViewMut, Matrix3x2, Point2, Point3, Vector3};
use proptest::prelude::*;
use surfload::condition::{
    Condition, ConditionVariables, NormalLoad, SurfaceLoad, SurfaceLoadFormula, SurfaceTraction,
};
use surfload::connectivity::{InterpolationOrder, SurfaceGeometryType};
use surfload::error::{ConditionError, EvaluationStage, GeometryError};
use surfload::geometry::GeometryProvider;
use surfload::mesh::procedural::create_planar_surface_mesh;
use surfload::mesh::{NodalValues, NodalVariable, SurfaceMesh};
use surfload::model::PropertiesId;
use surfload::proptest::{nodal_values, PlanarRectangle};
use surfload::quadrature::{QuadratureSettings, SurfaceQuadratureTable};

fn quad4_condition() -> Condition {
    Condition::new(7, SurfaceGeometryType::Quadrilateral4, vec![0, 1, 2, 3], PropertiesId(0), NormalLoad).unwrap()
}

fn rectangle_mesh(vertices: [Point3<f64>; 4], stress: Vec<f64>) -> SurfaceMesh<f64> {
    let mut mesh = SurfaceMesh::from_vertices(vertices.to_vec());
    mesh.nodal_values_mut()
        .set(NodalVariable::NormalContactStress, stress);
    mesh
}

/// Sums the force components over all nodes.
fn total_force(rhs: &DVector<f64>) -> Vector3<f64> {
    rhs.as_slice()
        .chunks_exact(3)
        .fold(Vector3::zeros(), |sum, f| sum + Vector3::from_column_slice(f))
}

#[test]
fn unit_square_constant_stress() {
    let vertices = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    let mesh = rectangle_mesh(vertices, vec![2.0; 4]);
    let quadrature = SurfaceQuadratureTable::default();

    let mut rhs = DVector::zeros(0);
    quad4_condition()
        .calculate_right_hand_side(&mesh, &quadrature, &mut rhs)
        .unwrap();

    // Each node receives a quarter of the total force s * area along +z
    #[rustfmt::skip]
    let expected = DVector::from_column_slice(&[
        0.0, 0.0, 0.5,
        0.0, 0.0, 0.5,
        0.0, 0.0, 0.5,
        0.0, 0.0, 0.5,
    ]);
    assert_matrix_eq!(rhs, expected, comp = abs, tol = 1e-14);
}

#[test]
fn reversed_node_order_flips_force_direction() {
    let vertices = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
    ];
    let mesh = rectangle_mesh(vertices, vec![2.0; 4]);
    let mut rhs = DVector::zeros(0);
    quad4_condition()
        .calculate_right_hand_side(&mesh, &SurfaceQuadratureTable::default(), &mut rhs)
        .unwrap();
    assert_matrix_eq!(total_force(&rhs), Vector3::new(0.0, 0.0, -2.0), comp = abs, tol = 1e-14);
}

#[test]
fn total_force_equals_stress_times_area_for_all_geometry_types() {
    let stress = 3.5;
    let (width, height) = (2.0, 1.5);
    for geometry_type in SurfaceGeometryType::ALL {
        let model = planar_model(geometry_type, (2, 3), (width, height), SurfaceLoad::default(), stress);
        let mut total = Vector3::zeros();
        let mut rhs = DVector::zeros(0);
        for index in 0..model.conditions().len() {
            model
                .calculate_condition_right_hand_side(index, &mut rhs)
                .unwrap();
            assert_eq!(rhs.len(), 3 * geometry_type.num_nodes());
            total += total_force(&rhs);
        }
        let expected = Vector3::new(0.0, 0.0, stress * width * height);
        assert_matrix_eq!(total, expected, comp = abs, tol = 1e-12);
    }
}

#[test]
fn total_force_is_independent_of_quadrature_order() {
    let vertices = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(3.0, 0.0, 0.0),
        Point3::new(3.0, 2.0, 0.0),
        Point3::new(0.0, 2.0, 0.0),
    ];
    let mesh = rectangle_mesh(vertices, vec![-1.5; 4]);
    let condition = quad4_condition();

    let mut reference = DVector::zeros(0);
    condition
        .calculate_right_hand_side(&mesh, &SurfaceQuadratureTable::default(), &mut reference)
        .unwrap();
    assert_matrix_eq!(total_force(&reference), Vector3::new(0.0, 0.0, -9.0), comp = abs, tol = 1e-13);

    for points in 1..=5 {
        let settings = QuadratureSettings {
            linear_quadrilateral_points: points,
            ..Default::default()
        };
        let quadrature = SurfaceQuadratureTable::from_settings(&settings).unwrap();
        let mut rhs = DVector::zeros(0);
        condition
            .calculate_right_hand_side(&mesh, &quadrature, &mut rhs)
            .unwrap();
        assert_matrix_eq!(total_force(&rhs), total_force(&reference), comp = abs, tol = 1e-12);
        if points >= 2 {
            assert_matrix_eq!(rhs, reference, comp = abs, tol = 1e-12);
        }
    }
}

#[test]
fn output_is_overwritten() {
    let vertices = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    let mesh = rectangle_mesh(vertices, vec![1.0, 2.0, 3.0, 4.0]);
    let quadrature = SurfaceQuadratureTable::default();
    let condition = quad4_condition();

    let mut expected = DVector::zeros(0);
    condition
        .calculate_right_hand_side(&mesh, &quadrature, &mut expected)
        .unwrap();

    let mut rhs = DVector::repeat(12, 100.0);
    condition
        .calculate_right_hand_side(&mesh, &quadrature, &mut rhs)
        .unwrap();
    assert_eq!(rhs, expected);

    let mut rhs = DVector::repeat(3, 100.0);
    condition
        .calculate_right_hand_side(&mesh, &quadrature, &mut rhs)
        .unwrap();
    assert_eq!(rhs, expected);
}

#[test]
fn repeated_evaluation_is_bit_identical() {
    let vertices = [
        Point3::new(0.1, -0.3, 0.2),
        Point3::new(1.7, 0.1, 0.4),
        Point3::new(1.9, 1.3, 1.1),
        Point3::new(-0.2, 1.1, 0.7),
    ];
    let mesh = rectangle_mesh(vertices, vec![0.3, -1.7, 2.9, 1.1]);
    let quadrature = SurfaceQuadratureTable::default();
    let condition = quad4_condition();

    let mut first = DVector::zeros(0);
    let mut second = DVector::zeros(0);
    condition
        .calculate_right_hand_side(&mesh, &quadrature, &mut first)
        .unwrap();
    condition
        .calculate_right_hand_side(&mesh, &quadrature, &mut second)
        .unwrap();
    assert_eq!(first.as_slice(), second.as_slice());
}

#[test]
fn degenerate_geometry_contributes_zero() {
    // All vertices on a line, so the tangents are parallel everywhere
    let vertices = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(2.0, 2.0, 2.0),
        Point3::new(3.0, 3.0, 3.0),
    ];
    let mesh = rectangle_mesh(vertices, vec![1e6; 4]);
    let mut rhs = DVector::zeros(0);
    quad4_condition()
        .calculate_right_hand_side(&mesh, &SurfaceQuadratureTable::default(), &mut rhs)
        .unwrap();
    assert!(rhs.iter().all(|&f| f == 0.0));
}

#[test]
fn integration_coefficient_of_normal_load_is_weight() {
    let weights = [0.25, 1.5, 2.0];
    let jacobians = [Matrix3x2::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0); 3];
    for point in 0..3 {
        let coefficient = NormalLoad.compute_integration_coefficient(point, &weights[..], &jacobians[..]);
        assert_eq!(coefficient, weights[point]);
    }
}

#[test]
fn normal_load_condition_vector() {
    let mut variables = ConditionVariables::new();
    variables.reset(2);
    variables.nu.copy_from_slice(&[0.25, 0.75]);
    variables.nodal_values = vec![2.0, 4.0];
    #[rustfmt::skip]
    variables.j_container.push(Matrix3x2::new(
        2.0, 0.0,
        0.0, 3.0,
        0.0, 0.0,
    ));
    NormalLoad.compute_condition_vector(&mut variables, 0);
    // Interpolated stress 3.5, normal (0, 0, 6)
    assert_eq!(variables.condition_vector, Vector3::new(0.0, 0.0, 21.0));
}

#[test]
fn assembly_step_accumulates_node_blocks() {
    let mut variables = ConditionVariables::new();
    variables.reset(2);
    variables.nu.copy_from_slice(&[0.5, 2.0]);
    variables.condition_vector = Vector3::new(1.0, 2.0, 3.0);
    variables.integration_coefficient = 0.5;

    let mut output = DVector::repeat(6, 1.0);
    let mut view = DVectorViewMut::from(&mut output);
    SurfaceLoadFormula::<f64>::calculate_and_add_condition_force(&NormalLoad, &mut view, &variables);
    assert_eq!(output, DVector::from_column_slice(&[1.25, 1.5, 1.75, 2.0, 3.0, 4.0]));
}

#[test]
fn surface_traction_constant_load() {
    let vertices = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 3.0),
        Point3::new(0.0, 0.0, 3.0),
    ];
    let mut mesh = SurfaceMesh::from_vertices(vertices.to_vec());
    let load = [1.0, -2.0, 0.5];
    for (variable, value) in NodalVariable::SURFACE_LOAD.iter().zip(load) {
        mesh.nodal_values_mut().set_uniform(*variable, value);
    }
    let condition =
        Condition::new(0, SurfaceGeometryType::Quadrilateral4, vec![0, 1, 2, 3], PropertiesId(0), SurfaceTraction)
            .unwrap();

    let mut rhs = DVector::zeros(0);
    condition
        .calculate_right_hand_side(&mesh, &SurfaceQuadratureTable::default(), &mut rhs)
        .unwrap();
    // The traction is independent of the orientation of the surface
    let expected = Vector3::from(load) * 6.0;
    assert_matrix_eq!(total_force(&rhs), expected, comp = abs, tol = 1e-13);
}

#[test]
fn surface_traction_integration_coefficient_includes_area_element() {
    let weights = [0.5];
    #[rustfmt::skip]
    let jacobians = [Matrix3x2::new(
        3.0, 0.0,
        0.0, 0.0,
        0.0, 2.0,
    )];
    let coefficient = SurfaceTraction.compute_integration_coefficient(0, &weights[..], &jacobians[..]);
    assert_scalar_eq!(coefficient, 3.0, comp = abs, tol = 1e-14);
}

#[test]
fn create_from_prototype() {
    let prototype = quad4_condition();
    let condition = prototype.create(12, &[4, 5, 6, 7], PropertiesId(3)).unwrap();
    assert_eq!(condition.id(), 12);
    assert_eq!(condition.nodes(), &[4, 5, 6, 7]);
    assert_eq!(condition.properties(), PropertiesId(3));
    assert_eq!(condition.geometry_type(), SurfaceGeometryType::Quadrilateral4);
    assert_eq!(condition.load(), SurfaceLoad::Normal(NormalLoad));
}

#[test]
fn create_with_wrong_node_count_fails() {
    let prototype = quad4_condition();
    let error = prototype.create(12, &[4, 5, 6], PropertiesId(0)).unwrap_err();
    assert_eq!(
        error,
        ConditionError::InvalidGeometry {
            id: 12,
            source: GeometryError::NodeCountMismatch {
                geometry_type: SurfaceGeometryType::Quadrilateral4,
                expected: 4,
                actual: 3
            }
        }
    );
    assert_eq!(error.condition_id(), 12);
}

#[test]
fn equation_ids_are_node_major() {
    let condition =
        Condition::new(0, SurfaceGeometryType::Triangle3, vec![4, 0, 2], PropertiesId(0), NormalLoad).unwrap();
    let mut ids = vec![99];
    condition.equation_ids(&mut ids);
    assert_eq!(ids, vec![12, 13, 14, 0, 1, 2, 6, 7, 8]);
}

#[test]
fn left_hand_side_is_zero() {
    let condition = quad4_condition();
    let mut lhs = DMatrix::repeat(2, 5, 1.0);
    condition.calculate_left_hand_side(&mut lhs);
    assert_eq!(lhs, DMatrix::zeros(12, 12));
}

#[test]
fn local_system() {
    let vertices = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    let mesh = rectangle_mesh(vertices, vec![1.0; 4]);
    let quadrature = SurfaceQuadratureTable::default();
    let mut lhs = DMatrix::zeros(0, 0);
    let mut rhs = DVector::zeros(0);
    quad4_condition()
        .calculate_local_system(&mesh, &quadrature, &mut lhs, &mut rhs)
        .unwrap();
    assert_eq!(lhs.shape(), (12, 12));
    assert_matrix_eq!(total_force(&rhs), Vector3::new(0.0, 0.0, 1.0), comp = abs, tol = 1e-14);
}

#[test]
fn check_reports_missing_nodal_values() {
    let vertices = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    let mesh = SurfaceMesh::from_vertices(vertices.to_vec());
    let condition = quad4_condition();
    let error = condition.check(&mesh).unwrap_err();
    assert_eq!(error.stage(), Some(EvaluationStage::NodalValues));
    assert_eq!(error.condition_id(), 7);

    let mut rhs = DVector::zeros(0);
    let evaluation_error = condition
        .calculate_right_hand_side(&mesh, &SurfaceQuadratureTable::default(), &mut rhs)
        .unwrap_err();
    assert_eq!(evaluation_error, error);

    let mesh = rectangle_mesh(vertices, vec![0.0; 4]);
    assert_eq!(condition.check(&mesh), Ok(()));
}

#[test]
fn check_reports_missing_vertices() {
    let mesh = SurfaceMesh::<f64>::from_vertices(vec![Point3::origin(); 3]);
    let error = quad4_condition().check(&mesh).unwrap_err();
    assert_eq!(
        error,
        ConditionError::Evaluation {
            id: 7,
            stage: EvaluationStage::Geometry,
            point: None,
            source: GeometryError::MissingVertex { node: 3 }
        }
    );
}

/// A geometry whose Jacobian can not be computed at one of the integration points.
struct FailingGeometry {
    nodes: Vec<usize>,
    weights: Vec<f64>,
    points: Vec<Point2<f64>>,
    failing_point: usize,
}

impl GeometryProvider<f64> for FailingGeometry {
    fn geometry_type(&self) -> SurfaceGeometryType {
        SurfaceGeometryType::Quadrilateral4
    }

    fn node_indices(&self) -> &[usize] {
        &self.nodes
    }

    fn quadrature_weights(&self) -> &[f64] {
        &self.weights
    }

    fn quadrature_points(&self) -> &[Point2<f64>] {
        &self.points
    }

    fn jacobian(&self, point: usize) -> Result<Matrix3x2<f64>, GeometryError> {
        if point == self.failing_point {
            Err(GeometryError::NonFiniteJacobian { point })
        } else {
            Ok(Matrix3x2::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0))
        }
    }

    fn populate_shape_functions(
        &self,
        _order: InterpolationOrder,
        _point: usize,
        values: &mut [f64],
    ) -> Result<(), GeometryError> {
        values.fill(0.25);
        Ok(())
    }
}

#[test]
fn geometry_failure_carries_condition_stage_and_point() {
    let geometry = FailingGeometry {
        nodes: vec![0, 1, 2, 3],
        weights: vec![1.0; 4],
        points: vec![Point2::origin(); 4],
        failing_point: 2,
    };
    let mut nodal_values = NodalValues::new(4);
    nodal_values.set_uniform(NodalVariable::NormalContactStress, 1.0);
    let mut variables = ConditionVariables::new();
    let mut output = DVector::zeros(12);

    let error = quad4_condition()
        .calculate_right_hand_side_with(&geometry, &nodal_values, &mut variables, DVectorViewMut::from(&mut output))
        .unwrap_err();
    assert_eq!(
        error,
        ConditionError::Evaluation {
            id: 7,
            stage: EvaluationStage::Jacobians,
            point: Some(2),
            source: GeometryError::NonFiniteJacobian { point: 2 }
        }
    );
    assert_eq!(
        error.to_string(),
        "condition 7: Jacobian computation failed at integration point 2: non-finite Jacobian at integration point 2"
    );
}

#[test]
fn variables_are_sized_by_geometry() {
    let geometry = FailingGeometry {
        nodes: vec![0, 1, 2, 3],
        weights: vec![1.0; 3],
        points: vec![Point2::origin(); 3],
        failing_point: usize::MAX,
    };
    let mut nodal_values = NodalValues::new(4);
    nodal_values.set_uniform(NodalVariable::NormalContactStress, 1.0);
    let mut variables = ConditionVariables::new();
    let mut output = DVector::zeros(12);
    quad4_condition()
        .calculate_right_hand_side_with(&geometry, &nodal_values, &mut variables, DVectorViewMut::from(&mut output))
        .unwrap();
    assert_eq!(variables.nu.len(), 4);
    assert_eq!(variables.j_container.len(), 3);
    assert_eq!(variables.nodal_values.len(), 4);
    // Each of the 3 points adds 0.25 * (0, 0, 1) * 1.0 to every node
    assert_matrix_eq!(total_force(&output), Vector3::new(0.0, 0.0, 3.0), comp = abs, tol = 1e-14);
}

#[test]
#[should_panic]
fn output_of_wrong_length_panics() {
    let geometry = FailingGeometry {
        nodes: vec![0, 1, 2, 3],
        weights: vec![1.0],
        points: vec![Point2::origin()],
        failing_point: usize::MAX,
    };
    let nodal_values = NodalValues::new(4);
    let mut variables = ConditionVariables::new();
    let mut output = DVector::zeros(11);
    let _ = quad4_condition().calculate_right_hand_side_with(
        &geometry,
        &nodal_values,
        &mut variables,
        DVectorViewMut::from(&mut output),
    );
}

proptest! {
    #[test]
    fn planar_rectangle_total_force(rectangle in any::<PlanarRectangle>(), stress in -100.0..100.0) {
        let mesh = rectangle_mesh(rectangle.vertices(), vec![stress; 4]);
        let mut rhs = DVector::zeros(0);
        quad4_condition()
            .calculate_right_hand_side(&mesh, &SurfaceQuadratureTable::default(), &mut rhs)
            .unwrap();
        let expected = rectangle.unit_normal() * stress * rectangle.area();
        let tol = 1e-9 * (1.0 + expected.norm());
        assert_matrix_eq!(total_force(&rhs), expected, comp = abs, tol = tol);
        // Every nodal force is parallel to the normal
        for f in rhs.as_slice().chunks_exact(3) {
            let f = Vector3::from_column_slice(f);
            assert_matrix_eq!(f.cross(&rectangle.unit_normal()), Vector3::zeros(), comp = abs, tol = tol);
        }
    }

    #[test]
    fn force_is_linear_in_nodal_stress(
        rectangle in any::<PlanarRectangle>(),
        stress in nodal_values(4),
        c in -10.0f64..10.0
    ) {
        let quadrature = SurfaceQuadratureTable::default();
        let condition = quad4_condition();
        let scaled_stress = stress.iter().map(|s| c * s).collect();

        let mut rhs = DVector::zeros(0);
        let mut scaled_rhs = DVector::zeros(0);
        condition
            .calculate_right_hand_side(&rectangle_mesh(rectangle.vertices(), stress), &quadrature, &mut rhs)
            .unwrap();
        condition
            .calculate_right_hand_side(&rectangle_mesh(rectangle.vertices(), scaled_stress), &quadrature, &mut scaled_rhs)
            .unwrap();
        let tol = 1e-10 * (1.0 + rhs.amax() * c.abs());
        assert_matrix_eq!(scaled_rhs, rhs * c, comp = abs, tol = tol);
    }
}

#[test]
fn deserialized_condition_with_wrong_node_count_is_rejected() {
    let condition = quad4_condition();
    let mut json = serde_json::to_value(&condition).unwrap();
    assert_eq!(serde_json::from_value::<Condition>(json.clone()).unwrap(), condition);

    json["connectivity"]["vertex_indices"] = serde_json::json!([0, 1]);
    assert!(serde_json::from_value::<Condition>(json).is_err());
}

#[test]
fn total_force_on_parabolic_cylinder_matches_closed_form() {
    // On z = c x² the area-weighted normal is (-2 c x, 0, 1), so the exact total force over
    // [0, W] x [0, H] is s (-c W² H, 0, W H). Quadratic geometry represents the surface exactly.
    let (stress, curvature) = (2.5, 0.4);
    let (width, height) = (2.0, 1.5);
    let high_order = SurfaceQuadratureTable::from_settings(&QuadratureSettings {
        quadratic_quadrilateral_points: 5,
        quadratic_triangle_strength: 5,
        ..Default::default()
    })
    .unwrap();

    let quadratic_types = [
        SurfaceGeometryType::Triangle6,
        SurfaceGeometryType::Quadrilateral8,
        SurfaceGeometryType::Quadrilateral9,
    ];
    for geometry_type in quadratic_types {
        let (planar, connectivity) = create_planar_surface_mesh(geometry_type, 2, 3, width, height).unwrap();
        let vertices = planar
            .vertices()
            .iter()
            .map(|v: &Point3<f64>| Point3::new(v.x, v.y, curvature * v.x * v.x))
            .collect();
        let mut mesh = SurfaceMesh::from_vertices(vertices);
        mesh.nodal_values_mut()
            .set_uniform(NodalVariable::NormalContactStress, stress);

        let mut total = Vector3::zeros();
        for (id, element) in connectivity.iter().enumerate() {
            let nodes = element.vertex_indices().to_vec();
            let condition = Condition::new(id, geometry_type, nodes, PropertiesId(0), NormalLoad).unwrap();

            let mut rhs = DVector::zeros(0);
            condition
                .calculate_right_hand_side(&mesh, &SurfaceQuadratureTable::default(), &mut rhs)
                .unwrap();
            let mut rhs_high_order = DVector::zeros(0);
            condition
                .calculate_right_hand_side(&mesh, &high_order, &mut rhs_high_order)
                .unwrap();
            assert_matrix_eq!(rhs, rhs_high_order, comp = abs, tol = 1e-12);
            total += total_force(&rhs);
        }

        let expected = stress * Vector3::new(-curvature * width * width * height, 0.0, width * height);
        assert_matrix_eq!(total, expected, comp = abs, tol = 1e-11);
    }
}

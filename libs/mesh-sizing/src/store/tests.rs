//! # Sample Store Tests
//!
//! Insertion validation and interpolation for list- and model-based stores.

use super::*;
use crate::error::SizingError;
use approx::assert_relative_eq;

fn cfg() -> InterpolationConfig {
    InterpolationConfig::default()
}

fn unit_triangle_store() -> ListStore {
    let mut store = ListStore::new();
    store
        .add_scatter_element(&[DVec3::ZERO, DVec3::X, DVec3::Y], &[0.1, 0.2, 0.3])
        .unwrap();
    store
}

// =============================================================================
// LIST STORE: INSERTION
// =============================================================================

#[test]
fn test_negative_point_rejected_without_change() {
    let mut store = ListStore::new();
    store.add_scatter_point(DVec3::ZERO, 0.5).unwrap();

    let err = store.add_scatter_point(DVec3::X, -1.0).unwrap_err();
    assert_eq!(err, SizingError::InvalidValue { value: -1.0 });
    assert_eq!(store.len(), 1);
    assert_eq!(store.sample_count(), 1);
}

#[test]
fn test_zero_point_rejected() {
    let mut store = ListStore::new();
    assert!(store.add_scatter_point(DVec3::ZERO, 0.0).is_err());
    assert!(store.is_empty());
}

#[test]
fn test_element_count_mismatch() {
    let mut store = ListStore::new();
    let err = store
        .add_scatter_element(&[DVec3::ZERO, DVec3::X, DVec3::Y], &[0.1, 0.2])
        .unwrap_err();
    assert_eq!(
        err,
        SizingError::DimensionMismatch {
            vertices: 3,
            values: 2
        }
    );
    assert!(store.is_empty());
}

#[test]
fn test_element_too_many_vertices() {
    let mut store = ListStore::new();
    let vertices = [DVec3::ZERO; 5];
    let sizes = [0.1; 5];
    assert!(matches!(
        store.add_scatter_element(&vertices, &sizes),
        Err(SizingError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_element_non_positive_size_rejected() {
    let mut store = unit_triangle_store();
    let err = store
        .add_scatter_element(&[DVec3::ZERO, DVec3::X], &[0.1, 0.0])
        .unwrap_err();
    assert_eq!(err, SizingError::InvalidValue { value: 0.0 });
    assert_eq!(store.len(), 1);
    assert_eq!(store.sample_count(), 3);
}

// =============================================================================
// LIST STORE: EVALUATION
// =============================================================================

#[test]
fn test_empty_store_fails() {
    let store = ListStore::new();
    assert_eq!(
        store.evaluate(DVec3::ZERO, &cfg()),
        Err(SizingError::EmptyStore)
    );
}

#[test]
fn test_exact_at_scatter_point() {
    let mut store = ListStore::new();
    store.add_scatter_point(DVec3::new(1.0, 2.0, 0.0), 0.7).unwrap();
    store.add_scatter_point(DVec3::new(3.0, 0.0, 0.0), 0.2).unwrap();
    assert_eq!(store.evaluate(DVec3::new(1.0, 2.0, 0.0), &cfg()), Ok(0.7));
    assert_eq!(store.evaluate(DVec3::new(3.0, 0.0, 0.0), &cfg()), Ok(0.2));
}

#[test]
fn test_exact_at_triangle_vertices() {
    let store = unit_triangle_store();
    assert_relative_eq!(store.evaluate(DVec3::ZERO, &cfg()).unwrap(), 0.1);
    assert_relative_eq!(store.evaluate(DVec3::X, &cfg()).unwrap(), 0.2);
    assert_relative_eq!(store.evaluate(DVec3::Y, &cfg()).unwrap(), 0.3);
}

#[test]
fn test_triangle_centroid_is_mean() {
    let mut store = ListStore::new();
    store
        .add_scatter_element(&[DVec3::ZERO, DVec3::X, DVec3::Y], &[1.0, 2.0, 3.0])
        .unwrap();
    let value = store
        .evaluate(DVec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0), &cfg())
        .unwrap();
    assert_relative_eq!(value, 2.0, epsilon = 1e-12);
}

#[test]
fn test_outside_falls_back_to_nearest_samples() {
    let store = unit_triangle_store();
    let value = store.evaluate(DVec3::new(5.0, 5.0, 0.0), &cfg()).unwrap();
    assert!((0.1..=0.3).contains(&value), "value {value} out of range");

    // Inverse-squared-distance weights: 1/50 for (0,0), 1/41 for the others
    let expected = (0.1 / 50.0 + 0.2 / 41.0 + 0.3 / 41.0) / (1.0 / 50.0 + 2.0 / 41.0);
    assert_relative_eq!(value, expected, epsilon = 1e-12);
}

#[test]
fn test_fallback_respects_sample_count() {
    let mut store = ListStore::new();
    store.add_scatter_point(DVec3::new(1.0, 0.0, 0.0), 0.1).unwrap();
    store.add_scatter_point(DVec3::new(10.0, 0.0, 0.0), 0.9).unwrap();
    let nearest_only = InterpolationConfig::new(1e-12, 1).unwrap();
    assert_eq!(store.evaluate(DVec3::ZERO, &nearest_only), Ok(0.1));
}

#[test]
fn test_single_sample_is_constant() {
    let mut store = ListStore::new();
    store.add_scatter_point(DVec3::ZERO, 0.05).unwrap();
    for point in [DVec3::splat(3.0), DVec3::new(-7.0, 2.0, 0.0), DVec3::X] {
        assert_relative_eq!(store.evaluate(point, &cfg()).unwrap(), 0.05);
    }
}

#[test]
fn test_lowest_dimension_wins() {
    let mut store = unit_triangle_store();
    let inside = DVec3::new(0.25, 0.25, 0.0);
    store.add_scatter_point(inside, 0.9).unwrap();
    assert_eq!(store.evaluate(inside, &cfg()), Ok(0.9));
}

#[test]
fn test_first_inserted_wins_on_overlap() {
    let mut store = unit_triangle_store();
    store
        .add_scatter_element(&[DVec3::ZERO, DVec3::X, DVec3::Y], &[5.0, 5.0, 5.0])
        .unwrap();
    let value = store
        .evaluate(DVec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0), &cfg())
        .unwrap();
    assert_relative_eq!(value, 0.2, epsilon = 1e-12);
}

#[test]
fn test_point_on_line() {
    let mut store = ListStore::new();
    store
        .add_scatter_element(&[DVec3::ZERO, DVec3::new(4.0, 0.0, 0.0)], &[1.0, 3.0])
        .unwrap();
    let value = store.evaluate(DVec3::new(1.0, 0.0, 0.0), &cfg()).unwrap();
    assert_relative_eq!(value, 1.5, epsilon = 1e-12);
}

#[test]
fn test_inside_tetrahedron() {
    let mut store = ListStore::new();
    store
        .add_scatter_element(
            &[DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z],
            &[1.0, 2.0, 3.0, 4.0],
        )
        .unwrap();
    let value = store.evaluate(DVec3::splat(0.25), &cfg()).unwrap();
    assert_relative_eq!(value, 2.5, epsilon = 1e-12);
}

#[test]
fn test_tilted_triangle_far_from_origin() {
    let e1 = DVec3::new(1.0, 0.1, 0.2);
    let e2 = DVec3::new(0.1, 1.0, 0.3);
    for origin in [DVec3::new(1e4, 7e3, 3e3), DVec3::new(1e6, 7e5, 3e5)] {
        let mut store = ListStore::new();
        store
            .add_scatter_element(&[origin, origin + e1, origin + e2], &[0.1, 0.2, 0.3])
            .unwrap();

        // Interior barycentric grid, clear of the edges
        for i in 1..20 {
            for j in 1..(20 - i) {
                let (u, v) = (f64::from(i) / 20.0, f64::from(j) / 20.0);
                let point = origin + e1 * u + e2 * v;
                let expected = 0.1 * (1.0 - u - v) + 0.2 * u + 0.3 * v;
                let value = store.evaluate(point, &cfg()).unwrap();
                assert_relative_eq!(value, expected, epsilon = 1e-8);
            }
        }
    }
}

#[test]
fn test_index_refreshed_after_insertion() {
    let mut store = unit_triangle_store();
    let far = DVec3::new(50.0, 50.0, 0.0);
    let before = store.evaluate(far, &cfg()).unwrap();
    assert!(before <= 0.3);

    store.add_scatter_point(far, 2.0).unwrap();
    assert_eq!(store.evaluate(far, &cfg()), Ok(2.0));
}

// =============================================================================
// MODEL STORE
// =============================================================================

/// Unit square split into two triangles.
fn square_mesh() -> Arc<BackgroundMesh> {
    let mut mesh = BackgroundMesh::new();
    let a = mesh.add_node(DVec3::ZERO);
    let b = mesh.add_node(DVec3::X);
    let c = mesh.add_node(DVec3::new(1.0, 1.0, 0.0));
    let d = mesh.add_node(DVec3::Y);
    mesh.add_element(MeshElement::Triangle([a, b, c])).unwrap();
    mesh.add_element(MeshElement::Triangle([a, c, d])).unwrap();
    Arc::new(mesh)
}

#[test]
fn test_mesh_element_from_nodes() {
    assert_eq!(
        MeshElement::from_nodes(&[0, 1, 2]),
        Ok(MeshElement::Triangle([0, 1, 2]))
    );
    assert!(MeshElement::from_nodes(&[0]).is_err());
}

#[test]
fn test_mesh_rejects_dangling_element() {
    let mut mesh = BackgroundMesh::new();
    mesh.add_node(DVec3::ZERO);
    let err = mesh.add_element(MeshElement::Line([0, 3])).unwrap_err();
    assert_eq!(
        err,
        SizingError::MissingNode {
            node: 3,
            node_count: 1
        }
    );
    assert_eq!(mesh.element_count(), 0);
}

#[test]
fn test_bind_missing_node() {
    let err = ModelStore::bind(square_mesh(), [(0, 0.1), (9, 0.2)]).unwrap_err();
    assert_eq!(
        err,
        SizingError::MissingNode {
            node: 9,
            node_count: 4
        }
    );
}

#[test]
fn test_bind_invalid_value() {
    let err = ModelStore::bind(square_mesh(), [(0, 0.1), (1, -0.2)]).unwrap_err();
    assert_eq!(err, SizingError::InvalidValue { value: -0.2 });
}

#[test]
fn test_model_exact_at_nodes() {
    let store = ModelStore::bind(square_mesh(), [(0, 0.1), (1, 0.2), (2, 0.3), (3, 0.4)]).unwrap();
    for (node, expected) in [(0u32, 0.1), (1, 0.2), (2, 0.3), (3, 0.4)] {
        let point = store.mesh().nodes()[node as usize];
        assert_relative_eq!(store.evaluate(point, &cfg()).unwrap(), expected, epsilon = 1e-12);
    }
}

#[test]
fn test_model_barycentric_inside() {
    let store = ModelStore::bind(square_mesh(), [(0, 1.0), (1, 1.0), (2, 3.0), (3, 3.0)]).unwrap();
    let value = store.evaluate(DVec3::new(0.5, 0.5, 0.0), &cfg()).unwrap();
    assert_relative_eq!(value, 2.0, epsilon = 1e-12);
}

#[test]
fn test_model_outside_uses_nearest_element() {
    let store = ModelStore::bind(square_mesh(), [(0, 1.0), (1, 2.0), (2, 4.0), (3, 1.0)]).unwrap();
    // Projects onto the edge between nodes 1 and 2 at its midpoint
    let value = store.evaluate(DVec3::new(3.0, 0.5, 0.0), &cfg()).unwrap();
    assert_relative_eq!(value, 3.0, epsilon = 1e-12);
}

#[test]
fn test_model_skips_elements_without_values() {
    let store = ModelStore::bind(square_mesh(), [(0, 1.0), (1, 2.0), (2, 4.0)]).unwrap();
    // Only the first triangle is usable; the second one's interior
    // projects onto the shared diagonal
    let value = store.evaluate(DVec3::new(0.0, 1.0, 0.0), &cfg()).unwrap();
    assert_relative_eq!(value, 2.5, epsilon = 1e-12);
}

#[test]
fn test_model_exact_at_node_of_partial_element() {
    let mut mesh = BackgroundMesh::new();
    let a = mesh.add_node(DVec3::ZERO);
    let b = mesh.add_node(DVec3::X);
    let c = mesh.add_node(DVec3::Y);
    let d = mesh.add_node(DVec3::new(5.0, 5.0, 0.0));
    let e = mesh.add_node(DVec3::new(6.0, 5.0, 0.0));
    mesh.add_element(MeshElement::Triangle([a, b, c])).unwrap();
    mesh.add_element(MeshElement::Triangle([c, d, e])).unwrap();
    let store =
        ModelStore::bind(Arc::new(mesh), [(a, 0.1), (b, 0.2), (c, 0.3), (d, 0.9)]).unwrap();

    assert_eq!(store.evaluate(DVec3::new(5.0, 5.0, 0.0), &cfg()), Ok(0.9));
    // Closer to d than to the valued triangle
    assert_eq!(store.evaluate(DVec3::new(5.0, 6.0, 0.0), &cfg()), Ok(0.9));
    assert_relative_eq!(
        store.evaluate(DVec3::new(0.25, 0.25, 0.0), &cfg()).unwrap(),
        0.175,
        epsilon = 1e-12
    );
}

#[test]
fn test_model_without_elements_uses_nearest_node() {
    let mut mesh = BackgroundMesh::new();
    mesh.add_node(DVec3::ZERO);
    mesh.add_node(DVec3::new(10.0, 0.0, 0.0));
    let store = ModelStore::bind(Arc::new(mesh), [(0, 0.3), (1, 0.6)]).unwrap();
    assert_eq!(store.evaluate(DVec3::new(8.0, 0.0, 0.0), &cfg()), Ok(0.6));
}

#[test]
fn test_model_empty_fails() {
    let store = ModelStore::bind(square_mesh(), []).unwrap();
    assert!(store.is_empty());
    assert_eq!(
        store.evaluate(DVec3::ZERO, &cfg()),
        Err(SizingError::EmptyStore)
    );
}

#[test]
fn test_model_shares_mesh() {
    let mesh = square_mesh();
    let first = SampleStore::bind_model(Arc::clone(&mesh), [(0, 0.1)]).unwrap();
    let second = SampleStore::bind_model(Arc::clone(&mesh), [(1, 0.2)]).unwrap();
    assert_eq!(Arc::strong_count(&mesh), 3);
    assert_eq!(first.sample_count(), 1);
    assert_eq!(second.sample_count(), 1);
}

#[test]
fn test_sample_store_dispatch() {
    let store: SampleStore = unit_triangle_store().into();
    assert_eq!(store.sample_count(), 3);
    assert!(!store.is_empty());
    let value = store
        .evaluate(DVec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0), &cfg())
        .unwrap();
    assert_relative_eq!(value, 0.2, epsilon = 1e-12);
}

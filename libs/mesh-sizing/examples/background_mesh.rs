//! Background mesh walkthrough.
//!
//! Loads a list field over a 0.1 x 0.3 rectangle, makes it the background
//! field, turns off the other size rules and samples sizes on a grid the
//! way a 2D mesher would.
//!
//! ```text
//! RUST_LOG=debug cargo run -p mesh-sizing --example background_mesh
//! ```

use glam::DVec3;
use mesh_sizing::{
    ConstraintSource, ListFieldData, ScatterRecord, SizeConstraint, SizeQuery, SizingError,
    SizingSession,
};
use tracing::info;

const WIDTH: f64 = 0.1;
const HEIGHT: f64 = 0.3;
const GRID: u32 = 20;

fn rectangle_field() -> ListFieldData {
    let corners = [
        DVec3::ZERO,
        DVec3::new(WIDTH, 0.0, 0.0),
        DVec3::new(WIDTH, HEIGHT, 0.0),
        DVec3::new(0.0, HEIGHT, 0.0),
    ];
    let sizes = [0.005, 0.01, 0.03, 0.02];
    ListFieldData {
        elements: vec![
            ScatterRecord {
                vertices: vec![corners[0], corners[1], corners[2]],
                sizes: vec![sizes[0], sizes[1], sizes[2]],
            },
            ScatterRecord {
                vertices: vec![corners[0], corners[2], corners[3]],
                sizes: vec![sizes[0], sizes[2], sizes[3]],
            },
        ],
    }
}

fn main() -> Result<(), SizingError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut session = SizingSession::new();
    let background = session.add_field(rectangle_field().into_store()?.into())?;
    session.set_option("Mesh.BackgroundField", f64::from(background.get()))?;
    session.set_option("Mesh.MeshSizeExtendFromBoundary", 0.0)?;
    session.set_option("Mesh.MeshSizeFromPoints", 0.0)?;
    session.set_option("Mesh.MeshSizeFromCurvature", 0.0)?;

    let queries: Vec<SizeQuery> = (0..=GRID)
        .flat_map(|i| (0..=GRID).map(move |j| (i, j)))
        .map(|(i, j)| SizeQuery {
            point: DVec3::new(
                WIDTH * f64::from(i) / f64::from(GRID),
                HEIGHT * f64::from(j) / f64::from(GRID),
                0.0,
            ),
            constraints: vec![SizeConstraint::new(
                ConstraintSource::BoundaryExtension,
                0.001,
            )],
        })
        .collect();

    let sizes = session
        .query_sizes(&queries)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    let min = sizes.iter().copied().fold(f64::INFINITY, f64::min);
    let max = sizes.iter().copied().fold(0.0, f64::max);
    let mean = sizes.iter().sum::<f64>() / sizes.len() as f64;
    info!(
        field = %background,
        queries = sizes.len(),
        min,
        max,
        mean,
        "sampled background sizes"
    );
    Ok(())
}

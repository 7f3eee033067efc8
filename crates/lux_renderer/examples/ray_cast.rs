//! Ray casting example.
//!
//! Builds a triangle tree over a random triangle soup, casts a grid of
//! camera rays through it in parallel and reports timing and hit counts.
//!
//! Run with `RUST_LOG=debug cargo run --example ray_cast` to see the tree
//! statistics logged during the build.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use lux_renderer::{BoundingBox, DVec3, Ray, Scene, TreeConfig, TriangleMesh, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TRIANGLES_PER_MESH: usize = 20_000;
const MESH_COUNT: usize = 4;
const IMAGE_WIDTH: usize = 640;
const IMAGE_HEIGHT: usize = 480;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut rng = StdRng::seed_from_u64(2024);
    let meshes = (0..MESH_COUNT)
        .map(|_| random_soup(&mut rng, TRIANGLES_PER_MESH).map(Arc::new))
        .collect::<Result<Vec<_>>>()?;

    let start = Instant::now();
    let scene = Scene::with_config(meshes, TreeConfig::default());
    log::info!("Scene built in {:?}", start.elapsed());

    let stats = scene.tree().stats();
    log::info!(
        "{} triangles, {} nodes, {} leaves, depth {}, largest leaf {}",
        stats.triangles,
        stats.nodes,
        stats.leaves,
        stats.max_depth,
        stats.max_leaf_size
    );

    let bounds = scene
        .world_bounds()
        .ok_or_else(|| anyhow::anyhow!("scene has no triangles"))?;
    let mut rays = camera_rays(&bounds, IMAGE_WIDTH, IMAGE_HEIGHT);
    let start = Instant::now();
    let hits = scene.tree().intersect_many(&mut rays);
    let elapsed = start.elapsed();

    let hit_count = hits.iter().filter(|h| h.is_some()).count();
    log::info!(
        "Cast {} rays in {:?} ({:.2} Mrays/s), {} hits",
        rays.len(),
        elapsed,
        rays.len() as f64 / elapsed.as_secs_f64() / 1e6,
        hit_count
    );

    // Shadow rays from every hit towards a point light
    let lift = DVec3::new(0.0, 2.0 * bounds.extent().y as f64, 0.0);
    let light = bounds.center().as_dvec3() + lift;
    let start = Instant::now();
    let occluded = rays
        .iter()
        .zip(&hits)
        .filter_map(|(ray, hit)| hit.map(|h| ray.at(h.t)))
        .filter(|&point| {
            let to_light = light - point;
            let shadow = Ray::with_range(point, to_light, 1e-4, 1.0 - 1e-4);
            scene.intersect_test(&shadow)
        })
        .count();
    log::info!(
        "{} of {} hit points in shadow ({:?})",
        occluded,
        hit_count,
        start.elapsed()
    );

    Ok(())
}

/// Triangles scattered through a 40-unit cube around the origin.
fn random_soup(rng: &mut StdRng, count: usize) -> Result<TriangleMesh> {
    let mut positions = Vec::with_capacity(3 * count);
    for _ in 0..count {
        let center = Vec3::new(
            rng.gen_range(-20.0..20.0),
            rng.gen_range(-20.0..20.0),
            rng.gen_range(-20.0..20.0),
        );
        for _ in 0..3 {
            let offset = Vec3::new(
                rng.gen_range(-0.5..0.5),
                rng.gen_range(-0.5..0.5),
                rng.gen_range(-0.5..0.5),
            );
            positions.push(center + offset);
        }
    }
    let indices = (0..positions.len() as u32).collect();
    Ok(TriangleMesh::from_indices(positions, indices)?)
}

/// Pinhole camera looking down -Z at the center of `bounds` with a 45 degree
/// vertical fov, backed off far enough to frame the whole box.
fn camera_rays(bounds: &BoundingBox, width: usize, height: usize) -> Vec<Ray> {
    let center = bounds.center().as_dvec3();
    let radius = 0.5 * bounds.extent().as_dvec3().length();
    let origin = center + DVec3::new(0.0, 0.0, 2.5 * radius);
    let half_height = (45.0_f64.to_radians() / 2.0).tan();
    let half_width = half_height * width as f64 / height as f64;

    (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| {
            let u = (2.0 * (x as f64 + 0.5) / width as f64 - 1.0) * half_width;
            let v = (1.0 - 2.0 * (y as f64 + 0.5) / height as f64) * half_height;
            Ray::new(origin, DVec3::new(u, v, -1.0))
        })
        .collect()
}

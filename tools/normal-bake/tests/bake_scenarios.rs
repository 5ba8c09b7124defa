//! End-to-end bake scenarios on tiny buffers

use glam::{Vec2, Vec3};
use normal_bake::{BakeSettings, NEUTRAL_NORMAL, bake};
use normal_core::{Direction, MeshSnapshot, NormalStore};

fn uv_rect(min: Vec2, max: Vec2) -> [Vec2; 4] {
    [
        Vec2::new(min.x, min.y),
        Vec2::new(max.x, min.y),
        Vec2::new(max.x, max.y),
        Vec2::new(min.x, max.y),
    ]
}

fn settings(resolution: u32, padding: u32) -> BakeSettings {
    BakeSettings {
        resolution,
        padding,
        ..Default::default()
    }
}

fn unit_quad_mesh() -> MeshSnapshot {
    let mut mesh = MeshSnapshot::new(vec![
        Vec3::ZERO,
        Vec3::X,
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::Y,
    ]);
    mesh.add_polygon(&[0, 1, 2, 3], Some(&uv_rect(Vec2::ZERO, Vec2::ONE)))
        .unwrap();
    mesh
}

#[test]
fn test_full_quad_bakes_neutral_blue() {
    let mesh = unit_quad_mesh();
    let mut store = NormalStore::new();
    store.insert(0, Direction::UP);

    let buffer = bake(&mesh, &store, &settings(4, 0)).unwrap();
    assert_eq!(buffer.written_count(), 16);
    assert!(buffer.pixels.iter().all(|&p| p == [0.5, 0.5, 1.0, 1.0]));
    assert_eq!(buffer.to_rgba_f32().len(), 4 * 4 * 4);
}

#[test]
fn test_flip_blue_zeroes_blue_channel() {
    let mesh = unit_quad_mesh();
    let mut store = NormalStore::new();
    store.insert(0, Direction::UP);

    let buffer = bake(
        &mesh,
        &store,
        &BakeSettings {
            flip_blue: true,
            ..settings(4, 0)
        },
    )
    .unwrap();
    assert!(buffer.pixels.iter().all(|&p| p == [0.5, 0.5, 0.0, 1.0]));
}

#[test]
fn test_padding_grows_two_pixels_from_adjacent_quads() {
    // Two quads sharing the UV edge u = 0.25; only the right one has a stored normal
    let mut mesh = MeshSnapshot::new(vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(2.0, 1.0, 0.0),
    ]);
    mesh.add_polygon(
        &[0, 1, 4, 3],
        Some(&uv_rect(Vec2::new(0.0, 0.0), Vec2::new(0.25, 0.5))),
    )
    .unwrap();
    mesh.add_polygon(
        &[1, 2, 5, 4],
        Some(&uv_rect(Vec2::new(0.25, 0.0), Vec2::new(0.5, 0.5))),
    )
    .unwrap();

    let mut store = NormalStore::new();
    store.insert(1, Direction::from_xyz(1.0, 0.0, 0.0));
    let stored = [1.0, 0.5, 0.5, 1.0];

    let buffer = bake(&mesh, &store, &settings(8, 2)).unwrap();

    // Rasterized region is x 0..4, y 0..4; everything within Manhattan distance 2 is written
    for y in 0..8i32 {
        for x in 0..8i32 {
            let dx = (x - 3).max(0);
            let dy = (y - 3).max(0);
            let distance = dx + dy;
            assert_eq!(
                buffer.is_written(x as u32, y as u32),
                distance <= 2,
                "({x}, {y})"
            );
            if distance > 2 {
                assert_eq!(buffer.get_pixel(x as u32, y as u32), NEUTRAL_NORMAL);
            }
        }
    }

    // Right margin is fed only by the stored quad
    for y in 0..4 {
        assert_eq!(buffer.get_pixel(4, y), stored);
        assert_eq!(buffer.get_pixel(5, y), stored);
    }
    assert_eq!(buffer.get_pixel(4, 4), stored);
    // Top margin above each quad takes that quad's colour
    assert_eq!(buffer.get_pixel(3, 5), stored);
    assert_eq!(buffer.get_pixel(0, 5), [0.5, 0.5, 1.0, 1.0]);
}

#[test]
fn test_no_uv_layer_is_reported() {
    let mut mesh = MeshSnapshot::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
    mesh.add_polygon(&[0, 1, 2], None).unwrap();
    let err = bake(&mesh, &NormalStore::new(), &settings(4, 0)).unwrap_err();
    assert_eq!(err.to_string(), "no active UV layer");
}

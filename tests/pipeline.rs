use std::time::Duration;

use wire3d::config::{AppConfig, Overrides};
use wire3d::mesh::{
    CanvasParameters, Extent, MeshContext, MeshEngine, MeshError, MeshEvent, Resolution,
    RotationStrategy, SURFACE_PRESETS, Topology, compute_index_size, find_preset,
};

fn unit_square(nx: u32, ny: u32, topology: Topology) -> CanvasParameters {
    CanvasParameters::new(
        Resolution::new(nx, ny),
        Extent::new(2.0, 2.0, -1.0, -1.0),
        topology,
    )
}

#[test]
fn every_topology_produces_a_valid_wireframe() {
    let mut context = MeshContext::with_grid_limit(32, 32);
    for topology in Topology::ALL {
        for (nx, ny) in [(2, 3), (5, 3), (7, 7)] {
            let params = unit_square(nx, ny, topology);
            context
                .generate(&params, &|x: f32, y: f32| x * y)
                .unwrap_or_else(|e| panic!("{topology} {nx}x{ny}: {e}"));

            let canvas = context.canvas();
            let vertex_count = canvas.vertex_count as u32;
            assert_eq!(context.vertex_buffer_len(), 3 * canvas.vertex_count);

            let calculated = compute_index_size(Resolution::new(nx, ny), topology.code());
            let written = context.index_buffer_len();
            if topology == Topology::PlanarTriangle {
                assert_eq!(written, calculated + 2, "{topology} {nx}x{ny}");
            } else {
                assert_eq!(written, calculated, "{topology} {nx}x{ny}");
            }
            assert!(context.indices().iter().all(|&i| i < vertex_count));
            assert!(
                context.indices().chunks_exact(2).all(|p| p[0] != p[1]),
                "{topology} {nx}x{ny} has a degenerate segment"
            );
        }
    }
}

#[test]
fn presets_generate_at_their_own_resolution() {
    let mut context = MeshContext::new();
    for preset in SURFACE_PRESETS {
        let params = preset.parameters();
        context.generate(&params, &preset.surface).unwrap();
        assert_eq!(context.canvas().resolution, preset.resolution, "{}", preset.name);
        let (z_min, z_max) = context.z_range().unwrap();
        assert!(z_min <= z_max, "{}", preset.name);
    }
}

#[test]
fn rotation_keeps_heights_and_radii() {
    let mut context = MeshContext::with_grid_limit(8, 8);
    let preset = find_preset("saddle").unwrap();
    context
        .generate(&unit_square(6, 6, Topology::PlanarSquare), &preset.surface)
        .unwrap();
    let before = context.vertices().to_vec();

    context.set_rotation_strategy(RotationStrategy::Exact);
    context.set_rotation_angle(std::f32::consts::FRAC_PI_8);
    for _ in 0..16 {
        context.rotate();
    }

    for (a, b) in before.chunks_exact(3).zip(context.vertices().chunks_exact(3)) {
        assert_eq!(a[2], b[2]);
        let ra = (a[0] * a[0] + a[1] * a[1]).sqrt();
        let rb = (b[0] * b[0] + b[1] * b[1]).sqrt();
        assert!((ra - rb).abs() < 1e-4);
        // sixteen eighth-turns make two full turns
        assert!((a[0] - b[0]).abs() < 1e-4 && (a[1] - b[1]).abs() < 1e-4);
    }
}

#[test]
fn bad_requests_leave_the_mesh_alone() {
    let mut context = MeshContext::with_grid_limit(8, 8);
    context
        .generate(&unit_square(4, 4, Topology::KleinSquare), &|_: f32, _: f32| 1.0_f32)
        .unwrap();
    let indices = context.indices().to_vec();

    let mut unknown = unit_square(4, 4, Topology::KleinSquare);
    unknown.topology = 99;
    assert_eq!(
        context.generate(&unknown, &|_: f32, _: f32| 2.0_f32),
        Err(MeshError::UnknownTopology(99))
    );
    assert!(context.generate(&unit_square(9, 9, Topology::PlanarSquare), &|_: f32, _: f32| 2.0_f32).is_err());

    assert_eq!(context.indices(), indices.as_slice());
    assert!(context.vertices().chunks_exact(3).all(|v| v[2] == 1.0));
}

#[test]
fn config_overrides_drive_the_engine() {
    let mut config = AppConfig::from_toml_str(
        r#"
        [rotation]
        angle_step = 0.05
        strategy = "exact"

        [viewer]
        preset = "flat plane"
        "#,
    )
    .unwrap();
    config
        .apply(&Overrides {
            preset: Some("Flat Plane".to_string()),
            nx: Some(4),
            ny: None,
            topology: Some(Topology::CylindricalTriangle),
        })
        .unwrap();
    config.validate().unwrap();

    let preset = find_preset(&config.viewer.preset).unwrap();
    let params = config.canvas.to_parameters();
    assert_eq!(params.nx, 4);
    assert_eq!(params.ny, preset.resolution.ny);

    let engine = MeshEngine::with_grid_limit(32, 32);
    engine.set_strategy(config.rotation.strategy);
    engine.set_rotation_angle(config.rotation.angle_step);
    engine.generate(params, preset.surface);

    match engine.recv_event_timeout(Duration::from_secs(5)) {
        Some(MeshEvent::Generated(mesh)) => {
            assert_eq!(mesh.canvas.vertex_count, 4 * preset.resolution.ny as usize);
            assert_eq!(mesh.z_range, (0.0, 0.0));
            assert_eq!(
                mesh.indices.len(),
                Topology::CylindricalTriangle.index_size(Resolution::new(4, preset.resolution.ny))
            );
        }
        other => panic!("expected a generated mesh, got {other:?}"),
    }

    engine.rotate();
    match engine.recv_event_timeout(Duration::from_secs(5)) {
        Some(MeshEvent::Rotated(vertices)) => {
            assert_eq!(vertices.len(), 3 * 4 * preset.resolution.ny as usize);
        }
        other => panic!("expected a rotated frame, got {other:?}"),
    }
}

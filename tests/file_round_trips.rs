use std::path::PathBuf;

use rasterlab::context::{CurveKind, FillAlgorithm};
use rasterlab::mesh::{cube, load_vtk, save_vtk, uv_sphere};
use rasterlab::raster::CurvePoint;
use rasterlab::scene::{load_scene, save_scene};
use rasterlab::{Canvas, Color, Object2D, Point, RenderContext, Scene};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("rasterlab-{}-{}", std::process::id(), name))
}

fn sample_scene() -> Scene {
    let mut scene = Scene::new();
    scene.add(Object2D::line(Point::new(0, 0), Point::new(120, 45)).with_outline(Color::RED));
    scene.add(Object2D::circle(Point::new(200, 200), Point::new(230, 200)));
    scene.add(
        Object2D::polygon(vec![Point::new(10, 10), Point::new(90, 20), Point::new(40, 70)])
            .named("roof")
            .with_outline(Color::BLUE)
            .with_fill(Color::rgb(20, 200, 40), FillAlgorithm::Barycentric),
    );
    scene.add(Object2D::curve(
        vec![
            CurvePoint::new(Point::new(5, 5), Point::new(25, 5)),
            CurvePoint::new(Point::new(60, 80), Point::new(90, 60)),
            CurvePoint::new(Point::new(150, 10), Point::new(150, 40)),
        ],
        CurveKind::Casteljau,
    ));
    scene
}

#[test]
fn test_scene_survives_save_and_load() {
    let path = temp_path("scene.txt");
    let scene = sample_scene();

    save_scene(&scene, &path).unwrap();
    let loaded = load_scene(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded, scene);
    let roof = loaded.get("roof").unwrap();
    assert_eq!(roof.layer, 2);
    assert_eq!(roof.fill_algorithm, FillAlgorithm::Barycentric);
    assert_eq!(roof.outline, Color::BLUE);
}

#[test]
fn test_missing_scene_file_is_io_error() {
    let result = load_scene(temp_path("does-not-exist.txt"));
    assert!(matches!(result, Err(rasterlab::Error::Io(_))));
}

#[test]
fn test_cube_survives_save_and_load() {
    let path = temp_path("cube.vtk");
    let mesh = cube(100.0);

    save_vtk(&mesh, &path).unwrap();
    let loaded = load_vtk(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.vertex_count(), 8);
    assert_eq!(loaded.face_count(), 12);
    assert_eq!(loaded.pair_count(), 18);
    assert_eq!(loaded.boundary_count(), 0);
    assert!(loaded.validate());
    assert_eq!(loaded, mesh);
}

#[test]
fn test_sphere_survives_save_and_load() {
    let path = temp_path("sphere.vtk");
    let mesh = uv_sphere(50.0, 12, 6).unwrap();

    save_vtk(&mesh, &path).unwrap();
    let loaded = load_vtk(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.polygons(), mesh.polygons());
    assert_eq!(loaded.boundary_count(), 0);
    assert_eq!(loaded, mesh);
}

#[test]
fn test_corrupt_mesh_file_is_rejected() {
    let path = temp_path("broken.vtk");
    std::fs::write(&path, "# vtk DataFile Version 3.0\nvtk output\nBINARY\n").unwrap();
    let result = load_vtk(&path);
    let _ = std::fs::remove_file(&path);

    assert!(matches!(result, Err(rasterlab::Error::Mesh(_))));
}

/// Cube file as written by the older viewer: compact header and a face list
/// that uses 0 -> 1 in two faces
const LEGACY_CUBE_FILE: &str = "#vtk DataFile Version 3.0
vtk output
ASCII
DATASET POLYDATA
POINTS 8 float
0 0 0
0 100 0
100 100 0
100 0 0
0 0 100
0 100 100
100 100 100
100 0 100
POLYGONS 12 48
3 0 1 3
3 1 2 3
3 0 1 5
3 0 4 5
3 0 3 4
3 3 7 4
3 3 2 7
3 2 6 7
3 1 5 6
3 2 1 6
3 4 7 5
3 5 7 6
";

#[test]
fn test_loads_legacy_cube_file() {
    let path = temp_path("legacy-cube.vtk");
    std::fs::write(&path, LEGACY_CUBE_FILE).unwrap();
    let mesh = load_vtk(&path);
    let _ = std::fs::remove_file(&path);

    let mesh = mesh.unwrap();
    assert_eq!(mesh.vertex_count(), 8);
    assert_eq!(mesh.face_count(), 12);
    assert_eq!(mesh.pair_count(), 15);
    assert!(mesh.validate());
}

#[test]
fn test_saved_mesh_uses_compact_header() {
    let path = temp_path("header.vtk");
    save_vtk(&cube(10.0), &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert!(text.starts_with("#vtk DataFile Version 3.0\nvtk output\nASCII\nDATASET POLYDATA\n"));
}

fn line_stanza(name: &str, layer: i32, from: (i32, i32), to: (i32, i32)) -> String {
    format!(
        "TYPE:line\nNAME:{}\nOUTLINE_COLOR:255:0:0\nFILLING_COLOR:0:0:0\nFILLING_ALG:0\n\
         CURVE_TYPE:0\nLAYER:{}\nPOINTS:2\n{}:{}\n{}:{}\n\n",
        name, layer, from.0, from.1, to.0, to.1
    )
}

#[test]
fn test_object_added_after_load_is_on_top() {
    let path = temp_path("sparse-layers.txt");
    let text = format!(
        "MODELVIEWER 2D SCENE FORMAT\n{}{}",
        line_stanza("a", 5, (0, 10), (40, 10)),
        line_stanza("b", 6, (0, 20), (40, 20)),
    );
    std::fs::write(&path, text).unwrap();

    let mut canvas = Canvas::new(50, 50, RenderContext::new());
    let loaded = canvas.load_scene(&path);
    let _ = std::fs::remove_file(&path);
    loaded.unwrap();

    let name = canvas
        .add_line(Point::new(20, 0), Point::new(20, 40), Color::BLUE)
        .unwrap();
    let layers: Vec<i32> = ["a", "b", name.as_str()]
        .iter()
        .filter_map(|n| canvas.scene().get(n).map(|o| o.layer))
        .collect();
    assert_eq!(layers, vec![0, 1, 2]);
    assert_eq!(canvas.buffer().get_pixel(20, 10), Some(Color::BLUE));
    assert_eq!(canvas.buffer().get_pixel(20, 20), Some(Color::BLUE));
    assert_eq!(canvas.buffer().get_pixel(5, 10), Some(Color::RED));
}

use std::path::PathBuf;

use log::{LevelFilter, Metadata, Record};
use rasterlab::config::{CliArgs, ViewerConfig, USAGE};
use rasterlab::display::{Display, PixelBuffer, RenderTarget};
use rasterlab::input::{Editor, InputEvent, Key};
use rasterlab::mesh::{cube, load_vtk};
use rasterlab::util::FpsCounter;
use rasterlab::{
    Canvas, HalfEdgeMesh, ProjectionKind, RenderContext, Renderer3D, Representation,
    SurfaceShading,
};

const DEFAULT_SCENE_PATH: &str = "scene.txt";
const DEFAULT_CUBE_EDGE: f64 = 200.0;
const ROTATE_STEP_DEGREES: f64 = 5.0;
const FPS_LOG_INTERVAL: u32 = 300;

/// Plain stderr sink for the `log` facade
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppMode {
    Draw2D,
    View3D,
}

fn init_logging(verbose: bool) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        });
    }
}

fn load_mesh(path: Option<&PathBuf>) -> HalfEdgeMesh {
    match path {
        Some(path) => load_vtk(path).unwrap_or_else(|e| {
            eprintln!("Failed to load mesh {}: {}", path.display(), e);
            cube(DEFAULT_CUBE_EDGE)
        }),
        None => cube(DEFAULT_CUBE_EDGE),
    }
}

/// Handle a 3D-mode key; returns whether the view changed
fn view_key(
    key: Key,
    view: &mut RenderContext,
    mesh: &mut HalfEdgeMesh,
    config: &ViewerConfig,
    color_seed: u64,
) -> bool {
    let azimuth = view.plane.azimuth().to_degrees();
    let zenith = view.plane.zenith().to_degrees();
    match key {
        Key::Left => view.set_azimuth_degrees(azimuth - ROTATE_STEP_DEGREES),
        Key::Right => view.set_azimuth_degrees(azimuth + ROTATE_STEP_DEGREES),
        Key::Up => view.set_zenith_degrees(zenith + ROTATE_STEP_DEGREES),
        Key::Down => view.set_zenith_degrees(zenith - ROTATE_STEP_DEGREES),
        Key::Char('p') => {
            view.projection = match view.projection {
                ProjectionKind::Parallel => ProjectionKind::Perspective,
                ProjectionKind::Perspective => ProjectionKind::Parallel,
            };
        },
        Key::Char('r') => {
            view.representation = match view.representation {
                Representation::Wireframe => Representation::Surface,
                Representation::Surface => Representation::Wireframe,
            };
        },
        Key::Char('g') => {
            view.shading = match view.shading {
                SurfaceShading::Flat => SurfaceShading::Gouraud,
                SurfaceShading::Gouraud => SurfaceShading::Flat,
            };
        },
        Key::Char('i') => {
            view.light = match view.light {
                Some(_) => None,
                None => Some(config.light.unwrap_or_default()),
            };
        },
        Key::Char('c') => mesh.randomize_face_colors(color_seed),
        Key::Char('x') => mesh.clear_face_colors(),
        _ => return false,
    }
    log::debug!(
        "view: azimuth {:.0} zenith {:.0} {:?} {:?} {:?} light {}",
        view.plane.azimuth().to_degrees(),
        view.plane.zenith().to_degrees(),
        view.projection,
        view.representation,
        view.shading,
        view.light.is_some()
    );
    true
}

fn print_banner(config: &ViewerConfig, scene_path: &std::path::Path) {
    println!("=== rasterlab ===");
    println!("Resolution: {}x{}", config.width, config.height);
    if config.vsync {
        println!("VSync: ON. Use --no-vsync for uncapped.");
    } else {
        println!("VSync: OFF (uncapped framerate)");
    }
    println!("Scene file: {}", scene_path.display());
    println!("Use --help for command line options.");
    println!("Controls:");
    println!("  Tab        - Toggle 2D editor / 3D viewer");
    println!("  W          - Save scene");
    println!("  O          - Load scene");
    println!("  Q          - Quit");
    println!("  Escape     - Cancel, or quit when idle");
    println!();
    println!("2D editor:");
    println!("  S L C P B  - Select / line / circle / polygon / curve tool");
    println!("  Left click - Place points, drag to move, shift-drag to edit a point");
    println!("  Enter      - Finish polygon or curve");
    println!("  Right click- Cancel");
    println!("  Delete     - Delete selected object");
    println!("  PgUp/PgDn  - Raise / lower layer");
    println!("  Arrows     - Rotate / scale selection (wheel scales too)");
    println!("  M / H      - Mirror / shear selection");
    println!("  F / K / D  - Cycle fill algorithm / curve kind / line algorithm");
    println!();
    println!("3D viewer:");
    println!("  Arrows     - Rotate azimuth / zenith");
    println!("  P          - Parallel / perspective projection");
    println!("  R          - Wireframe / surface");
    println!("  G          - Flat / Gouraud shading");
    println!("  I          - Toggle lighting");
    println!("  C / X      - Random face colors / clear face colors");
}

fn main() -> Result<(), String> {
    let args = CliArgs::parse(std::env::args().skip(1));
    if args.help {
        println!("{}", USAGE);
        std::process::exit(0);
    }
    init_logging(args.verbose);
    for flag in &args.unknown {
        log::warn!("ignoring unknown argument {:?}", flag);
    }

    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path).map_err(|e| e.to_string())?,
        None => ViewerConfig::default(),
    };
    args.apply(&mut config);
    config.validate().map_err(|e| e.to_string())?;

    let scene_path = args
        .scene
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCENE_PATH));

    let (mut display, texture_creator) =
        Display::with_options("rasterlab", config.width, config.height, config.vsync)?;
    let mut target = RenderTarget::with_size(&texture_creator, config.width, config.height)?;
    let mut frame = PixelBuffer::with_size(config.width, config.height);

    let mut canvas = Canvas::new(config.width, config.height, config.render_context());
    if args.scene.is_some() {
        if let Err(e) = canvas.load_scene(&scene_path) {
            eprintln!("Failed to load {}: {}", scene_path.display(), e);
        }
    }
    let mut editor = Editor::new();

    let mut mesh = load_mesh(args.mesh.as_ref());
    let mut view = config.render_context();
    let mut renderer = Renderer3D::new(config.width, config.height);
    let mut view_dirty = true;

    let mut mode = if args.mesh.is_some() {
        AppMode::View3D
    } else {
        AppMode::Draw2D
    };
    let mut fps_counter = FpsCounter::new(60);
    let mut frames = 0u32;

    print_banner(&config, &scene_path);

    'main: loop {
        let fps = fps_counter.tick();
        frames = frames.wrapping_add(1);
        if frames % FPS_LOG_INTERVAL == 0 {
            log::debug!("{:.1} fps", fps);
        }

        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Key::Char('q')) => break 'main,
                InputEvent::Resized { width, height } => {
                    canvas.resize(width, height);
                    frame.resize(width, height);
                    target = RenderTarget::with_size(&texture_creator, width, height)?;
                    view_dirty = true;
                    continue;
                },
                InputEvent::KeyDown(Key::Tab) => {
                    mode = match mode {
                        AppMode::Draw2D => AppMode::View3D,
                        AppMode::View3D => AppMode::Draw2D,
                    };
                    view_dirty = true;
                    continue;
                },
                InputEvent::KeyDown(Key::Char('w')) => {
                    match canvas.save_scene(&scene_path) {
                        Ok(()) => println!("Scene saved to {}", scene_path.display()),
                        Err(e) => eprintln!("Failed to save: {}", e),
                    }
                    continue;
                },
                InputEvent::KeyDown(Key::Char('o')) => {
                    match canvas.load_scene(&scene_path) {
                        Ok(()) => println!("Scene loaded from {}", scene_path.display()),
                        Err(e) => eprintln!("Failed to load: {}", e),
                    }
                    continue;
                },
                _ => {},
            }

            match mode {
                AppMode::Draw2D => {
                    let idle = !editor.is_drawing() && editor.selected().is_none();
                    if event == InputEvent::KeyDown(Key::Escape) && idle {
                        break 'main;
                    }
                    editor.handle_event(&mut canvas, &event);
                },
                AppMode::View3D => match event {
                    InputEvent::KeyDown(Key::Escape) => break 'main,
                    InputEvent::KeyDown(key) => {
                        view_dirty |= view_key(key, &mut view, &mut mesh, &config, u64::from(frames));
                    },
                    _ => {},
                },
            }
        }

        match mode {
            AppMode::Draw2D => {
                frame.clone_from(canvas.buffer());
                editor.draw_overlay(&canvas, &mut frame);
            },
            AppMode::View3D => {
                if view_dirty {
                    renderer.draw(&mesh, &view, &mut frame);
                    view_dirty = false;
                }
            },
        }

        display.present(&mut target, &frame)?;
    }

    Ok(())
}

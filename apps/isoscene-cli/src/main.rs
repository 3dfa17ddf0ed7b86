use std::sync::Mutex;

use serde::Serialize;

use isoscene_core::{ObjectKind, WorldPos};
use isoscene_renderer::{
    Key, KeyEvent, RenderFrame, SceneConfig, Tool, ViewportSnapshot, ViewportState,
};

/// Scene mounted when no config file is given.
const SAMPLE_SCENE: &str = r##"{
    "camera": { "x": 0, "y": 0, "zoom": 1, "smoothing": 0.1 },
    "objects": [
        { "kind": "character", "x": 100, "y": 100, "color": "#8B5CF6", "width": 20, "height": 30 },
        { "kind": "building", "x": 200, "y": 150 },
        { "kind": "tree", "x": 300, "y": 80 },
        { "kind": "npc", "x": 150, "y": 250, "name": "Merchant", "level": 4, "health": 45 },
        {
            "kind": "player", "x": 40, "y": 60, "name": "Hero", "level": 7, "health": 20,
            "animation": { "frame": 0, "speed": 0.2, "cycle": "walk" }
        }
    ]
}"##;

/// Frame interval of a 60 Hz display, in milliseconds.
const FRAME_MS: f64 = 16.67;

/// Shared host state, the way a windowed shell would hold it.
struct AppState {
    viewport: Mutex<ViewportState>,
}

impl AppState {
    fn mount(config: &SceneConfig) -> Result<Self, String> {
        let viewport = ViewportState::new(config).map_err(|e| e.to_string())?;
        Ok(Self {
            viewport: Mutex::new(viewport),
        })
    }
}

// ── Host commands ────────────────────────────────────────────────────

fn get_snapshot(state: &AppState) -> Result<ViewportSnapshot, String> {
    let vp = state.viewport.lock().map_err(|e| e.to_string())?;
    Ok(vp.snapshot())
}

fn place_object(state: &AppState, kind: ObjectKind, x: f64, y: f64) -> Result<String, String> {
    let mut vp = state.viewport.lock().map_err(|e| e.to_string())?;
    let id = vp
        .place(kind, WorldPos::ground(x, y))
        .map_err(|e| e.to_string())?;
    Ok(id.to_string())
}

fn follow_named(state: &AppState, name: &str) -> Result<bool, String> {
    let mut vp = state.viewport.lock().map_err(|e| e.to_string())?;
    let id = vp
        .scene()
        .iter()
        .find(|o| o.name.as_deref() == Some(name))
        .map(|o| o.id);
    vp.select(id);
    vp.set_following(id.is_some());
    Ok(id.is_some())
}

fn send_key(state: &AppState, event: KeyEvent) -> Result<(), String> {
    let mut vp = state.viewport.lock().map_err(|e| e.to_string())?;
    vp.key_down(event);
    Ok(())
}

/// Drive the display-refresh callback for `frames` frames.
fn run_frames(state: &AppState, frames: u32) -> Result<(), String> {
    let mut vp = state.viewport.lock().map_err(|e| e.to_string())?;
    vp.play();
    for i in 0..=frames {
        vp.tick(f64::from(i) * FRAME_MS);
    }
    vp.pause();
    Ok(())
}

fn render_frame(state: &AppState) -> Result<RenderFrame, String> {
    let mut vp = state.viewport.lock().map_err(|e| e.to_string())?;
    let mut frame = RenderFrame::new(vp.surface());
    vp.render(&mut frame);
    vp.take_redraw();
    Ok(frame)
}

// ── Entry point ──────────────────────────────────────────────────────

#[derive(Serialize)]
struct SessionReport {
    snapshot: ViewportSnapshot,
    draw_commands: usize,
    overlay: Vec<String>,
}

struct Args {
    config_path: Option<String>,
    frames: u32,
    dump_frame: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config_path: None,
        frames: 120,
        dump_frame: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--frames" => {
                let value = iter.next().ok_or("--frames needs a value")?;
                args.frames = value
                    .parse()
                    .map_err(|e| format!("bad --frames value {:?}: {}", value, e))?;
            }
            "--dump-frame" => args.dump_frame = true,
            _ if arg.starts_with("--") => return Err(format!("unknown flag {}", arg)),
            _ => args.config_path = Some(arg),
        }
    }
    Ok(args)
}

fn load_config(path: Option<&str>) -> Result<SceneConfig, String> {
    let json = match path {
        Some(path) => {
            log::info!("loading scene config from {}", path);
            std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?
        }
        None => {
            log::info!("no config given; using the sample scene");
            SAMPLE_SCENE.to_string()
        }
    };
    SceneConfig::from_json(&json).map_err(|e| e.to_string())
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let config = load_config(args.config_path.as_deref())?;
    let state = AppState::mount(&config)?;

    if !follow_named(&state, "Hero")? {
        log::warn!("no object named Hero; camera stays put");
    }
    run_frames(&state, args.frames)?;

    {
        let mut vp = state.viewport.lock().map_err(|e| e.to_string())?;
        vp.set_tool(Tool::Place);
        vp.set_placement_kind(ObjectKind::Resource);
    }
    place_object(&state, ObjectKind::Resource, 260.0, 40.0)?;
    send_key(&state, KeyEvent::with_ctrl(Key::Char('z')))?;
    send_key(&state, KeyEvent::with_ctrl(Key::Char('y')))?;

    let frame = render_frame(&state)?;
    let report = SessionReport {
        snapshot: get_snapshot(&state)?,
        draw_commands: frame.commands.len(),
        overlay: frame.texts().map(str::to_string).collect(),
    };

    let out = if args.dump_frame {
        serde_json::to_string_pretty(&frame)
    } else {
        serde_json::to_string_pretty(&report)
    }
    .map_err(|e| e.to_string())?;
    println!("{}", out);
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

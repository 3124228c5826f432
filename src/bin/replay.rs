use anyhow::{Context, Result, anyhow, bail};
use pushpull::PushPullTool;
use pushpull::push_pull::SETTINGS_PATH;
use pushpull::push_pull::settings::PushPullSettings;
use pushpull::replay::{Gesture, StepOutcome, run_gesture};
use pushpull::scene::Scene;
use pushpull::scene::file::{SceneFile, demo_scene_file};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Args {
    scene: Option<PathBuf>,
    gesture: PathBuf,
    settings: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = parse_args()?;

    let scene_file = match &args.scene {
        Some(path) => SceneFile::load(path)?,
        None => demo_scene_file(),
    };
    let mut scene = scene_file
        .into_scene()
        .context("scene could not be built")?;
    let settings = PushPullSettings::load(&args.settings)?;
    let gesture = Gesture::load(&args.gesture)?;

    let initial = scene.clone();
    let mut tool = PushPullTool::new(settings);
    let outcomes = run_gesture(&mut scene, &mut tool, &gesture);

    for (index, (step, outcome)) in gesture.steps.iter().zip(&outcomes).enumerate() {
        println!("{index:>3}: {step:?} -> {}", describe(outcome));
    }
    print_scene(&scene);
    print_moved_vertices(&initial, &scene);

    let failures = outcomes
        .iter()
        .filter(|o| matches!(o, StepOutcome::Failed(_)))
        .count();
    if failures > 0 {
        println!("{failures} step(s) failed");
    }
    Ok(())
}

fn describe(outcome: &StepOutcome) -> String {
    match outcome {
        StepOutcome::Done => "ok".to_string(),
        StepOutcome::Moved(change) => format!("depth change {change:+.4}"),
        StepOutcome::Ignored => "ignored".to_string(),
        StepOutcome::Failed(reason) => format!("failed: {reason}"),
    }
}

fn print_scene(scene: &Scene) {
    println!("tool: {}  undo chunks: {}", scene.tool(), scene.undo_depth());
    for object in scene.objects().iter().filter(|o| o.is_transform) {
        let t = object.transform.translation;
        let s = object.transform.scale;
        println!(
            "{name:>16}: translation=({:.4}, {:.4}, {:.4}) scale=({:.4}, {:.4}, {:.4})",
            t.x,
            t.y,
            t.z,
            s.x,
            s.y,
            s.z,
            name = object.name
        );
    }
}

fn print_moved_vertices(initial: &Scene, scene: &Scene) {
    for object in scene.objects() {
        let (Some(mesh), Some(before)) = (
            object.mesh.as_ref(),
            initial.object(&object.name).and_then(|o| o.mesh.as_ref()),
        ) else {
            continue;
        };
        for (index, (now, was)) in mesh.positions.iter().zip(&before.positions).enumerate() {
            if now.distance_squared(*was) <= f32::EPSILON {
                continue;
            }
            let Some(world) = object.vertex_world(index as u32) else {
                continue;
            };
            println!(
                "{name:>16}.vtx[{index}]: ({:.4}, {:.4}, {:.4})",
                world.x,
                world.y,
                world.z,
                name = object.name
            );
        }
    }
}

fn parse_args() -> Result<Args> {
    let mut scene = None;
    let mut gesture = None;
    let mut settings = PathBuf::from(SETTINGS_PATH);

    let mut iter = env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--scene" => {
                let value = iter.next().ok_or_else(|| anyhow!("--scene expects a path"))?;
                scene = Some(PathBuf::from(value));
            }
            "--gesture" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--gesture expects a path"))?;
                gesture = Some(PathBuf::from(value));
            }
            "--settings" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--settings expects a path"))?;
                settings = PathBuf::from(value);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => bail!("unknown argument: {arg}"),
        }
    }

    let Some(gesture) = gesture else {
        print_help();
        bail!("--gesture is required");
    };

    Ok(Args {
        scene,
        gesture,
        settings,
    })
}

fn print_help() {
    println!(
        "Usage:\n\
         cargo run --bin pushpull-replay -- --gesture <path> [options]\n\n\
         Options:\n\
         --gesture <path>    Gesture script (RON, required)\n\
         --scene <path>      Scene file (default: built-in demo scene)\n\
         --settings <path>   Tool settings (default: {SETTINGS_PATH})"
    );
}

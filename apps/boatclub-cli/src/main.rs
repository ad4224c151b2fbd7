use std::path::PathBuf;

use anyhow::Context;
use boatclub_assets::{SCENE_TEXTURES, SceneAssets};
use boatclub_common::MeshKind;
use boatclub_input::Key;
use boatclub_kernel::{SceneConfig, SceneState};
use boatclub_render::{FrameLoop, ManualScheduler, RecordingSink, SceneNodes, layout};
use boatclub_tools::SceneInspector;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "boatclub-cli", about = "Headless tools for the boat club scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene configuration (YAML). Defaults reproduce the stock scene.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding `<mesh>.json` files and the scene textures.
    /// Built-in placeholder assets are used when omitted.
    #[arg(short, long)]
    assets: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, configuration and loaded asset summary
    Info,
    /// Run the frame loop headless and print the draws of the last frame
    Frames {
        /// Number of frames to run
        #[arg(short, long, default_value = "1")]
        frames: u64,
    },
    /// Step the patrolling boats and print every phase change
    Patrol {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "600")]
        ticks: u64,
    },
    /// Replay key presses (names like `right`, `w`, `q` or numeric codes)
    Camera {
        keys: Vec<String>,
    },
    /// Print the effective configuration as YAML
    Config,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SceneConfig> {
    match path {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(SceneConfig::default()),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("boatclub-cli v{}", env!("CARGO_PKG_VERSION"));
            let assets = SceneAssets::load(cli.assets.as_deref())?;
            for kind in MeshKind::ALL {
                if let Some(mesh) = assets.meshes.get_kind(kind) {
                    println!(
                        "mesh {:<10} vertices={:<5} triangles={:<5} uv={}",
                        kind.file_stem(),
                        mesh.vertex_count(),
                        mesh.triangle_count(),
                        mesh.has_tex_coords()
                    );
                }
            }
            for (handle, image) in assets.textures.iter() {
                println!(
                    "texture #{} {} {}x{}",
                    handle.0, image.name, image.width, image.height
                );
            }
            println!(
                "draws per frame: {} ({} static + {} patrolling)",
                layout::STATIC_DRAWS + config.patrols.len(),
                layout::STATIC_DRAWS,
                config.patrols.len()
            );
            print!("{}", SceneInspector::summary(&SceneState::from_config(&config)?));
        }
        Commands::Frames { frames } => {
            let assets = SceneAssets::load(cli.assets.as_deref())?;
            let nodes = SceneNodes::resolve(&assets.meshes, &assets.textures)?;
            let mut frame_loop = FrameLoop::new(SceneState::from_config(&config)?, nodes);

            let mut sink = RecordingSink::new();
            let drawn = frame_loop.run(&mut sink, &mut ManualScheduler::new(frames))?;
            println!("ran {drawn} frames, {} draws total", sink.total_draws());
            if let Some(last) = sink.last_frame() {
                print!("{last}");
            }
            print!("{}", SceneInspector::summary(frame_loop.state()));
        }
        Commands::Patrol { ticks } => {
            let mut state = SceneState::from_config(&config)?;
            for _ in 0..ticks {
                state.step();
                for event in state.drain_events() {
                    println!(
                        "tick {:>6} boat {}: {:?} -> {:?}",
                        event.tick, event.actor, event.from, event.to
                    );
                }
            }
            print!("{}", SceneInspector::summary(&state));
        }
        Commands::Camera { keys } => {
            let mut state = SceneState::from_config(&config)?;
            let controls = *state.controls();
            println!("{}", SceneInspector::camera(&state));
            for name in &keys {
                let key = Key::from_name(name);
                match key.action() {
                    Some(action) => {
                        action.apply(state.camera_mut(), &controls);
                        println!("{name:>6}: {}", SceneInspector::camera(&state));
                    }
                    None => println!("{name:>6}: ignored"),
                }
            }
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
            println!("# textures: {}", SCENE_TEXTURES.join(", "));
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    run(cli).inspect_err(|e| tracing::error!("{e:#}"))
}

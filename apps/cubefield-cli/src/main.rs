use std::f64::consts::TAU;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use cubefield_script::{CubeFieldConfig, DemoScript, SceneKind, DEFAULT_RPM};
use cubefield_view::{FrameOutcome, HeadlessSurface, SceneView, SurfaceConfig, SurfaceSize};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cubefield-cli", about = "Headless runs of the cube field scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Drive a scene view through simulated frames and print the last one
    Run {
        /// Number of frame ticks to simulate
        #[arg(short, long, default_value_t = 360)]
        frames: u32,
        /// Simulated time between ticks, in milliseconds
        #[arg(long, default_value_t = 16)]
        frame_ms: u64,
        /// Number of cubes in the field
        #[arg(short, long, default_value_t = 2000)]
        cubes: usize,
        /// RNG seed for a reproducible layout
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// Spin speed of the reference box, in revolutions per minute
        #[arg(long, default_value_t = DEFAULT_RPM)]
        rpm: f64,
        /// Scene to run: `cubefield` or `basic`
        #[arg(long, default_value = "cubefield")]
        scene: SceneKind,
    },
}

/// What a headless run produced.
#[derive(Debug)]
struct RunReport {
    rendered: u32,
    simulated: Duration,
    /// Total rotation applied to the reference box, unwrapped.
    turned: f64,
    last_frame: String,
}

fn run(frames: u32, frame_ms: u64, script: DemoScript) -> anyhow::Result<RunReport> {
    let surface = HeadlessSurface::new(SurfaceSize::new(1280, 720, 1.0));
    let log = surface.log();
    let mut view = SceneView::new(surface, script);

    let t0 = Instant::now();
    let step = Duration::from_millis(frame_ms);
    let simulated = step
        .checked_mul(frames)
        .filter(|total| t0.checked_add(*total).is_some())
        .ok_or_else(|| anyhow::anyhow!("{frames} frames of {frame_ms} ms overflow the simulated clock"))?;

    view.mount(Arc::new(SurfaceConfig::default()), t0)?;
    let mut rendered = 0;
    for i in 1..=frames {
        if let FrameOutcome::Rendered(ft) = view.frame(t0 + step * i)? {
            rendered += 1;
            tracing::trace!(frame = ft.frame_index, delta_ms = ft.delta_ms(), "frame");
        }
    }

    let turned = view.context().map(|ctx| ctx.turned).unwrap_or(0.0);
    view.unmount();

    Ok(RunReport {
        rendered,
        simulated,
        turned,
        last_frame: log.last_frame(),
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("cubefield-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("view: {}", cubefield_view::crate_info());
            println!("scene: {}", cubefield_scene::crate_info());
            println!("input: {}", cubefield_input::crate_info());
            println!("script: {}", cubefield_script::crate_info());
            println!("default surface config:");
            println!("{}", serde_json::to_string_pretty(&SurfaceConfig::default())?);
        }
        Commands::Run {
            frames,
            frame_ms,
            cubes,
            seed,
            rpm,
            scene,
        } => {
            let script = DemoScript::new(
                scene,
                CubeFieldConfig {
                    cube_count: cubes,
                    seed: Some(seed),
                    rpm,
                    ..CubeFieldConfig::default()
                },
            );
            println!("Running {scene}: frames={frames}, frame_ms={frame_ms}, seed={seed}, rpm={rpm}");
            let report = run(frames, frame_ms, script)?;
            print!("{}", report.last_frame);
            println!(
                "Rendered {} frames over {:.3}s",
                report.rendered,
                report.simulated.as_secs_f64()
            );
            println!(
                "Reference box rotation: {:.4} rad ({:.3} revolutions)",
                report.turned,
                report.turned / TAU
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubefield(cubes: usize) -> DemoScript {
        DemoScript::new(
            SceneKind::CubeField,
            CubeFieldConfig {
                cube_count: cubes,
                seed: Some(1),
                ..CubeFieldConfig::default()
            },
        )
    }

    #[test]
    fn six_second_run_turns_once() {
        let report = run(375, 16, cubefield(10)).unwrap();
        assert_eq!(report.rendered, 375);
        assert_eq!(report.simulated, Duration::from_secs(6));
        assert!((report.turned - TAU).abs() < 1e-9);
    }

    #[test]
    fn last_frame_summarises_large_fields() {
        let report = run(2, 16, cubefield(100)).unwrap();
        assert!(report.last_frame.contains("101 boxes, 1 grounds"));
        assert!(report.last_frame.contains("frame=1"));
    }

    #[test]
    fn basic_scene_lists_its_meshes() {
        let script = DemoScript::new(SceneKind::Basic, CubeFieldConfig::default());
        let report = run(1, 16, script).unwrap();
        assert!(report.last_frame.contains("Camera: camera1"));
        assert!(report.last_frame.contains(" box pos="));
        assert!(report.last_frame.contains(" ground pos="));
    }

    #[test]
    fn zero_frames_renders_nothing() {
        let report = run(0, 16, cubefield(1)).unwrap();
        assert_eq!(report.rendered, 0);
        assert_eq!(report.turned, 0.0);
        assert!(report.last_frame.is_empty());
    }

    #[test]
    fn overflowing_simulated_time_is_an_error() {
        let err = run(u32::MAX, u64::MAX / 1000, cubefield(1)).unwrap_err();
        assert!(err.to_string().contains("overflow"));
    }
}

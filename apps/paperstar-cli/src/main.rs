use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use paperstar_common::Color;
use paperstar_render::{DebugTextRenderer, Renderer};
use paperstar_scene::FrameTime;
use paperstar_showcase::Showcase;
use paperstar_star::{StarParams, generate};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "paperstar-cli", about = "CLI tool for paperstar stars and scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Generate a star and describe the mesh
    Star(StarArgs),
    /// Step the showcase scene and dump it as text
    Scene {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "0")]
        frames: u64,
        /// Simulated frame rate
        #[arg(long, default_value = "60")]
        fps: f32,
    },
}

#[derive(Args)]
struct StarArgs {
    /// JSON parameter file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    outer: Option<f32>,
    #[arg(long)]
    inner: Option<f32>,
    #[arg(long)]
    depth: Option<f32>,
    #[arg(long)]
    bevel_size: Option<f32>,
    #[arg(long)]
    bevel_thickness: Option<f32>,
    #[arg(long)]
    bevel_segments: Option<u32>,
    /// Color as 0xRRGGBB or #RRGGBB
    #[arg(long)]
    color: Option<Color>,
    /// Print the resolved parameters as JSON instead of mesh stats
    #[arg(long)]
    json: bool,
}

impl StarArgs {
    fn resolve(&self) -> anyhow::Result<StarParams> {
        let mut params = match &self.config {
            Some(path) => StarParams::load(path)
                .with_context(|| format!("reading star config {}", path.display()))?,
            None => StarParams::default(),
        };
        if let Some(v) = self.outer {
            params.outer = v;
        }
        if let Some(v) = self.inner {
            params.inner = v;
        }
        if let Some(v) = self.depth {
            params.depth = v;
        }
        if let Some(v) = self.bevel_size {
            params.bevel_size = v;
        }
        if let Some(v) = self.bevel_thickness {
            params.bevel_thickness = v;
        }
        if let Some(v) = self.bevel_segments {
            params.bevel_segments = v;
        }
        if let Some(v) = self.color {
            params.color = v;
        }
        Ok(params)
    }
}

fn star(args: &StarArgs) -> anyhow::Result<()> {
    let params = args.resolve()?;
    if let Err(e) = params.validate() {
        tracing::warn!("{e}");
    }

    if args.json {
        println!("{}", params.to_json_pretty()?);
        return Ok(());
    }

    let mesh = generate(&params);
    let geometry = &mesh.geometry;
    println!(
        "Star: outer={} inner={} depth={} bevel_size={} bevel_thickness={} bevel_segments={}",
        params.outer,
        params.inner,
        params.depth,
        params.bevel_size,
        params.bevel_thickness,
        params.bevel_segments
    );
    println!(
        "Mesh: vertices={}, triangles={}, indexed={}",
        geometry.vertex_count(),
        geometry.triangle_count(),
        geometry.is_indexed()
    );
    match geometry.bounding_box() {
        Some(bb) => {
            let size = bb.size();
            println!(
                "Bounds: min=({:.3}, {:.3}, {:.3}) max=({:.3}, {:.3}, {:.3}) size=({:.3}, {:.3}, {:.3})",
                bb.min.x, bb.min.y, bb.min.z, bb.max.x, bb.max.y, bb.max.z, size.x, size.y, size.z
            );
        }
        None => println!("Bounds: empty"),
    }
    println!(
        "Material: {} {}",
        mesh.material.kind(),
        mesh.material.color()
    );
    println!("Scale: {:.2}", mesh.transform.scale.x);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("paperstar-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", paperstar_common::crate_info());
            println!("geometry: {}", paperstar_geometry::crate_info());
            println!("scene: {}", paperstar_scene::crate_info());
            println!("star: {}", paperstar_star::crate_info());
            println!("showcase: {}", paperstar_showcase::crate_info());
            println!("render: {}", paperstar_render::crate_info());
            println!("render-wgpu: {}", paperstar_render_wgpu::crate_info());
        }
        Commands::Star(args) => star(&args)?,
        Commands::Scene { frames, fps } => {
            let mut showcase = Showcase::build(&StarParams::default());
            for frame in 1..=frames {
                showcase.scene.update(&FrameTime::fixed(frame, fps));
            }
            println!("After {frames} frames at {fps} fps");
            print!(
                "{}",
                DebugTextRenderer::new().render(&showcase.scene, &showcase.view)
            );
        }
    }

    Ok(())
}

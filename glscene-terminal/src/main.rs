/// GLScene Terminal Demo - Rotating Cylinder
///
/// Loads the scene's resources from disk, then spins the cylinder.
/// Controls:
///   - WASD / Arrow Keys: Rotate the cylinder
///   - Q/ESC: Quit
use anyhow::Context;
use clap::Parser;
use glscene_core::{ResourceEntry, SceneConfig};
use glscene_terminal::{scene::CYLINDER_RESOURCE, TerminalApp};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "glscene-terminal", about = "Render a GLScene scene as ASCII art")]
struct Args {
    /// Scene config (TOML). Defaults to a single cylinder resource.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory resource URIs are resolved against. Defaults to the
    /// config file's directory, or the current directory.
    #[arg(short, long)]
    root: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SceneConfig::from_file(path)
            .with_context(|| format!("loading scene config {}", path.display()))?,
        None => SceneConfig {
            resources: vec![ResourceEntry {
                name: CYLINDER_RESOURCE.to_string(),
                uri: "cylinder.toml".to_string(),
            }],
            ..SceneConfig::default()
        },
    };

    let root = args
        .root
        .or_else(|| {
            args.config
                .as_ref()
                .and_then(|path| path.parent().map(PathBuf::from))
        })
        .unwrap_or_else(|| PathBuf::from("."));

    log::info!("resolving resources against {}", root.display());

    let mut app = TerminalApp::new(config, root).context("initializing terminal")?;
    app.run().context("running terminal renderer")?;

    println!("Thank you for using GLScene Terminal Renderer!");
    Ok(())
}

//! Windowed Example
//!
//! Opens a window and mounts the wolf scene into it. Models are read from
//! the configured asset root (`public/` by default); pass a JSON scene file
//! as the first argument to override any setting.
//!
//! Controls:
//! - Arrow keys: Walk (hold Shift to run)
//! - Space: Sit down / stand up
//! - Mouse drag: Orbit camera
//! - Scroll: Zoom

use prowl::App;
use prowl::config::SceneConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    App::new(config).with_title("Prowl").run()?;
    Ok(())
}

// NES V5 Presenter - Desktop simulator entry point
//
// Runs the frame loop in a window with the built-in test pattern engine.
// Settings come from `presenter.toml` if present.

use nes_v5::display::{run_simulator, WindowConfig};
use nes_v5::emulator::PresenterConfig;
use nes_v5::lifecycle;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("NES V5 Presenter (nes-v5) v0.1.0");
    println!("================================");
    println!();

    lifecycle::initialize();

    let config_path = "presenter.toml";
    let config = PresenterConfig::load_or_default(config_path);
    println!("Configuration loaded from '{}'", config_path);
    println!("  ROM: {}", config.rom_path.display());
    println!();

    println!("Controls:");
    println!("  Arrow Keys: D-pad");
    println!("  X: A button");
    println!("  Z: B button");
    println!("  Enter: Start");
    println!("  Right Shift: Select");
    println!("  Gamepads are picked up automatically");
    println!();

    let window_config = WindowConfig::new().with_scale(2);
    run_simulator(&config, window_config)
}

//! elemental_canvas — interactive entry point.

use elemental_canvas::app::{run, AppConfig};
use elemental_canvas::logging;
use tracing_subscriber::filter::LevelFilter;

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Elemental Canvas — Fire, Ice & Lightning            ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Keyboard/mouse simulation  (use --features leap for hardware)");
    println!();

    if let Err(e) = logging::init(LevelFilter::INFO) {
        eprintln!("Warning: {:#}", e);
    }

    let cfg = match AppConfig::from_args(std::env::args().skip(1)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            eprintln!("usage: elemental_canvas [--config <path.toml>] [--seed <u64>] [--width N] [--height N]");
            std::process::exit(2);
        }
    };

    println!("  Opening {}x{} window…", cfg.width, cfg.height);
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

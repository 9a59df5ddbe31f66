//! Xpcurve - Entry Point
//!
//! Small inspection tool: loads a curve directory and prints the xp table
//! for one curve, which is handy while tuning definition files.

use std::env;

use anyhow::Result;

use xpcurve::CurveRegistry;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("xpcurve v{}", env!("CARGO_PKG_VERSION"));

    let mut args = env::args().skip(1);
    let dir = args.next().unwrap_or_else(|| "assets/curves".to_string());
    let name = args.next().unwrap_or_else(|| "default".to_string());
    let max_level: i32 = match args.next() {
        Some(raw) => raw.parse()?,
        None => 20,
    };

    let registry = CurveRegistry::new(&dir);
    let curve = registry.get(&name);

    println!("curve '{}' (levels 1..={})", curve.name(), max_level);
    println!("{:>6} {:>14} {:>14}", "level", "total xp", "to next");
    for level in 1..=max_level {
        let total = curve.xp_for_level(level)?;
        let to_next = curve.xp_to_next_level(level)?;
        println!("{:>6} {:>14.1} {:>14.1}", level, total, to_next);
    }

    Ok(())
}

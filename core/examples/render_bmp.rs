// Renders one seed to contour_<seed>.bmp and contour_<seed>.png
// Usage: cargo run -p topo --example render_bmp [seed]

use topo::bmp::write_bmp;
use topo::{ContourConfig, generate, random_seed, render_image};
use tracing_subscriber::EnvFilter;

fn main() -> topo::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(random_seed);

    let config = ContourConfig::default();
    let state = generate(&config, seed)?;
    let img = render_image(&state, &config)?;

    write_bmp(format!("contour_{}.bmp", seed), &img)?;
    img.save(format!("contour_{}.png", seed))?;
    println!("Saved contour_{}.bmp ({}×{})", seed, img.width(), img.height());
    Ok(())
}

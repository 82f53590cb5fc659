use std::path::Path;

use placegrid_core::PlacegridConfig;

pub fn init(path: &str) -> anyhow::Result<()> {
    let output = Path::new(path).join("placegrid.toml");
    if output.exists() {
        anyhow::bail!("{} already exists", output.display());
    }

    let config = PlacegridConfig::scaffold();
    std::fs::write(&output, config.to_toml_string()?)?;
    println!("✓ Generated {}", output.display());
    Ok(())
}

use anyhow::Result;

use pulldown_core::AppConfig;

/// Print where the configuration file lives
pub fn path() -> Result<()> {
    let path = AppConfig::config_path();
    let marker = if path.exists() { "" } else { " (not created)" };
    println!("{}{}", path.display(), marker);
    Ok(())
}

/// Print the effective configuration as TOML
pub fn show(config: &AppConfig) -> Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

/// Write the default configuration, keeping an existing file unless forced
pub fn init(force: bool) -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() && !force {
        println!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
        return Ok(());
    }

    AppConfig::default().save()?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

// src/cli/check.rs — `parable check`: config and credential diagnostics

use crate::infra::config::Config;
use crate::infra::paths;

/// Print what the server would run with. Errors when it could not start.
pub fn run_check(config: &Config, config_path: Option<&str>) -> anyhow::Result<()> {
    println!("parable v{}", env!("CARGO_PKG_VERSION"));
    println!();

    match config_path {
        Some(p) => println!("  Config:     {p}"),
        None => {
            let default = paths::config_file_path();
            if default.exists() {
                println!("  Config:     {}", default.display());
            } else {
                println!("  Config:     (using defaults)");
            }
        }
    }
    println!("  Listen:     http://{}", config.bind_addr());
    println!("  Model:      {} via {}", config.model.model, config.model.base_url);
    println!("  History:    {} turns", config.sessions.max_history);
    match config.sessions.idle_timeout_seconds {
        Some(secs) => println!("  Expiry:     {secs}s idle"),
        None => println!("  Expiry:     never"),
    }

    config.validate()?;

    let key_set = std::env::var(&config.model.api_key_env)
        .map(|k| !k.trim().is_empty())
        .unwrap_or(false);
    if key_set {
        println!("  API key:    {} (set)", config.model.api_key_env);
        Ok(())
    } else {
        println!("  API key:    {} (missing)", config.model.api_key_env);
        anyhow::bail!("{} is not set", config.model.api_key_env)
    }
}

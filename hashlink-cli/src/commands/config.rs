use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use hashlink_pipeline::Settings;
use hashlink_ra::{API_KEY_ENV, api_key_source, load_api_key, mask_key};

/// Show the effective settings and where the API key comes from.
pub(crate) fn run_config_show(settings: &Settings, path: &Path) {
    println!(
        "{}",
        "hashlink Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    println!();

    if path.exists() {
        println!(
            "  Config file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        println!(
            "  Config file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    match load_api_key(settings.api_key.as_deref()) {
        Ok(key) => {
            let source = api_key_source(settings.api_key.as_deref());
            println!(
                "  {:<14} {} {}",
                "api_key",
                mask_key(&key),
                format!("({source})").if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        Err(_) => {
            println!(
                "  {:<14} {} {}",
                "api_key",
                "not set".if_supports_color(Stdout, |t| t.red()),
                format!("(set ${API_KEY_ENV} or api_key in the config file)")
                    .if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
    }
    println!();
    print!("{}", settings.to_display_toml());
}

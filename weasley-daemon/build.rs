//! Build script for weasley-daemon
//!
//! Validates the embedded clock.toml at compile time so a broken default
//! configuration never ships.

use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    validate_config();
}

/// Validate clock.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=clock.toml");

    let config_path = Path::new("clock.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: clock.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The daemon embeds a default clock.toml configuration file.      ║\n\
            ║  Please create one in the weasley-daemon directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read clock.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in clock.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_zones(&config, &mut errors);
    validate_channels(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid clock.toml                                       ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn number(value: Option<&toml::Value>) -> Option<f64> {
    match value {
        Some(toml::Value::Integer(i)) => Some(*i as f64),
        Some(toml::Value::Float(f)) => Some(*f),
        _ => None,
    }
}

/// Validate the [zone.*] tables and the fallback zone
fn validate_zones(config: &toml::Value, errors: &mut Vec<String>) {
    let zones = match config.get("zone") {
        Some(toml::Value::Table(t)) => t,
        _ => {
            errors.push("Missing [zone.*] section - at least one zone is required".into());
            return;
        }
    };

    for (name, zone) in zones {
        let zone = match zone.as_table() {
            Some(t) => t,
            None => {
                errors.push(format!("[zone.{}] must be a table", name));
                continue;
            }
        };

        let angle = number(zone.get("angle"));
        match angle {
            Some(angle) if (0.0..360.0).contains(&angle) => {}
            Some(_) => errors.push(format!("[zone.{}] angle must be in [0, 360)", name)),
            None => errors.push(format!("[zone.{}] missing 'angle'", name)),
        }

        match number(zone.get("theta")) {
            Some(theta) if theta >= 0.0 && angle.unwrap_or(0.0) + theta <= 360.0 => {}
            Some(_) => errors.push(format!(
                "[zone.{}] theta must be >= 0 and end the sector by 360",
                name
            )),
            None => errors.push(format!("[zone.{}] missing 'theta'", name)),
        }

        if let Some(value) = zone.get("near_home") {
            match number(Some(value)) {
                Some(threshold) if threshold >= 0.0 && threshold.is_finite() => {}
                _ => errors.push(format!("[zone.{}] near_home must be >= 0", name)),
            }
        }

        if let Some(toml::Value::String(style)) = zone.get("offset_style") {
            if !["distance", "staggered", "none"].contains(&style.as_str()) {
                errors.push(format!(
                    "[zone.{}] offset_style must be 'distance', 'staggered', or 'none'",
                    name
                ));
            }
        }
    }

    if let Some(shift) = config.get("center_shift") {
        match shift.as_integer() {
            Some(shift) if (-100_000..=100_000).contains(&shift) => {}
            _ => errors.push("center_shift must be an integer within ±100000".into()),
        }
    }

    let fallback = config
        .get("fallback_zone")
        .and_then(|v| v.as_str())
        .unwrap_or("lost");
    if !zones.contains_key(fallback) {
        errors.push(format!("fallback zone '{}' has no [zone.{}] table", fallback, fallback));
    }
}

/// Validate [hands] and [channels]
fn validate_channels(config: &toml::Value, errors: &mut Vec<String>) {
    let mut seen = Vec::new();
    if let Some(channels) = config.get("channels").and_then(|c| c.as_table()) {
        for (hand, channel) in channels {
            match channel.as_integer() {
                Some(c) if (0..16).contains(&c) => {
                    if seen.contains(&c) {
                        errors.push(format!("[channels] channel {} used twice", c));
                    }
                    seen.push(c);
                }
                _ => errors.push(format!("[channels] {} must be a channel 0-15", hand)),
            }
        }
    }

    if let Some(hands) = config.get("hands").and_then(|h| h.as_table()) {
        let mut used = Vec::new();
        for (person, hand) in hands {
            match hand.as_str() {
                Some(h) if used.contains(&h) => {
                    errors.push(format!("[hands] hand '{}' assigned twice", h))
                }
                Some(h) => used.push(h),
                None => errors.push(format!("[hands] {} must be a hand id string", person)),
            }
        }
    }
}

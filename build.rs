use std::fs;

fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

fn main() {
    // Validate default config at compile time
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={}", config_path);

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");

    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {}", e),
    };

    for section in ["colors", "font", "spacing", "list"] {
        if !table.contains_key(section) {
            panic!("default_config.toml is missing the [{}] section", section);
        }
    }

    // Same colour rule the runtime loader enforces
    if let Some(colors) = table.get("colors").and_then(|v| v.as_table()) {
        for (key, value) in colors {
            match value.as_str() {
                Some(color) if is_hex_color(color) => {}
                _ => panic!("default_config.toml: colors.{} must be a #rgb or #rrggbb colour", key),
            }
        }
    }
}

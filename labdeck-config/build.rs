//! Build script for labdeck-config
//!
//! Validates the embedded standards.toml at compile time so a broken
//! catalog never ships.

use std::fs;
use std::path::Path;

/// Sections every catalog must provide as non-empty arrays of tables
const SECTIONS: [&str; 3] = ["pipettes", "tipracks", "microplates"];

fn main() {
    validate_standards();
}

fn validate_standards() {
    println!("cargo:rerun-if-changed=standards.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let path = Path::new("standards.toml");

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read standards.toml                            ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let catalog: toml::Table = match toml::from_str(&content) {
        Ok(table) => table,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in standards.toml                    ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n\
                \n{}\n",
                e
            );
        }
    };

    for section in SECTIONS {
        let entries = match catalog.get(section) {
            Some(toml::Value::Array(entries)) if !entries.is_empty() => entries,
            _ => panic!(
                "\nstandards.toml: missing or empty [[{}]] section\n",
                section
            ),
        };

        let key = if section == "microplates" { "model" } else { "size" };
        for (index, entry) in entries.iter().enumerate() {
            let has_tag = entry
                .get(key)
                .and_then(toml::Value::as_str)
                .is_some_and(|tag| !tag.is_empty());
            if !has_tag {
                panic!(
                    "\nstandards.toml: [[{}]] entry {} has no `{}`\n",
                    section, index, key
                );
            }
        }
    }
}

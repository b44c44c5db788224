//! Generate JSON Schema for the repotree configuration
//!
//! Editors use the schema to validate and complete `config.json`.
//!
//! Usage:
//!   cargo run --features dev-bins --bin generate_schema > config-schema.json

use repotree::config::Config;
use schemars::schema_for;

fn main() {
    let schema = schema_for!(Config);
    let output = serde_json::to_string_pretty(&schema).expect("Failed to serialize schema");
    println!("{}", output);
}

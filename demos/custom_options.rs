//! Customizing SCL input and output with SclOptions.
//!
//! Run with: cargo run --example custom_options

use serde::{Deserialize, Serialize};
use serde_scl::{loads_with_options, scl, to_string_with_options, SclOptions, TypeSpec};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct Config {
    name: String,
    debug: bool,
    servers: Vec<Server>,
    aliases: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Server {
    host: String,
    port: u16,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config {
        name: "MyApp".to_string(),
        debug: true,
        servers: vec![Server {
            host: "localhost".to_string(),
            port: 8080,
        }],
        aliases: vec![],
    };

    println!("Default (4 spaces):");
    println!("{}", serde_scl::to_string(&config)?);

    println!("Two-space indent:");
    let options = SclOptions::new().with_indent(2);
    println!("{}", to_string_with_options(&config, &options)?);

    println!("Empty lists typed as num:");
    let options = SclOptions::new().with_empty_list_type(TypeSpec::Num);
    println!("{}", serde_scl::dumps_with_options(&scl!({"ids": []}), &options)?);

    println!("Multiline dedent on input:");
    let text = "motd :: ml {\n    'Welcome\n        to the\n        server\n    '\n}";
    let options = SclOptions::new().with_dedent_multiline(true);
    let doc = loads_with_options(text, &options)?;
    if let Some(motd) = doc.get("motd").and_then(|v| v.as_str()) {
        println!("{:?}", motd);
    }

    Ok(())
}

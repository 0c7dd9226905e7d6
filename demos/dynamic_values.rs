//! Working with Dynamic values for runtime flexibility.
//!
//! Run with: cargo run --example dynamic_values

use serde::{Deserialize, Serialize};
use serde_scl::{dumps, loads, to_document, to_dynamic, DynMap, Dynamic, SclOptions, Value};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Build a host value by hand
    let config = DynMap::new();
    config.insert("host", Dynamic::from("localhost"));
    config.insert("port", Dynamic::from(8080));
    config.insert(
        "features",
        Dynamic::from(vec![Dynamic::from("auth"), Dynamic::from("logging")]),
    );
    config.insert("debug", Dynamic::from(true));

    let text = dumps(&Dynamic::Map(config.clone()))?;
    println!("Config as SCL:\n{}", text);

    // Handles share storage, so edits show up in later dumps
    config.insert("port", Dynamic::from(9090));
    println!("After edit:\n{}", dumps(&Dynamic::Map(config.clone()))?);

    // Parsed documents are typed
    let doc = loads(&text)?;
    if let Some(Value::Str(host)) = doc.get("host") {
        println!("Accessing field 'host': {}", host);
    }
    if let Some(Value::List(features)) = doc.get("features") {
        println!(
            "Accessing field 'features': {} items of {}\n",
            features.len(),
            features.element_type()
        );
    }

    // Convert an existing struct to a Dynamic, then to a Document
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };
    let user_value = to_dynamic(&user)?;
    println!("User kind: {}", user_value.kind_name());

    let user_doc = to_document(&user_value, &SclOptions::default())?;
    for (name, value) in &user_doc {
        println!("  {} :: {}", name, value.type_spec());
    }

    // A map that contains itself cannot be written
    let looped = DynMap::new();
    looped.insert("me", Dynamic::Map(looped.clone()));
    if let Err(err) = dumps(&Dynamic::Map(looped.clone())) {
        println!("\nCycle rejected: {}", err);
    }
    // break the cycle so the handles can be freed
    looped.insert("me", Dynamic::Null);

    Ok(())
}

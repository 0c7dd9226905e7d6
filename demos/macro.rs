//! Using the scl! macro for dynamic value construction.
//!
//! Run with: cargo run --example macro

use serde_scl::{dumps, infer_type, scl};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("Inferred types:");
    for value in [
        scl!(true),
        scl!(42),
        scl!(2.5),
        scl!("one line"),
        scl!("two\nlines"),
        scl!([1, 2, 3]),
        scl!([[1], []]),
        scl!({"id": 1}),
    ] {
        println!("  {:<10} -> {}", value.kind_name(), infer_type(&value)?);
    }
    println!();

    let config = scl!({
        "app": {
            "name": "MyApp",
            "version": "1.0.0"
        },
        "database": {
            "host": "localhost",
            "port": 5432,
            "name": "mydb"
        },
        "features": ["auth", "logging", "metrics"],
        "debug": true
    });

    println!("Nested structures:");
    println!("{}", dumps(&config)?);

    let items = vec![
        scl!({"id": 1, "status": "active"}),
        scl!({"id": 2, "status": "pending"}),
        scl!({"id": 3, "status": "completed"}),
    ];
    let summary = scl!({
        "total": 3,
        "items": items
    });

    println!("Dynamic construction:");
    println!("{}", dumps(&summary)?);

    if let Some(app) = config.as_map().and_then(|root| root.get("app")) {
        if let Some(name) = app.as_map().and_then(|app| app.get("name")) {
            println!("Accessing values:");
            println!("  App name: {}", name.as_str().unwrap_or_default());
        }
    }

    let mixed = scl!({"values": [1, "two", true, null]});
    match dumps(&mixed) {
        Ok(text) => println!("{}", text),
        Err(err) => println!("  Mixed list rejected: {}", err),
    }

    let nothing = scl!({"value": null});
    if let Err(err) = dumps(&nothing) {
        println!("  Null rejected: {}", err);
    }

    Ok(())
}

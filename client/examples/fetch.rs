use std::process::exit;

use jsonclient::{Client, ClientError, Result};
use serde_json::{json, Value};

fn main() -> Result<()> {
    // Expect the URL to GET as the first argument,
    // an optional URL to POST to second and an optional token third
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <get_url> [post_url] [token]", args[0]);
        exit(1);
    }

    // Package-level helper backed by the shared default client
    match jsonclient::fetch_json::<Value>(&args[1]) {
        Ok(value) => println!("GET {} -> {}", args[1], value),
        Err(ClientError::Response(err)) => {
            println!("GET {} failed with status {}", args[1], err.status_code());
            println!("  Body: {}", err.body());
        }
        Err(err) => return Err(err),
    }

    if let Some(post_url) = args.get(2) {
        let mut client = Client::new().with_indent("  ");
        if let Some(token) = args.get(3) {
            client = client.with_authorization_header(format!("Bearer {}", token));
        }

        let reply: Value = client.send_json(post_url, &json!({"hello": "world"}))?;
        println!("POST {} -> {}", post_url, reply);
    }

    Ok(())
}

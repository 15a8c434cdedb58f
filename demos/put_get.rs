use std::time::Duration;

use nettable::{Client, ClientConfig, Entry, Error};
use tracing::Level;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    // Usage: put_get [host] [table] [key] [value]
    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let table_name = args.next().unwrap_or_else(|| "SmartDashboard".to_string());
    let key = args.next().unwrap_or_else(|| "counter".to_string());
    let value: i32 = args.next().and_then(|v| v.parse().ok()).unwrap_or(1);

    let config = ClientConfig {
        put_timeout: Some(Duration::from_secs(5)),
        ..Default::default()
    };

    let client = match Client::connect_with(&host, config).await {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Connection error: {}", e);
            return;
        }
    };

    let table = match client.table(&table_name) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Table error: {}", e);
            return;
        }
    };

    println!("Putting {}/{} = {}", table_name, key, value);
    match table.put(&key, Entry::Int(value)).await {
        Ok(()) => println!("Confirmed by server"),
        Err(Error::Denied) => println!("Server changed the value first"),
        Err(e) => eprintln!("Put error: {}", e),
    }

    match table.get(&key) {
        Some(entry) => println!("{}/{} is now {}", table_name, key, entry),
        None => println!("{}/{} has no value", table_name, key),
    }

    if let Err(e) = client.close().await {
        eprintln!("Close error: {}", e);
    }
    println!("\nDone");
}

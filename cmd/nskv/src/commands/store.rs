//! Key-value commands.

use nskv_storage::Storage;
use serde_json::Value;

use super::{parse_value, print_success, render};
use crate::Commands;

/// Runs a command against a store and returns what should be printed.
pub fn execute<S: Storage>(store: &S, command: &Commands, as_json: bool) -> anyhow::Result<String> {
    match command {
        Commands::Get { key } => {
            let value: Value = store.get(key.as_str())?;
            render(&value, as_json)
        }
        Commands::Set { key, value } => {
            store.set(key.as_str(), &parse_value(value))?;
            print_success(&format!("set {}", key));
            Ok(String::new())
        }
        Commands::Rm { key } => {
            store.remove(key.as_str())?;
            print_success(&format!("removed {}", key));
            Ok(String::new())
        }
        Commands::Keys => {
            let keys: Vec<String> = store.keys()?.into_iter().collect();
            render(&keys, as_json)
        }
        Commands::Count => {
            let n = store.len()?;
            if as_json {
                render(&serde_json::json!({ "count": n }), true)
            } else {
                Ok(format!("{}\n", n))
            }
        }
    }
}

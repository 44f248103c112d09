//! CLI commands module.

mod store;
mod util;

pub use store::execute;
pub(crate) use util::*;

use nskv_storage::StoragePlugin;

use crate::Cli;

/// Open the configured namespace and run the selected command.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let plugin = open_plugin(cli)?;
    print_verbose(cli, &format!("Using codec: {:?}", plugin.codec()));
    print_verbose(cli, &format!("Namespace: {}", cli.namespace));

    let store = plugin.open(&cli.namespace)?;
    let output = execute(&store, &cli.command, cli.json)?;
    if !output.is_empty() {
        print!("{}", output);
    }
    Ok(())
}

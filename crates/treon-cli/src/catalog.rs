//! `catalog` command handlers.

use clap::Subcommand;
use treon_store::FileStore;

/// Sub-commands available under `catalog`.
#[derive(Debug, Subcommand)]
pub enum CatalogCommands {
    /// Count products that can be shown on the kiosk
    Count,
}

/// # Errors
///
/// Returns an error if no catalog is configured.
pub(crate) fn run(store: &FileStore, command: CatalogCommands) -> anyhow::Result<()> {
    let catalog = store
        .catalog()
        .ok_or_else(|| anyhow::anyhow!("no catalog configured; set TREON_CATALOG_PATH"))?;

    match command {
        CatalogCommands::Count => {
            let listable = catalog.valid_product_count();
            println!(
                "{listable} listable products ({} skipped)",
                catalog.products.len() - listable
            );
        }
    }

    Ok(())
}

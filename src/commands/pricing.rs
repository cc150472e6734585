use crate::cli::{non_empty_path, PricingArgs};
use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Color, ContentArrangement, Table};
use plarix::pricing::{load_catalog, PricingCatalog, PricingFile};
use std::path::Path;

/// Execute the pricing command
pub fn execute(args: PricingArgs) -> Result<()> {
    let catalog = load_catalog(non_empty_path(&args.pricing))?;

    if let Some(path) = non_empty_path(&args.write) {
        write_catalog(&catalog, path)?;
        println!(
            "{} {} models to {}",
            "Wrote".green(),
            catalog.len(),
            path.display()
        );
        return Ok(());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&PricingFile::from(&catalog))?);
        return Ok(());
    }

    let updated = if catalog.last_updated().trim().is_empty() {
        "unknown"
    } else {
        catalog.last_updated()
    };
    println!(
        "{} (last updated: {})",
        "Pricing catalog".bold(),
        updated.cyan()
    );
    for source in catalog.sources() {
        println!("  {}", source.dimmed());
    }
    println!();
    println!("{}", build_table(&catalog));

    Ok(())
}

/// Regenerate a pricing document from an already validated catalog
fn write_catalog(catalog: &PricingCatalog, path: &Path) -> Result<()> {
    let mut json = serde_json::to_string_pretty(&PricingFile::from(catalog))?;
    json.push('\n');
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write pricing to {}", path.display()))?;
    tracing::info!("Wrote {} price entries to {}", catalog.len(), path.display());
    Ok(())
}

fn build_table(catalog: &PricingCatalog) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("PROVIDER").fg(Color::Cyan),
        Cell::new("MODEL").fg(Color::Cyan),
        Cell::new("INPUT $/1M").fg(Color::Cyan),
        Cell::new("OUTPUT $/1M").fg(Color::Cyan),
    ]);

    for entry in catalog.entries() {
        table.add_row(vec![
            Cell::new(&entry.provider),
            Cell::new(&entry.model),
            Cell::new(entry.input_price_per_million)
                .set_alignment(CellAlignment::Right),
            Cell::new(entry.output_price_per_million)
                .set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use plarix::pricing::embedded_catalog;

    #[test]
    fn test_table_has_row_per_entry() {
        let catalog = embedded_catalog().unwrap();
        let table = build_table(&catalog);
        assert_eq!(table.row_iter().count(), catalog.len());
        assert!(table.to_string().contains("gpt-4o-mini"));
    }

    #[test]
    fn test_written_catalog_loads_back() {
        let catalog = embedded_catalog().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricing.json");

        write_catalog(&catalog, &path).unwrap();
        let reloaded = load_catalog(Some(path.as_path())).unwrap();

        assert_eq!(reloaded.len(), catalog.len());
        assert_eq!(reloaded.last_updated(), catalog.last_updated());
        assert_eq!(reloaded.entries(), catalog.entries());
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let catalog = embedded_catalog().unwrap();
        let result = write_catalog(&catalog, Path::new("/nonexistent/dir/pricing.json"));
        assert!(result.is_err());
    }
}

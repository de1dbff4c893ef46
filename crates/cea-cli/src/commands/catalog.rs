use anyhow::Result;
use cea_cli::cli::CatalogCommands;
use cea_io::importers::load_line_catalog;

pub fn handle(command: &CatalogCommands) -> Result<()> {
    match command {
        CatalogCommands::Validate { catalog } => {
            let types = load_line_catalog(catalog)?;
            println!("Catalog {} is valid ({} types)", catalog.display(), types.len());
            for line in types.iter() {
                println!(
                    "  {:>2}  {:<16} {:>7.1} A  {:>8.2} CHF/m  {:>3} yr  {:.4} Ω/km",
                    line.index,
                    line.name,
                    line.current_rating.value(),
                    line.price_per_m,
                    line.lifetime_years,
                    line.resistance_ohm_per_km
                );
            }
            Ok(())
        }
    }
}

//! Show command - display a catalog profile

use console::style;
use profilectl_repo::{CatalogRef, ProfileDescription, Settings};

use crate::commands::{self, OutputFormat};
use crate::error::{CliError, Result};

pub fn run(reference: &str, catalog_url: Option<&str>, output: OutputFormat) -> Result<()> {
    let reference: CatalogRef = reference.parse()?;
    let settings = Settings::load()?;
    let client = commands::catalog_client(catalog_url, &settings)?;
    let profile = commands::runtime()?.block_on(client.show_ref(&reference))?;

    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&profile)
                .map_err(|e| CliError::internal(e.to_string()))?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&profile)
                .map_err(|e| CliError::internal(e.to_string()))?;
            print!("{}", yaml);
        }
        OutputFormat::Table => print_profile(&profile),
    }
    Ok(())
}

fn print_profile(profile: &ProfileDescription) {
    println!("{}", style(&profile.name).cyan().bold());
    println!("{}", style("=".repeat(profile.name.len())).dim());
    println!();

    println!("{}: {}", style("Catalog").bold(), profile.catalog);
    println!("{}: {}", style("Version").bold(), profile.version);
    if !profile.description.is_empty() {
        println!("{}: {}", style("Description").bold(), profile.description);
    }
    println!("{}: {}", style("URL").bold(), profile.url);
    if !profile.maintainer.is_empty() {
        println!("{}: {}", style("Maintainer").bold(), profile.maintainer);
    }

    if !profile.prerequisites.is_empty() {
        println!();
        println!("{}:", style("Prerequisites").bold());
        for prerequisite in &profile.prerequisites {
            println!("  - {}", prerequisite);
        }
    }
}

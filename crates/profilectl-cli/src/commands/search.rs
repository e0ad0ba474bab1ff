//! Search command

use console::style;
use profilectl_repo::{ProfileDescription, Settings};

use crate::commands::{self, OutputFormat};
use crate::error::{CliError, Result};

/// Search the catalog for profiles by name
pub fn run(query: &str, catalog_url: Option<&str>, output: OutputFormat) -> Result<()> {
    let settings = Settings::load()?;
    let client = commands::catalog_client(catalog_url, &settings)?;
    let profiles = commands::runtime()?.block_on(client.search(query))?;

    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&profiles)
                .map_err(|e| CliError::internal(e.to_string()))?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&profiles)
                .map_err(|e| CliError::internal(e.to_string()))?;
            print!("{}", yaml);
        }
        OutputFormat::Table if profiles.is_empty() => {
            println!("No profiles found matching '{}'", query);
        }
        OutputFormat::Table => print_table(&profiles),
    }
    Ok(())
}

fn print_table(profiles: &[ProfileDescription]) {
    println!(
        "{}",
        style(format!(
            "{:<40} {:<12} {}",
            "CATALOG/PROFILE", "VERSION", "DESCRIPTION"
        ))
        .bold()
    );
    println!("{}", "-".repeat(90));

    for profile in profiles {
        let desc = profile.description.chars().take(40).collect::<String>();
        println!(
            "{:<40} {:<12} {}",
            format!("{}/{}", profile.catalog, profile.name),
            profile.version,
            desc
        );
    }
}

//! Rules command implementation

use super::project_config;
use crate::models::Category;
use crate::rules::{Rule, RuleCatalog};

use anyhow::Result;
use console::style;
use std::path::Path;
use std::process::ExitCode;

pub(super) fn run(path: &Path, format: &str) -> Result<ExitCode> {
    let config = project_config(path)?;
    let catalog = RuleCatalog::from_config(&config.rules)?;

    if format == "json" {
        let rules: Vec<&Rule> = catalog.iter().collect();
        println!("{}", serde_json::to_string_pretty(&rules)?);
    } else {
        print!("{}", render_text(&catalog));
    }
    Ok(ExitCode::SUCCESS)
}

fn render_text(catalog: &RuleCatalog) -> String {
    let mut out = String::new();
    for category in Category::ALL {
        let rules: Vec<&Rule> = catalog.for_category(category).collect();
        out.push_str(&format!(
            "\n{} ({})\n",
            style(category.title().to_uppercase()).bold(),
            rules.len()
        ));
        for rule in rules {
            out.push_str(&format!(
                "  {:<30} {:<9} {:<14} {}\n",
                rule.name,
                rule.severity.to_string(),
                rule.role.to_string(),
                style(&rule.description).dim()
            ));
        }
    }
    out
}

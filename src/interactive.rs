use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};

use crate::settings::Settings;

/// Conversational configuration: prompts for the same values the CLI flags
/// cover, with defaults. Returns None when the user declines the final
/// confirmation.
pub fn prompt() -> anyhow::Result<Option<Settings>> {
    let theme = ColorfulTheme::default();
    let mut settings = Settings::default();

    println!("Interactive job search");

    let roles: String = Input::with_theme(&theme)
        .with_prompt("Job roles (comma-separated)")
        .default(settings.job_roles.join(", "))
        .interact_text()?;
    settings.job_roles = split_list(&roles);

    println!("Available countries: {}", settings.countries.join(", "));
    let countries: String = Input::with_theme(&theme)
        .with_prompt("Countries (comma-separated, or 'all')")
        .default("all".to_string())
        .interact_text()?;
    if !countries.trim().is_empty() && !countries.trim().eq_ignore_ascii_case("all") {
        settings.countries = split_list(&countries.to_lowercase());
    }

    let all_sites = settings.enabled_sites();
    println!("Available sites: {}", all_sites.join(", "));
    let excluded: String = Input::with_theme(&theme)
        .with_prompt("Sites to exclude (comma-separated, empty for none)")
        .allow_empty(true)
        .interact_text()?;
    settings.job_sites.disabled = split_list(&excluded.to_lowercase());

    let results: u32 = Input::with_theme(&theme)
        .with_prompt("Results per site")
        .default(settings.search_params.results_per_site)
        .interact_text()?;
    settings.search_params.results_per_site = results;

    settings.filters.visa_sponsorship_filter = Confirm::with_theme(&theme)
        .with_prompt("Enable visa sponsorship filter?")
        .default(true)
        .interact()?;

    let days: u32 = Input::with_theme(&theme)
        .with_prompt("Max job age in days")
        .default(7)
        .interact_text()?;
    settings.search_params.hours_old = days * 24;

    println!();
    println!("Configuration:");
    println!("  Roles: {}", settings.job_roles.join(", "));
    println!("  Countries: {}", settings.countries.join(", "));
    println!(
        "  Excluded sites: {}",
        if settings.job_sites.disabled.is_empty() {
            "none".to_string()
        } else {
            settings.job_sites.disabled.join(", ")
        }
    );
    println!(
        "  Results per site: {}",
        settings.search_params.results_per_site
    );
    println!(
        "  Visa filter: {}",
        if settings.filters.visa_sponsorship_filter {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!("  Max age: {days} days");

    let proceed = Confirm::with_theme(&theme)
        .with_prompt("Proceed?")
        .default(true)
        .interact()?;
    if !proceed {
        println!("Cancelled.");
        return Ok(None);
    }

    Ok(Some(settings))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

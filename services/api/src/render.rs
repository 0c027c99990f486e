use crate::infra::load_lookup;
use clap::Args;
use std::path::PathBuf;
use vastrabo::config::AppConfig;
use vastrabo::error::AppError;
use vastrabo::kommun::guidance::{APPLICATION_CHECKLIST, SEARCH_STEPS};
use vastrabo::kommun::{KommunLookup, KommunProfile, LookupError, NormalizedName, PortalLinks};
use vastrabo::telemetry::{self, LogTarget};

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    /// Emit JSON instead of a text table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ShowArgs {
    /// Municipality name or slug, e.g. "Göteborg" or "lilla-edet"
    pub(crate) name: String,
    /// Emit the profile as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct NormalizeArgs {
    /// Any place name; it does not have to be in the catalog
    pub(crate) name: String,
}

fn prepare(catalog_dir: Option<PathBuf>) -> Result<KommunLookup, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogTarget::Stderr)?;
    load_lookup(&config, catalog_dir)
}

pub(crate) fn run_list(args: ListArgs, catalog_dir: Option<PathBuf>) -> Result<(), AppError> {
    let lookup = prepare(catalog_dir)?;
    let summaries = lookup.summaries();

    if args.json {
        return print_json(&summaries);
    }

    println!(
        "Kommuner i Västra Götaland (catalog revision {})",
        lookup.catalog().revision()
    );
    for summary in &summaries {
        println!(
            "- {:<14} {:>4} km  {}",
            summary.name, summary.distance_km, summary.official_name
        );
    }

    println!("\nSå gör du");
    for (index, step) in SEARCH_STEPS.iter().enumerate() {
        println!("{}. {}", index + 1, step);
    }

    Ok(())
}

pub(crate) fn run_show(args: ShowArgs, catalog_dir: Option<PathBuf>) -> Result<(), AppError> {
    let lookup = prepare(catalog_dir)?;
    let profile = lookup
        .profile(&args.name)?
        .ok_or_else(|| LookupError::UnknownMunicipality(args.name.clone()))?;

    if args.json {
        print_json(&profile)?;
    } else {
        render_profile(&profile);
    }

    Ok(())
}

pub(crate) fn run_normalize(
    args: NormalizeArgs,
    catalog_dir: Option<PathBuf>,
) -> Result<(), AppError> {
    let lookup = prepare(catalog_dir)?;
    let normalized = NormalizedName::of(&args.name);
    let on_boplats = lookup
        .catalog()
        .find(&args.name)
        .map(|municipality| municipality.boplats)
        .unwrap_or(false);
    let links = PortalLinks::build(lookup.templates(), &args.name, on_boplats);

    println!("Name:             {}", normalized.name);
    println!("Slug:             {}", normalized.slug);
    println!("Genitive suffix:  {:?}", normalized.genitive_suffix);
    println!("Official name:    {}", normalized.official_name);
    println!("HomeQ fragment:   {}", normalized.homeq_query);
    println!("Qasa search area: {}", normalized.qasa_search_area);
    println!("Search term:      {}", normalized.search_term);
    println!();
    render_links(&links);

    Ok(())
}

fn render_profile(profile: &KommunProfile) {
    println!("{} ({})", profile.name, profile.official_name);

    println!("\nHyresvärdar");
    if !profile.municipal_landlords.is_empty() {
        println!("Kommunala:");
        for landlord in &profile.municipal_landlords {
            println!("- {} <{}>", landlord.name, landlord.url);
        }
    }
    if !profile.private_landlords.is_empty() {
        println!("Privata (exempel):");
        for landlord in &profile.private_landlords {
            println!("- {} <{}>", landlord.name, landlord.url);
        }
    }
    if let Some(search) = &profile.private_landlord_search {
        println!("Sök privata hyresvärdar på Google: {search}");
    }

    println!("\nSök lediga annonser");
    render_links(&profile.portals);
    if let Some(note) = profile.boplats_note {
        println!("{note}");
    }
    println!(
        "Sökningarna ovan är satta på {} (HomeQ/Qasa).",
        profile.official_name
    );

    println!("\nQasa – säkerhetsråd");
    for advice in profile.qasa_safety_advice {
        println!("- {advice}");
    }

    println!("\nKarta & läge");
    println!("Avstånd till Göteborg C: {}", profile.distance_label);
    if let Some(commute) = &profile.commute {
        println!("Restid (ungefär): {commute}");
    }
    println!(
        "Koordinater: {:.2}, {:.2}",
        profile.coordinates.lat, profile.coordinates.lon
    );

    println!("\nVad du behöver (oftast)");
    for item in APPLICATION_CHECKLIST {
        println!("- {item}");
    }
}

fn render_links(links: &PortalLinks) {
    match &links.homeq {
        Some(homeq) => println!("HomeQ:   {homeq}"),
        None => println!("HomeQ:   (ingen länk, namnet saknar bokstäver)"),
    }
    if let Some(boplats) = &links.boplats {
        println!("Boplats: {boplats}");
    }
    println!("Qasa:    {}", links.qasa);
    println!("Vägbeskrivning: {}", links.directions);
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

use anyhow::{Context, bail};
use atmo_core::{
    Config, FavoritesStore, Lookup, LookupError, WeatherLookup, provider::geocoding::search_name,
};
use clap::{Parser, Subcommand};
use inquire::{CustomType, CustomUserError, Text, validator::Validation};
use tokio::task::JoinSet;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "atmo", version, about = "Weather viewer")]
pub struct Cli {
    /// Log requests and responses to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show weather for one or more cities.
    Show {
        /// City names; defaults to the configured city.
        cities: Vec<String>,

        /// Also show every favorite city.
        #[arg(long)]
        favorites: bool,

        /// Print snapshots as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Manage favorite cities.
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Interactively set the default city, language and timeout.
    Configure,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    List,
    /// Resolve a city and store its canonical name.
    Add { city: String },
    Remove { city: String },
    Clear,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Show {
                cities,
                favorites,
                json,
            } => {
                let store = FavoritesStore::open(config.favorites_file_path()?)?;
                let cities = requested_cities(&config, &store, cities, favorites)?;
                let lookup = WeatherLookup::from_config(&config)?;
                show(&lookup, &store, cities, json).await
            }
            Command::Favorites { action } => {
                let mut store = FavoritesStore::open(config.favorites_file_path()?)?;
                manage_favorites(&config, &mut store, action).await
            }
            Command::Configure => configure(config),
        }
    }
}

/// Trimmed city names to look up, in the order given.
fn requested_cities(
    config: &Config,
    store: &FavoritesStore,
    cities: Vec<String>,
    include_favorites: bool,
) -> anyhow::Result<Vec<String>> {
    let mut out = Vec::with_capacity(cities.len());
    for city in cities {
        let city = city.trim();
        if city.is_empty() {
            bail!("City name must not be empty");
        }
        out.push(city.to_string());
    }

    // Favorites hold canonical names; search again by the bare place name.
    if include_favorites {
        out.extend(store.list().iter().map(|f| search_name(f).to_string()));
    }

    if out.is_empty() {
        out.push(config.startup_city().to_string());
    }

    Ok(out)
}

/// Look every city up on its own task and print results in request order.
async fn show(
    lookup: &WeatherLookup,
    store: &FavoritesStore,
    cities: Vec<String>,
    json: bool,
) -> anyhow::Result<()> {
    let mut tasks = JoinSet::new();
    for (idx, city) in cities.iter().enumerate() {
        let lookup = lookup.clone();
        let city = city.clone();
        tasks.spawn(async move { (idx, lookup.lookup(&city).await) });
    }

    let mut results: Vec<Option<Result<Lookup, LookupError>>> =
        std::iter::repeat_with(|| None).take(cities.len()).collect();
    while let Some(joined) = tasks.join_next().await {
        let (idx, result) = joined.context("Lookup task panicked")?;
        results[idx] = Some(result);
    }

    let mut failures = 0;
    let mut json_out = Vec::new();

    for (city, result) in cities.iter().zip(results) {
        let Some(result) = result else { continue };

        if json {
            json_out.push(render::lookup_json(city, &result));
            failures += usize::from(result.is_err());
            continue;
        }

        match result {
            Ok(Lookup::Found(snapshot)) => {
                let favorite = store.is_favorite(&snapshot.city_display_name);
                println!("{}", render::snapshot_text(&snapshot, favorite));
            }
            Ok(Lookup::NotFound { query }) => {
                print!("{}", render::not_found_text(&query));
            }
            Err(err) => {
                tracing::error!("Lookup for '{}' failed: {:?}", city, err);
                eprintln!("Nie udało się pobrać pogody dla {city}: {err}");
                failures += 1;
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&json_out)?);
    }

    if failures > 0 {
        bail!("{failures} of {} lookups failed", cities.len());
    }
    Ok(())
}

async fn manage_favorites(
    config: &Config,
    store: &mut FavoritesStore,
    action: FavoritesAction,
) -> anyhow::Result<()> {
    match action {
        FavoritesAction::List => {
            if store.list().is_empty() {
                println!("No favorites yet. Add one with `atmo favorites add <city>`.");
            }
            for city in store.list() {
                println!("{city}");
            }
        }
        FavoritesAction::Add { city } => {
            let lookup = WeatherLookup::from_config(config)?;
            let Some(name) = lookup.canonical_name(city.trim()).await? else {
                bail!("{}: {}", render::NOT_FOUND, city.trim());
            };

            if store.add(&name)? {
                println!("Added {name} to favorites.");
            } else {
                println!("{name} is already a favorite.");
            }
        }
        FavoritesAction::Remove { city } => {
            let mut removed = store.remove(&city)?;

            // Accept the name as typed as well as its canonical form.
            if !removed {
                let lookup = WeatherLookup::from_config(config)?;
                if let Some(name) = lookup.canonical_name(city.trim()).await? {
                    removed = store.remove(&name)?;
                }
            }

            if removed {
                println!("Removed {} from favorites.", city.trim());
            } else {
                println!("{} is not a favorite.", city.trim());
            }
        }
        FavoritesAction::Clear => {
            store.clear()?;
            println!("Favorites cleared.");
        }
    }

    Ok(())
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let city = Text::new("Default city:")
        .with_default(config.startup_city())
        .prompt()?;
    config.default_city = Some(city.trim().to_string()).filter(|c| !c.is_empty());

    config.language = Text::new("Geocoding language (e.g. pl, en):")
        .with_default(&config.language)
        .prompt()?
        .trim()
        .to_string();

    config.timeout_secs = CustomType::<u64>::new("Request timeout in seconds:")
        .with_default(config.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .with_validator(validate_timeout)
        .prompt()?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn validate_timeout(secs: &u64) -> Result<Validation, CustomUserError> {
    if *secs == 0 {
        Ok(Validation::Invalid("Timeout must be at least 1 second".into()))
    } else {
        Ok(Validation::Valid)
    }
}

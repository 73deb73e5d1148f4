use anyhow::Context;
use base64::Engine as _;
use chrono::Utc;
use clap::{Parser, Subcommand};
use safe_meal::advisor::{AllergyType, MealQuery, MealType, RestaurantQuery};
use safe_meal::config::Settings;
use safe_meal::mapping::{self, MapTarget};
use safe_meal::server::{self, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Safe Meal: allergy-safe meals and restaurants for pilgrims in Makkah.
///
/// Examples:
///   safe-meal resolve "Al Baik"
///   safe-meal search الطازج
///   safe-meal restaurants --allergy gluten --allergy nut --area "حي العزيزية"
///   safe-meal analyze --name "كبسة دجاج" --allergy sesame
///   safe-meal analyze --image meal.jpg --allergy lactose
///   safe-meal serve --port 3000
#[derive(Parser)]
#[command(name = "safe-meal", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every known restaurant.
    Locations,

    /// Find where a restaurant name points on the map.
    Resolve {
        /// Restaurant name, in any spelling.
        name: String,
    },

    /// Suggestions for a partially typed restaurant name.
    Search {
        term: String,
    },

    /// Ask for restaurants that suit your allergies.
    Restaurants {
        /// Allergy (gluten, peanut, lactose, nut, egg, fish, sesame, shellfish). Repeatable.
        #[arg(long = "allergy", short = 'a', required = true, value_parser = parse_allergy)]
        allergies: Vec<AllergyType>,

        /// District, e.g. "المنطقة المركزية" or "حي العزيزية". Defaults to all of Makkah.
        #[arg(long)]
        area: Option<String>,

        /// breakfast, lunch or dinner. Defaults to the current time in Makkah.
        #[arg(long, value_parser = parse_meal)]
        meal: Option<MealType>,
    },

    /// Check whether a meal is safe for your allergies.
    Analyze {
        /// Meal name.
        #[arg(long)]
        name: Option<String>,

        /// JPEG photo of the meal.
        #[arg(long)]
        image: Option<PathBuf>,

        #[arg(long = "allergy", short = 'a', required = true, value_parser = parse_allergy)]
        allergies: Vec<AllergyType>,
    },

    /// Run the JSON API server.
    Serve {
        #[arg(long, env = "SAFE_MEAL_HOST", default_value = "127.0.0.1")]
        host: String,

        #[arg(long, env = "SAFE_MEAL_PORT", default_value_t = 3000)]
        port: u16,
    },
}

fn parse_allergy(s: &str) -> Result<AllergyType, String> {
    s.parse()
}

fn parse_meal(s: &str) -> Result<MealType, String> {
    s.parse()
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "safe_meal=info,tower_http=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let registry = cli
        .settings
        .load_registry()
        .context("restaurant registry is invalid")?;

    match cli.command {
        Command::Locations => {
            for e in registry.all() {
                eprintln!("  {} {}  \u{2014}  {}", "\u{1F4CD}", e.name, e.category);
            }
            print_json(registry.all())?;
        }

        Command::Resolve { name } => {
            let Some(target) = mapping::target_for(&registry, &name) else {
                anyhow::bail!("restaurant name must not be blank");
            };
            print_target_banner(&target);
            print_json(&target)?;
        }

        Command::Search { term } => {
            let hits = registry.search(&term);
            if hits.is_empty() {
                eprintln!("  No suggestions for '{}'.", term);
            }
            print_json(&hits)?;
        }

        Command::Restaurants { allergies, area, meal } => {
            let advisor = cli.settings.build_advisor()?;
            let query = RestaurantQuery {
                allergies,
                area,
                meal_type: Some(meal.unwrap_or_else(|| MealType::for_makkah_time(Utc::now()))),
            };
            let recommendation = tokio::task::spawn_blocking(move || {
                advisor.recommend(&registry, &query)
            })
            .await??;

            eprintln!("  {}", recommendation.greeting);
            for r in &recommendation.restaurants {
                eprintln!("  \u{1F37D}\u{FE0F}  {} \u{2014} {}", r.restaurant.name, r.restaurant.location);
                print_target_banner(&r.map_target);
            }
            print_json(&recommendation)?;
        }

        Command::Analyze { name, image, allergies } => {
            let advisor = cli.settings.build_advisor()?;
            let image = match image {
                Some(path) => {
                    let bytes = std::fs::read(&path)
                        .with_context(|| format!("cannot read image {}", path.display()))?;
                    Some(base64::engine::general_purpose::STANDARD.encode(bytes))
                }
                None => None,
            };
            let query = MealQuery {
                meal_name: name.unwrap_or_default(),
                allergies,
                image,
            };
            let analysis = tokio::task::spawn_blocking(move || advisor.analyze_meal(&query)).await??;
            eprintln!("  Verdict: {}  {}", analysis.safety_status, analysis.explanation);
            print_json(&analysis)?;
        }

        Command::Serve { host, port } => {
            let advisor = match cli.settings.build_advisor() {
                Ok(a) => Some(Arc::new(a)),
                Err(e) => {
                    tracing::warn!("AI routes disabled: {}", e);
                    None
                }
            };
            let state = AppState { registry: Arc::new(registry), advisor };
            server::start(state, &host, port).await?;
        }
    }

    Ok(())
}

fn print_target_banner(target: &MapTarget) {
    match target {
        MapTarget::Registry { popup, tier, center, .. } => {
            eprintln!("     \u{1F4CD} {}  ({})", popup, tier);
            eprintln!("     \u{1F4D0} {}", center);
        }
        MapTarget::ExternalSearch { url, .. } => {
            eprintln!("     Not in the local list \u{2014} search: {}", url);
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

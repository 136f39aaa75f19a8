use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use recipe_oracle::catalog::{Catalog, Difficulty, Ingredient, IngredientCategory, Recipe};
use recipe_oracle::config::{Config, ConfigOverrides};
use recipe_oracle::detection::{
    detect_batch, DetectionResult, IngredientDetector, SimulatedDetector,
};
use recipe_oracle::matching::{MatchStrategy, ScoredRecipe};
use recipe_oracle::output::csv::{
    categories_to_csv, ingredients_to_csv, list_to_csv, recipes_to_csv, scored_to_csv,
};
use recipe_oracle::output::render_json;
use recipe_oracle::output::table::{
    render_categories_table, render_detection_table, render_ingredients_table, render_list_table,
    render_recipe_detail, render_recipes_table, render_scored_table,
};
use recipe_oracle::search::{
    find_matching_recipes, search_by_query, sort_recipes, SearchFilters, SortKey,
};
use recipe_oracle::server::run_server;
use recipe_oracle::session::SessionState;
use recipe_oracle::store::UserStore;
use recipe_oracle::suggest::suggest;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "recipe-oracle",
    about = "Find recipes you can cook with what you have"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    /// weighted or loose
    #[arg(short, long)]
    strategy: Option<String>,
    /// Seed for substitution confidences and simulated detection.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    db: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args, Clone, Default)]
struct FilterArgs {
    /// Comma-separated: easy,medium,hard
    #[arg(long)]
    difficulty: Option<String>,
    /// Maximum prep + cook minutes.
    #[arg(long = "max-time")]
    max_time: Option<u32>,
    #[arg(long)]
    dietary: Option<String>,
    #[arg(long)]
    cuisine: Option<String>,
    #[arg(long = "min-score")]
    min_score: Option<u8>,
}

impl FilterArgs {
    fn to_filters(&self) -> Result<SearchFilters> {
        let difficulty = self
            .difficulty
            .as_deref()
            .map(|raw| {
                split_list(raw)
                    .iter()
                    .map(|d| Difficulty::from_str(d))
                    .collect::<std::result::Result<Vec<_>, _>>()
            })
            .transpose()?;
        Ok(SearchFilters {
            difficulty,
            cook_time: self.max_time,
            dietary: self.dietary.as_deref().map(split_list),
            cuisine: self.cuisine.as_deref().map(split_list),
            min_match_score: self.min_score,
        })
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Autocomplete an ingredient name.
    Suggest {
        query: String,
        #[arg(long)]
        selected: Option<String>,
    },
    /// Rank recipes against comma-separated ingredients.
    Match {
        ingredients: String,
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value = "match")]
        sort: String,
    },
    /// Free-text recipe search.
    Search {
        query: String,
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        sort: Option<String>,
    },
    Show {
        id: String,
    },
    Popular,
    /// Recipes carrying a tag, e.g. vegan.
    Category {
        tag: String,
    },
    /// Ingredient categories with counts.
    Categories,
    Ingredients {
        #[arg(long)]
        category: Option<String>,
    },
    /// Simulated ingredient detection from one or more image files.
    Detect {
        #[arg(required = true)]
        images: Vec<PathBuf>,
        /// Rank recipes against the detected ingredients.
        #[arg(long = "match")]
        then_match: bool,
        #[arg(long)]
        no_delay: bool,
    },
    /// Confidence that typed names are real ingredients.
    Validate {
        names: String,
    },
    /// Acceptable stand-ins for an ingredient.
    Substitutes {
        ingredient: String,
    },
    Favorites {
        #[arg(long)]
        add: Option<String>,
        #[arg(long)]
        remove: Option<String>,
        #[arg(long)]
        toggle: Option<String>,
    },
    Recent {
        #[arg(long)]
        clear: bool,
    },
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        strategy: cli
            .strategy
            .as_deref()
            .map(MatchStrategy::from_str)
            .transpose()?,
        db_path: cli.db.clone(),
    });

    if matches!(cli.command, Commands::Config { .. }) {
        return handle_config_command(&cli.command, &config, &config_path);
    }
    if let Commands::Serve { host, port } = &cli.command {
        let addr = config.server.bind_address(host.as_deref(), *port)?;
        return run_server(config, addr, cli.seed).await;
    }

    let catalog = Catalog::builtin();
    let mut rng = cli
        .seed
        .map(StdRng::seed_from_u64)
        .unwrap_or_else(StdRng::from_entropy);

    match &cli.command {
        Commands::Suggest { query, selected } => {
            let selected = selected.as_deref().map(split_list).unwrap_or_default();
            let names = suggest(catalog, query, &selected, &config.suggest_options());
            print_list("Suggestion", &names, cli.output)?;
        }
        Commands::Match {
            ingredients,
            filters,
            sort,
        } => {
            let sort = SortKey::from_str(sort)?;
            let mut session = SessionState::new();
            session.add_from_input(catalog, ingredients);
            session.update_filters(config.with_default_floor(filters.to_filters()?));
            let results = run_match(&config, catalog, &session, sort, &mut rng)?;
            print_scored(&results, cli.output)?;
        }
        Commands::Search {
            query,
            filters,
            sort,
        } => {
            let mut results = search_by_query(catalog, query, &filters.to_filters()?);
            if let Some(raw) = sort {
                results = sort_recipes(results, SortKey::from_str(raw)?);
            }
            remember_search(&config, query);
            print_scored(&results, cli.output)?;
        }
        Commands::Show { id } => {
            let recipe = catalog
                .recipe_by_id(id)
                .ok_or_else(|| anyhow!("recipe not found: {id}"))?;
            print_recipe_detail(recipe, cli.output)?;
        }
        Commands::Popular => {
            let recipes: Vec<&Recipe> = catalog.popular_recipes().iter().collect();
            print_recipes(&recipes, cli.output)?;
        }
        Commands::Category { tag } => {
            let recipes = catalog.recipes_by_category(tag);
            if recipes.is_empty() {
                warn!("no recipes tagged {tag}");
            }
            print_recipes(&recipes, cli.output)?;
        }
        Commands::Categories => {
            let counts = catalog.category_counts();
            match cli.output {
                OutputFormat::Table => println!("{}", render_categories_table(&counts)),
                OutputFormat::Json => println!("{}", render_json(&counts)?),
                OutputFormat::Csv => print!("{}", categories_to_csv(&counts)?),
            }
        }
        Commands::Ingredients { category } => {
            let ingredients: Vec<&Ingredient> = match category {
                Some(raw) => catalog.ingredients_by_category(IngredientCategory::from_str(raw)?),
                None => catalog.ingredients().iter().collect(),
            };
            print_ingredients(&ingredients, cli.output)?;
        }
        Commands::Detect {
            images,
            then_match,
            no_delay,
        } => {
            let mut payloads = Vec::with_capacity(images.len());
            for image in images {
                let bytes = std::fs::read(image)
                    .with_context(|| format!("failed reading image {}", image.display()))?;
                payloads.push(bytes);
            }
            let detector: Arc<dyn IngredientDetector> =
                Arc::new(build_detector(&config, cli.seed, *no_delay));
            let results = detect_batch(detector, payloads).await;
            for result in &results {
                print_detection(result, cli.output)?;
            }
            if results.iter().all(DetectionResult::is_failed) {
                let reason = results.iter().find_map(|r| r.error.clone()).unwrap_or_default();
                return Err(anyhow!("detection failed: {reason}"));
            }
            if *then_match {
                let mut session = SessionState::new();
                for result in results.iter().filter(|r| !r.is_failed()) {
                    session.add_detected(&result.ingredients);
                }
                session.update_filters(config.with_default_floor(SearchFilters::default()));
                let results = run_match(&config, catalog, &session, SortKey::Match, &mut rng)?;
                print_scored(&results, cli.output)?;
            }
        }
        Commands::Validate { names } => {
            let detector = build_detector(&config, cli.seed, true);
            let mut lines = Vec::new();
            for name in split_list(names) {
                let confidence = detector.validate(&name).await?;
                lines.push(format!("{name}: {:.0}%", confidence * 100.0));
            }
            print_list("Ingredient confidence", &lines, cli.output)?;
        }
        Commands::Substitutes { ingredient } => {
            let substitutes = catalog.substitutions().substitutes_for(ingredient).to_vec();
            if substitutes.is_empty() {
                warn!("no substitutes known for {ingredient}");
            }
            print_list("Substitute", &substitutes, cli.output)?;
        }
        Commands::Favorites {
            add,
            remove,
            toggle,
        } => {
            let store = open_store(&config)?;
            if let Some(id) = add {
                ensure_recipe(catalog, id)?;
                store.add_favorite(id)?;
            }
            if let Some(id) = remove {
                store.remove_favorite(id)?;
            }
            if let Some(id) = toggle {
                ensure_recipe(catalog, id)?;
                let saved = store.toggle_favorite(id)?;
                info!(recipe = %id, saved, "toggled favorite");
            }
            print_recipes(&store.saved_recipes(catalog), cli.output)?;
        }
        Commands::Recent { clear } => {
            let store = open_store(&config)?;
            if *clear {
                store.clear_recent_searches()?;
            }
            print_list("Recent search", &store.recent_searches(), cli.output)?;
        }
        Commands::Config { .. } | Commands::Serve { .. } => {}
    }

    Ok(())
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &PathBuf) -> Result<()> {
    let Commands::Config { init, show } = command else {
        return Ok(());
    };
    if *init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if *show || !*init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|piece| piece.trim().to_string())
        .filter(|piece| !piece.is_empty())
        .collect()
}

fn run_match(
    config: &Config,
    catalog: &Catalog,
    session: &SessionState,
    sort: SortKey,
    rng: &mut StdRng,
) -> Result<Vec<ScoredRecipe>> {
    session.ensure_searchable()?;
    let settings = config.match_settings()?;
    let available = session.available_names();
    let results = find_matching_recipes(catalog, &available, session.filters(), &settings, rng);
    remember_search(config, &available.join(", "));
    Ok(sort_recipes(results, sort))
}

fn build_detector(config: &Config, seed: Option<u64>, no_delay: bool) -> SimulatedDetector {
    let rng = seed
        .map(StdRng::seed_from_u64)
        .unwrap_or_else(StdRng::from_entropy);
    let detector = SimulatedDetector::new(rng);
    if no_delay {
        return detector;
    }
    let (delay, jitter) = config.detection_delay();
    detector
        .with_delay(delay, jitter)
        .with_validate_delay(Duration::from_millis(config.detection.validate_delay_ms))
}

fn open_store(config: &Config) -> Result<UserStore> {
    Ok(UserStore::open(&config.resolved_db_path())?
        .with_recent_limit(config.user.recent_search_limit))
}

fn remember_search(config: &Config, text: &str) {
    let recorded = open_store(config).and_then(|store| store.record_search(text));
    if let Err(err) = recorded {
        warn!("failed to record recent search: {err:#}");
    }
}

fn ensure_recipe(catalog: &Catalog, id: &str) -> Result<()> {
    if catalog.recipe_by_id(id).is_none() {
        return Err(anyhow!("recipe not found: {id}"));
    }
    Ok(())
}

fn print_scored(results: &[ScoredRecipe], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_scored_table(results)),
        OutputFormat::Json => println!("{}", render_json(results)?),
        OutputFormat::Csv => print!("{}", scored_to_csv(results)?),
    }
    Ok(())
}

fn print_recipes(recipes: &[&Recipe], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_recipes_table(recipes)),
        OutputFormat::Json => println!("{}", render_json(recipes)?),
        OutputFormat::Csv => print!("{}", recipes_to_csv(recipes)?),
    }
    Ok(())
}

fn print_recipe_detail(recipe: &Recipe, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_recipe_detail(recipe)),
        OutputFormat::Json => println!("{}", render_json(recipe)?),
        OutputFormat::Csv => print!("{}", recipes_to_csv(&[recipe])?),
    }
    Ok(())
}

fn print_ingredients(ingredients: &[&Ingredient], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_ingredients_table(ingredients)),
        OutputFormat::Json => println!("{}", render_json(ingredients)?),
        OutputFormat::Csv => print!("{}", ingredients_to_csv(ingredients)?),
    }
    Ok(())
}

fn print_detection(result: &DetectionResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_detection_table(result)),
        OutputFormat::Json => println!("{}", render_json(result)?),
        OutputFormat::Csv => {
            let detected: Vec<&Ingredient> = result.ingredients.iter().collect();
            print!("{}", ingredients_to_csv(&detected)?);
        }
    }
    Ok(())
}

fn print_list(header: &str, items: &[String], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_list_table(header, items)),
        OutputFormat::Json => println!("{}", render_json(items)?),
        OutputFormat::Csv => print!("{}", list_to_csv(header, items)?),
    }
    Ok(())
}

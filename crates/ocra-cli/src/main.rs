use anyhow::{Context, bail};
use clap::Parser;
use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use ocra_cli::{
    Command, Config, OutputFormat, ResolvedConfig, SavedCommand, TerminalClipboard,
    TerminalShareTarget,
};
use ocra_client::GeminiClient;
use ocra_core::navigation::{dish_param, parse_url};
use ocra_core::render::render_status_line;
use ocra_core::{
    FileStore, Recipe, RecipeService, SavedRecipes, SearchSession, SearchState, ShareOutcome,
    SubmitOutcome, UnitSystem, copy_recipe, load_settings, render_page, render_plain_text,
    share_recipe,
};

type Session = SearchSession<RecipeService<GeminiClient>>;
type Saved = SavedRecipes<FileStore>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::parse();

    let level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let settings = load_settings(config.config.clone()).context("Failed to load settings")?;
    let resolved = config.resolve(settings.as_ref())?;

    let saved = SavedRecipes::new(FileStore::in_dir(&resolved.data_dir));
    let clipboard = TerminalClipboard::from_command(config.clipboard_cmd.as_deref());

    match &config.command {
        Command::Saved { action } => handle_saved(&saved, action, resolved.units),
        Command::Search {
            dish,
            format,
            save,
            copy,
            share,
        } => {
            let session = new_session(&config, &resolved)?;
            let recipe = run_search(&session, dish).await?;
            print_recipe(&recipe, *format, session.view_state(&recipe.name).units)?;
            eprintln!("Link: {}", session.current_url());

            if *save {
                saved.save(&recipe).context("Failed to save recipe")?;
                info!(recipe = %recipe.name, "Recipe saved");
            }
            if *copy {
                let units = session.view_state(&recipe.name).units;
                copy_recipe(&recipe, units, &clipboard).context("Failed to copy recipe")?;
            }
            if *share {
                share_link(&session, &recipe, &clipboard)?;
            }
            Ok(())
        }
        Command::Open { url, format } => {
            let start = parse_url(url)?;
            if dish_param(&start).filter(|d| !d.is_empty()).is_none() {
                bail!("Link has no dish parameter: {}", url);
            }
            let session = new_session_at(&config, &resolved, start)?;
            match session.startup().await {
                Some(SubmitOutcome::Succeeded) => {}
                _ => bail!(failure_message(&session)),
            }
            let recipe = session
                .current_recipe()
                .context("Search finished without a recipe")?;
            print_recipe(&recipe, *format, session.view_state(&recipe.name).units)?;
            Ok(())
        }
        Command::Shell => {
            let session = new_session(&config, &resolved)?;
            run_shell(&session, &saved, &clipboard).await
        }
    }
}

fn new_session(config: &Config, resolved: &ResolvedConfig) -> anyhow::Result<Session> {
    new_session_at(config, resolved, resolved.base_url.clone())
}

fn new_session_at(
    config: &Config,
    resolved: &ResolvedConfig,
    start: url::Url,
) -> anyhow::Result<Session> {
    let api_key = config
        .gemini_api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .context("GEMINI_API_KEY is not set. Export it or add it to a .env file")?;

    let client = GeminiClient::with_config(api_key, &resolved.generation)?;
    info!(model = client.model(), "Using Gemini backend");

    Ok(SearchSession::with_default_units(
        RecipeService::new(client),
        start,
        resolved.units,
    ))
}

async fn run_search(session: &Session, dish: &str) -> anyhow::Result<Recipe> {
    eprintln!("Generating your masterpiece...");
    match session.submit(dish).await {
        SubmitOutcome::Succeeded => session
            .current_recipe()
            .context("Search finished without a recipe"),
        SubmitOutcome::Ignored => bail!("Please enter a dish name"),
        _ => bail!(failure_message(session)),
    }
}

fn failure_message(session: &Session) -> String {
    session
        .error_message()
        .unwrap_or_else(|| "An unexpected error occurred.".to_string())
}

fn print_recipe(recipe: &Recipe, format: OutputFormat, units: UnitSystem) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{}", render_plain_text(recipe, units)),
        OutputFormat::Page => println!("{}", render_page(recipe, units)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(recipe)?),
    }
    Ok(())
}

fn share_link(session: &Session, recipe: &Recipe, clipboard: &TerminalClipboard) -> anyhow::Result<()> {
    let outcome = share_recipe(
        recipe,
        &session.current_url(),
        &TerminalShareTarget,
        clipboard,
    )
    .context("Failed to copy link")?;

    match outcome {
        ShareOutcome::Shared => eprintln!("Shared!"),
        ShareOutcome::Failed => eprintln!("Sharing failed."),
        ShareOutcome::LinkCopied => eprintln!("Link copied to clipboard!"),
    }
    Ok(())
}

fn handle_saved(saved: &Saved, action: &SavedCommand, units: UnitSystem) -> anyhow::Result<()> {
    match action {
        SavedCommand::List => {
            let recipes = saved.list().map_err(|e| anyhow::anyhow!(e.user_message()))?;
            if recipes.is_empty() {
                println!("No saved recipes yet. Save one with: ocra search <dish> --save");
            }
            for recipe in recipes {
                println!("{}  ({})", recipe.name, recipe.description);
            }
        }
        SavedCommand::Show { name, format } => {
            let recipe = saved
                .get(name)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?
                .with_context(|| format!("No saved recipe named '{}'", name))?;
            print_recipe(&recipe, *format, units)?;
        }
        SavedCommand::Remove { name } => {
            if saved
                .remove(name)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?
            {
                println!("Removed '{}'", name);
            } else {
                println!("'{}' was not saved", name);
            }
        }
    }
    Ok(())
}

async fn run_shell(
    session: &Session,
    saved: &Saved,
    clipboard: &TerminalClipboard,
) -> anyhow::Result<()> {
    println!("What are we cooking today? Type a dish name, or :quit to leave.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(command) = line.strip_prefix(':') else {
            println!("Generating your masterpiece...");
            let outcome = session.submit(line).await;
            show_outcome(session, saved, outcome);
            continue;
        };

        let (name, arg) = match command.split_once(' ') {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "quit" | "q" | "exit" => break,
            "back" | "forward" => {
                let moved = if name == "back" {
                    session.back()
                } else {
                    session.forward()
                };
                match moved {
                    None => println!("No more history in that direction."),
                    Some(url) => {
                        println!("{}", url);
                        if dish_param(&url).is_some_and(|d| !d.is_empty()) {
                            println!("Generating your masterpiece...");
                            if let Some(outcome) = session.replay_current().await {
                                show_outcome(session, saved, outcome);
                            }
                        }
                    }
                }
            }
            "link" => println!("{}", session.current_url()),
            "saved" => match saved.list() {
                Ok(recipes) if recipes.is_empty() => println!("No saved recipes yet."),
                Ok(recipes) => recipes.iter().for_each(|r| println!("  {}", r.name)),
                Err(e) => eprintln!("{}", e.user_message()),
            },
            _ => {
                let Some(recipe) = session.current_recipe() else {
                    println!("Search for a dish first.");
                    continue;
                };
                if let Err(e) = recipe_command(session, saved, clipboard, &recipe, name, arg) {
                    eprintln!("{}", e.user_message());
                }
            }
        }
    }

    Ok(())
}

fn show_outcome(session: &Session, saved: &Saved, outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Succeeded => {}
        SubmitOutcome::Ignored | SubmitOutcome::Stale => return,
        SubmitOutcome::Failed => {
            println!("Oops! Something went wrong.");
            println!("{}", failure_message(session));
            return;
        }
    }

    if let SearchState::Success(recipe) = session.state() {
        let view = session.view_state(&recipe.name);
        println!("{}", render_plain_text(&recipe, view.units));
        println!();
        println!("[{}]", render_status_line(view, session.is_saved(saved, &recipe.name)));
    }
}

/// Runs a `:command` that acts on the displayed recipe.
fn recipe_command(
    session: &Session,
    saved: &Saved,
    clipboard: &TerminalClipboard,
    recipe: &Recipe,
    name: &str,
    arg: &str,
) -> Result<(), ocra_core::AppError> {
    let view = session.view_state(&recipe.name);
    match name {
        "save" => {
            let flag = session.toggle_save(saved, recipe);
            println!("{}", if flag { "Saved." } else { "Not saved." });
        }
        "units" => {
            let units = if arg.is_empty() {
                session.toggle_units(&recipe.name)
            } else {
                let units: UnitSystem = arg.parse()?;
                session.set_units(&recipe.name, units);
                units
            };
            println!("{}", render_plain_text(recipe, units));
        }
        "rate" => {
            let stars: u8 = arg
                .parse()
                .map_err(|_| ocra_core::AppError::Generic(format!("Not a star count: '{}'", arg)))?;
            let rating = session.set_rating(&recipe.name, stars)?;
            println!("{}", rating);
        }
        "copy" => {
            copy_recipe(recipe, view.units, clipboard)?;
            println!("Copied!");
        }
        "share" => {
            match share_recipe(recipe, &session.current_url(), &TerminalShareTarget, clipboard) {
                Ok(ShareOutcome::LinkCopied) => println!("Link copied to clipboard!"),
                Ok(ShareOutcome::Shared) => println!("Shared!"),
                Ok(ShareOutcome::Failed) => println!("Sharing failed."),
                Err(e) => {
                    warn!(error = %e, "Could not copy link");
                    return Err(e);
                }
            }
        }
        "print" => println!("{}", render_page(recipe, view.units)),
        _ => println!("Unknown command ':{}'. Type :quit to leave.", name),
    }
    Ok(())
}

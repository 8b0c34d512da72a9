//! `staffdir` - CLI for the employee directory
//!
//! This binary drives the directory's list and form screens from the command
//! line and prints what they would show.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use staffdir::cli::{
    render, AddCommand, Cli, Command, ConfigCommand, DeleteCommand, EditCommand, LangArg,
    ListCommand, OutputFormat, ShowCommand, ViewArg,
};
use staffdir::router::{Route, Router, LIST_PATH, NEW_PATH};
use staffdir::{init_logging, App, Config, EmployeeId, Error, KeyValueStore, Storage, ViewMode};

const IN_MEMORY: &str = ":memory:";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration, then apply command-line overrides
    let mut config =
        Config::load_from(cli.config.clone()).context("failed to load configuration")?;
    if let Some(database) = &cli.database {
        config.storage.database_path = Some(database.clone());
    }
    if let Some(base) = &cli.base {
        config.router.base_path.clone_from(base);
        config.validate()?;
    }

    // Commands that never touch the store
    let command = match cli.command {
        Command::Config(cmd) => return handle_config(&config, cmd),
        Command::Route { path } => return handle_route(&config, &path),
        other => other,
    };

    let store = open_store(&config.database_path())?;
    let mut app = App::new(store, &config)?;

    match command {
        Command::List(cmd) => handle_list(&mut app, &cmd).await,
        Command::Show(cmd) => handle_show(&app, &cmd),
        Command::Add(cmd) => handle_add(&mut app, &cmd).await,
        Command::Edit(cmd) => handle_edit(&mut app, &cmd).await,
        Command::Delete(cmd) => handle_delete(&mut app, &cmd).await,
        Command::View { mode } => handle_view(&app, mode),
        Command::Lang { lang, toggle } => handle_lang(&app, lang, toggle),
        Command::Reset { yes } => handle_reset(&app, yes),
        Command::Config(_) | Command::Route { .. } => Ok(()),
    }
}

fn open_store(path: &Path) -> Result<Arc<dyn KeyValueStore>> {
    if path.as_os_str() == IN_MEMORY {
        debug!("Using in-memory store");
        return Ok(Arc::new(Storage::open_in_memory()?));
    }
    let storage = Storage::open(path)
        .with_context(|| format!("failed to open store at {}", path.display()))?;
    Ok(Arc::new(storage))
}

fn print_toast(app: &App) -> Result<()> {
    if let Some(toast) = app.notifier().current()? {
        println!("{}", toast.message);
    }
    Ok(())
}

fn print_confirm_hint(question: &str, detail: &str) {
    println!("{question}");
    println!("{detail}");
    println!("Use --yes to confirm.");
}

async fn handle_list(app: &mut App, cmd: &ListCommand) -> Result<()> {
    app.navigate(LIST_PATH).await?;
    let messages = app.messages()?;
    let list = app.list_mut().context("list screen did not open")?;

    if let Some(view) = cmd.view {
        list.set_view(view.into())?;
    }
    if let Some(query) = &cmd.search {
        list.set_search(query.as_str())?;
    }
    if let Some(page) = cmd.page {
        list.go_to_page(page)?;
    }

    let items = list.page_items();
    if cmd.format == OutputFormat::Json {
        let output = serde_json::json!({
            "view": list.view(),
            "page": list.current_page(),
            "totalPages": list.total_pages(),
            "matches": list.filtered().len(),
            "employees": items,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("{}", messages.get("noResults"));
    } else {
        let text = match (cmd.format, list.view()) {
            (OutputFormat::Plain, _) => render::plain(&items),
            (_, ViewMode::List) => render::table(&items, &messages),
            (_, ViewMode::Cards) => render::cards(&items, &messages),
        };
        print!("{text}");
    }
    if let Some(bar) = render::pagination(list.pagination().as_ref(), &messages) {
        println!("{bar}");
    }
    Ok(())
}

fn handle_show(app: &App, cmd: &ShowCommand) -> Result<()> {
    let id = EmployeeId::new(cmd.id.as_str());
    let employee = app
        .directory()
        .find(&id)?
        .ok_or(Error::EmployeeNotFound(id))?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&employee)?);
    } else {
        print!("{}", render::detail(&employee, &app.messages()?));
    }
    Ok(())
}

async fn handle_add(app: &mut App, cmd: &AddCommand) -> Result<()> {
    app.navigate(NEW_PATH).await?;
    let messages = app.messages()?;
    let form = app.form_mut().context("form screen did not open")?;

    for (field, value) in cmd.fields.given() {
        form.set_field(field, value);
    }
    form.submit()?;

    if !cmd.yes {
        print_confirm_hint(messages.get("areYouSure"), &form.confirm_message(&messages));
        return Ok(());
    }

    let result = app.confirm_form().await;
    print_toast(app)?;
    if let Some(outcome) = result? {
        println!("{}", outcome.employee().id);
    }
    Ok(())
}

async fn handle_edit(app: &mut App, cmd: &EditCommand) -> Result<()> {
    let id = EmployeeId::new(cmd.id.as_str());
    let path = Route::Edit(id.clone()).path();
    app.navigate(&path).await?;
    if app.router().current_path() != path {
        return Err(Error::EmployeeNotFound(id).into());
    }

    let messages = app.messages()?;
    let form = app.form_mut().context("form screen did not open")?;
    for (field, value) in cmd.fields.given() {
        form.set_field(field, value);
    }
    form.submit()?;

    if !cmd.yes {
        print_confirm_hint(messages.get("areYouSure"), &form.confirm_message(&messages));
        return Ok(());
    }

    let result = app.confirm_form().await;
    print_toast(app)?;
    result?;
    Ok(())
}

async fn handle_delete(app: &mut App, cmd: &DeleteCommand) -> Result<()> {
    app.navigate(LIST_PATH).await?;
    let messages = app.messages()?;
    let list = app.list_mut().context("list screen did not open")?;
    list.request_delete(&EmployeeId::new(cmd.id.as_str()))?;

    if !cmd.yes {
        let detail = list.confirm_message(&messages).unwrap_or_default();
        list.cancel_confirm();
        print_confirm_hint(messages.get("areYouSure"), &detail);
        return Ok(());
    }

    app.confirm_list().await?;
    print_toast(app)
}

fn handle_view(app: &App, mode: Option<ViewArg>) -> Result<()> {
    if let Some(mode) = mode {
        app.state().set_view(mode.into())?;
        app.state().set_page_index(1)?;
    }
    println!("{}", app.state().view()?);
    Ok(())
}

fn handle_lang(app: &App, lang: Option<LangArg>, toggle: bool) -> Result<()> {
    if toggle {
        app.toggle_lang()?;
    } else if let Some(lang) = lang {
        app.state().set_lang(lang.into())?;
    }
    println!("{}", app.state().lang()?);
    Ok(())
}

fn handle_reset(app: &App, yes: bool) -> Result<()> {
    if !yes {
        println!("This replaces every stored employee with the seed dataset.");
        println!("Use --yes to confirm.");
        return Ok(());
    }
    app.directory().reset()?;
    app.state().set_page_index(1)?;
    println!(
        "Collection reset to {} employees.",
        app.directory().load()?.len()
    );
    Ok(())
}

fn handle_route(config: &Config, path: &str) -> Result<()> {
    let mut router = Router::new(config.base_path());
    router.install();
    let route = router
        .go(path)
        .context("router did not accept the navigation")?;

    println!("Route:    {route:?}");
    println!("Logical:  {}", router.current_path());
    println!("Browser:  {}", router.browser_path());
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Seed count:         {}", config.storage.seed_count);
                println!();
                println!("[UI]");
                println!("  List page size:     {}", config.ui.list_page_size);
                println!("  Cards page size:    {}", config.ui.cards_page_size);
                println!("  Load delay (ms):    {}", config.ui.load_delay_ms);
                println!("  List toast (ms):    {}", config.ui.list_toast_ms);
                println!("  Form toast (ms):    {}", config.ui.form_toast_ms);
                println!();
                println!("[Form]");
                println!("  Min phone digits:   {}", config.form.min_phone_digits);
                println!();
                println!("[Router]");
                println!("  Base path:          {}", config.base_path());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

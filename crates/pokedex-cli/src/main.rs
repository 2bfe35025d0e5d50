// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, bail};
use config::Config;
use pokedex_app::{AppState, Catalog, Navigator, Router};
use pokedex_db::Store;
use pokedex_tui::Session;
use runtime::{ApiRuntime, CliRouter};
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `pokedex --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let db_path = config.db_path()?;
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let mut store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or POKEDEX_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;

    let client = pokedex_api::Client::new(config.api_base_url(), config.api_timeout()?)
        .with_context(|| {
            format!(
                "invalid [api] config in {}; fix base_url/timeout values",
                options.config_path.display()
            )
        })?;
    if options.check_only {
        return Ok(());
    }

    // Catalog size bounds every identifier, so the index must settle
    // before any navigation starts.
    let raw_index = client
        .fetch_index()
        .with_context(|| format!("fetch catalog index from {}", client.base_url()))?;
    let catalog = Catalog::normalize(&raw_index);
    if catalog.is_empty() {
        bail!(
            "catalog index from {} yielded no canonical entries; nothing to browse",
            client.base_url()
        );
    }

    let mut router = CliRouter::new(options.start_id);
    let nav = Navigator::restore(catalog.size(), &store, &router)?;
    router.navigate(nav.cursor());

    let mut state = AppState::default();
    let mut session = Session {
        catalog: &catalog,
        nav,
        store: &mut store,
        router: &mut router,
    };
    let mut runtime = ApiRuntime::new(client);
    pokedex_tui::run_app(&mut state, &mut session, &mut runtime)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    start_id: Option<String>,
    print_config_path: bool,
    print_db_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        start_id: None,
        print_config_path: false,
        print_db_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--id" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--id requires an identifier"))?;
                options.start_id = Some(value.as_ref().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("pokedex");
    println!("  --config <path>          Use a specific config path");
    println!("  --id <identifier>        Start at this catalog entry (clamped into range)");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config + DB + API client without starting");
    println!("  --help                   Show this help");
}

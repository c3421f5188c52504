use anyhow::{bail, Context, Result};
use codorders::{
    fetch::{refresh_sheet, ShopifyClient},
    schema::COLUMNS,
    settings::{load_layered, CredentialStore, EnvCredentials, JsonCredentials, Settings},
    sheet::{apply_filters, write_parquet, Grid},
};
use std::{collections::HashMap, env, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "\
usage:
  codorders fetch [--out FILE.parquet]
  codorders filter [COLUMN=VALUE ...] [--out FILE.parquet]
  codorders save-settings DOMAIN TOKEN [API_VERSION]
  codorders columns";

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let Some(cmd) = args.next() else {
        bail!(USAGE);
    };
    let rest: Vec<String> = args.collect();

    match cmd.as_str() {
        "fetch" => fetch(&rest),
        "filter" => filter(&rest),
        "save-settings" => save_settings(&rest),
        "columns" => {
            for c in COLUMNS {
                println!("{}", c);
            }
            Ok(())
        }
        other => bail!("unknown command {:?}\n{}", other, USAGE),
    }
}

/// Split `--out FILE` from the remaining arguments.
fn take_out(args: &[String]) -> Result<(Option<PathBuf>, Vec<String>)> {
    let mut out = None;
    let mut rest = Vec::new();
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == "--out" {
            let path = it.next().context("--out needs a file path")?;
            out = Some(PathBuf::from(path));
        } else {
            rest.push(a.clone());
        }
    }
    Ok((out, rest))
}

fn settings() -> Result<Settings> {
    let file = JsonCredentials::from_env();
    info!(path = %file.path().display(), "loading settings");
    load_layered(&EnvCredentials, &file)
}

fn load_grid() -> Result<(Grid, codorders::fetch::FetchResult)> {
    let settings = settings()?;
    let mut grid = Grid::new();
    let result = refresh_sheet(&mut grid, &settings, &ShopifyClient::new())?;
    Ok((grid, result))
}

fn fetch(args: &[String]) -> Result<()> {
    let (out, rest) = take_out(args)?;
    if !rest.is_empty() {
        bail!(USAGE);
    }
    let (grid, result) = load_grid()?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    if let Some(path) = out {
        write_parquet(&path, grid.data_rows())?;
    }
    Ok(())
}

fn filter(args: &[String]) -> Result<()> {
    let (out, rest) = take_out(args)?;
    let mut request: HashMap<String, Option<String>> = HashMap::new();
    for pair in &rest {
        let (column, value) = pair
            .split_once('=')
            .with_context(|| format!("expected COLUMN=VALUE, got {:?}", pair))?;
        request.insert(column.to_string(), Some(value.to_string()));
    }

    let (mut grid, result) = load_grid()?;
    if let Some(msg) = &result.message {
        eprintln!("{}", msg);
    }
    let applied = apply_filters(&mut grid, &request)?;
    let visible = grid.visible_rows();
    println!("{} column(s) filtered, {} row(s) visible", applied, visible.len());

    let objects: Vec<serde_json::Map<String, serde_json::Value>> = visible
        .iter()
        .map(|row| {
            COLUMNS
                .iter()
                .zip(row.iter())
                .map(|(c, v)| (c.name().to_string(), serde_json::Value::String(v.clone())))
                .collect()
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&objects)?);

    if let Some(path) = out {
        write_parquet(&path, &visible)?;
    }
    Ok(())
}

fn save_settings(args: &[String]) -> Result<()> {
    let (domain, token, version) = match args {
        [d, t] => (d, t, None),
        [d, t, v] => (d, t, Some(v.clone())),
        _ => bail!(USAGE),
    };
    let store = JsonCredentials::from_env();
    let mut settings = store.load()?;
    settings.domain = Some(domain.clone());
    settings.access_token = Some(token.clone());
    if version.is_some() {
        settings.api_version = version;
    }
    store.save(&settings)?;
    println!("saved settings to {}", store.path().display());
    Ok(())
}

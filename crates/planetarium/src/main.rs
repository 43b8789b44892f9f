//! `planetarium` - CLI for the planet catalog
//!
//! This binary runs the HTTP server and offers direct access to the catalog
//! and the image store from the command line.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use planetarium::cli::{
    Cli, Command, ConfigCommand, OutputFormat, PlanetCommand, SatelliteCommand, ServeCommand,
    UploadCommand,
};
use planetarium::http::{self, AppState};
use planetarium::images::split_extension;
use planetarium::{init_logging, Catalog, Config, ImageStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Serve(cmd) => handle_serve(config, cmd).await,
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Planets(cmd) => handle_planets(&config, cmd.format),
        Command::Planet(cmd) => handle_planet(&config, &cmd),
        Command::Satellite(cmd) => handle_satellite(&config, &cmd),
        Command::Upload(cmd) => handle_upload(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_store(config: &Config) -> anyhow::Result<ImageStore> {
    let dir = config.upload_dir();
    ImageStore::open(&dir, config.public_prefix())
        .with_context(|| format!("cannot open upload directory {}", dir.display()))
}

/// Load the catalog and attach any images already on disk.
fn open_catalog(config: &Config, store: &ImageStore) -> anyhow::Result<Catalog> {
    let catalog = Catalog::load(&config.data).context("cannot load catalog data")?;
    store.restore(&catalog);
    Ok(catalog)
}

async fn handle_serve(mut config: Config, cmd: ServeCommand) -> anyhow::Result<()> {
    if let Some(bind) = cmd.bind {
        config.server.bind = bind;
    }
    if let Some(dir) = cmd.upload_dir {
        config.upload.directory = Some(dir);
    }
    config.validate()?;

    let store = open_store(&config)?;
    let catalog = open_catalog(&config, &store)?;
    let state = AppState::new(
        Arc::new(catalog),
        Arc::new(store),
        config.upload.max_bytes,
    );

    http::serve(state, config.bind_addr()?).await?;
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let catalog = open_catalog(config, &store)?;
    let stats = catalog.stats();

    if json {
        let status = serde_json::json!({
            "catalog": stats,
            "upload_dir": store.root(),
            "bind": config.server.bind,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("planetarium status");
        println!("------------------");
        println!("Planets:             {}", stats.planets);
        println!("Satellites:          {}", stats.satellites);
        println!("Orphaned satellites: {}", stats.orphaned_satellites);
        println!("Planets with image:  {}", stats.planets_with_images);
        println!("Upload directory:    {}", store.root().display());
        println!("Bind address:        {}", config.server.bind);
    }
    Ok(())
}

fn handle_planets(config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let catalog = open_catalog(config, &store)?;
    let planets = catalog.planets();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&planets)?),
        OutputFormat::Plain => {
            for planet in &planets {
                let moons = catalog.satellites_of_planet(planet.id).len();
                let image = planet.image.as_deref().unwrap_or("-");
                println!("{:>3}  {:<12} {:>3} moons  {}", planet.id, planet.name, moons, image);
            }
        }
    }
    Ok(())
}

fn handle_planet(config: &Config, cmd: &PlanetCommand) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let catalog = open_catalog(config, &store)?;
    let planet = catalog
        .find_planet(cmd.id)
        .ok_or_else(|| planetarium::Error::planet_not_found(cmd.id))?;
    let satellites = catalog.satellites_of_planet(cmd.id);
    let image_url = store.image_url(cmd.id);

    match cmd.format {
        OutputFormat::Json => {
            let view = serde_json::json!({
                "planet": planet,
                "satellites": satellites,
                "image_url": image_url,
            });
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        OutputFormat::Plain => {
            println!("{} (id {})", planet.name, planet.id);
            for (key, value) in &planet.attributes {
                println!("  {key:<18} {value}");
            }
            println!("  {:<18} {}", "image", image_url.as_deref().unwrap_or("-"));
            if satellites.is_empty() {
                println!("No satellites.");
            } else {
                println!("Satellites:");
                for satellite in satellites {
                    println!("  {:>3}  {}", satellite.id, satellite.name);
                }
            }
        }
    }
    Ok(())
}

fn handle_satellite(config: &Config, cmd: &SatelliteCommand) -> anyhow::Result<()> {
    let catalog = Catalog::load(&config.data).context("cannot load catalog data")?;
    let satellite = catalog
        .find_satellite(cmd.id)
        .ok_or_else(|| planetarium::Error::satellite_not_found(cmd.id))?;
    let planet = catalog.find_planet(satellite.planet_id);

    match cmd.format {
        OutputFormat::Json => {
            let view = serde_json::json!({ "satellite": satellite, "planet": planet });
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        OutputFormat::Plain => {
            println!("{} (id {})", satellite.name, satellite.id);
            for (key, value) in &satellite.attributes {
                println!("  {key:<18} {value}");
            }
            match planet {
                Some(planet) => println!("Orbits {} (id {})", planet.name, planet.id),
                None => println!("Orbits unknown planet {}", satellite.planet_id),
            }
        }
    }
    Ok(())
}

fn handle_upload(config: &Config, cmd: &UploadCommand) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let catalog = open_catalog(config, &store)?;

    let file_name = cmd
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = split_extension(&file_name)
        .map(|(_, ext)| ext.to_owned())
        .unwrap_or_default();
    let bytes = std::fs::read(&cmd.file)
        .with_context(|| format!("cannot read {}", cmd.file.display()))?;

    if bytes.len() > config.upload.max_bytes {
        anyhow::bail!(
            "{} is {} bytes, the limit is {}",
            cmd.file.display(),
            bytes.len(),
            config.upload.max_bytes
        );
    }

    let stored = store.record_upload(&catalog, cmd.planet_id, &file_name, &extension, &bytes)?;
    println!("Stored {} ({} bytes)", stored.relative_path, stored.size_bytes);
    println!("Checksum: {}", stored.checksum);
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Bind:             {}", config.server.bind);
                println!();
                println!("[Data]");
                println!("  Planets:          {}", describe_source(config.data.planets_path.as_deref()));
                println!(
                    "  Satellites:       {}",
                    describe_source(config.data.satellites_path.as_deref())
                );
                println!();
                println!("[Upload]");
                println!("  Directory:        {}", config.upload_dir().display());
                println!("  Public prefix:    {}", config.public_prefix());
                println!("  Max bytes:        {}", config.upload.max_bytes);
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

fn describe_source(path: Option<&std::path::Path>) -> String {
    path.map_or_else(|| "(embedded)".to_string(), |p| p.display().to_string())
}

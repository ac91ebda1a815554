//! Subcommand execution against an explicitly constructed catalog service.

use crate::args::Commands;
use anyhow::{Context, Result};
use log::info;
use mercari_core::db::open_db;
use mercari_core::{
    ping, CatalogConfig, CatalogService, ImageStore, ItemRecord, SqliteCatalogRepository,
    SubmitItemRequest,
};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
struct Message<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct Submitted<'a> {
    message: &'a str,
    item_id: i64,
    image_name: Option<&'a str>,
}

#[derive(Serialize)]
struct Items<'a> {
    items: &'a [ItemRecord],
}

#[derive(Serialize)]
struct ConfigView<'a> {
    db_path: &'a Path,
    image_dir: &'a Path,
    allowed_origins: &'a [String],
    log_dir: Option<&'a Path>,
    log_level: &'a str,
}

/// Runs one subcommand and writes its JSON payload to `out`.
///
/// Service errors are returned unwrapped so callers can classify them.
pub fn run(command: &Commands, config: &CatalogConfig, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Ping => write_json(out, &Message { message: ping() }),
        Commands::Config => write_json(
            out,
            &ConfigView {
                db_path: &config.db_path,
                image_dir: &config.image_dir,
                allowed_origins: &config.allowed_origins,
                log_dir: config.log_dir.as_deref(),
                log_level: &config.log_level,
            },
        ),
        Commands::Submit {
            name,
            category,
            image,
        } => {
            let image = match image {
                Some(path) => Some(
                    std::fs::read(path)
                        .with_context(|| format!("reading image {}", path.display()))?,
                ),
                None => None,
            };
            let request = SubmitItemRequest {
                name: name.clone(),
                category: category.clone(),
                image,
            };
            with_service(config, |service| {
                let receipt = service.submit_item(request)?;
                info!(
                    "event=cli_submit module=cli status=ok item_id={}",
                    receipt.item_id
                );
                write_json(
                    out,
                    &Submitted {
                        message: &receipt.message,
                        item_id: receipt.item_id,
                        image_name: receipt.image_name.as_deref(),
                    },
                )
            })
        }
        Commands::List => with_service(config, |service| {
            write_json(
                out,
                &Items {
                    items: &service.list_items()?,
                },
            )
        }),
        Commands::Get { id } => {
            with_service(config, |service| write_json(out, &service.get_item(*id)?))
        }
        Commands::Search { keyword } => with_service(config, |service| {
            write_json(
                out,
                &Items {
                    items: &service.search_items(keyword)?,
                },
            )
        }),
        Commands::Image { name, out: target } => with_service(config, |service| match target {
            None => {
                let path = service.image_path(name)?;
                writeln!(out, "{}", path.display())?;
                Ok(())
            }
            Some(target) => {
                let bytes = service.fetch_image(name)?;
                std::fs::write(target, &bytes)
                    .with_context(|| format!("writing {}", target.display()))?;
                write_json(
                    out,
                    &Message {
                        message: &format!("wrote {} bytes", bytes.len()),
                    },
                )
            }
        }),
    }
}

/// Opens storage from `config` and hands a catalog service to `f`.
fn with_service<T>(
    config: &CatalogConfig,
    f: impl FnOnce(&CatalogService<SqliteCatalogRepository<'_>>) -> Result<T>,
) -> Result<T> {
    let conn = open_db(&config.db_path)
        .with_context(|| format!("opening {}", config.db_path.display()))?;
    let images = ImageStore::open(&config.image_dir)?;
    let service = CatalogService::new(SqliteCatalogRepository::new(&conn), images);
    f(&service)
}

fn write_json(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

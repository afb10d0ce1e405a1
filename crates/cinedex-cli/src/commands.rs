use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use cinedex_catalog::{MediaCatalog, ReviewBoard};
use cinedex_server::{CinedexServer, ServerConfig, ENDPOINTS};
use cinedex_store::{JsonFileStore, RecordStore};
use cinedex_types::{MediaRecord, Record, ReviewRecord};
use colored::Colorize;
use serde_json::{json, Value};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Init(args) => cmd_init(args).await,
        Command::Serve(args) => cmd_serve(args).await,
        Command::Routes => {
            print!("{}", render_routes(format)?);
            Ok(())
        }
        Command::List(args) => cmd_list(args, format).await,
        Command::Show(args) => cmd_show(args, format).await,
    }
}

async fn init_collections(data_dir: &Path) -> anyhow::Result<Vec<(&'static str, bool)>> {
    let store = JsonFileStore::new(data_dir);
    let mut outcome = Vec::new();
    for collection in [MediaRecord::COLLECTION, ReviewRecord::COLLECTION] {
        let created = store
            .ensure_collection(collection)
            .await
            .with_context(|| format!("cannot initialize {}", data_dir.display()))?;
        outcome.push((collection, created));
    }
    Ok(outcome)
}

async fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    let dir = &args.data.data_dir;
    for (collection, created) in init_collections(dir).await? {
        let path = dir.join(format!("{collection}.json"));
        if created {
            println!("{} Created {}", "✓".green().bold(), path.display().to_string().bold());
        } else {
            println!("  {} {}", "exists:".dimmed(), path.display());
        }
    }
    Ok(())
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    println!(
        "cinedex server on {} (data: {})",
        config.bind_addr.to_string().bold(),
        config.data_dir.display()
    );
    CinedexServer::new(config).serve().await?;
    Ok(())
}

fn render_routes(format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let routes: Vec<Value> = ENDPOINTS
                .iter()
                .map(|(method, path)| json!({ "method": method, "path": path }))
                .collect();
            Ok(serde_json::to_string_pretty(&routes)? + "\n")
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for (method, path) in ENDPOINTS {
                writeln!(out, "{:<7}{}", method.cyan(), path)?;
            }
            Ok(out)
        }
    }
}

fn open_store(data_dir: &Path) -> Arc<JsonFileStore> {
    Arc::new(JsonFileStore::new(data_dir))
}

async fn cmd_list(args: ListArgs, format: OutputFormat) -> anyhow::Result<()> {
    let catalog = MediaCatalog::new(open_store(&args.data.data_dir));
    let records = catalog.list_all().await.with_context(|| {
        format!(
            "cannot read media in {} (run `cinedex init` first?)",
            args.data.data_dir.display()
        )
    })?;
    print!("{}", render_media_list(&records, format)?);
    Ok(())
}

fn render_media_list(records: &[MediaRecord], format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(records)? + "\n");
    }
    if records.is_empty() {
        return Ok("No media.\n".into());
    }
    let mut out = String::new();
    for media in records {
        let poster = if media.poster.is_some() { " [poster]".green().to_string() } else { String::new() };
        writeln!(
            out,
            "{}  {} ({})  {}{}",
            media.id.as_str().yellow(),
            media.title.bold(),
            media.year,
            media.kind.cyan(),
            poster
        )?;
    }
    Ok(out)
}

async fn cmd_show(args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let store = open_store(&args.data.data_dir);
    let media = MediaCatalog::new(store.clone())
        .get(&args.id)
        .await
        .with_context(|| format!("cannot show media {}", args.id))?;
    let reviews = ReviewBoard::new(store)
        .list_for(&args.id)
        .await
        .context("cannot read reviews")?;
    print!("{}", render_media_detail(&media, &reviews, format)?);
    Ok(())
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_media_detail(
    media: &MediaRecord,
    reviews: &[ReviewRecord],
    format: OutputFormat,
) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        let detail = json!({ "media": media, "reviews": reviews });
        return Ok(serde_json::to_string_pretty(&detail)? + "\n");
    }

    let mut out = String::new();
    writeln!(out, "{}", media.title.red().bold())?;
    writeln!(out, "  imdbID:    {}", media.id.as_str().yellow())?;
    writeln!(out, "  type:      {}", media.kind)?;
    writeln!(out, "  year:      {}", media.year)?;
    if let Some(poster) = &media.poster {
        writeln!(out, "  poster:    {}", poster.blue())?;
    }
    writeln!(out, "  createdAt: {}", media.created_at.to_string().dimmed())?;
    writeln!(out, "  updatedAt: {}", media.updated_at.to_string().dimmed())?;
    for (key, value) in &media.extra {
        writeln!(out, "  {key}: {}", scalar(value))?;
    }

    writeln!(out, "\nReviews ({})", reviews.len())?;
    for review in reviews {
        let fields: Vec<String> = review
            .extra
            .iter()
            .map(|(k, v)| format!("{k}={}", scalar(v)))
            .collect();
        writeln!(out, "  {}  {}", review.id.as_str().yellow(), fields.join(" "))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> cinedex_types::Payload {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn init_creates_then_reports_existing() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");

        let first = init_collections(&data).await.unwrap();
        assert_eq!(first, vec![("media", true), ("reviews", true)]);
        let second = init_collections(&data).await.unwrap();
        assert_eq!(second, vec![("media", false), ("reviews", false)]);
    }

    #[test]
    fn routes_as_json() {
        let out = render_routes(OutputFormat::Json).unwrap();
        let routes: Vec<Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(routes.len(), ENDPOINTS.len());
        assert_eq!(routes[0], json!({"method": "GET", "path": "/health"}));
    }

    #[test]
    fn routes_as_text() {
        let out = render_routes(OutputFormat::Text).unwrap();
        assert_eq!(out.lines().count(), ENDPOINTS.len());
        assert!(out.contains("/medias/:id/reviews/:review_id"));
    }

    #[tokio::test]
    async fn list_and_show_read_the_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        init_collections(dir.path()).await.unwrap();
        let store = open_store(dir.path());
        let media = MediaCatalog::new(store.clone())
            .create(payload(json!({"type": "movie", "title": "Dune", "year": 2021, "director": "Villeneuve"})))
            .await
            .unwrap();
        ReviewBoard::new(store.clone())
            .create(media.id.as_str(), payload(json!({"comment": "Epic", "rate": 5})))
            .await
            .unwrap();

        let records = MediaCatalog::new(store.clone()).list_all().await.unwrap();
        let text = render_media_list(&records, OutputFormat::Text).unwrap();
        assert!(text.contains("Dune"));
        assert!(text.contains("2021"));

        let as_json: Vec<Value> =
            serde_json::from_str(&render_media_list(&records, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(as_json[0]["title"], "Dune");

        let reviews = ReviewBoard::new(store).list_for(media.id.as_str()).await.unwrap();
        let detail = render_media_detail(&media, &reviews, OutputFormat::Text).unwrap();
        assert!(detail.contains("director: Villeneuve"));
        assert!(detail.contains("Reviews (1)"));
        assert!(detail.contains("comment=Epic"));

        let detail: Value =
            serde_json::from_str(&render_media_detail(&media, &reviews, OutputFormat::Json).unwrap())
                .unwrap();
        assert_eq!(detail["reviews"][0]["imdbID"], media.id.as_str());
    }

    #[test]
    fn empty_list_text() {
        assert_eq!(render_media_list(&[], OutputFormat::Text).unwrap(), "No media.\n");
    }
}

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, Result};
use serde_json::{json, Value};
use tracing::{debug, info};

use sendarr_config::{PathManager, RadarrSettings, SettingsStore, SonarrSettings, TraktSettings};
use sendarr_core::Dispatcher;
use sendarr_models::{ExternalIds, MediaType};
use sendarr_services::trakt::auth::{AUTHORIZE_URL, REDIRECT_URI};
use sendarr_services::{HttpClient, ReqwestTransport};

mod logging;
mod output;

use output::{mask_secret, Output};

#[derive(Parser)]
#[command(name = "sendarr")]
#[command(about = "Send movies and shows from Trakt pages to Radarr/Sonarr")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MediaKind {
    Movie,
    Show,
}

impl From<MediaKind> for MediaType {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Movie => MediaType::Movie,
            MediaKind::Show => MediaType::Show,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Add a movie or show to Radarr/Sonarr (and optionally a Trakt list)
    Add {
        #[arg(value_enum)]
        kind: MediaKind,

        /// Trakt canonical slug, e.g. "the-matrix-1999"
        slug: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        year: Option<i64>,

        /// IMDB id, e.g. tt0133093
        #[arg(long)]
        imdb: Option<String>,

        /// TMDB numeric id
        #[arg(long)]
        tmdb: Option<u64>,

        /// TVDB numeric id
        #[arg(long)]
        tvdb: Option<u64>,

        /// Skip the Trakt metadata lookup for missing ids
        #[arg(long, action = ArgAction::SetTrue)]
        no_resolve: bool,
    },
    /// Resolve a slug's external ids via the Trakt metadata API
    Resolve {
        #[arg(value_enum)]
        kind: MediaKind,
        slug: String,
    },
    /// Trakt OAuth
    Auth {
        #[command(subcommand)]
        cmd: AuthCommands,
    },
    /// Show the authenticated user's Trakt lists
    Lists,
    /// View or update settings
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Exchange an authorization code for tokens (prompts when omitted)
    Exchange {
        #[arg(long)]
        code: Option<String>,
    },
    /// Show whether Trakt is authenticated
    Status,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (secrets masked)
    Show,
    /// Update Trakt settings; the client secret is prompted, never an argument
    Trakt {
        #[arg(long)]
        client_id: Option<String>,

        /// Also prompt for the client secret
        #[arg(long, action = ArgAction::SetTrue)]
        secret: bool,

        #[arg(long)]
        auto_add: Option<bool>,

        /// List slug or numeric id for auto-add
        #[arg(long)]
        list_id: Option<String>,
    },
    /// Update Radarr settings
    Radarr {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        root_folder: Option<String>,
        #[arg(long)]
        quality_profile: Option<i64>,
        #[arg(long)]
        monitored: Option<bool>,
        #[arg(long)]
        search_on_add: Option<bool>,
    },
    /// Update Sonarr settings
    Sonarr {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        root_folder: Option<String>,
        #[arg(long)]
        quality_profile: Option<i64>,
        #[arg(long)]
        language_profile: Option<i64>,
        #[arg(long)]
        season_folder: Option<bool>,
        #[arg(long)]
        monitored: Option<bool>,
        #[arg(long)]
        search_on_add: Option<bool>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet).map_err(|e| eyre!("{}", e))?;

    let out = Output::new(cli.quiet);
    let paths = PathManager::default();
    let store = SettingsStore::new(paths.settings_file());
    let dispatcher = Dispatcher::new(HttpClient::new(ReqwestTransport::new()), store);

    let ok = match cli.command {
        Commands::Add {
            kind,
            slug,
            title,
            year,
            imdb,
            tmdb,
            tvdb,
            no_resolve,
        } => {
            run_add(
                &dispatcher, &out, kind, slug, title, year, imdb, tmdb, tvdb, no_resolve,
            )
            .await
        }
        Commands::Resolve { kind, slug } => {
            let response = dispatcher
                .handle(
                    "resolveIds",
                    json!({"type": MediaType::from(kind), "slug": slug}),
                )
                .await;
            render_resolve(&out, &response)
        }
        Commands::Auth { cmd } => match cmd {
            AuthCommands::Exchange { code } => run_auth_exchange(&dispatcher, &out, code).await?,
            AuthCommands::Status => {
                let response = dispatcher.handle("authStatus", json!({})).await;
                if response["authed"].as_bool().unwrap_or(false) {
                    out.success(format!(
                        "Authenticated as {}",
                        response["username"].as_str().unwrap_or("")
                    ));
                } else {
                    out.info("Not authenticated. Run `sendarr auth exchange`.");
                }
                true
            }
        },
        Commands::Lists => {
            let response = dispatcher.handle("fetchLists", json!({})).await;
            render_lists(&out, &response)
        }
        Commands::Config { cmd } => {
            run_config(&out, cmd)?;
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Assemble the item the way the page widget would: start from whatever ids
/// were supplied, ask the resolver to fill gaps, then submit. Supplied values
/// always win over resolved ones.
#[allow(clippy::too_many_arguments)]
async fn run_add(
    dispatcher: &Dispatcher<ReqwestTransport>,
    out: &Output,
    kind: MediaKind,
    slug: String,
    title: Option<String>,
    year: Option<i64>,
    imdb: Option<String>,
    tmdb: Option<u64>,
    tvdb: Option<u64>,
    no_resolve: bool,
) -> bool {
    let media_type = MediaType::from(kind);
    let mut ids = ExternalIds { imdb, tmdb, tvdb };
    let mut title = title;
    let mut year = year;

    let needs_ids = match media_type {
        MediaType::Movie => ids.tmdb.is_none() && ids.imdb.is_none(),
        MediaType::Show => ids.tvdb.is_none() && ids.tmdb.is_none(),
    };
    if needs_ids && !no_resolve {
        debug!(%slug, "no usable lookup ids supplied, resolving via Trakt");
        let resolved = dispatcher
            .handle("resolveIds", json!({"type": media_type, "slug": &slug}))
            .await;
        if resolved["ok"].as_bool().unwrap_or(false) {
            apply_resolved(&mut ids, &mut title, &mut year, &resolved);
        } else {
            // Resolution is best-effort here; the lookup can still succeed on
            // a text term.
            out.info(format!(
                "Could not resolve ids: {}",
                resolved["error"].as_str().unwrap_or("unknown error")
            ));
        }
    }

    let action = match media_type {
        MediaType::Movie => "addMovie",
        MediaType::Show => "addShow",
    };
    info!(%slug, action, "submitting add request");
    let payload = json!({"slug": &slug, "title": title, "year": year, "ids": ids});
    let response = dispatcher.handle(action, payload).await;
    if response["ok"].as_bool().unwrap_or(false) {
        out.success(response["message"].as_str().unwrap_or("Done."));
        true
    } else {
        out.error(response["error"].as_str().unwrap_or("Failed."));
        false
    }
}

/// Supplied values win; the resolver only fills gaps.
fn apply_resolved(
    ids: &mut ExternalIds,
    title: &mut Option<String>,
    year: &mut Option<i64>,
    resolved: &Value,
) {
    if let Ok(resolved_ids) = serde_json::from_value::<ExternalIds>(resolved["ids"].clone()) {
        ids.merge(&resolved_ids);
    }
    if title.is_none() {
        *title = resolved["title"].as_str().map(|s| s.to_string());
    }
    if year.is_none() {
        *year = resolved["year"].as_i64();
    }
}

fn render_resolve(out: &Output, response: &Value) -> bool {
    if !response["ok"].as_bool().unwrap_or(false) {
        out.error(response["error"].as_str().unwrap_or("Failed."));
        return false;
    }
    out.field("title", response["title"].as_str().unwrap_or("(unknown)"));
    out.field(
        "year",
        response["year"]
            .as_i64()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "(unknown)".to_string()),
    );
    for key in ["imdb", "tmdb", "tvdb"] {
        let value = match &response["ids"][key] {
            Value::Null => "(none)".to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        out.field(key, value);
    }
    true
}

fn render_lists(out: &Output, response: &Value) -> bool {
    if !response["ok"].as_bool().unwrap_or(false) {
        out.error(response["error"].as_str().unwrap_or("Failed."));
        return false;
    }
    let empty = Vec::new();
    let lists = response["lists"].as_array().unwrap_or(&empty);
    if lists.is_empty() {
        out.info("No lists found.");
        return true;
    }
    for list in lists {
        let slug = list["ids"]["slug"]
            .as_str()
            .map(|s| s.to_string())
            .unwrap_or_else(|| list["ids"]["trakt"].to_string());
        out.info(format!(
            "{} [{}] ({})",
            list["name"].as_str().unwrap_or(""),
            slug,
            list["privacy"].as_str().unwrap_or("")
        ));
    }
    true
}

async fn run_auth_exchange(
    dispatcher: &Dispatcher<ReqwestTransport>,
    out: &Output,
    code: Option<String>,
) -> Result<bool> {
    let code = match code {
        Some(code) => code,
        None => {
            let paths = PathManager::default();
            let settings = SettingsStore::new(paths.settings_file()).load();
            let client_id = settings.trakt.client_id().to_string();
            if client_id.is_empty() {
                out.error("Set Trakt Client ID and Client Secret in Settings first.");
                return Ok(false);
            }
            out.info("Visit the following URL to authorize this application:");
            out.info(format!(
                "{}?response_type=code&client_id={}&redirect_uri={}",
                AUTHORIZE_URL, client_id, REDIRECT_URI
            ));
            prompt_line("Authorization code: ")?
        }
    };

    let response = dispatcher.handle("exchangeCode", json!({"code": code})).await;
    if response["ok"].as_bool().unwrap_or(false) {
        out.success(format!(
            "Authenticated as {}",
            response["username"].as_str().unwrap_or("")
        ));
        Ok(true)
    } else {
        out.error(response["error"].as_str().unwrap_or("Failed."));
        Ok(false)
    }
}

fn prompt_line(prompt: &str) -> Result<String> {
    use std::io::Write;
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn run_config(out: &Output, cmd: ConfigCommands) -> Result<()> {
    let paths = PathManager::default();
    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;
    let store = SettingsStore::new(paths.settings_file());

    match cmd {
        ConfigCommands::Show => {
            let settings = store.load();
            out.info("[trakt]");
            out.field("client_id", &settings.trakt.client_id);
            out.field("client_secret", mask_secret(&settings.trakt.client_secret));
            out.field("access_token", mask_secret(&settings.trakt.access_token));
            out.field(
                "token_expires",
                settings
                    .trakt
                    .token_expires_at()
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "(unknown)".to_string()),
            );
            out.field("username", &settings.trakt.username);
            out.field("auto_add", settings.trakt.auto_add.to_string());
            out.field("list_id", &settings.trakt.list_id);
            out.info("[radarr]");
            out.field("url", &settings.radarr.url);
            out.field("api_key", mask_secret(&settings.radarr.api_key));
            out.field("root_folder_path", &settings.radarr.root_folder_path);
            out.field(
                "quality_profile_id",
                opt_display(settings.radarr.quality_profile_id),
            );
            out.field("monitored", settings.radarr.monitored.to_string());
            out.field("search_on_add", settings.radarr.search_on_add.to_string());
            out.info("[sonarr]");
            out.field("url", &settings.sonarr.url);
            out.field("api_key", mask_secret(&settings.sonarr.api_key));
            out.field("root_folder_path", &settings.sonarr.root_folder_path);
            out.field(
                "quality_profile_id",
                opt_display(settings.sonarr.quality_profile_id),
            );
            out.field(
                "language_profile_id",
                opt_display(settings.sonarr.language_profile_id),
            );
            out.field("season_folder", settings.sonarr.season_folder.to_string());
            out.field("monitored", settings.sonarr.monitored.to_string());
            out.field("search_on_add", settings.sonarr.search_on_add.to_string());
        }
        ConfigCommands::Trakt {
            client_id,
            secret,
            auto_add,
            list_id,
        } => {
            let mut trakt: TraktSettings = store.load().trakt;
            if let Some(client_id) = client_id {
                trakt.client_id = client_id;
            }
            if secret {
                trakt.client_secret = rpassword::prompt_password("Trakt Client Secret: ")?;
            }
            if let Some(auto_add) = auto_add {
                trakt.auto_add = auto_add;
            }
            if let Some(list_id) = list_id {
                trakt.list_id = list_id;
            }
            store
                .set_trakt(trakt)
                .map_err(|e| eyre!("Failed to save settings: {}", e))?;
            out.success("Trakt settings saved.");
        }
        ConfigCommands::Radarr {
            url,
            api_key,
            root_folder,
            quality_profile,
            monitored,
            search_on_add,
        } => {
            let mut radarr: RadarrSettings = store.load().radarr;
            if let Some(url) = url {
                radarr.url = url;
            }
            if let Some(api_key) = api_key {
                radarr.api_key = api_key;
            }
            if let Some(root_folder) = root_folder {
                radarr.root_folder_path = root_folder;
            }
            if let Some(quality_profile) = quality_profile {
                radarr.quality_profile_id = Some(quality_profile);
            }
            if let Some(monitored) = monitored {
                radarr.monitored = monitored;
            }
            if let Some(search_on_add) = search_on_add {
                radarr.search_on_add = search_on_add;
            }
            store
                .set_radarr(radarr)
                .map_err(|e| eyre!("Failed to save settings: {}", e))?;
            out.success("Radarr settings saved.");
        }
        ConfigCommands::Sonarr {
            url,
            api_key,
            root_folder,
            quality_profile,
            language_profile,
            season_folder,
            monitored,
            search_on_add,
        } => {
            let mut sonarr: SonarrSettings = store.load().sonarr;
            if let Some(url) = url {
                sonarr.url = url;
            }
            if let Some(api_key) = api_key {
                sonarr.api_key = api_key;
            }
            if let Some(root_folder) = root_folder {
                sonarr.root_folder_path = root_folder;
            }
            if let Some(quality_profile) = quality_profile {
                sonarr.quality_profile_id = Some(quality_profile);
            }
            if let Some(language_profile) = language_profile {
                sonarr.language_profile_id = Some(language_profile);
            }
            if let Some(season_folder) = season_folder {
                sonarr.season_folder = season_folder;
            }
            if let Some(monitored) = monitored {
                sonarr.monitored = monitored;
            }
            if let Some(search_on_add) = search_on_add {
                sonarr.search_on_add = search_on_add;
            }
            store
                .set_sonarr(sonarr)
                .map_err(|e| eyre!("Failed to save settings: {}", e))?;
            out.success("Sonarr settings saved.");
        }
    }
    Ok(())
}

fn opt_display(value: Option<i64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "(not set)".to_string())
}

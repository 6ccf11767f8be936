use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, AuthService, Clock, ProgressService, TopicService, UpsertStrategy};
use storage::catalog::{SAMPLE_CATALOG, parse_catalog};
use storage::repository::InMemoryRepository;
use storage::rest::RestConfig;
use tracing_subscriber::EnvFilter;
use tracker_core::model::{User, UserId};
use ui::{App, UiApp, build_app_context};

/// Local backends act as this user unless told otherwise, so progress
/// survives restarts.
const DEFAULT_LOCAL_USER: &str = "00000000-0000-4000-8000-000000000001";
const DEFAULT_LOCAL_EMAIL: &str = "learner@localhost";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidBackend { raw: String },
    InvalidUpsertStrategy { raw: String },
    InvalidUserId { raw: String },
    InvalidDbUrl { raw: String },
    MissingSetting { name: &'static str },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidBackend { raw } => write!(f, "invalid --backend value: {raw}"),
            ArgsError::InvalidUpsertStrategy { raw } => {
                write!(f, "invalid --upsert-strategy value: {raw}")
            }
            ArgsError::InvalidUserId { raw } => write!(f, "invalid --user-id value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::MissingSetting { name } => write!(f, "{name} must be set"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Memory,
    Sqlite,
    Remote,
}

impl Backend {
    fn from_arg(raw: &str) -> Result<Self, ArgsError> {
        match raw.trim() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            "remote" => Ok(Self::Remote),
            other => Err(ArgsError::InvalidBackend {
                raw: other.to_owned(),
            }),
        }
    }
}

fn parse_upsert_strategy(raw: &str) -> Result<UpsertStrategy, ArgsError> {
    match raw.trim() {
        "atomic" => Ok(UpsertStrategy::Atomic),
        "lookup-then-write" => Ok(UpsertStrategy::LookupThenWrite),
        other => Err(ArgsError::InvalidUpsertStrategy {
            raw: other.to_owned(),
        }),
    }
}

struct Args {
    backend: Backend,
    upsert_strategy: UpsertStrategy,
    db_url: String,
    user_id: Option<UserId>,
    email: Option<String>,
    name: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--backend memory|sqlite|remote] [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --backend <kind>   memory (sample catalog), sqlite, or remote (default: sqlite)");
    eprintln!("  --db <sqlite_url>  SQLite database (default: sqlite://tracker.sqlite3)");
    eprintln!("  --upsert-strategy <kind>");
    eprintln!("                     atomic or lookup-then-write (default: atomic)");
    eprintln!("  --user-id <uuid>   Local user id (memory/sqlite)");
    eprintln!("  --email <email>    Sign-in email (remote) or local user email");
    eprintln!("  --name <name>      Local user display name");
    eprintln!();
    eprintln!("Seed a SQLite catalog with: cargo run -p storage --bin seed -- --db <sqlite_url>");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRACKER_BACKEND, TRACKER_UPSERT_STRATEGY, TRACKER_DB_URL, TRACKER_USER_ID,");
    eprintln!("  TRACKER_EMAIL,");
    eprintln!("  TRACKER_PASSWORD, TRACKER_SUPABASE_URL, TRACKER_SUPABASE_ANON_KEY");
    eprintln!("  RUST_LOG (default: info)");
}

fn parse_user_id(raw: String) -> Result<UserId, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidUserId { raw })
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut backend = std::env::var("TRACKER_BACKEND")
            .ok()
            .map_or(Ok(Backend::Sqlite), |raw| Backend::from_arg(&raw))?;
        let mut upsert_strategy = std::env::var("TRACKER_UPSERT_STRATEGY")
            .ok()
            .map_or(Ok(UpsertStrategy::default()), |raw| parse_upsert_strategy(&raw))?;
        let mut db_url = std::env::var("TRACKER_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://tracker.sqlite3".into(), normalize_sqlite_url);
        let mut user_id = std::env::var("TRACKER_USER_ID")
            .ok()
            .map(parse_user_id)
            .transpose()?;
        let mut email = std::env::var("TRACKER_EMAIL").ok();
        let mut name = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--backend" => {
                    backend = Backend::from_arg(&require_value(args, "--backend")?)?;
                }
                "--upsert-strategy" => {
                    upsert_strategy =
                        parse_upsert_strategy(&require_value(args, "--upsert-strategy")?)?;
                }
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--user-id" => {
                    user_id = Some(parse_user_id(require_value(args, "--user-id")?)?);
                }
                "--email" => email = Some(require_value(args, "--email")?),
                "--name" => name = Some(require_value(args, "--name")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            backend,
            upsert_strategy,
            db_url,
            user_id,
            email,
            name,
        })
    }

    fn local_user(&self) -> Result<User, Box<dyn std::error::Error>> {
        let id = match self.user_id {
            Some(id) => id,
            None => DEFAULT_LOCAL_USER.parse()?,
        };
        let email = self.email.as_deref().unwrap_or(DEFAULT_LOCAL_EMAIL);
        Ok(User::new(id, email, self.name.clone())?)
    }
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn topic_service(&self) -> Arc<TopicService> {
        self.services.topics()
    }

    fn progress_service(&self) -> Arc<ProgressService> {
        self.services.progress()
    }

    fn auth_service(&self) -> Arc<AuthService> {
        self.services.auth()
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn build_services(
    args: &Args,
    clock: Clock,
) -> Result<AppServices, Box<dyn std::error::Error>> {
    match args.backend {
        Backend::Memory => {
            let repo = InMemoryRepository::with_topics(parse_catalog(SAMPLE_CATALOG)?);
            Ok(AppServices::new_in_memory(repo, clock, args.local_user()?))
        }
        Backend::Sqlite => {
            // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
            prepare_sqlite_file(&args.db_url)?;
            Ok(AppServices::new_sqlite(&args.db_url, clock, args.local_user()?).await?)
        }
        Backend::Remote => {
            let config = RestConfig::from_env()?.ok_or(ArgsError::MissingSetting {
                name: "TRACKER_SUPABASE_URL",
            })?;
            let email = args.email.as_deref().ok_or(ArgsError::MissingSetting {
                name: "--email or TRACKER_EMAIL",
            })?;
            let password = std::env::var("TRACKER_PASSWORD").map_err(|_| {
                ArgsError::MissingSetting {
                    name: "TRACKER_PASSWORD",
                }
            })?;
            Ok(AppServices::new_remote(config, clock, email, &password).await?)
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let services = build_services(&args, Clock::default_clock())
        .await?
        .with_upsert_strategy(args.upsert_strategy);
    if let Some(user) = services.current_user() {
        tracing::info!(
            backend = ?args.backend,
            upsert_strategy = ?args.upsert_strategy,
            user_id = %user.id(),
            "starting tracker"
        );
    }

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Learning Tracker")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

use std::path::PathBuf;

use clap::Parser;
use vellum_core::domain::common::{DatabaseConfig, LocalizationConfig, VellumConfig};

#[derive(Debug, Clone, Parser)]
#[command(name = "vellum-api", about = "Schema-driven document store HTTP API")]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Path to the collections definition file (a JSON list of schemas)
    #[arg(long, env = "VELLUM_COLLECTIONS", default_value = "collections.json")]
    pub collections: PathBuf,

    #[arg(long, env = "VELLUM_DEFAULT_LOCALE", default_value = "en")]
    pub default_locale: String,

    #[arg(
        long,
        env = "VELLUM_LOCALES",
        value_delimiter = ',',
        default_value = "en"
    )]
    pub locales: Vec<String>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ServerArgs {
    #[arg(long, env = "VELLUM_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "VELLUM_PORT", default_value_t = 3333)]
    pub port: u16,

    #[arg(long, env = "VELLUM_ROOT_PATH", default_value = "/api")]
    pub root_path: String,

    #[arg(
        long,
        env = "VELLUM_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct DatabaseArgs {
    #[arg(long = "db-host", env = "DATABASE_HOST", default_value = "localhost")]
    pub host: String,

    #[arg(long = "db-port", env = "DATABASE_PORT", default_value_t = 5432)]
    pub port: u16,

    #[arg(long = "db-user", env = "DATABASE_USER", default_value = "postgres")]
    pub username: String,

    #[arg(
        long = "db-password",
        env = "DATABASE_PASSWORD",
        default_value = "postgres"
    )]
    pub password: String,

    #[arg(long = "db-name", env = "DATABASE_NAME", default_value = "vellum")]
    pub name: String,
}

impl From<Args> for VellumConfig {
    fn from(args: Args) -> Self {
        VellumConfig {
            database: DatabaseConfig {
                host: args.database.host,
                port: args.database.port,
                username: args.database.username,
                password: args.database.password,
                name: args.database.name,
            },
            localization: LocalizationConfig {
                default_locale: args.default_locale,
                locales: args.locales,
            },
        }
    }
}

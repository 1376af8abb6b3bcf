use serde::Deserialize;
use std::env;
use std::str::FromStr;

pub const DEFAULT_POKEMON_API_BASE: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_POKEMON_SPRITES_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub limits: LimitsConfig,
    pub pokemon_api: PokemonApiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub rust_log: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Shared secret every mutating request must echo back in its `password` field.
    pub submission_password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LimitsConfig {
    pub weekly_result_cap: i64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            weekly_result_cap: 50,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PokemonApiConfig {
    pub api_base: String,
    pub sprites_base: String,
    pub search_limit: u32,
    pub results_limit: usize,
    pub timeout_secs: u64,
}

impl Default for PokemonApiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_POKEMON_API_BASE.to_string(),
            sprites_base: DEFAULT_POKEMON_SPRITES_BASE.to_string(),
            search_limit: 1500,
            results_limit: 20,
            timeout_secs: 5,
        }
    }
}

fn var_or<T>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => Ok(raw.parse()?),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;
        let max_connections: u32 = var_or("DATABASE_MAX_CONNECTIONS", 5)?;
        let submission_password = env::var("SUBMISSION_PASSWORD")?;
        if submission_password.is_empty() {
            anyhow::bail!("SUBMISSION_PASSWORD must not be empty");
        }

        let port: u16 = var_or("PORT", 8080)?;
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let limits = LimitsConfig {
            weekly_result_cap: var_or("WEEKLY_RESULT_CAP", LimitsConfig::default().weekly_result_cap)?,
        };

        let defaults = PokemonApiConfig::default();
        let pokemon_api = PokemonApiConfig {
            api_base: env::var("POKEMON_API_BASE").unwrap_or(defaults.api_base),
            sprites_base: env::var("POKEMON_SPRITES_BASE").unwrap_or(defaults.sprites_base),
            search_limit: var_or("POKEMON_SEARCH_LIMIT", defaults.search_limit)?,
            results_limit: var_or("POKEMON_RESULTS_LIMIT", defaults.results_limit)?,
            timeout_secs: var_or("POKEMON_API_TIMEOUT_SECS", defaults.timeout_secs)?,
        };

        Ok(Config {
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            server: ServerConfig { port, host, rust_log },
            auth: AuthConfig {
                submission_password,
            },
            limits,
            pokemon_api,
        })
    }
}

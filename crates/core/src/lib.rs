pub mod charts;
pub mod domain;
pub mod predict;
pub mod rng;
pub mod time;

pub mod config {
    use anyhow::Context;
    use std::path::PathBuf;

    const DEFAULT_PORT: u16 = 8000;
    const DEFAULT_MODEL_PATH: &str = "model.json";
    const DEFAULT_STATIC_DIR: &str = "static";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub port: u16,
        pub model_path: PathBuf,
        pub static_dir: PathBuf,
        pub rng_seed: Option<u64>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        /// Builds settings from an arbitrary key lookup; empty values count as unset.
        pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
            let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

            let port = match var("PORT") {
                Some(v) => v
                    .trim()
                    .parse::<u16>()
                    .with_context(|| format!("PORT must be a valid port number (got {v:?})"))?,
                None => DEFAULT_PORT,
            };

            let rng_seed = var("RNG_SEED")
                .map(|v| {
                    v.trim()
                        .parse::<u64>()
                        .with_context(|| format!("RNG_SEED must be an unsigned integer (got {v:?})"))
                })
                .transpose()?;

            Ok(Self {
                port,
                model_path: var("MODEL_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
                static_dir: var("STATIC_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
                rng_seed,
                sentry_dsn: var("SENTRY_DSN"),
            })
        }
    }

}

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
  pub node: NodeSettings,
  #[serde(default)]
  pub query: QuerySettings,
  #[serde(default)]
  pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NodeSettings {
  pub api: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuerySettings {
  #[serde(default = "default_max_blocks")]
  pub max_blocks: u32,
  #[serde(default = "default_fetch_concurrency")]
  pub fetch_concurrency: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
  #[serde(default = "default_listen")]
  pub listen: String,
}

fn default_max_blocks() -> u32 {
  100
}

fn default_fetch_concurrency() -> usize {
  8
}

fn default_listen() -> String {
  "0.0.0.0:3000".to_string()
}

impl Default for QuerySettings {
  fn default() -> Self {
    Self {
      max_blocks: default_max_blocks(),
      fetch_concurrency: default_fetch_concurrency(),
    }
  }
}

impl Default for ServerSettings {
  fn default() -> Self {
    Self {
      listen: default_listen(),
    }
  }
}

impl Settings {
  pub fn new() -> Result<Self, config::ConfigError> {
    let default_config_path = "./config.toml";
    let env_prefix = "APP"; // Environment variable prefix (e.g., APP_NODE__API=...)

    let builder = config::Config::builder()
      .add_source(config::File::with_name(default_config_path).required(true))
      // E.g., `APP_QUERY__MAX_BLOCKS=50` would override the config file value
      .add_source(config::Environment::with_prefix(env_prefix).separator("__"));

    builder.build()?.try_deserialize()
  }
}

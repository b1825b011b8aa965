//! Configuration (layered: defaults < `.env` < process env < explicit setters).

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use strum::{Display, EnumString};

use crate::error::ColloquyError;
use crate::session::FileSessionRepository;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_DOCS_DIR: &str = "docs";
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 10;
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a helpful assistant for an internal \
company portal. Use the available tools to look up weather, companies, collaborators and \
internal documentation instead of guessing. Answer concisely.";

/// Where session histories live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SessionBackend {
    #[default]
    File,
    Memory,
}

/// Everything needed to wire an agent, its tools and the HTTP surface.
#[derive(Clone)]
pub struct AgentConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: String,
    pub host: IpAddr,
    pub port: u16,
    pub docs_dir: PathBuf,
    pub sessions_dir: PathBuf,
    pub session_backend: SessionBackend,
    pub max_tool_rounds: usize,
    pub system_instruction: String,
    /// Tools offered to the model; `None` offers every registered tool.
    pub tools: Option<Vec<String>>,
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("docs_dir", &self.docs_dir)
            .field("sessions_dir", &self.sessions_dir)
            .field("session_backend", &self.session_backend)
            .field("max_tool_rounds", &self.max_tool_rounds)
            .field("tools", &self.tools)
            .finish()
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            docs_dir: PathBuf::from(DEFAULT_DOCS_DIR),
            sessions_dir: FileSessionRepository::default_dir(),
            session_backend: SessionBackend::File,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            tools: None,
        }
    }
}

impl AgentConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ColloquyError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ColloquyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        config.api_key = get("GEMINI_API_KEY").or_else(|| get("GOOGLE_API_KEY"));
        config.base_url = get("GEMINI_BASE_URL");
        if let Some(model) = get("MODEL") {
            config.model = model;
        }
        if let Some(host) = get("HTTP_HOST") {
            config.host = parse_value("HTTP_HOST", &host)?;
        }
        if let Some(port) = get("HTTP_PORT") {
            config.port = parse_value("HTTP_PORT", &port)?;
        }
        if let Some(dir) = get("DOCS_DIR") {
            config.docs_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get("SESSIONS_DIR") {
            config.sessions_dir = PathBuf::from(dir);
        }
        if let Some(backend) = get("SESSION_BACKEND") {
            config.session_backend = parse_value("SESSION_BACKEND", &backend)?;
        }
        if let Some(rounds) = get("MAX_TOOL_ROUNDS") {
            config.max_tool_rounds = parse_value("MAX_TOOL_ROUNDS", &rounds)?;
        }
        if let Some(instruction) = get("SYSTEM_INSTRUCTION") {
            config.system_instruction = instruction;
        }
        if let Some(tools) = get("TOOLS") {
            config.tools = Some(parse_list(&tools));
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    pub fn with_docs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.docs_dir = dir.into();
        self
    }

    pub fn with_sessions_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.sessions_dir = dir.into();
        self
    }

    pub fn with_session_backend(mut self, backend: SessionBackend) -> Self {
        self.session_backend = backend;
        self
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ColloquyError> {
    raw.parse()
        .map_err(|_| ColloquyError::Configuration(format!("invalid value for {key}: {raw:?}")))
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AgentConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.max_tool_rounds, 10);
        assert_eq!(config.session_backend, SessionBackend::File);
        assert!(config.api_key.is_none());
        assert!(config.tools.is_none());
    }

    #[test]
    fn environment_values_override_defaults() {
        let config = AgentConfig::from_lookup(lookup(&[
            ("GOOGLE_API_KEY", "fallback"),
            ("MODEL", "gemini-2.5-pro"),
            ("HTTP_PORT", "9000"),
            ("HTTP_HOST", "127.0.0.1"),
            ("SESSION_BACKEND", "Memory"),
            ("MAX_TOOL_ROUNDS", "3"),
            ("TOOLS", "get_weather, search_docs,,"),
        ]))
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("fallback"));
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.session_backend, SessionBackend::Memory);
        assert_eq!(config.max_tool_rounds, 3);
        assert_eq!(
            config.tools,
            Some(vec!["get_weather".to_string(), "search_docs".to_string()])
        );
    }

    #[test]
    fn gemini_key_wins_over_google_key() {
        let config = AgentConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "primary"),
            ("GOOGLE_API_KEY", "fallback"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn invalid_numbers_are_configuration_errors() {
        let err = AgentConfig::from_lookup(lookup(&[("HTTP_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ColloquyError::Configuration(msg) if msg.contains("HTTP_PORT")));

        let err = AgentConfig::from_lookup(lookup(&[("MAX_TOOL_ROUNDS", "-1")])).unwrap_err();
        assert!(matches!(err, ColloquyError::Configuration(_)));
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let config = AgentConfig::default().with_api_key("secret-key");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }
}

use crate::session::AutosavePolicy;
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:5000";
pub(crate) const DEFAULT_AUTOSAVE_MS: u32 = 30_000;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct EnvConfig {
    pub api_url: String,
    pub autosave_ms: u32,
    pub autosave_policy: AutosavePolicy,
}

impl EnvConfig {
    /// Reads `window.ENV`, falling back to compiled-in defaults.
    pub fn new() -> Self {
        let env = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .filter(|env| !env.is_undefined() && env.is_object());

        match env {
            Some(env) => Self::from_lookup(|key| {
                js_sys::Reflect::get(&env, &key.into())
                    .ok()
                    .and_then(|v| v.as_string().or_else(|| v.as_f64().map(|n| n.to_string())))
            }),
            None => Self::default_values(),
        }
    }

    pub(crate) fn default_values() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            autosave_ms: DEFAULT_AUTOSAVE_MS,
            autosave_policy: AutosavePolicy::FixedOrigin,
        }
    }

    /// Builds a config from a key lookup.
    ///
    /// Each setting accepts both the README style (`API_URL`) and the lowercase
    /// form (`api_url`); the uppercase key wins. Unparseable values fall back to defaults.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |upper: &str, lower: &str| {
            lookup(upper)
                .or_else(|| lookup(lower))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut cfg = Self::default_values();

        if let Some(url) = get("API_URL", "api_url") {
            cfg.api_url = url.trim_end_matches('/').to_string();
        }

        if let Some(ms) = get("AUTOSAVE_MS", "autosave_ms") {
            match ms.parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 && v <= u32::MAX as f64 => {
                    cfg.autosave_ms = v as u32;
                }
                _ => leptos::logging::warn!("ignoring invalid AUTOSAVE_MS value: {ms}"),
            }
        }

        if let Some(policy) = get("AUTOSAVE_POLICY", "autosave_policy") {
            match policy.parse::<AutosavePolicy>() {
                Ok(p) => cfg.autosave_policy = p,
                Err(_) => leptos::logging::warn!("ignoring unknown AUTOSAVE_POLICY: {policy}"),
            }
        }

        cfg
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

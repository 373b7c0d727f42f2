//! French/Arabic message catalogs.
//!
//! User-facing notification strings resolve through static JSON catalogs,
//! with French as the fallback for missing keys and unknown languages. The
//! active language is the persisted preference, else the configured
//! default.

use std::collections::HashMap;
use std::sync::LazyLock;

use souk_core::Lang;

use crate::store::LocalStore;

static FR: LazyLock<HashMap<String, String>> =
    LazyLock::new(|| load_catalog(include_str!("../locales/fr.json"), "fr"));

static AR: LazyLock<HashMap<String, String>> =
    LazyLock::new(|| load_catalog(include_str!("../locales/ar.json"), "ar"));

fn load_catalog(raw: &str, tag: &str) -> HashMap<String, String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::error!(tag, error = %e, "malformed message catalog");
        HashMap::new()
    })
}

fn catalog(lang: Lang) -> &'static HashMap<String, String> {
    match lang {
        Lang::Fr => &FR,
        Lang::Ar => &AR,
    }
}

/// Look up a message, falling back to French, then to the key itself.
#[must_use]
pub fn message(lang: Lang, key: &'static str) -> &'static str {
    catalog(lang)
        .get(key)
        .or_else(|| FR.get(key))
        .map_or(key, String::as_str)
}

/// The active interface language: the persisted preference, else `default`.
#[must_use]
pub fn active(store: &LocalStore, default: Lang) -> Lang {
    store.language().unwrap_or(default)
}

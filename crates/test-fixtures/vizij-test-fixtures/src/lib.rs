use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    pages: HashMap<String, String>,
}

/// Recorded page geometry: viewport, scroll offset and element boxes in document space.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PageLayout {
    pub viewport_height: f64,
    pub scroll_top: f64,
    pub elements: BTreeMap<String, ElementBox>,
}

#[derive(Copy, Clone, Debug, Deserialize, PartialEq)]
pub struct ElementBox {
    /// Distance from the document top to the element's top edge.
    pub doc_top: f64,
    pub height: f64,
}

impl PageLayout {
    pub fn element(&self, name: &str) -> Result<ElementBox> {
        self.elements
            .get(name)
            .copied()
            .ok_or_else(|| anyhow!("page has no element '{name}'"))
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod pages {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.pages.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.pages, "page", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.pages, "page", name)?;
        super::load_json(rel)
    }

    pub fn layout(name: &str) -> Result<PageLayout> {
        load(name)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.pages, "page", name)?;
        Ok(resolve_path(rel))
    }
}

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::MapModel;

/// All maps known to the editor, plus which one (at most) is selected. Persists as
/// pretty-printed JSON at the path it was loaded from.
#[derive(Serialize, Deserialize)]
pub struct MapStore {
    maps: BTreeMap<String, MapModel>,
    selected: Option<String>,
    #[serde(skip)]
    path: String,
}

impl MapStore {
    pub const DEFAULT_PATH: &'static str = "maps.json";

    /// An empty store that'll persist at the given path.
    pub fn empty(path: &str) -> MapStore {
        MapStore {
            maps: BTreeMap::new(),
            selected: None,
            path: path.to_string(),
        }
    }

    /// Loads the store, or starts an empty one if the file doesn't exist yet.
    pub fn load(path: &str) -> Result<MapStore> {
        let mut store = maputil::maybe_read_json(path, MapStore::empty(path))?;
        store.path = path.to_string();
        info!("Loaded {} maps from {}", store.maps.len(), path);
        Ok(store)
    }

    pub fn store(&self) -> Result<()> {
        maputil::write_json(&self.path, self)
    }

    /// Creates an empty map with default options. A name that's already taken is left alone.
    pub fn add_map(&mut self, name: &str) {
        if self.maps.contains_key(name) {
            return;
        }
        self.maps.insert(name.to_string(), MapModel::new(name));
    }

    pub fn get_map(&self, name: &str) -> Option<&MapModel> {
        self.maps.get(name)
    }

    pub fn get_map_mut(&mut self, name: &str) -> Option<&mut MapModel> {
        self.maps.get_mut(name)
    }

    /// Deletes the map, dropping the selection if it pointed there.
    pub fn delete_map(&mut self, name: &str) -> Option<MapModel> {
        if self.selected.as_deref() == Some(name) {
            self.selected = None;
        }
        self.maps.remove(name)
    }

    pub fn map_names(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(|name| name.as_str())
    }

    pub fn selected_map_name(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Selects an existing map; returns whether the name was known.
    pub fn select_map(&mut self, name: &str) -> bool {
        if self.maps.contains_key(name) {
            self.selected = Some(name.to_string());
            true
        } else {
            false
        }
    }

    pub fn selected_map(&self) -> Option<&MapModel> {
        self.maps.get(self.selected.as_ref()?)
    }

    pub fn selected_map_mut(&mut self) -> Option<&mut MapModel> {
        let name = self.selected.clone()?;
        self.maps.get_mut(&name)
    }
}

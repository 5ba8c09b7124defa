//! Per-polygon normal storage
//!
//! The [`NormalStore`] remembers which Direction the user assigned to each
//! polygon. It is persisted by the host as one string property per mesh
//! object (see [`PropertySlots`]) holding a JSON object
//! `{"<polygon index>": [x, y, z]}`.
//!
//! Loading never fails: a missing or malformed property yields an empty
//! store. Keys are not checked against the current topology, so after the
//! host changes the mesh some entries may refer to polygons that no longer
//! exist; [`NormalStore::iter_valid`] skips them.

use crate::Direction;
use hashbrown::HashMap;
use std::collections::BTreeMap;

/// Property name the store is saved under
pub const NORMAL_STORE_KEY: &str = "local_normal_editor_data";

/// Host persistent key-value storage, one string per `(object, key)`
pub trait PropertySlots {
    /// Read a property, `None` if absent
    fn read(&self, object_id: &str, key: &str) -> Option<String>;

    /// Write (or overwrite) a property
    fn write(&mut self, object_id: &str, key: &str, value: String);
}

/// In-memory [`PropertySlots`]
#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    slots: HashMap<(String, String), String>,
}

impl MemorySlots {
    /// Create empty slots
    pub fn new() -> Self {
        Self::default()
    }
}

impl PropertySlots for MemorySlots {
    fn read(&self, object_id: &str, key: &str) -> Option<String> {
        self.slots
            .get(&(object_id.to_string(), key.to_string()))
            .cloned()
    }

    fn write(&mut self, object_id: &str, key: &str, value: String) {
        self.slots
            .insert((object_id.to_string(), key.to_string()), value);
    }
}

/// Polygon index -> Direction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalStore {
    normals: BTreeMap<usize, Direction>,
}

impl NormalStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the store of `object_id`, empty when absent or unreadable
    pub fn load<S: PropertySlots + ?Sized>(slots: &S, object_id: &str) -> Self {
        match slots.read(object_id, NORMAL_STORE_KEY) {
            Some(text) => Self::from_json(&text),
            None => Self::new(),
        }
    }

    /// Save the store into the `object_id` property
    pub fn save<S: PropertySlots + ?Sized>(&self, slots: &mut S, object_id: &str) {
        slots.write(object_id, NORMAL_STORE_KEY, self.to_json());
        tracing::debug!("Saved {} stored normals for {}", self.len(), object_id);
    }

    /// Parse the persisted encoding, empty on any error
    pub fn from_json(text: &str) -> Self {
        let parsed: BTreeMap<String, [f32; 3]> = match serde_json::from_str(text) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Ignoring malformed normal store: {}", e);
                return Self::new();
            }
        };

        let mut normals = BTreeMap::new();
        for (key, v) in parsed {
            match key.trim().parse::<usize>() {
                Ok(index) => {
                    normals.insert(index, Direction::from(v));
                }
                Err(_) => {
                    tracing::warn!("Ignoring malformed normal store: bad polygon key {:?}", key);
                    return Self::new();
                }
            }
        }
        Self { normals }
    }

    /// Persisted encoding, keys in ascending polygon order
    pub fn to_json(&self) -> String {
        let data: BTreeMap<String, [f32; 3]> = self
            .normals
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_array()))
            .collect();
        // A map of strings to float arrays always serializes
        serde_json::to_string(&data).unwrap_or_else(|_| "{}".to_string())
    }

    /// Stored direction of `polygon`
    pub fn get(&self, polygon: usize) -> Option<Direction> {
        self.normals.get(&polygon).copied()
    }

    /// Set the direction of `polygon`
    pub fn insert(&mut self, polygon: usize, direction: Direction) {
        self.normals.insert(polygon, direction);
    }

    /// Forget `polygon`
    pub fn remove(&mut self, polygon: usize) -> Option<Direction> {
        self.normals.remove(&polygon)
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.normals.clear();
    }

    /// Number of stored polygons
    pub fn len(&self) -> usize {
        self.normals.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.normals.is_empty()
    }

    /// All entries, ascending by polygon
    pub fn iter(&self) -> impl Iterator<Item = (usize, Direction)> + '_ {
        self.normals.iter().map(|(&k, &v)| (k, v))
    }

    /// Entries whose polygon index exists in a mesh of `polygon_count` polygons
    pub fn iter_valid(&self, polygon_count: usize) -> impl Iterator<Item = (usize, Direction)> + '_ {
        self.iter().filter(move |&(polygon, _)| {
            let valid = polygon < polygon_count;
            if !valid {
                tracing::debug!("Skipping stale stored normal for polygon {}", polygon);
            }
            valid
        })
    }
}

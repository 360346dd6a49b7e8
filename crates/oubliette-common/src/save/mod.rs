//! Save-data management for mod features.
//!
//! Each feature registers its state under a unique key with a lifetime
//! that controls when the state is reset back to its defaults. Persistent
//! and run state round-trips through the host's save slot as a single
//! JSON document; level and room state is never persisted, since play
//! reconstructs it.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save-data key \"{0}\" is already registered")]
    DuplicateKey(String),
    #[error("failed to serialize save data for \"{key}\": {source}")]
    Serialize {
        key: String,
        source: serde_json::Error,
    },
    #[error("failed to deserialize save data for \"{key}\": {source}")]
    Deserialize {
        key: String,
        source: serde_json::Error,
    },
    #[error("save-data document is not a JSON object")]
    MalformedDocument,
}

/// How long a piece of feature state lives before being reset to its
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Lifetime {
    /// Survives across runs; always persisted.
    Persistent,
    /// Reset when a new run starts; persisted so that continuing a run
    /// restores it.
    Run,
    /// Reset when a new level starts.
    Level,
    /// Reset when a new room is entered.
    Room,
}

impl Lifetime {
    fn is_persisted(self) -> bool {
        matches!(self, Lifetime::Persistent | Lifetime::Run)
    }
}

/// Handle to one feature's registered state. Cheap to clone into
/// callback closures.
pub struct SaveData<T> {
    inner: Rc<RefCell<T>>,
}

impl<T> Clone for SaveData<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> SaveData<T> {
    pub fn borrow(&self) -> Ref<'_, T> {
        self.inner.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.inner.borrow_mut()
    }
}

trait SaveSlot {
    fn lifetime(&self) -> Lifetime;
    fn reset(&self);
    fn to_value(&self) -> Result<Value, serde_json::Error>;
    fn load_value(&self, value: Value) -> Result<(), serde_json::Error>;
    fn should_save(&self) -> bool;
}

struct TypedSlot<T> {
    data: Rc<RefCell<T>>,
    lifetime: Lifetime,
    condition: Option<Box<dyn Fn() -> bool>>,
}

impl<T: Serialize + DeserializeOwned + Default + 'static> SaveSlot for TypedSlot<T> {
    fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    fn reset(&self) {
        *self.data.borrow_mut() = T::default();
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(&*self.data.borrow())
    }

    fn load_value(&self, value: Value) -> Result<(), serde_json::Error> {
        *self.data.borrow_mut() = serde_json::from_value(value)?;
        Ok(())
    }

    fn should_save(&self) -> bool {
        self.condition.as_ref().map_or(true, |condition| condition())
    }
}

/// Registry of all feature save data, keyed by feature name.
pub struct SaveDataManager {
    slots: BTreeMap<String, Box<dyn SaveSlot>>,
}

impl SaveDataManager {
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    /// Register feature state under a unique key.
    pub fn register<T>(&mut self, key: &str, lifetime: Lifetime) -> Result<SaveData<T>, SaveError>
    where
        T: Serialize + DeserializeOwned + Default + 'static,
    {
        self.register_slot(key, lifetime, None)
    }

    /// Like [`register`](Self::register), but the feature is skipped
    /// during serialization whenever `condition` returns false.
    pub fn register_with_condition<T>(
        &mut self,
        key: &str,
        lifetime: Lifetime,
        condition: impl Fn() -> bool + 'static,
    ) -> Result<SaveData<T>, SaveError>
    where
        T: Serialize + DeserializeOwned + Default + 'static,
    {
        self.register_slot(key, lifetime, Some(Box::new(condition)))
    }

    fn register_slot<T>(
        &mut self,
        key: &str,
        lifetime: Lifetime,
        condition: Option<Box<dyn Fn() -> bool>>,
    ) -> Result<SaveData<T>, SaveError>
    where
        T: Serialize + DeserializeOwned + Default + 'static,
    {
        if self.slots.contains_key(key) {
            return Err(SaveError::DuplicateKey(key.to_string()));
        }

        let data = Rc::new(RefCell::new(T::default()));
        self.slots.insert(
            key.to_string(),
            Box::new(TypedSlot {
                data: Rc::clone(&data),
                lifetime,
                condition,
            }),
        );

        Ok(SaveData { inner: data })
    }

    pub fn registered_keys(&self) -> Vec<&str> {
        self.slots.keys().map(String::as_str).collect()
    }

    /// Reset run, level, and room state. Called when a new run starts.
    pub fn reset_run(&mut self) {
        self.reset_from(Lifetime::Run);
    }

    /// Reset level and room state. Called when a new level starts.
    pub fn reset_level(&mut self) {
        self.reset_from(Lifetime::Level);
    }

    /// Reset room state. Called when a new room is entered.
    pub fn reset_room(&mut self) {
        self.reset_from(Lifetime::Room);
    }

    fn reset_from(&mut self, boundary: Lifetime) {
        for (key, slot) in &self.slots {
            if slot.lifetime() >= boundary {
                debug!(target: "save", "Resetting save data: {}", key);
                slot.reset();
            }
        }
    }

    /// Serialize all persisted state into the document handed to the
    /// host's save slot.
    pub fn serialize(&self) -> Result<String, SaveError> {
        let mut document = serde_json::Map::new();

        for (key, slot) in &self.slots {
            if !slot.lifetime().is_persisted() || !slot.should_save() {
                continue;
            }

            let value = slot.to_value().map_err(|source| SaveError::Serialize {
                key: key.clone(),
                source,
            })?;
            document.insert(key.clone(), value);
        }

        serde_json::to_string(&Value::Object(document)).map_err(|source| SaveError::Serialize {
            key: "<document>".to_string(),
            source,
        })
    }

    /// Restore persisted state from a document produced by
    /// [`serialize`](Self::serialize).
    ///
    /// Keys with no registered feature are ignored (the feature may have
    /// been removed in a newer mod version); registered features missing
    /// from the document keep their defaults.
    pub fn load(&mut self, document: &str) -> Result<(), SaveError> {
        let parsed: Value =
            serde_json::from_str(document).map_err(|_| SaveError::MalformedDocument)?;
        let Value::Object(entries) = parsed else {
            return Err(SaveError::MalformedDocument);
        };

        for (key, value) in entries {
            let Some(slot) = self.slots.get(&key) else {
                debug!(target: "save", "Ignoring unknown save-data key: {}", key);
                continue;
            };
            if !slot.lifetime().is_persisted() {
                continue;
            }

            slot.load_value(value).map_err(|source| SaveError::Deserialize {
                key: key.clone(),
                source,
            })?;
        }

        Ok(())
    }
}

impl Default for SaveDataManager {
    fn default() -> Self {
        Self::new()
    }
}

//! Persistence of value tables.
//!
//! Two formats are supported:
//!
//! - **JSON** (`.json`): a flat object from canonical board label to value,
//!   e.g. `{"..X/.O./...": 0.12}`. Visit counts are not kept.
//! - **MessagePack** (`.msgpack`): a versioned snapshot that also keeps the
//!   visit counts, the averaging policy and the initializer, so Monte Carlo
//!   sample-mean training can resume exactly.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, ErrorKind},
    path::Path,
};

use serde::{Deserialize, Serialize};

use super::store::{Averaging, Entry, Initializer, ValueStore};
use crate::{Error, Result, tictactoe::GameState};

/// Canonical label → value mapping of every entry in `store`.
pub fn to_labels(store: &ValueStore) -> BTreeMap<String, f64> {
    store
        .iter()
        .map(|(state, entry)| (state.canonical_form().label(), entry.value))
        .collect()
}

/// Rebuild a store from a label → value mapping.
///
/// # Errors
///
/// Returns an error if a label is not a valid board.
pub fn from_labels(labels: &BTreeMap<String, f64>, mut store: ValueStore) -> Result<ValueStore> {
    for (label, &value) in labels {
        let state = GameState::from_label(label)?;
        store.set(&state, value);
    }
    Ok(store)
}

/// Versioned binary snapshot of a store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueSnapshot {
    pub version: u32,
    pub initializer: Initializer,
    pub averaging: Averaging,
    pub entries: Vec<(String, Entry)>,
}

impl ValueSnapshot {
    pub const VERSION: u32 = 1;

    pub fn from_store(store: &ValueStore) -> Self {
        let mut entries: Vec<(String, Entry)> = store
            .iter()
            .map(|(state, entry)| (state.canonical_form().label(), *entry))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        Self {
            version: Self::VERSION,
            initializer: store.initializer(),
            averaging: store.averaging(),
            entries,
        }
    }

    pub fn into_store(self) -> Result<ValueStore> {
        if self.version != Self::VERSION {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "unsupported value snapshot version {} (expected {})",
                    self.version,
                    Self::VERSION
                ),
            });
        }

        let mut store = ValueStore::new(self.initializer).with_averaging(self.averaging);
        for (label, entry) in self.entries {
            let state = GameState::from_label(&label)?;
            store.insert_entry(&state, entry);
        }
        Ok(store)
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|source| Error::Io {
        operation: format!("create {}", path.display()),
        source,
    })?;
    Ok(BufWriter::new(file))
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|source| Error::Io {
        operation: format!("open {}", path.display()),
        source,
    })?;
    Ok(BufReader::new(file))
}

pub fn save_json<P: AsRef<Path>>(store: &ValueStore, path: P) -> Result<()> {
    let writer = create(path.as_ref())?;
    serde_json::to_writer_pretty(writer, &to_labels(store))?;
    Ok(())
}

/// Load a JSON table into a learning store (unseen states start uniform in [-1, 1]).
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<ValueStore> {
    let reader = open(path.as_ref())?;
    let labels: BTreeMap<String, f64> = serde_json::from_reader(reader)?;
    from_labels(&labels, ValueStore::learning())
}

pub fn save_msgpack<P: AsRef<Path>>(store: &ValueStore, path: P) -> Result<()> {
    let mut writer = create(path.as_ref())?;
    rmp_serde::encode::write(&mut writer, &ValueSnapshot::from_store(store))?;
    Ok(())
}

pub fn load_msgpack<P: AsRef<Path>>(path: P) -> Result<ValueStore> {
    let reader = open(path.as_ref())?;
    let snapshot: ValueSnapshot = rmp_serde::decode::from_read(reader)?;
    snapshot.into_store()
}

fn is_msgpack(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("msgpack") || ext.eq_ignore_ascii_case("mp"))
}

/// Save in the format implied by the file extension (JSON unless `.msgpack`).
pub fn save<P: AsRef<Path>>(store: &ValueStore, path: P) -> Result<()> {
    let path = path.as_ref();
    if is_msgpack(path) {
        save_msgpack(store, path)
    } else {
        save_json(store, path)
    }?;
    log::debug!("saved {} states to {}", store.len(), path.display());
    Ok(())
}

/// Load in the format implied by the file extension (JSON unless `.msgpack`).
pub fn load<P: AsRef<Path>>(path: P) -> Result<ValueStore> {
    let path = path.as_ref();
    let store = if is_msgpack(path) {
        load_msgpack(path)
    } else {
        load_json(path)
    }?;
    log::info!("loaded {} states from {}", store.len(), path.display());
    Ok(store)
}

/// Load a table, falling back to an empty learning store if the file is missing.
///
/// # Errors
///
/// Only errors other than "file not found" are returned.
pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Result<ValueStore> {
    let path = path.as_ref();
    match load(path) {
        Ok(store) => Ok(store),
        Err(Error::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
            log::warn!(
                "value table {} not found, continuing with an empty table",
                path.display()
            );
            Ok(ValueStore::learning())
        }
        Err(err) => Err(err),
    }
}

//! Deadline alert definitions and where they are kept.
//!
//! Alerts live behind an [`AlertStore`] capability (load, save, subscribe)
//! so nothing else in the crate depends on where they are persisted.
//! [`AlertBook`] layers the list operations on top of a store.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ResultExt};

/// A reminder on a work's events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub work_id: String,
    /// Event description the alert watches
    pub event_filter: String,
    pub recurrence_days: u32,
    pub recurrence_active: bool,
    pub lead_time_days: u32,
    pub lead_time_active: bool,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
}

/// Callback invoked with the full list after every save.
pub type Listener = Box<dyn Fn(&[Alert]) + Send + Sync>;

/// Handle returned by [`AlertStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Persistence capability for the alert list.
pub trait AlertStore: Send + Sync {
    fn load(&self) -> Result<Vec<Alert>>;
    fn save(&self, alerts: &[Alert]) -> Result<()>;
    fn subscribe(&self, listener: Listener) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId);
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Arc<Listener>)>,
}

impl Listeners {
    fn add(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Arc::new(listener)));
        id
    }

    fn remove(&mut self, id: SubscriptionId) {
        self.entries.retain(|(existing, _)| *existing != id);
    }

    fn snapshot(&self) -> Vec<Arc<Listener>> {
        self.entries.iter().map(|(_, l)| Arc::clone(l)).collect()
    }
}

fn notify(listeners: &Mutex<Listeners>, alerts: &[Alert]) {
    // copy out so a listener can subscribe or unsubscribe without deadlocking
    let snapshot = listeners.lock().snapshot();
    for listener in snapshot {
        listener(alerts);
    }
}

/// Store kept in memory only.
#[derive(Default)]
pub struct MemoryAlertStore {
    alerts: RwLock<Vec<Alert>>,
    listeners: Mutex<Listeners>,
}

impl MemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alerts(alerts: Vec<Alert>) -> Self {
        Self {
            alerts: RwLock::new(alerts),
            listeners: Mutex::default(),
        }
    }
}

impl AlertStore for MemoryAlertStore {
    fn load(&self) -> Result<Vec<Alert>> {
        Ok(self.alerts.read().clone())
    }

    fn save(&self, alerts: &[Alert]) -> Result<()> {
        *self.alerts.write() = alerts.to_vec();
        notify(&self.listeners, alerts);
        Ok(())
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        self.listeners.lock().add(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.lock().remove(id);
    }
}

/// Store backed by a JSON file. A missing file reads as an empty list.
pub struct JsonFileAlertStore {
    path: PathBuf,
    write_lock: Mutex<()>,
    listeners: Mutex<Listeners>,
}

impl JsonFileAlertStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            listeners: Mutex::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AlertStore for JsonFileAlertStore {
    fn load(&self) -> Result<Vec<Alert>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::from(e)).context(format!("Reading {}", self.path.display()))
            }
        };
        serde_json::from_str(&contents)
            .map_err(|e| Error::AlertStore(format!("{}: {e}", self.path.display())))
    }

    fn save(&self, alerts: &[Alert]) -> Result<()> {
        {
            let _guard = self.write_lock.lock();
            let json = serde_json::to_string_pretty(alerts)?;
            // write-then-rename so readers never see a partial file
            let tmp = self.path.with_extension("json.tmp");
            fs::write(&tmp, json)
                .map_err(Error::from)
                .context(format!("Writing {}", tmp.display()))?;
            fs::rename(&tmp, &self.path)
                .map_err(Error::from)
                .context(format!("Replacing {}", self.path.display()))?;
        }
        log::debug!("Saved {} alerts to {}", alerts.len(), self.path.display());
        notify(&self.listeners, alerts);
        Ok(())
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        self.listeners.lock().add(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.lock().remove(id);
    }
}

/// List operations over a store. Every mutation is persisted immediately.
pub struct AlertBook<S: AlertStore> {
    store: S,
}

impl<S: AlertStore> AlertBook<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn alerts(&self) -> Result<Vec<Alert>> {
        self.store.load()
    }

    /// Alerts attached to one work.
    pub fn for_work(&self, work_id: &str) -> Result<Vec<Alert>> {
        Ok(self
            .store
            .load()?
            .into_iter()
            .filter(|a| a.work_id == work_id)
            .collect())
    }

    /// Replace the alert with the same id, or append it.
    pub fn upsert(&self, alert: Alert) -> Result<()> {
        let mut alerts = self.store.load()?;
        match alerts.iter_mut().find(|a| a.id == alert.id) {
            Some(existing) => *existing = alert,
            None => alerts.push(alert),
        }
        self.store.save(&alerts)
    }

    /// Remove by id. Returns false if no alert had that id.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut alerts = self.store.load()?;
        let before = alerts.len();
        alerts.retain(|a| a.id != id);
        if alerts.len() == before {
            return Ok(false);
        }
        self.store.save(&alerts)?;
        Ok(true)
    }
}

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use crate::display::render_report;
use crate::draw::{DayMode, DrawLists, DrawReport, Drawer, ListKind, RandomSource};
use crate::error::{SessionError, StoreError};
use crate::store::KeyValueStore;

/// Store key of the saved raw input lists
pub const INPUTS_KEY: &str = "draw_inputs";

/// Raw lists as persisted, stamped with the time they were saved
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedInputs {
    #[serde(flatten)]
    lists: DrawLists,
    saved_at: DateTime<Utc>,
}

pub fn save_inputs(
    store: &dyn KeyValueStore,
    lists: &DrawLists,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    let saved = SavedInputs {
        lists: lists.clone(),
        saved_at: now,
    };
    store.set(INPUTS_KEY, &serde_json::to_string(&saved)?)
}

/// Reads saved lists back. A record at least `ttl` old, or one that no
/// longer decodes, is removed and ignored.
pub fn restore_inputs(
    store: &dyn KeyValueStore,
    now: DateTime<Utc>,
    ttl: Duration,
) -> Result<Option<DrawLists>, StoreError> {
    let Some(blob) = store.get(INPUTS_KEY)? else {
        return Ok(None);
    };
    let saved: SavedInputs = match serde_json::from_str(&blob) {
        Ok(saved) => saved,
        Err(e) => {
            warn!(error = %e, "discarding unreadable input lists");
            store.remove(INPUTS_KEY)?;
            return Ok(None);
        }
    };

    if now - saved.saved_at < ttl {
        Ok(Some(saved.lists))
    } else {
        info!(saved_at = %saved.saved_at, "discarding expired input lists");
        store.remove(INPUTS_KEY)?;
        Ok(None)
    }
}

/// State of one user session: the lists being edited, the active mode
/// and the last successful draw.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Session {
    pub mode: DayMode,
    pub lists: DrawLists,
    pub last_draw: Option<DrawReport>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a trimmed value to a list. Blank values are rejected.
    pub fn add_item(&mut self, kind: ListKind, value: &str) -> Result<(), SessionError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(SessionError::EmptyValue);
        }
        self.lists.get_mut(kind).push(value.to_string());
        Ok(())
    }

    pub fn remove_item(&mut self, kind: ListKind, index: usize) -> Result<String, SessionError> {
        let list = self.lists.get_mut(kind);
        if index >= list.len() {
            return Err(SessionError::IndexOutOfRange {
                list: kind.name(),
                index,
                len: list.len(),
            });
        }
        Ok(list.remove(index))
    }

    pub fn has_draw(&self) -> bool {
        self.last_draw.is_some()
    }

    /// Printable text of the last draw
    pub fn printable(&self) -> Result<String, SessionError> {
        self.last_draw
            .as_ref()
            .map(render_report)
            .ok_or(SessionError::NoDrawYet)
    }
}

/// A session bound to its store and drawer. Every list edit is saved so it
/// can be restored within the input lifetime.
pub struct SessionContext {
    store: Arc<dyn KeyValueStore>,
    drawer: Drawer,
    session: Session,
}

impl SessionContext {
    /// Starts a session, restoring unexpired lists from the store.
    /// Returns whether saved lists were recovered.
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        input_ttl: Duration,
    ) -> Result<(Self, bool), SessionError> {
        let mut session = Session::new();
        let restored = match restore_inputs(store.as_ref(), Utc::now(), input_ttl)? {
            Some(lists) => {
                session.lists = lists;
                true
            }
            None => false,
        };
        if restored {
            info!("recovered input lists from storage");
        }

        let drawer = Drawer::new(store.clone());
        Ok((
            Self {
                store,
                drawer,
                session,
            },
            restored,
        ))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn add_item(&mut self, kind: ListKind, value: &str) -> Result<(), SessionError> {
        self.session.add_item(kind, value)?;
        self.save()
    }

    pub fn remove_item(&mut self, kind: ListKind, index: usize) -> Result<String, SessionError> {
        let removed = self.session.remove_item(kind, index)?;
        self.save()?;
        Ok(removed)
    }

    /// Replaces all lists at once, e.g. after loading them from a file
    pub fn replace_lists(&mut self, lists: DrawLists) -> Result<(), SessionError> {
        self.session.lists = lists;
        self.save()
    }

    pub fn set_mode(&mut self, mode: DayMode) {
        self.session.mode = mode;
    }

    /// Runs a draw for the current mode and keeps it as the last draw
    pub fn draw<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<&DrawReport, SessionError> {
        let report = self.drawer.draw(self.session.mode, &self.session.lists, rng)?;
        let report = self.session.last_draw.insert(report);
        Ok(&*report)
    }

    pub fn printable(&self) -> Result<String, SessionError> {
        self.session.printable()
    }

    /// Starts over: fresh session, saved lists removed, and every shift
    /// category's previous assignment forgotten.
    pub fn clear_all(&mut self) -> Result<(), SessionError> {
        self.session = Session::new();
        self.store.remove(INPUTS_KEY)?;
        self.drawer.memory().clear_all()?;
        info!("cleared all session data");
        Ok(())
    }

    fn save(&self) -> Result<(), SessionError> {
        save_inputs(self.store.as_ref(), &self.session.lists, Utc::now())?;
        Ok(())
    }
}

//! Reading and writing the settings document, and the change detection
//! behind the settings snapshot listener.

use std::{future::Future, rc::Rc};

use async_trait::async_trait;

use crate::{
    firestore::{Document, DocumentPath},
    settings::AlertSettings,
    status::{StatusSnapshot, StatusView},
    subscription::Cancellation,
    Result,
};

#[async_trait(?Send)]
pub trait StatusSource {
    async fn fetch_status(&self) -> Result<StatusSnapshot>;
}

pub async fn poll_status<S: StatusSource + ?Sized>(source: &S) -> StatusView {
    StatusView::from_poll(source.fetch_status().await)
}

#[async_trait(?Send)]
pub trait SettingsStore {
    /// `Ok(None)` when the document does not exist.
    async fn load(&self, path: &DocumentPath) -> Result<Option<Document>>;
    /// Replaces the whole document, dropping fields not present in `document`.
    async fn replace(&self, path: &DocumentPath, document: &Document) -> Result<()>;
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MissingDocument {
    UseDefaults,
    CreateWithDefaults,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Snapshot {
    pub settings: AlertSettings,
    pub revision: Option<String>,
}

/// Reads the settings document. A missing document is only created while
/// `cancellation` is still live, so a reader torn down mid-request never
/// writes.
pub async fn read_settings<S: SettingsStore + ?Sized>(
    store: &S,
    path: &DocumentPath,
    on_missing: MissingDocument,
    cancellation: &Cancellation,
) -> Result<Snapshot> {
    match store.load(path).await? {
        Some(document) => Ok(Snapshot {
            settings: AlertSettings::from(&document),
            revision: document.revision().map(str::to_string),
        }),
        None => {
            let settings = AlertSettings::default();
            match on_missing {
                MissingDocument::UseDefaults => {
                    log::warn!("settings document {path} not found, using defaults");
                }
                MissingDocument::CreateWithDefaults if cancellation.is_cancelled() => {
                    log::debug!("reader of {path} went away, not creating the document");
                }
                MissingDocument::CreateWithDefaults => {
                    log::info!("creating settings document {path} with defaults");
                    if let Err(error) = store.replace(path, &Document::from(&settings)).await {
                        log::error!("error writing default settings to {path}: {error}");
                    }
                }
            }
            Ok(Snapshot {
                settings,
                revision: None,
            })
        }
    }
}

pub async fn save_settings<S: SettingsStore + ?Sized>(
    store: &S,
    path: &DocumentPath,
    settings: &AlertSettings,
) -> Result<()> {
    store.replace(path, &Document::from(settings)).await
}

/// Emits settings only when they differ from the previously delivered ones.
///
/// A new revision carrying the same settings (the document healed with
/// defaults, or a save of what is already shown) is not a change.
#[derive(Default, Debug)]
pub struct SnapshotTracker {
    last: Option<Snapshot>,
}

impl SnapshotTracker {
    pub fn observe(&mut self, snapshot: Snapshot) -> Option<AlertSettings> {
        let changed = self
            .last
            .as_ref()
            .map_or(true, |last| last.settings != snapshot.settings);
        let settings = changed.then(|| snapshot.settings.clone());
        if changed {
            log::debug!("settings changed at revision {:?}", snapshot.revision);
        }
        self.last = Some(snapshot);
        settings
    }
}

/// One settings listener: repeatedly [`SettingsListener::poll`]ed by its owner.
pub struct SettingsListener<S: ?Sized> {
    store: Rc<S>,
    path: DocumentPath,
    on_missing: MissingDocument,
    tracker: SnapshotTracker,
    cancellation: Cancellation,
}

impl<S: SettingsStore + ?Sized> SettingsListener<S> {
    pub fn new(store: Rc<S>, path: DocumentPath, on_missing: MissingDocument) -> Self {
        Self {
            store,
            path,
            on_missing,
            tracker: SnapshotTracker::default(),
            cancellation: Cancellation::default(),
        }
    }

    /// Flag that stops this listener; cancelling it also suppresses the
    /// creation of a missing document by a poll already in flight.
    pub fn cancellation(&self) -> Cancellation {
        self.cancellation.clone()
    }

    /// `Ok(Some(_))` carries changed settings, `Ok(None)` means nothing changed.
    pub async fn poll(&mut self) -> Result<Option<AlertSettings>> {
        let snapshot = read_settings(
            self.store.as_ref(),
            &self.path,
            self.on_missing,
            &self.cancellation,
        )
        .await?;
        Ok(self.tracker.observe(snapshot))
    }

    /// Polls until cancelled, waiting on `pause()` between polls. Nothing is
    /// delivered to `on_update` once the listener has been cancelled.
    pub async fn run<P, F>(mut self, mut pause: P, mut on_update: impl FnMut(AlertSettings))
    where
        P: FnMut() -> F,
        F: Future<Output = ()>,
    {
        let running = self.cancellation();
        while !running.is_cancelled() {
            match self.poll().await {
                Ok(Some(settings)) if !running.is_cancelled() => on_update(settings),
                Ok(_) => {}
                Err(error) => log::error!("error subscribing to settings: {error}"),
            }
            if running.is_cancelled() {
                break;
            }
            pause().await;
        }
        log::debug!("settings listener for {} stopped", self.path);
    }
}

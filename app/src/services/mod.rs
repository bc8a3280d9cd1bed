//! Service handles built from the injected configuration.
//!
//! Each page constructs its handle when it mounts and drops it when it
//! unmounts; nothing is kept in globals.

use std::rc::Rc;

use drowsy_dashboard_shared::{
    auth::Session,
    config::DashboardConfig,
    firestore::{self, DocumentPath},
    Result,
};
use url::Url;

use self::http::{FirestoreStore, HttpStatusSource, IdentityToolkit};

pub(crate) mod audio;
pub(crate) mod http;
pub(crate) mod session;

#[derive(Clone)]
pub(crate) struct StatusServices {
    pub(crate) config: Rc<DashboardConfig>,
    pub(crate) video_feed_url: Url,
    pub(crate) status: Rc<HttpStatusSource>,
    pub(crate) settings: Rc<FirestoreStore>,
}

impl StatusServices {
    pub(crate) fn new(config: Rc<DashboardConfig>) -> Result<Self> {
        let status = HttpStatusSource::new(config.status_url()?);
        let settings = FirestoreStore::anonymous(
            firestore_endpoint(&config),
            config.firebase.project_id.clone(),
        );
        Ok(Self {
            video_feed_url: config.video_feed_url()?,
            status: Rc::new(status),
            settings: Rc::new(settings),
            config,
        })
    }
}

impl PartialEq for StatusServices {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.status, &other.status) && Rc::ptr_eq(&self.settings, &other.settings)
    }
}

#[derive(Clone)]
pub(crate) struct SettingsServices {
    pub(crate) config: Rc<DashboardConfig>,
    pub(crate) identity: Rc<IdentityToolkit>,
}

impl SettingsServices {
    pub(crate) fn new(config: Rc<DashboardConfig>) -> Result<Self> {
        Ok(Self {
            identity: Rc::new(IdentityToolkit::new(config.identity_endpoints()?)),
            config,
        })
    }

    /// Store acting with the credentials of `session`.
    pub(crate) fn settings_store(&self, session: &Session) -> FirestoreStore {
        FirestoreStore::authorized(
            firestore_endpoint(&self.config),
            self.config.firebase.project_id.clone(),
            session,
        )
    }

    pub(crate) fn settings_document(&self) -> &DocumentPath {
        &self.config.settings_document
    }
}

impl PartialEq for SettingsServices {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.identity, &other.identity)
    }
}

fn firestore_endpoint(config: &DashboardConfig) -> Url {
    config
        .firebase
        .firestore_endpoint
        .clone()
        .unwrap_or_else(firestore::default_endpoint)
}

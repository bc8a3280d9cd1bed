use std::{io, net::SocketAddr, path::PathBuf};

use drowsy_dashboard_shared::DashboardError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ServerError {
    #[error("could not read configuration {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid configuration: {0}")]
    ParseConfig(#[from] serde_yaml::Error),
    #[error("invalid dashboard configuration: {0}")]
    Dashboard(#[from] DashboardError),
    #[error("could not listen on {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("server stopped: {0}")]
    Serve(#[source] io::Error),
}

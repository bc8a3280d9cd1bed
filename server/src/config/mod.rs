use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use drowsy_dashboard_shared::config::DashboardConfig;
use serde::{Deserialize, Serialize};
use tokio::{fs::File, io::AsyncReadExt, io::BufReader};

use crate::error::ServerError;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct Configuration {
    #[serde(default = "default_listen")]
    pub(crate) listen: SocketAddr,
    /// Output directory of the web app build.
    #[serde(default = "default_dist_dir")]
    pub(crate) dist_dir: PathBuf,
    /// Alarm tone files; served from `dist_dir` when unset.
    #[serde(default)]
    pub(crate) sounds_dir: Option<PathBuf>,
    pub(crate) dashboard: DashboardConfig,
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("../app/dist")
}

impl Configuration {
    pub(crate) fn from_yaml(yaml: &str) -> Result<Self, ServerError> {
        let config = serde_yaml::from_str::<Configuration>(yaml)?;
        config.dashboard.validate()?;
        Ok(config)
    }

    pub(crate) async fn from_file(path: &Path) -> Result<Self, ServerError> {
        let read_error = |source| ServerError::ReadConfig {
            path: path.to_path_buf(),
            source,
        };
        let config = File::open(path).await.map_err(read_error)?;
        let mut config_file = String::new();
        BufReader::new(config)
            .read_to_string(&mut config_file)
            .await
            .map_err(read_error)?;
        Self::from_yaml(&config_file)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn applies_host_defaults() {
        let config = Configuration::from_yaml(
            r#"
dashboard:
  backend_url: http://localhost:5000
  firebase:
    apiKey: AIza-test
    projectId: drowsiness-system
"#,
        )
        .unwrap();
        assert_eq!(config.listen, default_listen());
        assert_eq!(config.dist_dir, PathBuf::from("../app/dist"));
        assert!(config.sounds_dir.is_none());
    }

    #[test]
    pub fn rejects_invalid_dashboard_section() {
        let result = Configuration::from_yaml(
            r#"
dashboard:
  backend_url: http://localhost:5000
  firebase:
    apiKey: ""
    projectId: drowsiness-system
"#,
        );
        assert!(matches!(result, Err(ServerError::Dashboard(_))));
    }

    #[test]
    pub fn rejects_sounds_path_the_router_cannot_mount() {
        for sounds_path in ["/config.json", "/sounds/:tone", "/*all"] {
            let result = Configuration::from_yaml(&format!(
                r#"
sounds_dir: ./sounds
dashboard:
  backend_url: http://localhost:5000
  sounds_path: "{sounds_path}"
  firebase:
    apiKey: AIza-test
    projectId: drowsiness-system
"#
            ));
            assert!(
                matches!(result, Err(ServerError::Dashboard(_))),
                "{sounds_path} should be rejected"
            );
        }
    }

    #[test]
    pub fn rejects_malformed_yaml() {
        let result = Configuration::from_yaml("dashboard: [1, 2");
        assert!(matches!(result, Err(ServerError::ParseConfig(_))));
    }
}

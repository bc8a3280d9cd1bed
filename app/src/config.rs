use std::rc::Rc;

use drowsy_dashboard_shared::{
    config::{DashboardConfig, CONFIG_PATH},
    DashboardError, Result,
};
use gloo::net::http::Request;

/// Injected configuration, shared with every page through a context.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig(pub Rc<DashboardConfig>);

pub(crate) async fn fetch_config() -> Result<AppConfig> {
    let response = Request::get(CONFIG_PATH)
        .send()
        .await
        .map_err(|e| DashboardError::Network(e.to_string()))?;
    if !response.ok() {
        return Err(DashboardError::HttpStatus(response.status()));
    }
    let body = response
        .text()
        .await
        .map_err(|e| DashboardError::Network(e.to_string()))?;
    let config = DashboardConfig::from_json(&body)?;
    Ok(AppConfig(Rc::new(config)))
}

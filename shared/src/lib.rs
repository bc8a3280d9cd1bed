pub mod alarm;
pub mod auth;
pub mod config;
pub mod error;
pub mod firestore;
pub mod identity;
pub mod settings;
pub mod status;
pub mod subscription;
pub mod sync;

pub use error::{AuthFailure, DashboardError, Result};

//! HTTP request handlers for the web server.

mod crops;
mod diseases;
mod helpers;
mod history;
mod pages;
mod predict_api;
mod static_files;

// Re-export handlers for use by the router
pub use crops::{crop_detail, crops_list};
pub use diseases::{disease_detail, diseases_list};
pub use history::{dashboard, prediction_result};
pub use pages::{about, contact, home};
pub use predict_api::{classify_image, health, predict_and_record};
pub use static_files::{serve_css, serve_js, serve_upload};

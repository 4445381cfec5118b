// Presentation layer - HTTP API driving the selection and exposing the scene
pub mod app_state;
pub mod handlers;

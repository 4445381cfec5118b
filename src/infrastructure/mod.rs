// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod feeds;
pub mod file_repository;
pub mod geojson;
pub mod http_repository;
pub mod report_client;
pub mod scene_surface;

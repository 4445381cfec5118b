// Domain layer - Pure types shared by every other layer
pub mod calendar;
pub mod device;
pub mod error;
pub mod geo;
pub mod render;
pub mod track;
pub mod zone;

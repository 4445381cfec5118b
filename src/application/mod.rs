// Application layer - Use cases over the domain, independent of transport
pub mod map_surface;
pub mod resource_locator;
pub mod selection_state;
pub mod track_aggregator;
pub mod track_fetcher;
pub mod track_repository;
pub mod zone_index;
pub mod zone_presenter;

#[cfg(test)]
pub mod testing;

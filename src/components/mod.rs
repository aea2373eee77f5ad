pub mod control_panel;
pub mod location_input;
pub mod map_view;
pub mod stats_panel;

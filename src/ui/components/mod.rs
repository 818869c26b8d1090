pub mod hold_bar;
pub mod round_card;
pub mod setup_panel;
pub mod stats_screen;

pub mod chapter_list;
pub mod explore_toggle;
pub mod map_view;
pub mod memory_panel;
pub mod music_player;

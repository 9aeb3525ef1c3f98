pub mod goto_input;
pub mod info_bar;
pub mod path_display;
pub mod preview;
pub mod tree;

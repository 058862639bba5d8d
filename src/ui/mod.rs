pub mod color;
pub mod compose;
pub mod draw;
pub mod font;
pub mod layout;
pub mod text;

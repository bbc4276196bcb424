pub mod glyph;
pub mod icon_gen;
pub mod shapes;

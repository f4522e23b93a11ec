pub mod canvas;

pub use canvas::StrokeCanvas;

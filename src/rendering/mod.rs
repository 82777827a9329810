pub mod svg_to_pdf;
pub mod svg_to_png;

pub use svg_to_pdf::{Orientation, PdfPage};
pub use svg_to_png::SvgRenderer;

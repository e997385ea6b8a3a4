pub mod ascii;
pub mod png;
pub mod scene;
pub mod surface;

pub use ascii::{
    AsciiCell, AsciiConverter, AsciiRenderer, BlockAsciiRenderer, CellGrid, LumaAsciiConverter,
};
pub use png::{encode_png, write_png};
pub use scene::LoopScene;
pub use surface::{pixmap_to_frame, RenderSurface};

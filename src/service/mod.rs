//! Rule service module: the engine facade and its Python handles

mod engine;
#[cfg(feature = "python")]
mod handle;

pub use engine::*;
#[cfg(feature = "python")]
pub use handle::*;

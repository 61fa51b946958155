pub mod extract;
pub mod pattern;
pub mod wasm;

pub use extract::*;
pub use pattern::*;
pub use wasm::*;

pub mod api;
pub mod commands;
pub mod events;
pub mod machine;
pub mod position;

pub use api::*;
pub use commands::*;
pub use events::*;
pub use machine::*;
pub use position::*;

#[cfg(test)]
mod tests;

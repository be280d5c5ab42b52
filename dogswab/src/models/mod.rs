mod pet;
mod recommendation;
mod reminder;

pub use pet::*;
pub use recommendation::*;
pub use reminder::*;

// Core models
pub mod archetype;
pub mod meta_deck;
pub mod player;
pub mod pokemon;
pub mod result;
pub mod submission;
pub mod validation;

// Re-export commonly used types
pub use archetype::*;
pub use meta_deck::*;
pub use player::*;
pub use pokemon::*;
pub use result::*;
pub use submission::*;

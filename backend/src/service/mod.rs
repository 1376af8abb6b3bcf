// Service layer for the weekly results backend
pub mod archetype_service;
pub mod player_service;
pub mod pokemon_service;
pub mod result_service;
pub mod submission_service;


pub use archetype_service::ArchetypeService;
pub use player_service::PlayerService;
pub use pokemon_service::{PokemonApiError, PokemonService};
pub use result_service::ResultService;
pub use submission_service::{
    ResolvedIds, SubmissionFailure, SubmissionReceipt, SubmissionService, SubmissionStage,
};

pub mod generation_service;
pub mod normalizer;
pub mod prompt_service;
pub mod trip_service;

pub mod mappers;
pub mod queries;
pub mod repositories;

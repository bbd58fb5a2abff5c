pub mod link_repository;
pub mod profile_repository;

pub mod links;
pub mod profiles;

pub mod assignments;
pub mod volunteers;

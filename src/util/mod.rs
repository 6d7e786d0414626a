pub mod dates;
pub mod unicode;

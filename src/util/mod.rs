pub mod dates;
pub mod macros;
pub mod numbers;

pub mod generate;
pub mod tutorial;

pub mod fixed;
pub mod text;

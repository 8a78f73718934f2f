pub mod scanner;
pub mod sequence;

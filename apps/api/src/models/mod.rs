pub mod score;
pub mod wallet;

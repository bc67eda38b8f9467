pub mod implementations;
pub mod topsis;
pub mod traits;

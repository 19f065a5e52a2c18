//! Proof oracle implementations.

pub mod keccak_oracle;
pub mod table_oracle;

pub use keccak_oracle::KeccakWorkOracle;
pub use table_oracle::TableOracle;

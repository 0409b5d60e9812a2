pub mod geodesy;
pub mod integrate;
pub mod spectrum;
pub mod sta_lta;
pub mod stats;

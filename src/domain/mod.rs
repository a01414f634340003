pub mod error;
pub mod filter;
pub mod port_record;
pub mod theme;

mod codec;

pub use codec::{decode, encode, CSV_HEADER};

mod block;
mod decoder;
mod encoder;
mod galois;

pub(crate) use block::*;
pub(crate) use decoder::*;

pub const MAX_EC_SIZE: usize = 64;

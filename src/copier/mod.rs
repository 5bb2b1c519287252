pub mod bulk;
pub mod pairing;

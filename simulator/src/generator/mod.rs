pub mod channel;
pub mod exemplar;
pub mod payload;

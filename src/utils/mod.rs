pub mod serde;
pub mod timestamps;

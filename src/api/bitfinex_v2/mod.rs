pub mod client;
pub mod mapper;
pub mod signer;
pub mod types;

pub use client::BitfinexV2Client;

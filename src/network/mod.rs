pub mod pairing;
pub mod signal_network;

pub use pairing::Pairing;
pub use signal_network::Network;

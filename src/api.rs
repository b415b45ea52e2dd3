pub mod client;
pub mod ecoguard;
pub mod heartbeat;
pub mod home_assistant;

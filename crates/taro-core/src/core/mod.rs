pub mod agent;
pub mod events;

pub mod clock;
pub mod events;
pub mod flash;
pub mod host;
pub mod state;

pub mod installer;
pub mod modal;

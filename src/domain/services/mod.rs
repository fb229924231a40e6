pub mod conflict;
pub mod payment;
pub mod promotion;
pub mod schedule;
pub mod slots;

pub mod center;
pub mod court;
pub mod maintenance;
pub mod promotion;
pub mod reservation;
pub mod user;
pub mod wallet;

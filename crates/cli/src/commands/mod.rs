pub mod menu;
pub mod order;
pub mod quote;

pub mod access;
pub mod expression;
pub mod selector;
pub mod stage;

pub mod catalogue;
pub mod compare;
pub mod diff;
pub mod inspect;
pub mod predict;

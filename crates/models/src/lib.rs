pub mod catalog;
pub mod lifecycle;
pub mod marks;
pub mod outcome;
pub mod role;
pub mod slug;
pub mod term;

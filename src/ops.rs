//! Operators. Each one is a plain description holding its upstream(s);
//! its cursor is created per subscription.

pub mod concat;
pub mod map;
pub mod map_err;
pub mod subscribe_on;
pub mod take;
pub mod zip;

#![allow(non_snake_case)]

pub mod LoginEvent;
pub mod User;

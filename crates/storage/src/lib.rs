#![forbid(unsafe_code)]

pub mod catalog;
pub mod repository;
pub mod rest;
pub mod sqlite;

pub mod server;

pub mod db;
pub mod web;
pub mod dashboard; // Client-side dashboard logic (search, palette, favicons, persistence client)

pub mod models;

pub mod app;
pub mod audit;
pub mod cart;
pub mod config;
pub mod db;
pub mod dto;
pub mod email;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pricing;
pub mod response;
pub mod routes;
pub mod services;
pub mod slug;
pub mod state;
pub mod stock;

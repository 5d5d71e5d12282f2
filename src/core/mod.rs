pub mod agent_client;
pub mod app;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod download;
pub mod layout;
pub mod menu;
pub mod message;
pub mod notifications;
pub mod theme;
pub mod turn;
pub mod turn_service;

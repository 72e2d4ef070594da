//! Ports to collaborators outside the menu core

pub mod role_provider;

pub use role_provider::RoleProvider;

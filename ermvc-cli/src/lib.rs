//! # ermvc-cli
//!
//! Command-line tool for scaffolding and inspecting ermvc applications.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ermvc init <dir>` | Create a new application |
//! | `ermvc generate model <name>` | Model struct + create-table migration |
//! | `ermvc generate controller <name>` | CRUD controller, registry entry, views |
//! | `ermvc generate resource <name>` | Model, controller and views together |
//! | `ermvc routes` | List the convention routes of the project |
//!
//! `generate` is also available as `g`.

pub mod commands;

//! # Zone 25 - Platform Economy Core
//!
//! Zone 25 is a floating ocean platform with a strict weight limit: in a
//! post-scarcity world where anything can be fabricated, the only scarce
//! resource is buoyancy. This crate implements the platform's economy and
//! enforcement core -- everything that keeps the platform afloat.
//!
//! ## Features
//!
//! - **Weight Model**: weighted item accounting with fractional categories
//!   (materials, displayed items, masterpieces) and per-body player weight.
//! - **Danger Levels**: safe/warning/critical/sinking classification with a
//!   one-directional broadcast policy -- pressure never announces its relief.
//! - **Ash Economy**: a bounded station pool that every fine and shop
//!   transaction routes through, scarcity-priced shops, the incinerator
//!   faucet and the itemator sink.
//! - **Hoarding Enforcement**: escalating fines, timed investigations that
//!   reporters can accelerate, and a security unit that walks offenders
//!   through a six-phase seizure, fail-soft at every step.
//! - **Async Design**: a single tokio task owns all mutation, giving the
//!   economy its single-writer guarantee without locks.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zone25::config::Config;
//! use zone25::server::ZoneServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let mut server = ZoneServer::new(config)?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`world`] - Record types, the sled-backed store, display shelves
//! - [`zone`] - Weight model, danger classification, the platform monitor
//! - [`economy`] - Station pool, pricing, shops, crafting, incineration
//! - [`enforcement`] - Reports, investigations, the security unit
//! - [`config`] - Configuration management and validation
//! - [`server`] - The scheduler loop that drives the periodic systems

pub mod config;
pub mod economy;
pub mod enforcement;
pub mod logutil;
pub mod server;
pub mod world;
pub mod zone;

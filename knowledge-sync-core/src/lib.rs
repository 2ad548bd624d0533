#![doc = "knowledge-sync-core: core pipeline library for knowledge-sync."]

//! This crate holds the whole fetch → extract → walk → upload → associate
//! pipeline, its configuration types and its error taxonomy.
//! The concrete HTTP client for the knowledge service lives in the CLI crate;
//! everything here talks to it through [`contract::KnowledgeApi`].
//!
//! # Usage
//! Build a [`config::SyncConfig`], pick a [`contract::KnowledgeApi`] and a
//! [`contract::ArchiveFetcher`], then call [`synchronise::synchronise`].

pub mod collection;
pub mod config;
pub mod contract;
pub mod download;
pub mod error;
pub mod extract;
pub mod report;
pub mod synchronise;
pub mod upload;
pub mod walker;

pub use error::SyncError;

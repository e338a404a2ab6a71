//! Typed client and webhook parser for the Recurly v2 XML API.
//!
//! The hard part of talking to Recurly v2 is the wire format: `nil="nil"` sentinels,
//! `type`-tagged scalars, `href`-only links between resources and `type`-discriminated
//! line items. This crate turns those documents into plain Rust values and back.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐
//! │   client     │   │   webhooks   │  parse_notification(reader)
//! │  (services)  │   │ (dispatcher) │
//! └──────┬───────┘   └──────┬───────┘
//!        │                  │
//! ┌──────▼──────────────────▼───────┐
//! │        models  +  xml codec     │
//! └──────┬──────────────────────────┘
//!        │ Request / TransportResponse
//! ┌──────▼───────┐
//! │  transport   │  HttpTransport (reqwest) or your own
//! └──────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Webhooks
//!
//! ```
//! use recurly::webhooks::{Notification, parse_notification};
//!
//! let body = br#"<?xml version="1.0" encoding="UTF-8"?>
//! <new_subscription_notification>
//!   <account><account_code>1</account_code></account>
//!   <subscription>
//!     <plan><plan_code>gold</plan_code><name>Gold</name></plan>
//!     <uuid>8047cb4fd5f874b14d713d785436ebd3</uuid>
//!     <state>active</state>
//!   </subscription>
//! </new_subscription_notification>"#;
//!
//! match parse_notification(&body[..])? {
//!     Notification::NewSubscription(payload) => {
//!         assert_eq!(payload.account.account_code, "1");
//!         assert_eq!(payload.subscription.plan.code, "gold");
//!     }
//!     other => panic!("unexpected {:?}", other.kind()),
//! }
//! # Ok::<(), recurly::RecurlyError>(())
//! ```
//!
//! ## REST resources
//!
//! ```rust,no_run
//! use recurly::{Client, ClientConfig};
//!
//! # async fn example() -> recurly::Result<()> {
//! let config = ClientConfig::from_file("recurly.toml")?;
//! let client = Client::from_config(&config)?;
//!
//! if let Some(account) = client.accounts().get("1").await? {
//!     println!("{} is {}", account.account_code, account.state);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`xml`]: codec primitives ([`xml::Nullable`], [`xml::Href`], traits)
//! - [`models`]: resource entities and their wire rules
//! - [`webhooks`]: notification registry and dispatcher
//! - [`transport`]: the [`transport::Transport`] seam and the reqwest implementation
//! - [`client`]: typed resource services
//! - [`config`]: TOML configuration

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest"
)]

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod transport;
pub mod webhooks;
pub mod xml;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{ApiErrorDetail, RecurlyError, Result};

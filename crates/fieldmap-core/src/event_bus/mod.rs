//! # Event Bus Module
//!
//! Typed publish/subscribe between the drawing tools, the fetch controller,
//! the clustering layer, and whatever presents their output.
//!
//! ## Overview
//!
//! - Publishers emit typed events without knowing subscribers
//! - Subscribers filter and receive events of interest
//! - Supports both sync handlers and async broadcast receivers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fieldmap_core::event_bus::{AppEvent, DrawingEvent, EventBus, EventCategory, EventFilter};
//!
//! let bus = Arc::new(EventBus::new());
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Drawing]),
//!     |event| {
//!         if let AppEvent::Drawing(DrawingEvent::FeatureAdded { feature }) = event {
//!             println!("added {}", feature.id);
//!         }
//!     },
//! );
//!
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;

//! Hardware-independent UI core for the slate touchscreen panel
//!
//! This crate contains the retained-element layout engine for the slate
//! panel firmware: geometry primitives (overloaded relative/absolute
//! rectangles, display rotation and mirroring), an absolute-positioning
//! strategy, a single-line flexbox strategy, and the adapter that reads and
//! writes computed geometry on the element tree.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets (ESP32-S3) and desktop hosts (for the simulator and
//! tests). Rendering, input routing, and theming live in their own crates
//! and consume this one.

#![no_std]

extern crate alloc;

pub mod element;
pub mod geometry;
pub mod layout;

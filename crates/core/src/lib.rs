//! Domain types and pure logic for the Vision Studio backend.
//!
//! Everything in this crate is I/O-free: wire enums, the generated-video
//! record, the style catalog, YouTube video-ID extraction, and grading
//! prompt construction. Network clients live in `vision-veo` and
//! `vision-auth`.

pub mod error;
pub mod prompt;
pub mod record;
pub mod styles;
pub mod types;
pub mod video_id;

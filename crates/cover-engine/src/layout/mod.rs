//! Layout calculation modules for the cover sheet
//!
//! This module handles the geometric placement of the three cover panels:
//! - Panel rectangles (back, spine, front) inside the bleed-inset area
//! - Scale handling for the side panels
//! - Assembly of placed panels with their loaded artwork

mod placement;
mod types;

pub use placement::*;
pub use types::*;

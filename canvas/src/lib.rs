//! Coordinate and interaction engine for the PDF form-field mapper.
//!
//! This crate owns everything between a raw pointer event on a rendered PDF
//! page and a mutation of the field list: converting canvas pixels to PDF
//! points, snapping to the grid, hit-testing fields, driving the gesture state
//! machine, validating names before form generation, and the JSON map codec.
//! PDF rasterization, form-field injection and AI detection are reached only
//! through the capability traits in [`document`], [`form`] and [`detect`], so
//! the whole crate runs and tests without a browser or a PDF library.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`camera`] | Canvas pixel ↔ PDF point conversions |
//! | [`grid`] | Grid configuration and snapping arithmetic |
//! | [`hit`] | Hit-testing against fields and resize handles |
//! | [`doc`] | Field definitions and the ordered field store |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`engine`] | Testable [`engine::EngineCore`] driving gestures and keyboard nudges |
//! | [`session`] | Document lifecycle, paging, render slot, notices |
//! | [`document`] | PDF document capability and cancellable render tasks |
//! | [`validate`] | Empty/duplicate name checks gating form generation |
//! | [`codec`] | JSON export/import of the field map |
//! | [`detect`] | Detection-service contract and candidate sanitization |
//! | [`form`] | Form-PDF generator contract and widget planning |
//! | [`overlay`] | Renderer-agnostic display list (grid, markers, rubber band) |
//! | [`consts`] | Shared numeric constants |

pub mod camera;
pub mod codec;
pub mod consts;
pub mod detect;
pub mod doc;
pub mod document;
pub mod engine;
pub mod form;
pub mod grid;
pub mod hit;
pub mod input;
pub mod overlay;
pub mod session;
pub mod validate;

//! Layout editor engine for the portfolio admin.
//!
//! The admin arranges photo and artwork tiles on a free-form canvas: drag to
//! move, corner handle to resize, hold-and-drag, wheel, or pinch to scale,
//! plus rotate and z-order buttons. This crate owns that interaction model.
//! It is compiled natively for tests and to WebAssembly for the browser,
//! where the host wires DOM events to [`engine::EditorCore`] and persists the
//! layout through the `folio` service.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Gesture handling, discrete actions, and the [`engine::Action`] list |
//! | [`input`] | Mode, handles, buttons, and the gesture state machine |
//! | [`tile`] | Tile record, geometry, and sparse updates |
//! | [`collection`] | Tiles of one category; z-order planning |
//! | [`placement`] | Grid slot for a newly uploaded tile |
//! | [`snap`] | Grid snapping and scale clamping |
//! | [`history`] | Bounded undo/redo stack |
//! | [`metadata`] | Metadata form validation and patch building |
//! | [`panel`] | Metadata panel save lifecycle |
//! | [`subscription`] | Scoped window-listener subscriptions |
//! | [`web`] | `web-sys` binding of listeners to `window` |
//! | [`geom`] | Points and distances |
//! | [`consts`] | Shared numeric limits |

pub mod collection;
pub mod consts;
pub mod engine;
pub mod geom;
pub mod history;
pub mod input;
pub mod metadata;
pub mod panel;
pub mod placement;
pub mod snap;
pub mod subscription;
pub mod tile;
pub mod web;

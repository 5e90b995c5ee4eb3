//! Interactive theme editor built from kdialog menus.
//!
//! ```text
//! main menu ─┬─ new theme ──┐
//!            ├─ open JSON ──┴─ edit loop ─┬─ name / comment
//!            └─ import (unsupported)      ├─ sounds ─ sound ─ import
//!                                         ├─ save / export / install
//!                                         └─ back (offers to save)
//! ```

mod actions;
mod session;
mod sounds;

pub use session::EditorSession;

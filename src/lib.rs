// Library root
// -----------
// This crate exposes the smoke run as a library. The binary (`main.rs`)
// only wires it to stdout.
//
// Module responsibilities:
// - `api`: blocking HTTP calls against the QuickDesk backend and
//   best-effort field extraction from JSON replies.
// - `session`: tokens, user ids and entity ids captured during a run.
// - `scenario`: the fixed sequence of steps.
// - `ui`: console output for each step.
pub mod api;
pub mod scenario;
pub mod session;
pub mod ui;

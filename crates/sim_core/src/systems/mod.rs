//! Per-kind controllers: enemy decision making and player input handling.

pub mod ai;
pub mod player;

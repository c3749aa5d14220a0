//! Implementation of the checkers environment: board representation, rules of
//! the game and persistence.

pub mod bitboard;
pub mod core;
pub mod persistence;
pub mod position;
pub mod rules;

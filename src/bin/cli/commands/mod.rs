pub mod cards;
pub mod flashcards;
pub mod questions;
pub mod quiz;
pub mod stats;
pub mod subjects;
pub mod topics;
pub mod transfer;

pub mod action;
pub mod language_pack;

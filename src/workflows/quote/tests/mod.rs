mod common;
mod input;

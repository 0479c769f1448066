//! Library half of the `toolcall` binary, split out so the command
//! handlers can be tested without spawning the binary itself.

pub mod cli;

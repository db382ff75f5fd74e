//! Input loading and the HTTP service behind the `hobart` binary.

pub(crate) mod inputs;
pub(crate) mod server;

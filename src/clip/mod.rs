pub(crate) mod config;
pub(crate) mod controller;
pub(crate) mod live;
pub(crate) mod source;
pub(crate) mod state;

pub(crate) mod buffer;
pub(crate) mod handle;
pub(crate) mod surface;

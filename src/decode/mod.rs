pub(crate) mod protocol;
pub(crate) mod range;
pub(crate) mod session;
pub(crate) mod synthetic;
pub(crate) mod worker;

pub(crate) mod controller;
pub(crate) mod gesture;
pub(crate) mod view;

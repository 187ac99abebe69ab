pub(crate) mod decode;
pub(crate) mod gallery;
pub(crate) mod loader;
pub(crate) mod raster;
pub(crate) mod source;

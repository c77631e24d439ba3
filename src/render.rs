pub(crate) mod canvas;
pub(crate) mod frame;
pub(crate) mod layout;
pub(crate) mod text;

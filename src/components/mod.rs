pub(crate) mod hooks;
pub(crate) mod notes;
pub(crate) mod ui;

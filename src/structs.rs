pub mod appstate;
pub mod draft;
pub mod event;
pub mod package;
pub mod server;
pub mod tab;
pub mod timedstring;

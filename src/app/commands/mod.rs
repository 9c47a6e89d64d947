pub mod bootstrap;
pub mod install;
pub mod launcher;
pub mod run;
pub mod start;

pub mod network;
pub mod run;
pub mod selfcheck;
pub mod version;

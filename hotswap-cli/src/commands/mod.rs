pub mod config;
pub mod inspect;
pub mod reload;
pub mod run;

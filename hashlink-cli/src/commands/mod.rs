pub(crate) mod config;
pub(crate) mod count;
pub(crate) mod plan;
pub(crate) mod run;

// Library for tests to access modules

pub mod alert_log;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod input;
pub mod layout;
pub mod models;
pub mod sort_policy;
pub mod sysinfo_repo;
pub mod thresholds;
pub mod ui;
pub mod version;
pub mod worker;

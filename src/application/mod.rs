pub mod use_cases;

pub use use_cases::appearance::AppearanceService;
pub use use_cases::dashboard::DashboardService;

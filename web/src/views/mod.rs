mod login;
pub use login::Login;

mod dashboard;
pub use dashboard::{
    AdminDashboard, AgentDashboard, LandlordDashboard, ServiceProviderDashboard, TenantDashboard,
};

mod sections;
pub use sections::{
    LandlordCaretakers, LandlordFinance, LandlordProperties, LandlordReports, LandlordTenants,
};

mod maintenance;
pub use maintenance::LandlordMaintenance;

pub mod assembly_service;
pub mod chart_service;
pub mod export_service;
pub mod notification_service;
pub mod ratio_service;
pub mod report_service;
pub mod template_service;

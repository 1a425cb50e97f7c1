pub mod analytics_event;
pub mod audit_event;
pub mod deletion_job;

pub use analytics_event::AnalyticsEvent;
pub use audit_event::AuditEvent;
pub use deletion_job::DeletionJob;

pub mod health_report;

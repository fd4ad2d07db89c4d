pub mod excel_write;
pub mod salaries;
pub mod text_report;
pub mod work_orders;
